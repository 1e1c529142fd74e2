//! Channel downmix and sample-rate conversion.
//!
//! The recognizer consumes **16 kHz mono `f32`**.  Microphones and WAV files
//! deliver whatever they like, so every source funnels through
//! [`to_recognizer_format`].  Resampling is linear interpolation, which is
//! plenty for speech recognition input.

/// Sample rate every recognizer in this crate expects.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Average interleaved `channels` down to one channel.
///
/// `channels == 0` yields nothing; a trailing partial frame is dropped.
///
/// ```rust
/// use voice_concierge::audio::downmix;
///
/// assert_eq!(downmix(&[0.5, -0.5, 0.25, 0.75], 2), vec![0.0, 0.5]);
/// ```
pub fn downmix(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = usize::from(n);
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

/// Linearly resample mono `samples` from `from_rate` to `to_rate` Hz.
///
/// ```rust
/// use voice_concierge::audio::resample;
///
/// assert_eq!(resample(&[0.5; 480], 48_000, 16_000).len(), 160);
/// assert_eq!(resample(&[0.5; 80], 8_000, 16_000).len(), 160);
/// ```
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == 0 || to_rate == 0 {
        return Vec::new();
    }
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let step = f64::from(from_rate) / f64::from(to_rate);
    let out_len = (samples.len() as f64 / step).ceil() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = (pos as usize).min(last);
            let next = (idx + 1).min(last);
            let frac = (pos - idx as f64) as f32;
            samples[idx] + (samples[next] - samples[idx]) * frac
        })
        .collect()
}

/// Downmix and resample to 16 kHz mono in one go.
pub fn to_recognizer_format(samples: &[f32], sample_rate: u32, channels: u16) -> Vec<f32> {
    let mono = downmix(samples, channels);
    resample(&mono, sample_rate, TARGET_SAMPLE_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_mono_is_identity() {
        assert_eq!(downmix(&[0.1, 0.2, 0.3], 1), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn downmix_four_channels() {
        let out = downmix(&[0.4_f32; 8], 4);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|s| (s - 0.4).abs() < 1e-6));
    }

    #[test]
    fn downmix_zero_channels() {
        assert!(downmix(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn same_rate_is_identity() {
        let input: Vec<f32> = (0..160).map(|i| i as f32 / 160.0).collect();
        assert_eq!(resample(&input, 16_000, 16_000), input);
    }

    #[test]
    fn empty_input() {
        assert!(resample(&[], 48_000, 16_000).is_empty());
    }

    #[test]
    fn one_second_at_44100_becomes_one_second_at_16k() {
        let out = resample(&vec![0.0_f32; 44_100], 44_100, 16_000);
        assert!(out.len().abs_diff(16_000) <= 1, "got {}", out.len());
    }

    #[test]
    fn dc_level_is_preserved() {
        let out = resample(&[0.5_f32; 480], 48_000, 16_000);
        assert!(out.iter().all(|s| (s - 0.5).abs() < 1e-5));
    }

    #[test]
    fn stereo_48k_to_recognizer_format() {
        let stereo = vec![0.25_f32; 960]; // 10 ms stereo @ 48 kHz
        let out = to_recognizer_format(&stereo, 48_000, 2);
        assert_eq!(out.len(), 160);
    }
}
