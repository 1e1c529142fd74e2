//! Energy-based voice activity detection.
//!
//! Audio is cut into 30 ms frames (480 samples at 16 kHz); a frame is voice
//! when its RMS exceeds the threshold.  The endpoint detector consumes the
//! per-frame verdicts to measure trailing silence, and the streaming
//! recognizer uses [`VadDetector::trim_silence`] to keep leading and trailing
//! quiet out of the decoder input.

/// Verdict for one analysis frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Number of samples in the frame (the last frame of a chunk may be short).
    pub len: usize,
    pub voiced: bool,
}

/// RMS-threshold frame classifier.
///
/// ```rust
/// use voice_concierge::audio::VadDetector;
///
/// let vad = VadDetector::new(0.01);
/// let mut audio = vec![0.0_f32; 480];
/// audio.extend(vec![0.5_f32; 480]);
///
/// let voiced: Vec<bool> = vad.frames(&audio).map(|f| f.voiced).collect();
/// assert_eq!(voiced, vec![false, true]);
/// ```
#[derive(Debug, Clone)]
pub struct VadDetector {
    rms_threshold: f32,
    frame_size: usize,
}

impl VadDetector {
    /// 30 ms frames at 16 kHz.
    pub fn new(rms_threshold: f32) -> Self {
        Self::with_frame_size(rms_threshold, 480)
    }

    /// # Panics
    ///
    /// Panics if `frame_size == 0`.
    pub fn with_frame_size(rms_threshold: f32, frame_size: usize) -> Self {
        assert!(frame_size > 0, "frame_size must be > 0");
        Self {
            rms_threshold,
            frame_size,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.rms_threshold
    }

    pub fn is_voice(&self, frame: &[f32]) -> bool {
        if frame.is_empty() {
            return false;
        }
        let mean_sq = frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32;
        mean_sq.sqrt() > self.rms_threshold
    }

    /// Classify `audio` frame by frame.
    pub fn frames<'a>(&'a self, audio: &'a [f32]) -> impl Iterator<Item = Frame> + 'a {
        audio.chunks(self.frame_size).map(move |chunk| Frame {
            len: chunk.len(),
            voiced: self.is_voice(chunk),
        })
    }

    /// Sub-slice from the first to the last voiced frame; empty when silent.
    pub fn trim_silence<'a>(&self, audio: &'a [f32]) -> &'a [f32] {
        let voiced: Vec<bool> = self.frames(audio).map(|f| f.voiced).collect();

        let Some(first) = voiced.iter().position(|v| *v) else {
            return &audio[..0];
        };
        let last = voiced.iter().rposition(|v| *v).unwrap_or(first);

        let start = first * self.frame_size;
        let end = ((last + 1) * self.frame_size).min(audio.len());
        &audio[start..end]
    }
}
