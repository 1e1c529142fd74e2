//! Bounded sample window for the utterance being recognised.
//!
//! [`RingBuffer`] keeps at most `capacity` samples; pushing past that drops
//! the oldest ones, so a speaker who never pauses cannot grow the decoder
//! input without bound.  Unlike a drain-style buffer it can be re-read with
//! [`RingBuffer::snapshot`] every time the recognizer re-decodes.
//!
//! ```rust
//! use voice_concierge::audio::RingBuffer;
//!
//! let mut buf = RingBuffer::new(4);
//! buf.push_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
//! assert_eq!(buf.snapshot(), vec![2.0, 3.0, 4.0, 5.0]);
//! assert_eq!(buf.len(), 4); // snapshot does not consume
//! ```

use std::collections::VecDeque;

/// Fixed-capacity FIFO that overwrites its oldest items.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T: Copy> RingBuffer<T> {
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be > 0");
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push_slice(&mut self, data: &[T]) {
        // Only the newest `capacity` items of `data` can survive.
        let tail = &data[data.len().saturating_sub(self.capacity)..];
        let overflow = (self.items.len() + tail.len()).saturating_sub(self.capacity);
        self.items.drain(..overflow);
        self.items.extend(tail.iter().copied());
    }

    /// Contents in chronological order, leaving the buffer untouched.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Buffered duration in seconds at `sample_rate` Hz mono.
    pub fn duration_secs(&self, sample_rate: u32) -> f32 {
        if sample_rate == 0 {
            return 0.0;
        }
        self.items.len() as f32 / sample_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_everything_within_capacity() {
        let mut buf = RingBuffer::new(8);
        buf.push_slice(&[1.0_f32, 2.0, 3.0]);
        assert_eq!(buf.snapshot(), vec![1.0, 2.0, 3.0]);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn overflow_across_pushes_drops_oldest() {
        let mut buf = RingBuffer::new(3);
        buf.push_slice(&[1.0_f32, 2.0, 3.0]);
        buf.push_slice(&[4.0, 5.0]);
        assert_eq!(buf.snapshot(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn single_push_larger_than_capacity() {
        let mut buf = RingBuffer::new(4);
        buf.push_slice(&[1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(buf.snapshot(), vec![5.0, 6.0, 7.0, 8.0]);
        assert_eq!(buf.len(), buf.capacity());
    }

    #[test]
    fn clear_then_reuse() {
        let mut buf = RingBuffer::new(2);
        buf.push_slice(&[1.0_f32, 2.0, 3.0]);
        buf.clear();
        assert!(buf.is_empty());
        buf.push_slice(&[9.0]);
        assert_eq!(buf.snapshot(), vec![9.0]);
    }

    #[test]
    fn duration_in_seconds() {
        let mut buf = RingBuffer::new(16_000);
        buf.push_slice(&vec![0.0_f32; 8_000]);
        assert!((buf.duration_secs(16_000) - 0.5).abs() < 1e-6);
        assert_eq!(buf.duration_secs(0), 0.0);
    }

    #[test]
    #[should_panic(expected = "RingBuffer capacity must be > 0")]
    fn zero_capacity_panics() {
        let _buf: RingBuffer<f32> = RingBuffer::new(0);
    }
}
