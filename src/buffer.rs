//! Append-only store for the samples of one recording session

use crate::types::MotionSample;

/// Ordered, append-only sample storage.
///
/// There is no way to mutate or remove a sample once pushed. Timestamps are
/// kept non-decreasing: a sample stamped earlier than its predecessor is
/// clamped to the predecessor's timestamp before it is stored.
#[derive(Debug, Clone, Default)]
pub struct SampleBuffer {
    samples: Vec<MotionSample>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `capacity` samples
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, mut sample: MotionSample) {
        if let Some(last) = self.samples.last() {
            if sample.timestamp < last.timestamp {
                sample.timestamp = last.timestamp;
            }
        }
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MotionSample> {
        self.samples.iter()
    }

    pub fn as_slice(&self) -> &[MotionSample] {
        &self.samples
    }

    pub fn first(&self) -> Option<&MotionSample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&MotionSample> {
        self.samples.last()
    }

    /// Time between the first and last sample in seconds
    pub fn span_secs(&self) -> f64 {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => 0.0,
        }
    }
}

impl<'a> IntoIterator for &'a SampleBuffer {
    type Item = &'a MotionSample;
    type IntoIter = std::slice::Iter<'a, MotionSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl FromIterator<MotionSample> for SampleBuffer {
    fn from_iter<I: IntoIterator<Item = MotionSample>>(iter: I) -> Self {
        let mut buffer = SampleBuffer::new();
        for sample in iter {
            buffer.push(sample);
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_at(timestamp: f64) -> MotionSample {
        MotionSample {
            timestamp,
            ..Default::default()
        }
    }

    #[test]
    fn test_push_preserves_order() {
        let mut buffer = SampleBuffer::new();
        assert!(buffer.is_empty());

        for i in 0..5 {
            buffer.push(sample_at(i as f64));
        }

        assert_eq!(buffer.len(), 5);
        let timestamps: Vec<f64> = buffer.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(buffer.span_secs(), 4.0);
    }

    #[test]
    fn test_backwards_timestamp_is_clamped() {
        let mut buffer = SampleBuffer::new();
        buffer.push(sample_at(10.0));
        buffer.push(sample_at(9.5));
        buffer.push(sample_at(11.0));

        let timestamps: Vec<f64> = buffer.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![10.0, 10.0, 11.0]);
    }

    #[test]
    fn test_empty_span() {
        assert_eq!(SampleBuffer::new().span_secs(), 0.0);
    }
}
