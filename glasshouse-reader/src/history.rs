//! Bounded value-over-time history
//!
//! A fixed-capacity FIFO of timestamped samples. Once full, every push
//! evicts the oldest entry.

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;

/// Upper bound on the up-front allocation; larger buffers grow as they fill
const PREALLOCATED_SAMPLES: usize = 4096;

/// One timestamped value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample<T> {
    /// Decode time relative to the reader session's start
    pub at: Duration,
    pub value: T,
}

/// Ring buffer of samples in append order
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T> {
    samples: VecDeque<Sample<T>>,
    capacity: usize,
}

impl<T: Copy> HistoryBuffer<T> {
    /// Create an empty buffer holding at most `capacity` samples (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity.min(PREALLOCATED_SAMPLES)),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest if full
    pub fn push(&mut self, at: Duration, value: T) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { at, value });
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<Sample<T>> {
        self.samples.back().copied()
    }

    /// Independent copy of all samples, oldest first
    pub fn snapshot(&self) -> Vec<Sample<T>> {
        self.samples.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Copies of both history channels
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct History {
    /// Temperature in °C
    pub temperature: Vec<Sample<f32>>,
    /// Raw gas ADC reading
    pub gas: Vec<Sample<u16>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_overflow_evicts_oldest() {
        let mut buffer = HistoryBuffer::new(3);
        for i in 0..4u16 {
            buffer.push(ms(u64::from(i)), i);
        }

        assert_eq!(buffer.len(), 3);
        let values: Vec<u16> = buffer.snapshot().iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1, 2, 3]);
        assert_eq!(buffer.latest().map(|s| s.at), Some(ms(3)));
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut buffer = HistoryBuffer::new(0);
        buffer.push(ms(0), 1.0f32);
        buffer.push(ms(1), 2.0);
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.snapshot(), vec![Sample { at: ms(1), value: 2.0 }]);
    }

    #[test]
    fn test_huge_capacity_allocates_lazily() {
        let mut buffer = HistoryBuffer::new(usize::MAX);
        buffer.push(ms(0), 1u16);
        assert_eq!(buffer.capacity(), usize::MAX);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut buffer = HistoryBuffer::new(4);
        buffer.push(ms(0), 10u16);
        let copy = buffer.snapshot();
        buffer.push(ms(1), 11);
        buffer.clear();

        assert_eq!(copy.len(), 1);
        assert!(buffer.is_empty());
    }
}
