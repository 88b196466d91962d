use std::collections::VecDeque;

/// Samples kept per metric when nothing else is configured.
pub const DEFAULT_CAPACITY: usize = 30;

/// Rolling window of one metric's samples, oldest first. Feeds the trend
/// charts.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryBuffer {
    samples:  VecDeque<f32>,
    capacity: usize,
}

impl HistoryBuffer {
    /// A zero capacity is bumped to 1 so the buffer can always hold the
    /// latest reading.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest if at capacity.
    pub fn push(&mut self, value: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Samples in chronological order; index 0 is the oldest.
    pub fn values(&self) -> Vec<f32> {
        self.samples.iter().copied().collect()
    }

    /// Change the window size, dropping the oldest samples if it shrinks.
    pub fn set_capacity(&mut self, capacity: usize) {
        let capacity = capacity.max(1);
        while self.samples.len() > capacity {
            self.samples.pop_front();
        }
        self.capacity = capacity;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_last_thirty_of_thirty_five() {
        let mut buf = HistoryBuffer::new(DEFAULT_CAPACITY);
        for v in 1..=35 {
            buf.push(v as f32);
        }
        let expected: Vec<f32> = (6..=35).map(|v| v as f32).collect();
        assert_eq!(buf.values(), expected);
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut buf = HistoryBuffer::new(30);
        for v in 0..200 {
            buf.push((v % 100) as f32);
            assert!(buf.len() <= 30);
        }
        assert_eq!(buf.len(), 30);
        assert_eq!(buf.values().last(), Some(&99.0));
    }

    #[test]
    fn shrinking_evicts_oldest() {
        let mut buf = HistoryBuffer::new(5);
        for v in 1..=5 {
            buf.push(v as f32);
        }
        buf.set_capacity(2);
        assert_eq!(buf.capacity(), 2);
        assert_eq!(buf.values(), vec![4.0, 5.0]);
        buf.push(6.0);
        assert_eq!(buf.values(), vec![5.0, 6.0]);
    }
}
