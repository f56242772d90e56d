use std::collections::VecDeque;

use crate::shared::constants::OFFSET_HISTORY_CAPACITY;

/// Sliding window of recent offset samples, oldest evicted first.
#[derive(Debug, Clone)]
pub struct OffsetHistory {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl OffsetHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, sample: f64) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
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

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    /// Mean absolute change between consecutive samples.
    ///
    /// `None` with fewer than two samples.
    pub fn mean_abs_delta(&self) -> Option<f64> {
        if self.samples.len() < 2 {
            return None;
        }
        let total: f64 = self
            .samples
            .iter()
            .zip(self.samples.iter().skip(1))
            .map(|(prior, current)| (current - prior).abs())
            .sum();
        Some(total / (self.samples.len() - 1) as f64)
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for OffsetHistory {
    fn default() -> Self {
        Self::new(OFFSET_HISTORY_CAPACITY)
    }
}
