use std::collections::VecDeque;

/// History capacity used when a configuration does not specify
/// `max_history`, or specifies a non-positive value.
pub const DEFAULT_MAX_HISTORY: usize = 1000;

/// Bounded FIFO of computed indicator values, oldest first.
///
/// Each indicator instance owns exactly one buffer. Once the capacity is
/// reached, pushing evicts the oldest value.
#[derive(Debug, Clone)]
pub struct History {
    values: VecDeque<f64>,
    capacity: usize,
}

impl History {
    /// An empty buffer. A zero capacity clamps to [`DEFAULT_MAX_HISTORY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_MAX_HISTORY
        } else {
            capacity
        };
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Chronological snapshot copy of the retained values.
    pub fn values(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.back().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Empty the buffer; the capacity is retained.
    pub fn reset(&mut self) {
        self.values.clear();
    }
}
