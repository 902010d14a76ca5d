use std::collections::VecDeque;

/// Fixed-capacity FIFO of episode outcomes
#[derive(Debug, Clone)]
pub struct SuccessWindow {
    outcomes: VecDeque<bool>,
    capacity: usize,
    successes: usize,
}

impl SuccessWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            outcomes: VecDeque::with_capacity(capacity),
            capacity,
            successes: 0,
        }
    }

    pub fn push(&mut self, success: bool) {
        if self.outcomes.len() >= self.capacity
            && let Some(true) = self.outcomes.pop_front()
        {
            self.successes -= 1;
        }
        self.outcomes.push_back(success);
        if success {
            self.successes += 1;
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.outcomes.len() == self.capacity
    }

    pub fn successes(&self) -> usize {
        self.successes
    }

    /// Success rate over whatever has been collected so far
    pub fn rate(&self) -> f32 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.successes as f32 / self.outcomes.len() as f32
        }
    }

    /// Success rate over the full capacity, once there is enough data for it
    pub fn full_rate(&self) -> Option<f32> {
        self.is_full()
            .then(|| self.successes as f32 / self.capacity as f32)
    }
}
