use std::collections::VecDeque;

/// Number of generations the tracker looks back over.
pub const WINDOW: usize = 10;

/// Rolling window over the most recent live-cell totals.
///
/// A constant total is only a hint that the board has settled: two different boards can hold the
/// same number of live cells, so oscillators and spaceships with a fixed population also read as
/// static.
#[derive(Clone, Debug, Default)]
pub struct StabilityTracker {
    history: VecDeque<usize>,
}

impl StabilityTracker {
    pub fn new() -> Self {
        Self {
            history: VecDeque::with_capacity(WINDOW + 1),
        }
    }

    pub fn update(&mut self, live: usize) {
        self.history.push_back(live);
        if self.history.len() > WINDOW {
            self.history.pop_front();
        }
    }

    pub fn is_static(&self) -> bool {
        match self.history.front() {
            Some(first) => self.history.iter().all(|v| v == first),
            None => false,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Oldest first.
    #[cfg(test)]
    pub fn history(&self) -> impl Iterator<Item = usize> + '_ {
        self.history.iter().copied()
    }
}
