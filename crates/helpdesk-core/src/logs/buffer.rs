use std::collections::VecDeque;

/// Number of log entries the live view keeps.
pub const LOG_BUFFER_CAPACITY: usize = 50;

/// Fixed-capacity FIFO that drops its oldest element on overflow.
///
/// Insertion order is display order. `len() <= capacity()` holds after every
/// call; a push appends first and then trims from the front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollingLogBuffer<T = String> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingLogBuffer<T> {
    /// Buffer holding at most `capacity` items.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity.saturating_add(1)),
            capacity,
        }
    }

    /// Append `item`, evicting from the front until the bound holds again.
    ///
    /// Returns the evicted item, if any.
    pub fn push(&mut self, item: T) -> Option<T> {
        self.items.push_back(item);
        let mut evicted = None;
        while self.items.len() > self.capacity {
            evicted = self.items.pop_front();
        }
        evicted
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Items from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    #[must_use]
    pub fn newest(&self) -> Option<&T> {
        self.items.back()
    }

    #[must_use]
    pub fn oldest(&self) -> Option<&T> {
        self.items.front()
    }
}

impl<T> Default for RollingLogBuffer<T> {
    fn default() -> Self {
        Self::with_capacity(LOG_BUFFER_CAPACITY)
    }
}

impl<'a, T> IntoIterator for &'a RollingLogBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
