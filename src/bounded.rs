//! Capacity-bounded append log with oldest-first eviction.

use std::collections::VecDeque;

/// Append-only log that never holds more than `capacity` items.
///
/// Pushing past capacity drops the single oldest entry (FIFO, not LRU).
/// Reading never reorders anything.
#[derive(Clone, Debug)]
pub struct BoundedLog<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedLog<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append `item`, returning the evicted entry if capacity was exceeded.
    pub fn push(&mut self, item: T) -> Option<T> {
        self.items.push_back(item);
        if self.items.len() > self.capacity {
            self.items.pop_front()
        } else {
            None
        }
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

    /// Oldest to newest.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a BoundedLog<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_below_capacity_keeps_everything() {
        let mut log = BoundedLog::new(4);
        for i in 0..3 {
            assert_eq!(log.push(i), None);
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_overflow_keeps_last_c_in_order() {
        let mut log = BoundedLog::new(5);
        for i in 0..23 {
            log.push(i);
        }
        assert_eq!(log.len(), 5);
        assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec![18, 19, 20, 21, 22]);
    }

    #[test]
    fn test_push_returns_evicted_oldest() {
        let mut log = BoundedLog::new(2);
        log.push("a");
        log.push("b");
        assert_eq!(log.push("c"), Some("a"));
        assert_eq!(log.push("d"), Some("b"));
    }

    #[test]
    fn test_clear() {
        let mut log = BoundedLog::new(3);
        log.push(1);
        log.push(2);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.capacity(), 3);
    }

    #[test]
    fn test_zero_capacity_holds_nothing() {
        let mut log = BoundedLog::new(0);
        assert_eq!(log.push(7), Some(7));
        assert!(log.is_empty());
    }

    #[test]
    fn test_ripple_and_line_capacities() {
        let mut ripples = BoundedLog::new(600);
        let mut lines = BoundedLog::new(200);
        for i in 0..1000 {
            ripples.push(i);
            lines.push(i);
        }
        assert_eq!(ripples.len(), 600);
        assert_eq!(lines.len(), 200);
        assert_eq!(ripples.iter().next(), Some(&400));
        assert_eq!(lines.iter().next(), Some(&800));
    }
}
