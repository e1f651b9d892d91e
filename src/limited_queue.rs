use std::ops::Index;

/// Ring buffer that keeps only the `N` most recently pushed elements.
#[derive(Clone, Debug)]
pub(crate) struct LimitedQueue<T, const N: usize> {
    queue: [T; N],
    start: usize,
    len: usize,
}

impl<T: Copy + Default, const N: usize> LimitedQueue<T, N> {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            queue: [T::default(); N],
            start: 0,
            len: 0,
        }
    }
}

impl<T: Copy + Default, const N: usize> Default for LimitedQueue<T, N> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> LimitedQueue<T, N> {
    #[inline]
    pub(crate) fn push(&mut self, elem: T) {
        if self.len == N {
            self.queue[self.start] = elem;
            self.start = (self.start + 1) % N;
        } else {
            self.queue[(self.start + self.len) % N] = elem;
            self.len += 1;
        }
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) const fn is_full(&self) -> bool {
        self.len == N
    }

    #[inline]
    pub(crate) fn last(&self) -> Option<&T> {
        self.len.checked_sub(1).map(|idx| &self[idx])
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.start = 0;
        self.len = 0;
    }

    /// Iterate from the oldest to the newest element.
    #[inline]
    pub(crate) fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        (0..self.len).map(move |i| &self[i])
    }
}

impl<T, const N: usize> Index<usize> for LimitedQueue<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, idx: usize) -> &Self::Output {
        &self.queue[(self.start + idx) % N]
    }
}

#[cfg(test)]
mod tests {
    use super::LimitedQueue;

    #[test]
    fn empty() {
        let queue = LimitedQueue::<u8, 4>::new();

        assert!(queue.is_empty());
        assert_eq!(queue.last(), None);
        assert_eq!(queue.iter().count(), 0);
    }

    #[test]
    fn overwrites_oldest() {
        let mut queue = LimitedQueue::<u8, 3>::new();

        for i in 1..=5 {
            queue.push(i);
        }

        assert!(queue.is_full());
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(queue[0], 3);
        assert_eq!(queue.last(), Some(&5));
    }

    #[test]
    fn clear_resets() {
        let mut queue = LimitedQueue::<u8, 2>::new();
        queue.push(1);
        queue.push(2);
        queue.push(3);
        queue.clear();
        queue.push(4);

        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![4]);
    }
}
