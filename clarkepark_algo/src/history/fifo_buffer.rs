// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

/// Fixed-length FIFO holding the `N` most recent samples.
///
/// Length never changes: every write evicts the oldest sample. Reads are
/// indexed newest-first, index `0` being the last written sample.
#[derive(Clone, Debug)]
pub struct BufferFIFO<T, const N: usize> {
    buffer: [T; N],

    idx: usize, // Slot of the oldest sample, overwritten by the next write
}

impl<T, const N: usize> BufferFIFO<T, N>
where
    T: Default + Copy,
{
    /// Creates a buffer filled with `T::default()` samples
    pub fn new() -> Self {
        Self {
            buffer: [T::default(); N],
            idx: 0,
        }
    }

    /// Stores `value` as the newest sample and returns the evicted oldest one.
    pub fn push(&mut self, value: T) -> T {
        let evicted = self.buffer[self.idx];
        self.buffer[self.idx] = value;
        self.idx = (self.idx + 1) % N;
        evicted
    }

    /// Newest sample
    pub fn newest(&self) -> T {
        self.buffer[(self.idx + N - 1) % N]
    }

    /// Oldest sample, the one the next push evicts
    pub fn oldest(&self) -> T {
        self.buffer[self.idx]
    }

    /// Sample `age` writes back, `0` being the newest. `None` past the capacity.
    pub fn get(&self, age: usize) -> Option<T> {
        if age >= N {
            return None;
        }
        Some(self.buffer[(self.idx + N - 1 - age) % N])
    }

    /// Iterates all `N` samples from newest to oldest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = T> + '_ {
        (0..N).map(move |age| self.buffer[(self.idx + N - 1 - age) % N])
    }

    /// Copies samples out in newest-first order
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Refills every slot with `T::default()`
    pub fn clear(&mut self) {
        self.buffer = [T::default(); N];
        self.idx = 0;
    }

    /// Always `N`
    pub const fn len(&self) -> usize {
        N
    }

    /// Always `false`, a buffer is never shorter than its capacity
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl<T, const N: usize> Default for BufferFIFO<T, N>
where
    T: Default + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

// Equality compares samples in age order, the write cursor is irrelevant
impl<T, const N: usize> PartialEq for BufferFIFO<T, N>
where
    T: Default + Copy + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_default_fill() {
        let buf: BufferFIFO<i32, 4> = BufferFIFO::new();
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.to_vec(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn newest_first_order_after_wraparound() {
        let mut buf: BufferFIFO<i32, 4> = BufferFIFO::new();
        for v in 1..=6 {
            buf.push(v);
        }
        assert_eq!(buf.to_vec(), vec![6, 5, 4, 3]);
        assert_eq!(buf.newest(), 6);
        assert_eq!(buf.oldest(), 3);
        assert_eq!(buf.get(1), Some(5));
        assert_eq!(buf.get(4), None);
    }

    #[test]
    fn push_returns_evicted_sample() {
        let mut buf: BufferFIFO<i32, 3> = BufferFIFO::new();
        assert_eq!(buf.push(7), 0);
        buf.push(8);
        buf.push(9);
        assert_eq!(buf.push(10), 7);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn clear_restores_initial_fill() {
        let mut buf: BufferFIFO<i32, 5> = BufferFIFO::new();
        for v in 0..17 {
            buf.push(v);
        }
        buf.clear();
        assert_eq!(buf, BufferFIFO::new());
    }

    #[test]
    fn equality_ignores_write_cursor() {
        let mut shifted: BufferFIFO<i32, 3> = BufferFIFO::new();
        shifted.push(0);
        assert_eq!(shifted, BufferFIFO::new());
        shifted.push(1);
        assert_ne!(shifted, BufferFIFO::new());
    }

    #[test]
    fn single_slot_buffer() {
        let mut buf: BufferFIFO<u8, 1> = BufferFIFO::new();
        buf.push(3);
        assert_eq!(buf.to_vec(), vec![3]);
        assert_eq!(buf.push(4), 3);
        assert_eq!(buf.newest(), buf.oldest());
    }
}
