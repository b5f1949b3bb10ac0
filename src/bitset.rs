//! Lock-free fixed-capacity bitset, the free-slot search underneath every
//! pool in the core. Adapted from the CAS-loop pattern in a slab allocator's
//! free-bitmap search: scan one word at a time, try to claim the lowest
//! clear bit, retry the word on a lost race.

use std::sync::atomic::{AtomicU64, Ordering};

const WORD_BITS: usize = 64;

pub struct AtomicBitset {
    words: Vec<AtomicU64>,
    capacity: usize,
}

impl AtomicBitset {
    pub fn new(capacity: usize) -> Self {
        let word_count = capacity.div_ceil(WORD_BITS).max(1);
        let words = (0..word_count).map(|_| AtomicU64::new(0)).collect();
        Self { words, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Finds a clear bit and atomically sets it, returning its index, or
    /// `None` if every bit in range is set.
    pub fn find_clear_and_set(&self) -> Option<usize> {
        for (word_idx, word) in self.words.iter().enumerate() {
            loop {
                let current = word.load(Ordering::Acquire);
                let bit = (!current).trailing_zeros() as usize;
                if bit >= WORD_BITS {
                    break;
                }
                let index = word_idx * WORD_BITS + bit;
                if index >= self.capacity {
                    break;
                }
                let updated = current | (1u64 << bit);
                match word.compare_exchange(current, updated, Ordering::Release, Ordering::Relaxed) {
                    Ok(_) => return Some(index),
                    Err(_) => continue,
                }
            }
        }
        None
    }

    pub fn clear_bit(&self, index: usize) {
        let word_idx = index / WORD_BITS;
        let bit = index % WORD_BITS;
        self.words[word_idx].fetch_and(!(1u64 << bit), Ordering::Release);
    }

    /// Resets every bit to clear. Only safe with no concurrent access.
    pub fn init(&mut self) {
        for word in &mut self.words {
            *word = AtomicU64::new(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_and_clears_bits() {
        let bs = AtomicBitset::new(10);
        let a = bs.find_clear_and_set().unwrap();
        let b = bs.find_clear_and_set().unwrap();
        assert_ne!(a, b);
        bs.clear_bit(a);
        let c = bs.find_clear_and_set().unwrap();
        assert_eq!(c, a);
    }

    #[test]
    fn exhausts_at_capacity() {
        let bs = AtomicBitset::new(3);
        for _ in 0..3 {
            assert!(bs.find_clear_and_set().is_some());
        }
        assert!(bs.find_clear_and_set().is_none());
    }

    #[test]
    fn capacity_spanning_multiple_words() {
        let bs = AtomicBitset::new(130);
        for _ in 0..130 {
            assert!(bs.find_clear_and_set().is_some());
        }
        assert!(bs.find_clear_and_set().is_none());
    }
}
