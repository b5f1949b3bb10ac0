//! `FixedSlab<T>`: a fixed-capacity pool of `T`, indexed by the slot
//! `AtomicBitset` hands out. Every pool in the core (sensor table, request
//! table) is one of these.

use crate::bitset::AtomicBitset;

pub struct FixedSlab<T> {
    bitset: AtomicBitset,
    slots: Vec<Option<T>>,
}

impl<T> FixedSlab<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            bitset: AtomicBitset::new(capacity),
            slots: (0..capacity).map(|_| None).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn try_insert(&mut self, value: T) -> Option<usize> {
        let index = self.bitset.find_clear_and_set()?;
        self.slots[index] = Some(value);
        Some(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        let taken = self.slots.get_mut(index)?.take();
        if taken.is_some() {
            self.bitset.clear_bit(index);
        }
        taken
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)?.as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)?.as_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| s.as_ref().map(|v| (i, v)))
    }
}
