use std::mem::MaybeUninit;

use crate::utils::bitset::Bitset64;

/// Fixed-capacity slot array; occupancy is tracked in a bitset so only occupied slots are ever
/// read or dropped.
// BITSET_WIDTH must be RANGE_WIDTH / 64, rounded up.
pub struct BitArray<X, const RANGE_WIDTH: usize, const BITSET_WIDTH: usize> {
    bitset: Bitset64<BITSET_WIDTH>,
    storage: [MaybeUninit<X>; RANGE_WIDTH],
}

impl<X, const RANGE_WIDTH: usize, const BITSET_WIDTH: usize>
    BitArray<X, RANGE_WIDTH, BITSET_WIDTH>
{
    pub fn new() -> Self {
        assert!(BITSET_WIDTH * 64 >= RANGE_WIDTH);

        Self {
            bitset: Bitset64::new(),
            storage: [const { MaybeUninit::uninit() }; RANGE_WIDTH],
        }
    }

    #[inline]
    pub fn first_free_pos(&self) -> Option<usize> {
        self.bitset.first_empty().filter(|pos| *pos < RANGE_WIDTH)
    }

    #[inline]
    pub fn first_used_pos(&self) -> Option<usize> {
        self.bitset.first()
    }

    #[inline]
    pub fn last_used_pos(&self) -> Option<usize> {
        self.bitset.last()
    }

    #[inline]
    pub fn get(&self, pos: usize) -> Option<&X> {
        assert!(pos < RANGE_WIDTH);
        if self.bitset.check(pos) {
            Some(unsafe { self.storage[pos].assume_init_ref() })
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, pos: usize) -> Option<&mut X> {
        assert!(pos < RANGE_WIDTH);
        if self.bitset.check(pos) {
            Some(unsafe { self.storage[pos].assume_init_mut() })
        } else {
            None
        }
    }

    /// Stores `x` at `pos`, returning whatever was there before.
    #[inline]
    pub fn set(&mut self, pos: usize, x: X) -> Option<X> {
        let old = self.erase(pos);
        self.storage[pos].write(x);
        self.bitset.set(pos);
        old
    }

    #[inline]
    pub fn erase(&mut self, pos: usize) -> Option<X> {
        assert!(pos < RANGE_WIDTH);
        if !self.bitset.check(pos) {
            return None;
        }
        self.bitset.unset(pos);
        let old = std::mem::replace(&mut self.storage[pos], MaybeUninit::uninit());
        Some(unsafe { old.assume_init() })
    }

    pub fn clear(&mut self) {
        for i in self.bitset.iter() {
            unsafe { self.storage[i].assume_init_drop() }
        }
        self.bitset.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bitset.is_empty()
    }

    pub fn size(&self) -> usize {
        self.bitset.size()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (usize, &X)> {
        self.storage.iter().enumerate().filter_map(|(pos, x)| {
            if self.bitset.check(pos) {
                Some((pos, unsafe { x.assume_init_ref() }))
            } else {
                None
            }
        })
    }
}

impl<X, const RANGE_WIDTH: usize, const BITSET_WIDTH: usize> Default
    for BitArray<X, RANGE_WIDTH, BITSET_WIDTH>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<X, const RANGE_WIDTH: usize, const BITSET_WIDTH: usize> Drop
    for BitArray<X, RANGE_WIDTH, BITSET_WIDTH>
{
    fn drop(&mut self) {
        self.clear();
    }
}
