use std::ops::Index;

use num_traits::PrimInt;

// TODO: The bulk of these parameters can be deleted and automatically derived when
// generic_const_exprs lands in stable.
pub struct Bitset<
    StorageType,
    const BIT_WIDTH: usize,
    const SHIFT: usize,
    const STORAGE_WIDTH: usize,
> where
    StorageType: PrimInt,
{
    bitset: [StorageType; STORAGE_WIDTH],
}

impl<StorageType, const BIT_WIDTH: usize, const SHIFT: usize, const STORAGE_WIDTH: usize>
    Bitset<StorageType, BIT_WIDTH, SHIFT, STORAGE_WIDTH>
where
    StorageType: PrimInt,
{
    pub fn new() -> Self {
        Self {
            bitset: [StorageType::zero(); STORAGE_WIDTH],
        }
    }

    pub fn first_empty(&self) -> Option<usize> {
        for (i, b) in self.bitset.iter().enumerate() {
            if b.is_zero() {
                return Some(i << SHIFT);
            }
            if *b != StorageType::max_value() {
                return Some((i << SHIFT) + b.trailing_ones() as usize);
            }
        }
        None
    }

    #[inline]
    pub fn set(&mut self, pos: usize) {
        assert!(pos < STORAGE_WIDTH * BIT_WIDTH);
        let shift = StorageType::one() << (pos % BIT_WIDTH);
        self.bitset[pos >> SHIFT] = self.bitset[pos >> SHIFT] | shift;
    }

    #[inline]
    pub fn unset(&mut self, pos: usize) {
        assert!(pos < STORAGE_WIDTH * BIT_WIDTH);
        let shift = StorageType::one() << (pos % BIT_WIDTH);
        self.bitset[pos >> SHIFT] = self.bitset[pos >> SHIFT] & !shift;
    }

    #[inline]
    pub fn check(&self, pos: usize) -> bool {
        assert!(pos < STORAGE_WIDTH * BIT_WIDTH);
        let shift = StorageType::one() << (pos % BIT_WIDTH);
        !(self.bitset[pos >> SHIFT] & shift).is_zero()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.bitset.fill(StorageType::zero());
    }

    /// Lowest set position.
    pub fn first(&self) -> Option<usize> {
        self.bitset
            .iter()
            .enumerate()
            .find(|(_, b)| !b.is_zero())
            .map(|(i, b)| (i << SHIFT) + b.trailing_zeros() as usize)
    }

    /// Highest set position.
    pub fn last(&self) -> Option<usize> {
        self.bitset
            .iter()
            .enumerate()
            .rev()
            .find(|(_, b)| !b.is_zero())
            .map(|(i, b)| (i << SHIFT) + (BIT_WIDTH - 1) - b.leading_zeros() as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.bitset.iter().all(|x| x.is_zero())
    }

    pub fn size(&self) -> usize {
        self.bitset.iter().map(|x| x.count_ones() as usize).sum()
    }

    pub fn capacity(&self) -> usize {
        STORAGE_WIDTH * BIT_WIDTH
    }

    /// Set positions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bitset.iter().enumerate().flat_map(|(i, b)| {
            let mut word = *b;
            std::iter::from_fn(move || {
                if word.is_zero() {
                    return None;
                }
                let j = word.trailing_zeros() as usize;
                word = word & (word - StorageType::one());
                Some((i << SHIFT) + j)
            })
        })
    }
}

impl<StorageType, const BIT_WIDTH: usize, const SHIFT: usize, const STORAGE_WIDTH: usize> Default
    for Bitset<StorageType, BIT_WIDTH, SHIFT, STORAGE_WIDTH>
where
    StorageType: PrimInt,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<StorageType, const BIT_WIDTH: usize, const SHIFT: usize, const STORAGE_WIDTH: usize>
    Index<usize> for Bitset<StorageType, BIT_WIDTH, SHIFT, STORAGE_WIDTH>
where
    StorageType: PrimInt,
{
    type Output = bool;

    #[inline]
    fn index(&self, pos: usize) -> &Self::Output {
        if self.check(pos) { &true } else { &false }
    }
}

pub type Bitset64<const STORAGE_WIDTH_U64: usize> = Bitset<u64, 64, 6, STORAGE_WIDTH_U64>;
pub type Bitset8<const STORAGE_WIDTH_U8: usize> = Bitset<u8, 8, 3, STORAGE_WIDTH_U8>;

#[cfg(test)]
mod tests {
    #[test]
    fn test_first_free_8s() {
        let mut bs = super::Bitset8::<4>::new();
        bs.set(1);
        bs.set(3);
        assert_eq!(bs.first_empty(), Some(0));
        bs.set(0);
        assert_eq!(bs.first_empty(), Some(2));

        // Now fill it up and verify none.
        for i in 0..bs.capacity() {
            bs.set(i);
        }
        assert_eq!(bs.first_empty(), None);
    }

    #[test]
    fn test_first_free_64s() {
        let mut bs = super::Bitset64::<4>::new();
        bs.set(1);
        bs.set(3);
        assert_eq!(bs.first_empty(), Some(0));
        bs.set(0);
        assert_eq!(bs.first_empty(), Some(2));
        for i in 0..64 {
            bs.set(i);
        }
        assert_eq!(bs.first_empty(), Some(64));
    }

    #[test]
    fn test_first_last_span_words() {
        let mut bs = super::Bitset64::<4>::new();
        assert_eq!(bs.first(), None);
        assert_eq!(bs.last(), None);
        bs.set(70);
        bs.set(3);
        bs.set(200);
        assert_eq!(bs.first(), Some(3));
        assert_eq!(bs.last(), Some(200));
        bs.unset(200);
        assert_eq!(bs.last(), Some(70));
        bs.unset(3);
        assert_eq!(bs.first(), Some(70));
        assert_eq!(bs.size(), 1);
    }

    #[test]
    fn test_iter_64s() {
        let mut bs = super::Bitset64::<4>::new();
        for i in [0, 1, 2, 4, 8, 16, 32, 47, 48, 49, 127, 255] {
            bs.set(i);
        }
        let v: Vec<usize> = bs.iter().collect();
        assert_eq!(v, vec![0, 1, 2, 4, 8, 16, 32, 47, 48, 49, 127, 255]);
        assert!(bs[127]);
        assert!(!bs[126]);
        bs.clear();
        assert!(bs.is_empty());
    }
}
