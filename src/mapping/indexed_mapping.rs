use crate::mapping::NodeMapping;
use crate::mapping::direct_mapping::DirectMapping;
use crate::mapping::sorted_keyed_mapping::SortedKeyedMapping;
use crate::utils::bitarray::BitArray;

/// A mapping from keys to separate child slots: a 256-entry index from key byte to slot, where
/// `0` marks an unused byte and anything else is the slot number plus one. Backs Node48.
pub struct IndexedMapping<N, const WIDTH: usize, const BITWIDTH: usize> {
    child_ptr_indexes: Box<[u8; 256]>,
    children: Box<BitArray<N, WIDTH, BITWIDTH>>,
    pub(crate) num_children: u8,
}

impl<N, const WIDTH: usize, const BITWIDTH: usize> Default for IndexedMapping<N, WIDTH, BITWIDTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, const WIDTH: usize, const BITWIDTH: usize> IndexedMapping<N, WIDTH, BITWIDTH> {
    pub fn new() -> Self {
        assert!(WIDTH < 256);
        Self {
            child_ptr_indexes: Box::new([0; 256]),
            children: Box::new(BitArray::new()),
            num_children: 0,
        }
    }

    pub fn from_keyed<const KM_WIDTH: usize>(km: &mut SortedKeyedMapping<N, KM_WIDTH>) -> Self {
        let mut im = Self::new();
        km.move_into::<WIDTH, Self>(&mut im);
        im
    }

    pub(crate) fn from_direct(dm: &mut DirectMapping<N>) -> Self {
        let mut im = Self::new();
        dm.move_into::<WIDTH, Self>(&mut im);
        im
    }

    /// Moves every child, in ascending key order, into `nm`.
    pub(crate) fn move_into<const NM_WIDTH: usize, NM: NodeMapping<N, NM_WIDTH>>(
        &mut self,
        nm: &mut NM,
    ) {
        for key in 0..=255u8 {
            let pos = std::mem::take(&mut self.child_ptr_indexes[key as usize]);
            if pos == 0 {
                continue;
            }
            if let Some(node) = self.children.erase(pos as usize - 1) {
                nm.add_child(key, node);
            }
        }
        self.num_children = 0;
    }

    #[inline]
    fn slot_for(&self, key: u8) -> Option<usize> {
        match self.child_ptr_indexes[key as usize] {
            0 => None,
            pos => Some(pos as usize - 1),
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (u8, &N)> {
        (0..=255u8).filter_map(move |key| {
            let pos = self.slot_for(key)?;
            self.children.get(pos).map(|node| (key, node))
        })
    }
}

impl<N, const WIDTH: usize, const BITWIDTH: usize> NodeMapping<N, WIDTH>
    for IndexedMapping<N, WIDTH, BITWIDTH>
{
    fn add_child(&mut self, key: u8, node: N) {
        let pos = self
            .children
            .first_free_pos()
            .expect("add_child: no space left");
        self.child_ptr_indexes[key as usize] = (pos + 1) as u8;
        self.children.set(pos, node);
        self.num_children += 1;
    }

    fn seek_child(&self, key: u8) -> Option<&N> {
        self.children.get(self.slot_for(key)?)
    }

    fn seek_child_mut(&mut self, key: u8) -> Option<&mut N> {
        let pos = self.slot_for(key)?;
        self.children.get_mut(pos)
    }

    fn delete_child(&mut self, key: u8) -> Option<N> {
        let pos = self.slot_for(key)?;
        self.child_ptr_indexes[key as usize] = 0;
        let old = self.children.erase(pos);
        if old.is_some() {
            self.num_children -= 1;
        }
        old
    }

    fn num_children(&self) -> usize {
        self.num_children as usize
    }

    fn first(&self) -> Option<&N> {
        self.iter().next().map(|(_, node)| node)
    }

    fn last(&self) -> Option<&N> {
        self.iter().next_back().map(|(_, node)| node)
    }
}
