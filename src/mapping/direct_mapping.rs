use crate::mapping::NodeMapping;
use crate::mapping::indexed_mapping::IndexedMapping;
use crate::utils::bitarray::BitArray;

/// One slot per possible key byte. Backs Node256.
pub struct DirectMapping<N> {
    pub(crate) children: Box<BitArray<N, 256, 4>>,
    num_children: usize,
}

impl<N> Default for DirectMapping<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> DirectMapping<N> {
    pub fn new() -> Self {
        Self {
            children: Box::new(BitArray::new()),
            num_children: 0,
        }
    }

    pub fn from_indexed<const WIDTH: usize, const BITWIDTH: usize>(
        im: &mut IndexedMapping<N, WIDTH, BITWIDTH>,
    ) -> Self {
        let mut new_mapping = DirectMapping::<N>::new();
        im.move_into::<256, Self>(&mut new_mapping);
        new_mapping
    }

    /// Moves every child, in ascending key order, into `nm`.
    pub(crate) fn move_into<const NM_WIDTH: usize, NM: NodeMapping<N, NM_WIDTH>>(
        &mut self,
        nm: &mut NM,
    ) {
        for key in 0..=255u8 {
            if let Some(node) = self.children.erase(key as usize) {
                nm.add_child(key, node);
            }
        }
        self.num_children = 0;
    }

    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (u8, &N)> {
        self.children.iter().map(|(key, node)| (key as u8, node))
    }
}

impl<N> NodeMapping<N, 256> for DirectMapping<N> {
    #[inline]
    fn add_child(&mut self, key: u8, node: N) {
        if self.children.set(key as usize, node).is_none() {
            self.num_children += 1;
        }
    }

    #[inline]
    fn seek_child(&self, key: u8) -> Option<&N> {
        self.children.get(key as usize)
    }

    #[inline]
    fn seek_child_mut(&mut self, key: u8) -> Option<&mut N> {
        self.children.get_mut(key as usize)
    }

    #[inline]
    fn delete_child(&mut self, key: u8) -> Option<N> {
        let n = self.children.erase(key as usize);
        if n.is_some() {
            self.num_children -= 1;
        }
        n
    }

    #[inline]
    fn num_children(&self) -> usize {
        self.num_children
    }

    fn first(&self) -> Option<&N> {
        self.children.get(self.children.first_used_pos()?)
    }

    fn last(&self) -> Option<&N> {
        self.children.get(self.children.last_used_pos()?)
    }
}
