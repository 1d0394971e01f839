use std::mem::MaybeUninit;

use crate::mapping::NodeMapping;
use crate::mapping::indexed_mapping::IndexedMapping;
use crate::utils::u8_keys::{
    u8_keys_find_insert_position_sorted, u8_keys_find_key_position_sorted,
};

/// Maps a key to a node, using a sorted array of keys and a corresponding array of nodes.
/// The first `num_children` positions of both arrays are occupied, everything after is not.
/// When an item is inserted or deleted the items to the right of it are shifted, in order to
/// keep the arrays dense and sorted. Backs both Node4 and Node16.
pub struct SortedKeyedMapping<N, const WIDTH: usize> {
    pub(crate) keys: [u8; WIDTH],
    pub(crate) children: Box<[MaybeUninit<N>; WIDTH]>,
    pub(crate) num_children: u8,
}

impl<N, const WIDTH: usize> Default for SortedKeyedMapping<N, WIDTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, const WIDTH: usize> SortedKeyedMapping<N, WIDTH> {
    #[inline]
    pub fn new() -> Self {
        Self {
            keys: [255; WIDTH],
            children: Box::new([const { MaybeUninit::uninit() }; WIDTH]),
            num_children: 0,
        }
    }

    /// Rebuilds a mapping of another width from `km`, leaving `km` empty.
    pub fn from_resized<const OLD_WIDTH: usize>(km: &mut SortedKeyedMapping<N, OLD_WIDTH>) -> Self {
        assert!(km.num_children as usize <= WIDTH);
        let mut new = SortedKeyedMapping::new();
        for i in 0..km.num_children as usize {
            new.keys[i] = km.keys[i];
            new.children[i] = std::mem::replace(&mut km.children[i], MaybeUninit::uninit());
        }
        new.num_children = km.num_children;
        km.num_children = 0;
        new
    }

    pub fn from_indexed<const IM_WIDTH: usize, const BITWIDTH: usize>(
        im: &mut IndexedMapping<N, IM_WIDTH, BITWIDTH>,
    ) -> Self {
        let mut new = SortedKeyedMapping::new();
        im.move_into::<WIDTH, Self>(&mut new);
        new
    }

    /// Returns the key and value of the only child, and removes it from the mapping.
    pub fn take_only_child(&mut self) -> (u8, N) {
        assert_eq!(self.num_children, 1);
        let value = std::mem::replace(&mut self.children[0], MaybeUninit::uninit());
        self.num_children = 0;
        (self.keys[0], unsafe { value.assume_init() })
    }

    /// Moves every child, in ascending key order, into `nm`.
    pub(crate) fn move_into<const NM_WIDTH: usize, NM: NodeMapping<N, NM_WIDTH>>(
        &mut self,
        nm: &mut NM,
    ) {
        let count = self.num_children as usize;
        self.num_children = 0;
        for i in 0..count {
            let child = std::mem::replace(&mut self.children[i], MaybeUninit::uninit());
            nm.add_child(self.keys[i], unsafe { child.assume_init() });
        }
    }

    #[inline]
    pub(crate) fn iter(&self) -> impl DoubleEndedIterator<Item = (u8, &N)> {
        let count = self.num_children as usize;
        self.keys[..count].iter().copied().zip(
            self.children[..count]
                .iter()
                .map(|c| unsafe { c.assume_init_ref() }),
        )
    }
}

impl<N, const WIDTH: usize> NodeMapping<N, WIDTH> for SortedKeyedMapping<N, WIDTH> {
    #[inline]
    fn add_child(&mut self, key: u8, node: N) {
        let count = self.num_children as usize;
        assert!(count < WIDTH, "add_child: no space left");
        let idx = u8_keys_find_insert_position_sorted::<WIDTH>(key, &self.keys, count);

        for i in (idx..count).rev() {
            self.keys[i + 1] = self.keys[i];
            self.children[i + 1] = std::mem::replace(&mut self.children[i], MaybeUninit::uninit());
        }
        self.keys[idx] = key;
        self.children[idx].write(node);
        self.num_children += 1;
    }

    fn seek_child(&self, key: u8) -> Option<&N> {
        let idx =
            u8_keys_find_key_position_sorted::<WIDTH>(key, &self.keys, self.num_children as usize)?;
        Some(unsafe { self.children[idx].assume_init_ref() })
    }

    fn seek_child_mut(&mut self, key: u8) -> Option<&mut N> {
        let idx =
            u8_keys_find_key_position_sorted::<WIDTH>(key, &self.keys, self.num_children as usize)?;
        Some(unsafe { self.children[idx].assume_init_mut() })
    }

    fn delete_child(&mut self, key: u8) -> Option<N> {
        let count = self.num_children as usize;
        let idx = u8_keys_find_key_position_sorted::<WIDTH>(key, &self.keys, count)?;

        let node = std::mem::replace(&mut self.children[idx], MaybeUninit::uninit());

        // Shift keys and children to the left.
        for i in idx..count - 1 {
            self.keys[i] = self.keys[i + 1];
            self.children[i] = std::mem::replace(&mut self.children[i + 1], MaybeUninit::uninit());
        }
        self.keys[count - 1] = 255;
        self.num_children -= 1;

        Some(unsafe { node.assume_init() })
    }

    #[inline(always)]
    fn num_children(&self) -> usize {
        self.num_children as usize
    }

    fn first(&self) -> Option<&N> {
        if self.num_children == 0 {
            return None;
        }
        Some(unsafe { self.children[0].assume_init_ref() })
    }

    fn last(&self) -> Option<&N> {
        let count = self.num_children as usize;
        if count == 0 {
            return None;
        }
        Some(unsafe { self.children[count - 1].assume_init_ref() })
    }
}

impl<N, const WIDTH: usize> Drop for SortedKeyedMapping<N, WIDTH> {
    fn drop(&mut self) {
        for value in &mut self.children[..self.num_children as usize] {
            unsafe { value.assume_init_drop() }
        }
        self.num_children = 0;
    }
}

#[cfg(test)]
mod tests {
    use crate::mapping::NodeMapping;
    use crate::mapping::sorted_keyed_mapping::SortedKeyedMapping;

    #[test]
    fn test_add_seek_delete() {
        let mut node = SortedKeyedMapping::<u8, 4>::new();
        node.add_child(1, 1);
        node.add_child(2, 2);
        node.add_child(3, 3);
        node.add_child(4, 4);
        assert_eq!(node.num_children(), 4);
        assert_eq!(node.seek_child(1), Some(&1));
        assert_eq!(node.seek_child(2), Some(&2));
        assert_eq!(node.seek_child(3), Some(&3));
        assert_eq!(node.seek_child(4), Some(&4));
        assert_eq!(node.seek_child(5), None);
        assert_eq!(node.seek_child_mut(1), Some(&mut 1));
        assert_eq!(node.seek_child_mut(5), None);
        assert_eq!(node.delete_child(1), Some(1));
        assert_eq!(node.delete_child(2), Some(2));
        assert_eq!(node.delete_child(3), Some(3));
        assert_eq!(node.delete_child(4), Some(4));
        assert_eq!(node.delete_child(5), None);
        assert_eq!(node.num_children(), 0);
    }

    #[test]
    fn test_keeps_keys_sorted() {
        let mut node = SortedKeyedMapping::<u8, 16>::new();
        for k in [200u8, 3, 129, 77, 0, 255, 128] {
            node.add_child(k, k);
        }
        let keys: Vec<u8> = node.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![0, 3, 77, 128, 129, 200, 255]);
        assert_eq!(node.first(), Some(&0));
        assert_eq!(node.last(), Some(&255));

        node.delete_child(77);
        let keys: Vec<u8> = node.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![0, 3, 128, 129, 200, 255]);
        assert_eq!(node.seek_child(129), Some(&129));
        assert_eq!(node.seek_child(77), None);
    }

    #[test]
    fn test_resize_and_take() {
        let mut small = SortedKeyedMapping::<String, 4>::new();
        small.add_child(9, "nine".to_string());
        small.add_child(1, "one".to_string());
        let mut big = SortedKeyedMapping::<String, 16>::from_resized(&mut small);
        assert_eq!(small.num_children(), 0);
        assert_eq!(big.num_children(), 2);
        assert_eq!(big.seek_child(9).map(String::as_str), Some("nine"));

        big.delete_child(9);
        let mut back = SortedKeyedMapping::<String, 4>::from_resized(&mut big);
        assert_eq!(back.take_only_child(), (1, "one".to_string()));
        assert_eq!(back.num_children(), 0);
    }

    #[test]
    // Verify that the memory width of the node is nice and compact.
    fn test_memory_width() {
        // num_children = 1
        // keys = 4
        // children array ptr = 8
        // total = 13 pads out to 16
        assert_eq!(std::mem::size_of::<SortedKeyedMapping<Box<u8>, 4>>(), 16);

        // 32 is the padded size of the struct on account of
        // num_children + keys (u8) + children ptrs
        assert_eq!(std::mem::size_of::<SortedKeyedMapping<Box<u8>, 16>>(), 32);
    }
}
