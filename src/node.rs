use tracing::trace;

use crate::keys;
use crate::mapping::NodeMapping;
use crate::mapping::direct_mapping::DirectMapping;
use crate::mapping::indexed_mapping::IndexedMapping;
use crate::mapping::sorted_keyed_mapping::SortedKeyedMapping;
use crate::partials::Partial;

pub(crate) struct Node<V> {
    pub(crate) prefix: Partial,
    pub(crate) content: Content<V>,
}

pub(crate) enum Content<V> {
    Leaf(LeafData<V>),
    Node4(SortedKeyedMapping<Node<V>, 4>),
    Node16(SortedKeyedMapping<Node<V>, 16>),
    Node48(IndexedMapping<Node<V>, 48, 1>),
    Node256(DirectMapping<Node<V>>),
}

/// A stored entry. `key` is the full tree key (see [`crate::keys`]), so a leaf can be checked
/// without knowing the path that led to it.
pub(crate) struct LeafData<V> {
    pub(crate) key: Box<[u8]>,
    pub(crate) value: V,
}

impl<V> LeafData<V> {
    #[inline]
    pub(crate) fn matches(&self, key: &[u8]) -> bool {
        *self.key == *key
    }

    /// Length of the run of equal bytes shared with `key`, starting at `depth`.
    pub(crate) fn longest_common_prefix(&self, key: &[u8], depth: usize) -> usize {
        let ours = self.key.get(depth..).unwrap_or_default();
        let theirs = key.get(depth..).unwrap_or_default();
        ours.iter()
            .zip(theirs)
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// The application key this leaf was stored under.
    pub(crate) fn application_key(&self) -> Vec<u8> {
        keys::restore(&self.key)
    }
}

impl<V> Node<V> {
    #[inline]
    pub(crate) fn new_leaf(key: Vec<u8>, value: V) -> Self {
        Self {
            prefix: Partial::empty(),
            content: Content::Leaf(LeafData {
                key: key.into_boxed_slice(),
                value,
            }),
        }
    }

    #[inline]
    pub(crate) fn new_inner(prefix: Partial) -> Self {
        Self {
            prefix,
            content: Content::Node4(SortedKeyedMapping::new()),
        }
    }

    #[cfg(test)]
    pub(crate) fn new_16(prefix: Partial) -> Self {
        Self {
            prefix,
            content: Content::Node16(SortedKeyedMapping::new()),
        }
    }

    #[cfg(test)]
    pub(crate) fn new_48(prefix: Partial) -> Self {
        Self {
            prefix,
            content: Content::Node48(IndexedMapping::new()),
        }
    }

    #[cfg(test)]
    pub(crate) fn new_256(prefix: Partial) -> Self {
        Self {
            prefix,
            content: Content::Node256(DirectMapping::new()),
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match &self.content {
            Content::Leaf(_) => "Leaf",
            Content::Node4(_) => "Node4",
            Content::Node16(_) => "Node16",
            Content::Node48(_) => "Node48",
            Content::Node256(_) => "Node256",
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(&self.content, Content::Leaf(_))
    }

    #[inline]
    pub(crate) fn leaf(&self) -> Option<&LeafData<V>> {
        let Content::Leaf(leaf) = &self.content else {
            return None;
        };
        Some(leaf)
    }

    #[cfg(test)]
    pub(crate) fn value(&self) -> Option<&V> {
        self.leaf().map(|leaf| &leaf.value)
    }

    pub(crate) fn into_value(self) -> Option<V> {
        match self.content {
            Content::Leaf(leaf) => Some(leaf.value),
            _ => None,
        }
    }

    pub(crate) fn num_children(&self) -> usize {
        match &self.content {
            Content::Node4(km) => km.num_children(),
            Content::Node16(km) => km.num_children(),
            Content::Node48(im) => im.num_children(),
            Content::Node256(dm) => dm.num_children(),
            Content::Leaf(_) => 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        match &self.content {
            Content::Node4(km) => km.width(),
            Content::Node16(km) => km.width(),
            Content::Node48(im) => im.width(),
            Content::Node256(dm) => dm.width(),
            Content::Leaf(_) => 0,
        }
    }

    pub(crate) fn seek_child(&self, key: u8) -> Option<&Node<V>> {
        match &self.content {
            Content::Node4(km) => km.seek_child(key),
            Content::Node16(km) => km.seek_child(key),
            Content::Node48(im) => im.seek_child(key),
            Content::Node256(dm) => dm.seek_child(key),
            Content::Leaf(_) => None,
        }
    }

    pub(crate) fn seek_child_mut(&mut self, key: u8) -> Option<&mut Node<V>> {
        match &mut self.content {
            Content::Node4(km) => km.seek_child_mut(key),
            Content::Node16(km) => km.seek_child_mut(key),
            Content::Node48(im) => im.seek_child_mut(key),
            Content::Node256(dm) => dm.seek_child_mut(key),
            Content::Leaf(_) => None,
        }
    }

    /// Attaches `node` under `key`, promoting this node to the next larger variant first if it
    /// is at capacity. `key` must not already be present.
    pub(crate) fn add_child(&mut self, key: u8, node: Node<V>) {
        debug_assert!(self.seek_child(key).is_none());
        if self.is_full() {
            self.grow();
        }

        match &mut self.content {
            Content::Node4(km) => km.add_child(key, node),
            Content::Node16(km) => km.add_child(key, node),
            Content::Node48(im) => im.add_child(key, node),
            Content::Node256(dm) => dm.add_child(key, node),
            Content::Leaf(_) => unreachable!("cannot add a child to a leaf"),
        }
    }

    /// Detaches the child under `key`, then demotes or collapses this node if that leaves it
    /// underfull. A Node4 left with a single child is replaced by that child.
    pub(crate) fn delete_child(&mut self, key: u8) -> Option<Node<V>> {
        let (deleted, underfull) = match &mut self.content {
            Content::Node4(km) => {
                let node = km.delete_child(key);
                (node, km.num_children() == 1)
            }
            Content::Node16(km) => {
                let node = km.delete_child(key);
                (node, km.num_children() == 3)
            }
            Content::Node48(im) => {
                let node = im.delete_child(key);
                (node, im.num_children() == 12)
            }
            Content::Node256(dm) => {
                let node = dm.delete_child(key);
                // Hysteresis: demote well below Node48's capacity.
                (node, dm.num_children() == 37)
            }
            Content::Leaf(_) => unreachable!("cannot delete a child from a leaf"),
        };

        if deleted.is_some() && underfull {
            self.shrink();
        }
        deleted
    }

    #[inline]
    fn is_full(&self) -> bool {
        match &self.content {
            Content::Node256(_) => false,
            _ => self.num_children() >= self.capacity(),
        }
    }

    fn grow(&mut self) {
        let from = self.type_name();
        let grown = match &mut self.content {
            Content::Node4(km) => Content::Node16(SortedKeyedMapping::from_resized(km)),
            Content::Node16(km) => Content::Node48(IndexedMapping::from_keyed(km)),
            Content::Node48(im) => Content::Node256(DirectMapping::from_indexed(im)),
            Content::Node256(_) => unreachable!("Node256 never grows"),
            Content::Leaf(_) => unreachable!("cannot grow a leaf"),
        };
        self.content = grown;
        trace!(
            target: "radix_art::node",
            from,
            to = self.type_name(),
            children = self.num_children(),
            "promoted node"
        );
    }

    fn shrink(&mut self) {
        if let Content::Node4(km) = &mut self.content {
            let (key, child) = km.take_only_child();
            self.absorb(key, child);
            trace!(
                target: "radix_art::node",
                key,
                into = self.type_name(),
                prefix_len = self.prefix.len(),
                "collapsed single-child node"
            );
            return;
        }

        let from = self.type_name();
        let shrunk = match &mut self.content {
            Content::Node4(_) => unreachable!(),
            Content::Node16(km) => Content::Node4(SortedKeyedMapping::from_resized(km)),
            Content::Node48(im) => Content::Node16(SortedKeyedMapping::from_indexed(im)),
            Content::Node256(dm) => Content::Node48(IndexedMapping::from_direct(dm)),
            Content::Leaf(_) => unreachable!("cannot shrink a leaf"),
        };
        self.content = shrunk;
        trace!(
            target: "radix_art::node",
            from,
            to = self.type_name(),
            children = self.num_children(),
            "demoted node"
        );
    }

    /// Replaces this node with `child`, which sat under `key`. An inner child inherits our
    /// prefix, the key byte and its own prefix, in that order. A leaf carries its full key and
    /// needs no prefix.
    fn absorb(&mut self, key: u8, child: Node<V>) {
        let Node {
            prefix: child_prefix,
            content,
        } = child;
        if !matches!(content, Content::Leaf(_)) {
            self.prefix = self.prefix.joined(key, &child_prefix);
        } else {
            self.prefix = child_prefix;
        }
        self.content = content;
    }

    /// The smallest leaf at or below this node.
    pub(crate) fn minimum_leaf(&self) -> Option<&LeafData<V>> {
        let mut node = self;
        loop {
            node = match &node.content {
                Content::Leaf(leaf) => return Some(leaf),
                Content::Node4(km) => km.first()?,
                Content::Node16(km) => km.first()?,
                Content::Node48(im) => im.first()?,
                Content::Node256(dm) => dm.first()?,
            };
        }
    }

    /// The largest leaf at or below this node.
    pub(crate) fn maximum_leaf(&self) -> Option<&LeafData<V>> {
        let mut node = self;
        loop {
            node = match &node.content {
                Content::Leaf(leaf) => return Some(leaf),
                Content::Node4(km) => km.last()?,
                Content::Node16(km) => km.last()?,
                Content::Node48(im) => im.last()?,
                Content::Node256(dm) => dm.last()?,
            };
        }
    }

    /// Moves every child into `out` and leaves this node empty, without demoting it. Used to
    /// tear a tree down without recursing once per level.
    pub(crate) fn detach_children(&mut self, out: &mut Vec<Node<V>>) {
        let keys: Vec<u8> = self.iter().map(|(k, _)| k).collect();
        for key in keys {
            let child = match &mut self.content {
                Content::Node4(km) => km.delete_child(key),
                Content::Node16(km) => km.delete_child(key),
                Content::Node48(im) => im.delete_child(key),
                Content::Node256(dm) => dm.delete_child(key),
                Content::Leaf(_) => None,
            };
            out.extend(child);
        }
    }

    /// Children in ascending key order.
    pub(crate) fn iter(&self) -> Box<dyn DoubleEndedIterator<Item = (u8, &Self)> + '_> {
        match &self.content {
            Content::Node4(km) => Box::new(km.iter()),
            Content::Node16(km) => Box::new(km.iter()),
            Content::Node48(im) => Box::new(im.iter()),
            Content::Node256(dm) => Box::new(dm.iter()),
            Content::Leaf(_) => Box::new(std::iter::empty()),
        }
    }
}
