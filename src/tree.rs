use std::cmp::min;
use std::fmt;
use std::mem;

use tracing::trace;

use crate::iter::{Iter, Values};
use crate::keys;
use crate::node::{Content, LeafData, Node};
use crate::partials::Partial;

/// An ordered map from byte-string keys to values, stored as an adaptive radix tree.
///
/// Keys are arbitrary byte sequences, including the empty one. Lookups cost time proportional to
/// the key length, independent of how many keys are stored.
pub struct AdaptiveRadixTree<V> {
    root: Option<Node<V>>,
    size: usize,
}

impl<V> Default for AdaptiveRadixTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> AdaptiveRadixTree<V> {
    pub fn new() -> Self {
        Self {
            root: None,
            size: 0,
        }
    }

    /// Number of stored keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn clear(&mut self) {
        // Dismantled from an explicit stack; dropping a deep tree node by node would recurse
        // once per level.
        let mut pending: Vec<Node<V>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
        self.size = 0;
    }

    pub(crate) fn root(&self) -> Option<&Node<V>> {
        self.root.as_ref()
    }

    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Option<&V> {
        let key = keys::encode(key.as_ref());
        Self::search(self.root.as_ref()?, &key).map(|leaf| &leaf.value)
    }

    pub fn get_mut<K: AsRef<[u8]>>(&mut self, key: K) -> Option<&mut V> {
        let key = keys::encode(key.as_ref());
        let mut node = self.root.as_mut()?;
        let mut depth = 0;
        loop {
            if node.is_leaf() {
                let Content::Leaf(leaf) = &mut node.content else {
                    unreachable!()
                };
                if !leaf.matches(&key) {
                    return None;
                }
                return Some(&mut leaf.value);
            }
            let (c, next) = Self::next_edge(node, &key, depth)?;
            node = node.seek_child_mut(c)?;
            depth = next;
        }
    }

    pub fn contains_key<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// One step down from the inner node `node`: the byte selecting the next child and the depth
    /// below it. Prefixes are compared optimistically. Only the stored bytes are checked, and
    /// the leaf at the end settles the rest by comparing full keys.
    #[inline]
    fn next_edge(node: &Node<V>, key: &[u8], depth: usize) -> Option<(u8, usize)> {
        let mut depth = depth;
        if !node.prefix.is_empty() {
            if node.prefix.check(key, depth) != node.prefix.stored_len() {
                return None;
            }
            depth += node.prefix.len();
        }
        let c = *key.get(depth)?;
        Some((c, depth + 1))
    }

    fn search<'a>(root: &'a Node<V>, key: &[u8]) -> Option<&'a LeafData<V>> {
        let mut node = root;
        let mut depth = 0;
        loop {
            if let Content::Leaf(leaf) = &node.content {
                return leaf.matches(key).then_some(leaf);
            }
            let (c, next) = Self::next_edge(node, key, depth)?;
            node = node.seek_child(c)?;
            depth = next;
        }
    }

    /// Stores `value` under `key`, returning the value it replaced, if any.
    pub fn insert<K: AsRef<[u8]>>(&mut self, key: K, value: V) -> Option<V> {
        let key = keys::encode(key.as_ref());
        let Some(root) = self.root.as_mut() else {
            self.root = Some(Node::new_leaf(key, value));
            self.size = 1;
            return None;
        };

        let replaced = Self::insert_below(root, key, value);
        if replaced.is_none() {
            self.size += 1;
        }
        replaced
    }

    // Unlike lookups, insertion needs the exact mismatch offset in every prefix it passes, so it
    // walks with `prefix_mismatch` instead of `next_edge`.
    fn insert_below(root: &mut Node<V>, key: Vec<u8>, value: V) -> Option<V> {
        let mut node = root;
        let mut depth = 0;
        loop {
            if node.is_leaf() {
                return Self::insert_at_leaf(node, key, value, depth);
            }

            let prefix_len = node.prefix.len();
            if prefix_len > 0 {
                let mismatch = Self::prefix_mismatch(node, &key, depth);
                if mismatch < prefix_len {
                    Self::split_prefix(node, key, value, depth, mismatch);
                    return None;
                }
                depth += prefix_len;
            }

            let c = key[depth];
            if node.seek_child(c).is_none() {
                node.add_child(c, Node::new_leaf(key, value));
                return None;
            }
            let Some(child) = node.seek_child_mut(c) else {
                unreachable!()
            };
            node = child;
            depth += 1;
        }
    }

    /// Either overwrites the value of the leaf `node` or, for a different key, puts a Node4 in
    /// its place holding both leaves.
    fn insert_at_leaf(node: &mut Node<V>, key: Vec<u8>, value: V, depth: usize) -> Option<V> {
        let Content::Leaf(leaf) = &mut node.content else {
            unreachable!()
        };
        if leaf.matches(&key) {
            return Some(mem::replace(&mut leaf.value, value));
        }

        // Two distinct encoded keys always differ before either one ends.
        let common = leaf.longest_common_prefix(&key, depth);
        let existing_byte = leaf.key[depth + common];
        let new_byte = key[depth + common];
        trace!(target: "radix_art::tree", depth, common, "splitting leaf");

        let inner = Node::new_inner(Partial::from_key(&key, depth, common));
        let existing = mem::replace(node, inner);
        node.add_child(existing_byte, existing);
        node.add_child(new_byte, Node::new_leaf(key, value));
        None
    }

    /// Index of the first prefix byte that disagrees with `key` at `depth`, or the prefix length
    /// when all of it matches. Bytes beyond the stored ones are read from the minimum leaf.
    fn prefix_mismatch(node: &Node<V>, key: &[u8], depth: usize) -> usize {
        let prefix = &node.prefix;
        let matched = prefix.check(key, depth);
        if matched < prefix.stored_len() || !prefix.is_truncated() {
            return matched;
        }

        let Some(leaf) = node.minimum_leaf() else {
            unreachable!("inner node without leaves")
        };
        let end = min(depth + prefix.len(), key.len());
        let recovered = key
            .get(depth + matched..end)
            .unwrap_or_default()
            .iter()
            .zip(leaf.key.get(depth + matched..).unwrap_or_default())
            .take_while(|(a, b)| a == b)
            .count();
        matched + recovered
    }

    /// Breaks the prefix of `node` at `mismatch`: a new Node4 takes its place, holding the
    /// shared part of the prefix, with the old node (prefix trimmed) and a new leaf below it.
    fn split_prefix(node: &mut Node<V>, key: Vec<u8>, value: V, depth: usize, mismatch: usize) {
        let prefix = node.prefix;
        let (existing_byte, remaining) = if !prefix.is_truncated() {
            (prefix.at(mismatch), prefix.tail(mismatch + 1))
        } else {
            let Some(leaf) = node.minimum_leaf() else {
                unreachable!("inner node without leaves")
            };
            let at = depth + mismatch;
            (
                leaf.key[at],
                Partial::from_key(&leaf.key, at + 1, prefix.len() - mismatch - 1),
            )
        };
        trace!(
            target: "radix_art::tree",
            depth,
            mismatch,
            prefix_len = prefix.len(),
            "splitting prefix"
        );

        let new_byte = key[depth + mismatch];
        let inner = Node::new_inner(prefix.head(mismatch));
        let mut existing = mem::replace(node, inner);
        existing.prefix = remaining;
        node.add_child(existing_byte, existing);
        node.add_child(new_byte, Node::new_leaf(key, value));
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove<K: AsRef<[u8]>>(&mut self, key: K) -> Option<V> {
        let key = keys::encode(key.as_ref());
        let root = self.root.as_mut()?;

        let removed = if root.is_leaf() {
            if !root.leaf().is_some_and(|leaf| leaf.matches(&key)) {
                return None;
            }
            self.root.take().and_then(Node::into_value)
        } else {
            Self::remove_below(root, &key)
        };

        if removed.is_some() {
            self.size -= 1;
        }
        removed
    }

    /// Walks down to the parent of the leaf for `key` and detaches the leaf there, which may
    /// demote or collapse that parent in place.
    fn remove_below(root: &mut Node<V>, key: &[u8]) -> Option<V> {
        let mut node = root;
        let mut depth = 0;
        loop {
            let (c, next) = Self::next_edge(node, key, depth)?;
            let child = node.seek_child(c)?;
            if let Some(leaf) = child.leaf() {
                if !leaf.matches(key) {
                    return None;
                }
                return node.delete_child(c).and_then(Node::into_value);
            }
            node = node.seek_child_mut(c)?;
            depth = next;
        }
    }

    /// The entry with the smallest key.
    pub fn minimum(&self) -> Option<(Vec<u8>, &V)> {
        let leaf = self.root.as_ref()?.minimum_leaf()?;
        Some((leaf.application_key(), &leaf.value))
    }

    /// The entry with the largest key.
    pub fn maximum(&self) -> Option<(Vec<u8>, &V)> {
        let leaf = self.root.as_ref()?.maximum_leaf()?;
        Some((leaf.application_key(), &leaf.value))
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self.root.as_ref(), self.size)
    }

    /// Values in ascending key order.
    pub fn values(&self) -> Values<'_, V> {
        Values::new(self.root.as_ref(), self.size)
    }
}

impl<V> Drop for AdaptiveRadixTree<V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<'a, V> IntoIterator for &'a AdaptiveRadixTree<V> {
    type Item = (Vec<u8>, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: AsRef<[u8]>, V> FromIterator<(K, V)> for AdaptiveRadixTree<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: AsRef<[u8]>, V> Extend<(K, V)> for AdaptiveRadixTree<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for AdaptiveRadixTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
