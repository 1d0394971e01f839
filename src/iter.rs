use std::iter::FusedIterator;

use crate::node::{LeafData, Node};

type IterEntry<'a, V> = (u8, &'a Node<V>);
type NodeIterator<'a, V> = dyn DoubleEndedIterator<Item = IterEntry<'a, V>> + 'a;

/// Depth-first walk over the leaves, smallest key first.
struct Leaves<'a, V> {
    node_iter_stack: Vec<Box<NodeIterator<'a, V>>>,
    remaining: usize,
}

impl<'a, V> Leaves<'a, V> {
    fn new(root: Option<&'a Node<V>>, len: usize) -> Self {
        let mut node_iter_stack: Vec<Box<NodeIterator<'a, V>>> = Vec::new();
        if let Some(node) = root {
            node_iter_stack.push(Box::new(std::iter::once((0u8, node))));
        }
        Self {
            node_iter_stack,
            remaining: len,
        }
    }
}

impl<'a, V> Iterator for Leaves<'a, V> {
    type Item = &'a LeafData<V>;

    fn next(&mut self) -> Option<Self::Item> {
        // Pull from the innermost child iterator. An exhausted one is popped, a leaf is the
        // answer, and an inner node pushes its own children.
        loop {
            let last_iter = self.node_iter_stack.last_mut()?;

            let Some((_k, node)) = last_iter.next() else {
                self.node_iter_stack.pop();
                continue;
            };

            match node.leaf() {
                Some(leaf) => {
                    self.remaining -= 1;
                    return Some(leaf);
                }
                None => self.node_iter_stack.push(node.iter()),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Iterator over `(key, &value)` in ascending key order. Created by
/// [`AdaptiveRadixTree::iter`](crate::AdaptiveRadixTree::iter).
pub struct Iter<'a, V> {
    leaves: Leaves<'a, V>,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(root: Option<&'a Node<V>>, len: usize) -> Self {
        Self {
            leaves: Leaves::new(root, len),
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let leaf = self.leaves.next()?;
        Some((leaf.application_key(), &leaf.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.leaves.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

/// Iterator over values in ascending key order. Created by
/// [`AdaptiveRadixTree::values`](crate::AdaptiveRadixTree::values).
pub struct Values<'a, V> {
    leaves: Leaves<'a, V>,
}

impl<'a, V> Values<'a, V> {
    pub(crate) fn new(root: Option<&'a Node<V>>, len: usize) -> Self {
        Self {
            leaves: Leaves::new(root, len),
        }
    }
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.leaves.next().map(|leaf| &leaf.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.leaves.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}
impl<V> FusedIterator for Values<'_, V> {}
