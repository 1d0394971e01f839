pub mod direct_mapping;
pub mod indexed_mapping;
pub mod sorted_keyed_mapping;

/// Child storage for one inner node variant, keyed by the discriminating byte.
pub trait NodeMapping<N, const NUM_CHILDREN: usize> {
    fn add_child(&mut self, key: u8, node: N);
    fn seek_child(&self, key: u8) -> Option<&N>;
    fn seek_child_mut(&mut self, key: u8) -> Option<&mut N>;
    fn delete_child(&mut self, key: u8) -> Option<N>;
    fn num_children(&self) -> usize;
    /// Child under the smallest key byte.
    fn first(&self) -> Option<&N>;
    /// Child under the largest key byte.
    fn last(&self) -> Option<&N>;
    fn width(&self) -> usize {
        NUM_CHILDREN
    }
}
