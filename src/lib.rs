//! An in-memory Adaptive Radix Tree keyed by arbitrary byte strings.
//!
//! Inner nodes come in four sizes (4, 16, 48 and 256 children) and are promoted or demoted as
//! their child count changes. Chains of single-child nodes are folded into per-node prefixes.
//!
//! ```
//! use radix_art::AdaptiveRadixTree;
//!
//! let mut tree = AdaptiveRadixTree::new();
//! tree.insert("car", 1);
//! tree.insert("cat", 2);
//! tree.insert("dog", 3);
//!
//! assert_eq!(tree.get("cat"), Some(&2));
//! assert_eq!(tree.minimum(), Some((b"car".to_vec(), &1)));
//! assert_eq!(tree.remove("cat"), Some(2));
//! assert_eq!(tree.len(), 2);
//! ```
//!
//! The tree has no internal synchronization. Mutation takes `&mut self`, so sharing it across
//! threads needs the usual external lock.

pub mod error;
pub mod iter;
pub mod keys;
pub mod mapping;
mod node;
pub mod partials;
pub mod stats;
pub mod tree;
pub mod utils;

pub use error::KeyError;
pub use iter::{Iter, Values};
pub use partials::MAX_PREFIX_LEN;
pub use stats::{NodeStats, TreeStats, TreeStatsTrait};
pub use tree::AdaptiveRadixTree;
