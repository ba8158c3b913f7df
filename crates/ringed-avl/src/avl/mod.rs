//! AVL engine: node layout, insertion fixup, traversal and the public map.

pub mod index;
pub mod iter;
pub mod tree;
pub mod types;
pub mod util;

pub use index::*;
pub use iter::{Indices, Iter};
pub use tree::{AvlTree, AvlTreeBuilder};
