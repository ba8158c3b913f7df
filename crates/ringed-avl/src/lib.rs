//! Arena-based AVL map threaded with two circular rings.
//!
//! Every node sits in a `Vec` arena and is addressed by a stable `u32`
//! index. On top of the usual parent / left / right links each node carries
//! two circular doubly-linked rings:
//!
//! - **Sorted ring** (`next_sorted` / `prev_sorted`): ascending key order,
//!   giving O(1) successor, predecessor, minimum and maximum.
//! - **Insertion ring** (`next_inserted` / `prev_inserted`): chronological
//!   order, so the same map doubles as a FIFO queue and a LIFO stack.
//!
//! Each node also memoizes its height and the sizes of both subtrees, which
//! keeps rank and select at O(log n).
//!
//! ```
//! use ringed_avl::{AvlTree, ForEachMode};
//!
//! let mut tree = AvlTree::new();
//! tree.put(3, "c");
//! tree.put(1, "a");
//! tree.put(2, "b");
//!
//! let sorted: Vec<_> = tree.iter(ForEachMode::SortedAscending).map(|(k, _)| *k).collect();
//! assert_eq!(sorted, vec![1, 2, 3]);
//! let stack: Vec<_> = tree.iter(ForEachMode::InsertionOrderReversed).map(|(k, _)| *k).collect();
//! assert_eq!(stack, vec![2, 1, 3]);
//! assert_eq!(tree.rank_of(&3), Some(2));
//! ```
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`types`] | link traits, [`CollisionPolicy`], [`ForEachMode`] |
//! | [`error`] | [`ConfigError`] |
//! | [`ring`] | circular ring primitives |
//! | [`util`] | structural `first`, `last`, `next`, `prev`, `size`, `find` |
//! | [`avl`] | node layout, fixup and rotations, [`AvlTree`], [`Iter`] |
//! | [`print`] | tree-dump formatting |
//! | [`shared`] | [`SharedAvlTree`], a mutex-guarded tree |

pub mod avl;
pub mod error;
pub mod print;
pub mod ring;
pub mod shared;
pub mod types;
pub mod util;

pub use avl::{AvlNode, AvlTree, AvlTreeBuilder, Iter};
pub use error::ConfigError;
pub use shared::SharedAvlTree;
pub use types::{default_comparator, CollisionPolicy, ForEachMode, KvNode, Node, Ring, RingNode};
