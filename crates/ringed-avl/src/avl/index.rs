//! Flat re-exports of the AVL building blocks.

pub use super::types::{AvlNode, AvlNodeLike, HEIGHT_NONE};
pub use super::util::{
    assert_avl_tree, insert_fixup, insert_left, insert_right, print, rank, rotate, select, Anchors,
};
