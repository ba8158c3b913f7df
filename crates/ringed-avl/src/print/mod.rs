//! Tree-dump formatting used by the diagnostics.

pub mod print_tree;

pub use print_tree::print_tree;

/// Renders one child line given the indentation prefix of its subtree.
pub type PrintChild<'a> = dyn Fn(&str) -> String + 'a;
