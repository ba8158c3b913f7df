//! Link traits and configuration enums.
//!
//! Every node lives in a `Vec`-backed arena and every "pointer" is an index
//! into it:
//! - [`Node`]: structural links (`p` / `l` / `r`), `Option<u32>`.
//! - [`RingNode`]: circular ring links, one `next` / `prev` pair per [`Ring`].
//!   Ring links are plain `u32`; a node alone in a ring points at itself.

use crate::error::ConfigError;

/// Structural binary-tree links (`p`, `l`, `r`).
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// Comparator used by the tree: negative, zero or positive like `strcmp`.
pub type Comparator<K> = dyn Fn(&K, &K) -> i32;

/// Derives a key from a stored value.
pub type KeyExtractor<K, V> = fn(&V) -> K;

/// Comparator for any totally ordered key.
pub fn default_comparator<K: Ord>(a: &K, b: &K) -> i32 {
    a.cmp(b) as i32
}

/// Key/value node interface.
pub trait KvNode<K, V>: Node {
    fn key(&self) -> &K;
    fn value(&self) -> &V;
    fn value_mut(&mut self) -> &mut V;
    fn set_key(&mut self, key: K);
    /// Stores `value`, handing back the one it replaced.
    fn replace_value(&mut self, value: V) -> V;
}

/// The two rings threaded through every node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ring {
    /// Ascending key order.
    Sorted,
    /// Chronological insertion order, oldest first.
    Inserted,
}

/// Ring links, addressed by [`Ring`].
pub trait RingNode {
    fn next(&self, ring: Ring) -> u32;
    fn prev(&self, ring: Ring) -> u32;
    fn set_next(&mut self, ring: Ring, v: u32);
    fn set_prev(&mut self, ring: Ring, v: u32);
}

/// What `put` does when the key is already present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CollisionPolicy {
    /// Overwrite the entry and move it to the newest insertion position.
    #[default]
    Replace,
    /// Keep the stored entry untouched and reject the new value.
    IgnoreInsertion,
}

impl TryFrom<u8> for CollisionPolicy {
    type Error = ConfigError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Replace),
            1 => Ok(Self::IgnoreInsertion),
            other => Err(ConfigError::UnknownCollisionPolicy(other)),
        }
    }
}

impl From<CollisionPolicy> for u8 {
    fn from(policy: CollisionPolicy) -> Self {
        match policy {
            CollisionPolicy::Replace => 0,
            CollisionPolicy::IgnoreInsertion => 1,
        }
    }
}

/// Traversal order for `for_each` and `iter`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ForEachMode {
    /// Ascending keys, starting at the minimum.
    SortedAscending,
    /// Descending keys, starting at the maximum.
    SortedDescending,
    /// Oldest to newest (queue order).
    InsertionOrder,
    /// Newest to oldest (stack order).
    InsertionOrderReversed,
}

impl ForEachMode {
    pub const ALL: [ForEachMode; 4] = [
        ForEachMode::SortedAscending,
        ForEachMode::SortedDescending,
        ForEachMode::InsertionOrder,
        ForEachMode::InsertionOrderReversed,
    ];

    /// Ring walked by this mode.
    pub fn ring(self) -> Ring {
        match self {
            Self::SortedAscending | Self::SortedDescending => Ring::Sorted,
            Self::InsertionOrder | Self::InsertionOrderReversed => Ring::Inserted,
        }
    }

    /// `true` when the walk follows `prev` links.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::SortedDescending | Self::InsertionOrderReversed)
    }
}

impl TryFrom<u8> for ForEachMode {
    type Error = ConfigError;

    /// Codes follow the byte layout `InOrder`, `ReverseInOrder`, `Queue`, `Stack`.
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::SortedAscending),
            1 => Ok(Self::SortedDescending),
            2 => Ok(Self::InsertionOrder),
            3 => Ok(Self::InsertionOrderReversed),
            other => Err(ConfigError::UnknownForEachMode(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_policy_codes() {
        assert_eq!(CollisionPolicy::try_from(0), Ok(CollisionPolicy::Replace));
        assert_eq!(
            CollisionPolicy::try_from(1),
            Ok(CollisionPolicy::IgnoreInsertion)
        );
        assert_eq!(
            CollisionPolicy::try_from(7),
            Err(ConfigError::UnknownCollisionPolicy(7))
        );
        assert_eq!(u8::from(CollisionPolicy::IgnoreInsertion), 1);
    }

    #[test]
    fn for_each_mode_codes() {
        for (code, mode) in ForEachMode::ALL.iter().enumerate() {
            assert_eq!(ForEachMode::try_from(code as u8), Ok(*mode));
        }
        assert_eq!(
            ForEachMode::try_from(4),
            Err(ConfigError::UnknownForEachMode(4))
        );
        assert_eq!(ForEachMode::InsertionOrderReversed.ring(), Ring::Inserted);
        assert!(ForEachMode::SortedDescending.is_reversed());
        assert!(!ForEachMode::InsertionOrder.is_reversed());
    }

    #[test]
    fn default_comparator_sign() {
        assert_eq!(default_comparator(&1, &2), -1);
        assert_eq!(default_comparator(&2, &2), 0);
        assert_eq!(default_comparator(&"b", &"a"), 1);
    }
}
