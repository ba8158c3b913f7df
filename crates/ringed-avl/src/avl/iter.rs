//! Lazy traversal over one of the rings.

use std::iter::FusedIterator;

use crate::types::{ForEachMode, RingNode};

use super::types::AvlNode;

/// Walks a ring from its anchor until it wraps around.
///
/// The walk is bounded by the number of nodes left, so every node is visited
/// exactly once per pass, a one-node tree included. Cloning the iterator
/// snapshots the position.
pub struct Iter<'a, K, V> {
    arena: &'a [AvlNode<K, V>],
    mode: ForEachMode,
    curr: Option<u32>,
    remaining: usize,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            mode: self.mode,
            curr: self.curr,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(
        arena: &'a [AvlNode<K, V>],
        mode: ForEachMode,
        anchor: Option<u32>,
        len: usize,
    ) -> Self {
        Self {
            arena,
            mode,
            curr: anchor,
            remaining: if anchor.is_some() { len } else { 0 },
        }
    }

    pub fn mode(&self) -> ForEachMode {
        self.mode
    }

    fn step(&mut self) -> Option<u32> {
        if self.remaining == 0 {
            return None;
        }
        let curr = self.curr?;
        self.remaining -= 1;
        let node = &self.arena[curr as usize];
        let ring = self.mode.ring();
        self.curr = Some(if self.mode.is_reversed() {
            node.prev(ring)
        } else {
            node.next(ring)
        });
        Some(curr)
    }

    /// Same walk, yielding arena indices instead of entries.
    pub fn indices(self) -> Indices<'a, K, V> {
        Indices(self)
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.step()?;
        let node = &self.arena[idx as usize];
        Some((&node.k, &node.v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Index-yielding form of [`Iter`].
pub struct Indices<'a, K, V>(Iter<'a, K, V>);

impl<K, V> Clone for Indices<'_, K, V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<K, V> Iterator for Indices<'_, K, V> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        self.0.step()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Indices<'_, K, V> {}

impl<K, V> FusedIterator for Indices<'_, K, V> {}
