//! Externally synchronized access to an [`AvlTree`].
//!
//! The tree itself does no locking. [`SharedAvlTree`] serializes every
//! operation behind one mutex, so a visitor can never race with a `put`.

use parking_lot::Mutex;

use crate::avl::AvlTree;
use crate::types::ForEachMode;

pub struct SharedAvlTree<K, V, C = fn(&K, &K) -> i32>
where
    C: Fn(&K, &K) -> i32,
{
    inner: Mutex<AvlTree<K, V, C>>,
}

impl<K, V, C> SharedAvlTree<K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    pub fn new(tree: AvlTree<K, V, C>) -> Self {
        Self {
            inner: Mutex::new(tree),
        }
    }

    pub fn put(&self, key: K, value: V) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().put(key, value)
    }

    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    pub fn size(&self) -> usize {
        self.inner.lock().size()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Runs a full traversal while holding the lock.
    pub fn for_each<G: FnMut(&K, &V)>(&self, mode: ForEachMode, visitor: G) {
        self.inner.lock().for_each(mode, visitor)
    }

    /// Runs `f` with shared access to the tree.
    pub fn with<R>(&self, f: impl FnOnce(&AvlTree<K, V, C>) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Runs `f` with exclusive access to the tree.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut AvlTree<K, V, C>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn into_inner(self) -> AvlTree<K, V, C> {
        self.inner.into_inner()
    }
}

impl<K, V, C> From<AvlTree<K, V, C>> for SharedAvlTree<K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    fn from(tree: AvlTree<K, V, C>) -> Self {
        Self::new(tree)
    }
}
