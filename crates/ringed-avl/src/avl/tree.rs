use std::fmt;

use crate::error::ConfigError;
use crate::print::{print_tree, PrintChild};
use crate::ring;
use crate::types::{default_comparator, CollisionPolicy, ForEachMode, KeyExtractor, Ring};
use crate::util::find;

use super::iter::Iter;
use super::types::AvlNode;
use super::util::{self, Anchors};

/// AVL map threaded with a sorted ring and an insertion-order ring.
///
/// Nodes live in an arena and are addressed by stable `u32` indices, which
/// the index-based accessors (`key`, `value`, `rank`, `next`, ...) accept.
/// There is no per-node removal: nodes are released together when the tree
/// is dropped or cleared.
pub struct AvlTree<K, V, C = fn(&K, &K) -> i32>
where
    C: Fn(&K, &K) -> i32,
{
    arena: Vec<AvlNode<K, V>>,
    root: Option<u32>,
    min: Option<u32>,
    first_inserted: Option<u32>,
    len: usize,
    comparator: C,
    policy: CollisionPolicy,
    key_extractor: Option<KeyExtractor<K, V>>,
}

impl<K, V> AvlTree<K, V, fn(&K, &K) -> i32>
where
    K: Ord,
{
    /// Tree over `K`'s natural order with [`CollisionPolicy::Replace`].
    pub fn new() -> Self {
        Self::with_comparator(default_comparator::<K>, CollisionPolicy::Replace)
    }
}

impl<K, V> Default for AvlTree<K, V, fn(&K, &K) -> i32>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> AvlTree<K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    pub fn with_comparator(comparator: C, policy: CollisionPolicy) -> Self {
        Self {
            arena: Vec::new(),
            root: None,
            min: None,
            first_inserted: None,
            len: 0,
            comparator,
            policy,
            key_extractor: None,
        }
    }

    pub fn builder() -> AvlTreeBuilder<K, V, C> {
        AvlTreeBuilder::new()
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.policy
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn arena(&self) -> &[AvlNode<K, V>] {
        &self.arena
    }

    pub fn root_index(&self) -> Option<u32> {
        self.root
    }

    pub fn node(&self, idx: u32) -> &AvlNode<K, V> {
        &self.arena[idx as usize]
    }

    pub fn key(&self, idx: u32) -> &K {
        &self.node(idx).k
    }

    pub fn value(&self, idx: u32) -> &V {
        &self.node(idx).v
    }

    pub fn value_mut_by_index(&mut self, idx: u32) -> &mut V {
        &mut self.arena[idx as usize].v
    }

    fn push_node(&mut self, key: K, value: V) -> u32 {
        let idx = u32::try_from(self.arena.len()).expect("arena index fits in u32");
        self.arena.push(AvlNode::new(idx, key, value));
        self.first_inserted = Some(ring::push_back(
            &mut self.arena,
            Ring::Inserted,
            self.first_inserted,
            idx,
        ));
        self.len = self.len.saturating_add(1);
        idx
    }

    /// Applies the collision policy to the existing node `idx`.
    fn collide(&mut self, idx: u32, key: K, value: V) -> Option<V>
    where
        V: Clone,
    {
        match self.policy {
            CollisionPolicy::Replace => {
                let node = &mut self.arena[idx as usize];
                node.k = key;
                let old = std::mem::replace(&mut node.v, value);
                let head = self.first_inserted.expect("non-empty tree has a head");
                self.first_inserted = Some(ring::move_to_back(
                    &mut self.arena,
                    Ring::Inserted,
                    head,
                    idx,
                ));
                log::debug!("avl: replaced value at node {idx}");
                Some(old)
            }
            CollisionPolicy::IgnoreInsertion => {
                log::debug!("avl: ignored insertion colliding with node {idx}");
                Some(self.arena[idx as usize].v.clone())
            }
        }
    }

    /// Inserts `key` → `value`.
    ///
    /// Returns the value stored under `key` before the call, or `None` when
    /// the key is new. On a collision the tree's [`CollisionPolicy`] decides
    /// whether the entry is overwritten (and becomes the newest) or kept.
    pub fn put(&mut self, key: K, value: V) -> Option<V>
    where
        V: Clone,
    {
        let Some(root) = self.root else {
            let idx = self.push_node(key, value);
            self.root = Some(idx);
            self.min = Some(idx);
            return None;
        };

        let mut curr = root;
        loop {
            let cmp = (self.comparator)(&key, &self.arena[curr as usize].k);
            if cmp == 0 {
                return self.collide(curr, key, value);
            }
            let child = if cmp < 0 {
                self.arena[curr as usize].l
            } else {
                self.arena[curr as usize].r
            };
            match child {
                Some(child) => curr = child,
                None => {
                    let idx = self.push_node(key, value);
                    if cmp < 0 {
                        if self.min == Some(curr) {
                            self.min = Some(idx);
                        }
                        self.root = util::insert_left(&mut self.arena, self.root, idx, curr);
                    } else {
                        self.root = util::insert_right(&mut self.arena, self.root, idx, curr);
                    }
                    return None;
                }
            }
        }
    }

    /// Inserts `value` under the key produced by the configured key extractor.
    pub fn put_value(&mut self, value: V) -> Result<Option<V>, ConfigError>
    where
        V: Clone,
    {
        let extract = self.key_extractor.ok_or(ConfigError::MissingKeyExtractor)?;
        let key = extract(&value);
        Ok(self.put(key, value))
    }

    pub fn find(&self, key: &K) -> Option<u32> {
        find(&self.arena, self.root, key, &self.comparator)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|i| self.value(i))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.find(key)?;
        Some(self.value_mut_by_index(idx))
    }

    pub fn has(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn size(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every node at once.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.min = None;
        self.first_inserted = None;
        self.len = 0;
    }

    /// Node with the smallest key.
    pub fn first(&self) -> Option<u32> {
        self.min
    }

    /// Node with the largest key.
    pub fn last(&self) -> Option<u32> {
        self.min.map(|m| self.arena[m as usize].prev_sorted)
    }

    /// Oldest node (queue front).
    pub fn first_inserted(&self) -> Option<u32> {
        self.first_inserted
    }

    /// Newest node (stack top).
    pub fn last_inserted(&self) -> Option<u32> {
        self.first_inserted
            .map(|f| self.arena[f as usize].prev_inserted)
    }

    /// Next node in ascending key order; `None` after the maximum.
    pub fn next(&self, curr: u32) -> Option<u32> {
        let next = self.arena[curr as usize].next_sorted;
        (Some(next) != self.min).then_some(next)
    }

    /// Previous node in ascending key order; `None` before the minimum.
    pub fn prev(&self, curr: u32) -> Option<u32> {
        (Some(curr) != self.min).then(|| self.arena[curr as usize].prev_sorted)
    }

    /// Next node in insertion order; `None` after the newest.
    pub fn next_inserted(&self, curr: u32) -> Option<u32> {
        let next = self.arena[curr as usize].next_inserted;
        (Some(next) != self.first_inserted).then_some(next)
    }

    /// Previous node in insertion order; `None` before the oldest.
    pub fn prev_inserted(&self, curr: u32) -> Option<u32> {
        (Some(curr) != self.first_inserted).then(|| self.arena[curr as usize].prev_inserted)
    }

    /// 0-based position of node `idx` in ascending key order.
    ///
    /// Derived from the memoized subtree sizes on the way to the root.
    pub fn rank(&self, idx: u32) -> usize {
        util::rank(&self.arena, idx)
    }

    pub fn rank_of(&self, key: &K) -> Option<usize> {
        self.find(key).map(|i| self.rank(i))
    }

    /// Node at 0-based position `rank` in ascending key order.
    pub fn select(&self, rank: usize) -> Option<u32> {
        util::select(&self.arena, self.root, rank)
    }

    /// Starting node of a traversal mode.
    fn anchor(&self, mode: ForEachMode) -> Option<u32> {
        match mode {
            ForEachMode::SortedAscending => self.first(),
            ForEachMode::SortedDescending => self.last(),
            ForEachMode::InsertionOrder => self.first_inserted(),
            ForEachMode::InsertionOrderReversed => self.last_inserted(),
        }
    }

    /// Lazy walk over one ring. The iterator is `Clone`, so a pass can be
    /// restarted from any saved position.
    pub fn iter(&self, mode: ForEachMode) -> Iter<'_, K, V> {
        Iter::new(&self.arena, mode, self.anchor(mode), self.len)
    }

    /// Calls `visitor` on every entry in `mode` order.
    ///
    /// Visits nothing on an empty tree and each node exactly once otherwise.
    pub fn for_each<G: FnMut(&K, &V)>(&self, mode: ForEachMode, mut visitor: G) {
        for (k, v) in self.iter(mode) {
            visitor(k, v);
        }
    }

    /// Indices in `mode` order.
    pub fn indices(&self, mode: ForEachMode) -> impl Iterator<Item = u32> + '_ {
        self.iter(mode).indices()
    }

    fn anchors(&self) -> Anchors {
        Anchors {
            root: self.root,
            min: self.min,
            first_inserted: self.first_inserted,
            len: self.len,
        }
    }

    /// Checks every structural, annotation and ring invariant.
    pub fn assert_valid(&self) -> Result<(), String> {
        util::assert_avl_tree(&self.arena, self.anchors(), &self.comparator)
    }
}

impl<K, V, C> AvlTree<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Fn(&K, &K) -> i32,
{
    /// Compact structural dump with heights and subtree sizes.
    pub fn print(&self) -> String {
        util::print::<K, V, AvlNode<K, V>>(&self.arena, self.root, "")
    }

    fn dump_node(&self, full: bool, idx: u32, tab: &str) -> String {
        let n = self.node(idx);
        let mut out = format!("[{}] {:?} = {:?}", self.rank(idx), n.k, n.v);
        if full {
            let key_of = |i: Option<u32>| match i {
                Some(i) => format!("{:?}", self.key(i)),
                None => "∅".to_string(),
            };
            out.push_str(&format!(
                " (h={}, sl={}, sr={}, parent={}, sorted={}<>{}, inserted={}<>{})",
                n.h,
                n.sl,
                n.sr,
                key_of(n.p),
                key_of(Some(n.prev_sorted)),
                key_of(Some(n.next_sorted)),
                key_of(Some(n.prev_inserted)),
                key_of(Some(n.next_inserted)),
            ));
        }
        if n.l.is_none() && n.r.is_none() {
            return out;
        }
        let left = self.dump_child(full, n.l);
        let right = self.dump_child(full, n.r);
        out.push_str(&print_tree(Some(tab), &[Some(&*left), Some(&*right)]));
        out
    }

    fn dump_child(&self, full: bool, child: Option<u32>) -> Box<PrintChild<'_>> {
        match child {
            Some(c) => Box::new(move |tab: &str| self.dump_node(full, c, tab)),
            None => Box::new(|_: &str| "∅".to_string()),
        }
    }

    /// Indented dump of the whole tree, one node per line, with ranks.
    ///
    /// With `full`, every line also shows the node's height, subtree sizes,
    /// parent and both pairs of ring neighbours (by key).
    pub fn dump(&self, full: bool) -> String {
        let mut out = format!("AVL tree of size {}", self.len);
        match self.root {
            None => out.push_str(" (empty)"),
            Some(root) => {
                out.push('\n');
                out.push_str(&self.dump_node(full, root, ""));
            }
        }
        out
    }
}

impl<K, V, C> fmt::Display for AvlTree<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Fn(&K, &K) -> i32,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump(true))
    }
}

impl<K, V, C> fmt::Debug for AvlTree<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Fn(&K, &K) -> i32,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter(ForEachMode::SortedAscending)).finish()
    }
}

impl<'a, K, V, C> IntoIterator for &'a AvlTree<K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter(ForEachMode::SortedAscending)
    }
}

/// Collects construction-time configuration for an [`AvlTree`].
pub struct AvlTreeBuilder<K, V, C = fn(&K, &K) -> i32>
where
    C: Fn(&K, &K) -> i32,
{
    comparator: Option<C>,
    policy: CollisionPolicy,
    key_extractor: Option<KeyExtractor<K, V>>,
}

impl<K, V, C> Default for AvlTreeBuilder<K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> AvlTreeBuilder<K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    pub fn new() -> Self {
        Self {
            comparator: None,
            policy: CollisionPolicy::default(),
            key_extractor: None,
        }
    }

    pub fn comparator(mut self, comparator: C) -> Self {
        self.comparator = Some(comparator);
        self
    }

    pub fn collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn key_extractor(mut self, extractor: KeyExtractor<K, V>) -> Self {
        self.key_extractor = Some(extractor);
        self
    }

    /// Builds the tree; fails when no comparator was given.
    pub fn build(self) -> Result<AvlTree<K, V, C>, ConfigError> {
        let Some(comparator) = self.comparator else {
            log::debug!("avl: refusing to build a tree without a comparator");
            return Err(ConfigError::MissingComparator);
        };
        let mut tree = AvlTree::with_comparator(comparator, self.policy);
        tree.key_extractor = self.key_extractor;
        log::debug!("avl: built tree with {:?} policy", self.policy);
        Ok(tree)
    }
}
