use crate::types::{KvNode, Node, Ring, RingNode};

/// Height reported for an absent child: one below a leaf.
pub const HEIGHT_NONE: i32 = -1;

/// AVL node threaded into both rings.
#[derive(Clone, Debug)]
pub struct AvlNode<K, V> {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub k: K,
    pub v: V,
    /// Longest path down to a leaf; a leaf has height 0.
    pub h: i32,
    /// Number of nodes in the left subtree.
    pub sl: usize,
    /// Number of nodes in the right subtree.
    pub sr: usize,
    pub next_sorted: u32,
    pub prev_sorted: u32,
    pub next_inserted: u32,
    pub prev_inserted: u32,
}

impl<K, V> AvlNode<K, V> {
    /// Detached leaf stored at arena slot `idx`; both rings self-loop.
    pub fn new(idx: u32, k: K, v: V) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            k,
            v,
            h: 0,
            sl: 0,
            sr: 0,
            next_sorted: idx,
            prev_sorted: idx,
            next_inserted: idx,
            prev_inserted: idx,
        }
    }
}

impl<K, V> Node for AvlNode<K, V> {
    fn p(&self) -> Option<u32> {
        self.p
    }

    fn l(&self) -> Option<u32> {
        self.l
    }

    fn r(&self) -> Option<u32> {
        self.r
    }

    fn set_p(&mut self, v: Option<u32>) {
        self.p = v;
    }

    fn set_l(&mut self, v: Option<u32>) {
        self.l = v;
    }

    fn set_r(&mut self, v: Option<u32>) {
        self.r = v;
    }
}

impl<K, V> KvNode<K, V> for AvlNode<K, V> {
    fn key(&self) -> &K {
        &self.k
    }

    fn value(&self) -> &V {
        &self.v
    }

    fn value_mut(&mut self) -> &mut V {
        &mut self.v
    }

    fn set_key(&mut self, key: K) {
        self.k = key;
    }

    fn replace_value(&mut self, value: V) -> V {
        std::mem::replace(&mut self.v, value)
    }
}

impl<K, V> RingNode for AvlNode<K, V> {
    fn next(&self, ring: Ring) -> u32 {
        match ring {
            Ring::Sorted => self.next_sorted,
            Ring::Inserted => self.next_inserted,
        }
    }

    fn prev(&self, ring: Ring) -> u32 {
        match ring {
            Ring::Sorted => self.prev_sorted,
            Ring::Inserted => self.prev_inserted,
        }
    }

    fn set_next(&mut self, ring: Ring, v: u32) {
        match ring {
            Ring::Sorted => self.next_sorted = v,
            Ring::Inserted => self.next_inserted = v,
        }
    }

    fn set_prev(&mut self, ring: Ring, v: u32) {
        match ring {
            Ring::Sorted => self.prev_sorted = v,
            Ring::Inserted => self.prev_inserted = v,
        }
    }
}

/// AVL-specific node behavior: memoized height and subtree sizes.
pub trait AvlNodeLike<K, V>: KvNode<K, V> + RingNode {
    fn height(&self) -> i32;
    fn set_height(&mut self, h: i32);
    fn size_left(&self) -> usize;
    fn size_right(&self) -> usize;
    fn set_size_left(&mut self, s: usize);
    fn set_size_right(&mut self, s: usize);

    /// Nodes in the subtree rooted here, self included.
    fn subtree_size(&self) -> usize {
        self.size_left() + self.size_right() + 1
    }
}

impl<K, V> AvlNodeLike<K, V> for AvlNode<K, V> {
    fn height(&self) -> i32 {
        self.h
    }

    fn set_height(&mut self, h: i32) {
        self.h = h;
    }

    fn size_left(&self) -> usize {
        self.sl
    }

    fn size_right(&self) -> usize {
        self.sr
    }

    fn set_size_left(&mut self, s: usize) {
        self.sl = s;
    }

    fn set_size_right(&mut self, s: usize) {
        self.sr = s;
    }
}
