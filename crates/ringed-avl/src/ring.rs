//! Circular doubly-linked ring primitives.
//!
//! Rings never contain an "absent" link: a lone node points at itself and
//! the owner of a ring keeps a separate `Option<u32>` head.

use crate::types::{Ring, RingNode};

#[inline]
fn set_next<N: RingNode>(arena: &mut [N], i: u32, ring: Ring, v: u32) {
    arena[i as usize].set_next(ring, v);
}

#[inline]
fn set_prev<N: RingNode>(arena: &mut [N], i: u32, ring: Ring, v: u32) {
    arena[i as usize].set_prev(ring, v);
}

/// Makes `node` a ring of its own.
pub fn self_link<N: RingNode>(arena: &mut [N], ring: Ring, node: u32) {
    set_next(arena, node, ring, node);
    set_prev(arena, node, ring, node);
}

/// Links `node` right after `anchor`.
pub fn link_after<N: RingNode>(arena: &mut [N], ring: Ring, anchor: u32, node: u32) {
    let next = arena[anchor as usize].next(ring);
    set_prev(arena, node, ring, anchor);
    set_next(arena, node, ring, next);
    set_prev(arena, next, ring, node);
    set_next(arena, anchor, ring, node);
}

/// Links `node` right before `anchor`.
pub fn link_before<N: RingNode>(arena: &mut [N], ring: Ring, anchor: u32, node: u32) {
    let prev = arena[anchor as usize].prev(ring);
    link_after(arena, ring, prev, node);
}

/// Detaches `node`, closing the gap. The node is left self-linked.
pub fn unlink<N: RingNode>(arena: &mut [N], ring: Ring, node: u32) {
    let prev = arena[node as usize].prev(ring);
    let next = arena[node as usize].next(ring);
    set_next(arena, prev, ring, next);
    set_prev(arena, next, ring, prev);
    self_link(arena, ring, node);
}

/// Appends `node` at the tail of the ring headed by `head`.
///
/// Returns the head, which only changes when the ring was empty.
pub fn push_back<N: RingNode>(arena: &mut [N], ring: Ring, head: Option<u32>, node: u32) -> u32 {
    match head {
        None => {
            self_link(arena, ring, node);
            node
        }
        Some(head) => {
            link_before(arena, ring, head, node);
            head
        }
    }
}

/// Moves `node` to the tail of the ring headed by `head`.
///
/// Returns the new head. When `node` was the head, the head advances to the
/// next element so the relative order of everything else is kept.
pub fn move_to_back<N: RingNode>(arena: &mut [N], ring: Ring, head: u32, node: u32) -> u32 {
    let next = arena[node as usize].next(ring);
    if next == node {
        return head;
    }
    if node == head {
        // The ring is circular: the old head already sits right after the tail.
        return next;
    }
    unlink(arena, ring, node);
    link_before(arena, ring, head, node);
    head
}

/// Number of nodes reachable from `head` before wrapping around.
pub fn len<N: RingNode>(arena: &[N], ring: Ring, head: Option<u32>) -> usize {
    let Some(head) = head else {
        return 0;
    };
    let mut count = 1;
    let mut curr = arena[head as usize].next(ring);
    while curr != head {
        count += 1;
        curr = arena[curr as usize].next(ring);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default)]
    struct N {
        next: [u32; 2],
        prev: [u32; 2],
    }

    fn slot(ring: Ring) -> usize {
        match ring {
            Ring::Sorted => 0,
            Ring::Inserted => 1,
        }
    }

    impl RingNode for N {
        fn next(&self, ring: Ring) -> u32 {
            self.next[slot(ring)]
        }
        fn prev(&self, ring: Ring) -> u32 {
            self.prev[slot(ring)]
        }
        fn set_next(&mut self, ring: Ring, v: u32) {
            self.next[slot(ring)] = v;
        }
        fn set_prev(&mut self, ring: Ring, v: u32) {
            self.prev[slot(ring)] = v;
        }
    }

    fn collect(arena: &[N], ring: Ring, head: u32) -> Vec<u32> {
        let mut out = vec![head];
        let mut curr = arena[head as usize].next(ring);
        while curr != head {
            out.push(curr);
            curr = arena[curr as usize].next(ring);
        }
        out
    }

    fn collect_back(arena: &[N], ring: Ring, head: u32) -> Vec<u32> {
        let tail = arena[head as usize].prev(ring);
        let mut out = vec![tail];
        let mut curr = arena[tail as usize].prev(ring);
        while curr != tail {
            out.push(curr);
            curr = arena[curr as usize].prev(ring);
        }
        out
    }

    #[test]
    fn push_back_builds_queue() {
        let mut arena = vec![N::default(); 4];
        let mut head = None;
        for i in 0..4 {
            head = Some(push_back(&mut arena, Ring::Inserted, head, i));
        }
        let head = head.unwrap();
        assert_eq!(head, 0);
        assert_eq!(collect(&arena, Ring::Inserted, head), vec![0, 1, 2, 3]);
        assert_eq!(collect_back(&arena, Ring::Inserted, head), vec![3, 2, 1, 0]);
        assert_eq!(len(&arena, Ring::Inserted, Some(head)), 4);
        assert_eq!(len(&arena, Ring::Inserted, None), 0);
    }

    #[test]
    fn rings_are_independent() {
        let mut arena = vec![N::default(); 3];
        let mut sorted = None;
        let mut inserted = None;
        for i in 0..3 {
            sorted = Some(push_back(&mut arena, Ring::Sorted, sorted, 2 - i));
            inserted = Some(push_back(&mut arena, Ring::Inserted, inserted, i));
        }
        assert_eq!(collect(&arena, Ring::Sorted, sorted.unwrap()), vec![2, 1, 0]);
        assert_eq!(collect(&arena, Ring::Inserted, inserted.unwrap()), vec![0, 1, 2]);
    }

    #[test]
    fn link_after_and_before() {
        let mut arena = vec![N::default(); 4];
        self_link(&mut arena, Ring::Sorted, 0);
        link_after(&mut arena, Ring::Sorted, 0, 2);
        link_before(&mut arena, Ring::Sorted, 2, 1);
        link_before(&mut arena, Ring::Sorted, 0, 3);
        assert_eq!(collect(&arena, Ring::Sorted, 0), vec![0, 1, 2, 3]);
        assert_eq!(collect_back(&arena, Ring::Sorted, 0), vec![3, 2, 1, 0]);
    }

    #[test]
    fn move_to_back_keeps_relative_order() {
        let mut arena = vec![N::default(); 4];
        let mut head = None;
        for i in 0..4 {
            head = Some(push_back(&mut arena, Ring::Inserted, head, i));
        }
        let head = move_to_back(&mut arena, Ring::Inserted, head.unwrap(), 1);
        assert_eq!(collect(&arena, Ring::Inserted, head), vec![0, 2, 3, 1]);

        let head = move_to_back(&mut arena, Ring::Inserted, head, 0);
        assert_eq!(collect(&arena, Ring::Inserted, head), vec![2, 3, 1, 0]);
        assert_eq!(collect_back(&arena, Ring::Inserted, head), vec![0, 1, 3, 2]);

        let head = move_to_back(&mut arena, Ring::Inserted, head, 0);
        assert_eq!(collect(&arena, Ring::Inserted, head), vec![2, 3, 1, 0]);
    }

    #[test]
    fn move_to_back_single_node() {
        let mut arena = vec![N::default(); 1];
        let head = push_back(&mut arena, Ring::Inserted, None, 0);
        assert_eq!(move_to_back(&mut arena, Ring::Inserted, head, 0), 0);
        assert_eq!(arena[0].next(Ring::Inserted), 0);
        assert_eq!(arena[0].prev(Ring::Inserted), 0);
    }

    #[test]
    fn unlink_leaves_node_self_linked() {
        let mut arena = vec![N::default(); 3];
        let mut head = None;
        for i in 0..3 {
            head = Some(push_back(&mut arena, Ring::Sorted, head, i));
        }
        unlink(&mut arena, Ring::Sorted, 1);
        assert_eq!(collect(&arena, Ring::Sorted, 0), vec![0, 2]);
        assert_eq!(arena[1].next(Ring::Sorted), 1);
        assert_eq!(arena[1].prev(Ring::Sorted), 1);
    }
}
