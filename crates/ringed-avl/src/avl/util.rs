use std::fmt::Debug;

use crate::ring;
use crate::types::Ring;
use crate::util::{first, get_l, get_p, get_r, next, replace_child, set_l, set_p, set_r};

use super::types::{AvlNodeLike, HEIGHT_NONE};

#[inline]
fn height<K, V, N>(arena: &[N], i: Option<u32>) -> i32
where
    N: AvlNodeLike<K, V>,
{
    i.map_or(HEIGHT_NONE, |i| arena[i as usize].height())
}

#[inline]
fn set_height<K, V, N>(arena: &mut [N], i: u32, h: i32)
where
    N: AvlNodeLike<K, V>,
{
    arena[i as usize].set_height(h);
}

#[inline]
fn subtree_size<K, V, N>(arena: &[N], i: Option<u32>) -> usize
where
    N: AvlNodeLike<K, V>,
{
    i.map_or(0, |i| arena[i as usize].subtree_size())
}

#[inline]
fn size_left<K, V, N>(arena: &[N], i: u32) -> usize
where
    N: AvlNodeLike<K, V>,
{
    arena[i as usize].size_left()
}

#[inline]
fn size_right<K, V, N>(arena: &[N], i: u32) -> usize
where
    N: AvlNodeLike<K, V>,
{
    arena[i as usize].size_right()
}

#[inline]
fn set_size_left<K, V, N>(arena: &mut [N], i: u32, s: usize)
where
    N: AvlNodeLike<K, V>,
{
    arena[i as usize].set_size_left(s);
}

#[inline]
fn set_size_right<K, V, N>(arena: &mut [N], i: u32, s: usize)
where
    N: AvlNodeLike<K, V>,
{
    arena[i as usize].set_size_right(s);
}

#[inline]
fn child_height<K, V, N>(arena: &[N], i: u32) -> i32
where
    N: AvlNodeLike<K, V>,
{
    1 + height(arena, get_l(arena, i)).max(height(arena, get_r(arena, i)))
}

/// Simple right rotation: the left child of `n` takes its place.
fn rotate_right<K, V, N>(arena: &mut [N], n: u32) -> u32
where
    N: AvlNodeLike<K, V>,
{
    let parent = get_p(arena, n);
    let p = get_l(arena, n).expect("left child exists");
    let pr = get_r(arena, p);

    set_l(arena, n, pr);
    if let Some(pr) = pr {
        set_p(arena, pr, Some(n));
    }
    set_r(arena, p, Some(n));
    set_p(arena, n, Some(p));
    set_p(arena, p, parent);
    replace_child(arena, parent, n, p);

    let nsl = size_right(arena, p);
    set_size_left(arena, n, nsl);
    let psr = 1 + nsl + size_right(arena, n);
    set_size_right(arena, p, psr);

    let nh = child_height(arena, n);
    set_height(arena, n, nh);
    let ph = 1 + nh.max(height(arena, get_l(arena, p)));
    set_height(arena, p, ph);
    p
}

/// Simple left rotation: the right child of `n` takes its place.
fn rotate_left<K, V, N>(arena: &mut [N], n: u32) -> u32
where
    N: AvlNodeLike<K, V>,
{
    let parent = get_p(arena, n);
    let p = get_r(arena, n).expect("right child exists");
    let pl = get_l(arena, p);

    set_r(arena, n, pl);
    if let Some(pl) = pl {
        set_p(arena, pl, Some(n));
    }
    set_l(arena, p, Some(n));
    set_p(arena, n, Some(p));
    set_p(arena, p, parent);
    replace_child(arena, parent, n, p);

    let nsr = size_left(arena, p);
    set_size_right(arena, n, nsr);
    let psl = 1 + nsr + size_left(arena, n);
    set_size_left(arena, p, psl);

    let nh = child_height(arena, n);
    set_height(arena, n, nh);
    let ph = 1 + nh.max(height(arena, get_r(arena, p)));
    set_height(arena, p, ph);
    p
}

/// Left-right rotation through `c = n.l.r`, which becomes the subtree top.
fn rotate_left_right<K, V, N>(arena: &mut [N], a: u32) -> u32
where
    N: AvlNodeLike<K, V>,
{
    let parent = get_p(arena, a);
    let b = get_l(arena, a).expect("left child exists");
    let c = get_r(arena, b).expect("left-right grandchild exists");
    let cl = get_l(arena, c);
    let cr = get_r(arena, c);

    replace_child(arena, parent, a, c);
    set_p(arena, c, parent);

    set_l(arena, a, cr);
    if let Some(cr) = cr {
        set_p(arena, cr, Some(a));
    }
    set_r(arena, b, cl);
    if let Some(cl) = cl {
        set_p(arena, cl, Some(b));
    }
    set_l(arena, c, Some(b));
    set_p(arena, b, Some(c));
    set_r(arena, c, Some(a));
    set_p(arena, a, Some(c));

    // Heights of a, b and c are current for the pre-rotation shape.
    let (ah, bh, ch) = (
        arena[a as usize].height(),
        arena[b as usize].height(),
        arena[c as usize].height(),
    );
    set_height(arena, c, ch + 1);
    set_height(arena, a, ah - 2);
    set_height(arena, b, bh - 1);
    debug_assert_eq!(arena[a as usize].height(), child_height(arena, a));
    debug_assert_eq!(arena[b as usize].height(), child_height(arena, b));
    debug_assert_eq!(arena[c as usize].height(), child_height(arena, c));

    let (csl, csr) = (size_left(arena, c), size_right(arena, c));
    set_size_left(arena, a, csr);
    set_size_right(arena, b, csl);
    let asr = size_right(arena, a);
    let bsl = size_left(arena, b);
    set_size_right(arena, c, csr + 1 + asr);
    set_size_left(arena, c, csl + 1 + bsl);
    c
}

/// Right-left rotation through `c = n.r.l`, which becomes the subtree top.
fn rotate_right_left<K, V, N>(arena: &mut [N], a: u32) -> u32
where
    N: AvlNodeLike<K, V>,
{
    let parent = get_p(arena, a);
    let b = get_r(arena, a).expect("right child exists");
    let c = get_l(arena, b).expect("right-left grandchild exists");
    let cl = get_l(arena, c);
    let cr = get_r(arena, c);

    replace_child(arena, parent, a, c);
    set_p(arena, c, parent);

    set_r(arena, a, cl);
    if let Some(cl) = cl {
        set_p(arena, cl, Some(a));
    }
    set_l(arena, b, cr);
    if let Some(cr) = cr {
        set_p(arena, cr, Some(b));
    }
    set_r(arena, c, Some(b));
    set_p(arena, b, Some(c));
    set_l(arena, c, Some(a));
    set_p(arena, a, Some(c));

    let (ah, bh, ch) = (
        arena[a as usize].height(),
        arena[b as usize].height(),
        arena[c as usize].height(),
    );
    set_height(arena, c, ch + 1);
    set_height(arena, a, ah - 2);
    set_height(arena, b, bh - 1);
    debug_assert_eq!(arena[a as usize].height(), child_height(arena, a));
    debug_assert_eq!(arena[b as usize].height(), child_height(arena, b));
    debug_assert_eq!(arena[c as usize].height(), child_height(arena, c));

    let (csl, csr) = (size_left(arena, c), size_right(arena, c));
    set_size_right(arena, a, csl);
    set_size_left(arena, b, csr);
    let asl = size_left(arena, a);
    let bsr = size_right(arena, b);
    set_size_left(arena, c, csl + 1 + asl);
    set_size_right(arena, c, csr + 1 + bsr);
    c
}

/// Restores balance at `n`, which is two levels taller on one side.
///
/// `left_heavy` picks the rotation direction; the double form is chosen when
/// the heavy child leans the other way (strictly). Returns the new root.
pub fn rotate<K, V, N>(arena: &mut [N], root: u32, n: u32, left_heavy: bool) -> u32
where
    N: AvlNodeLike<K, V>,
{
    let top = if left_heavy {
        let p = get_l(arena, n).expect("left child exists");
        if height(arena, get_r(arena, p)) > height(arena, get_l(arena, p)) {
            log::trace!("avl: left-right rotation at node {n}");
            rotate_left_right(arena, n)
        } else {
            log::trace!("avl: right rotation at node {n}");
            rotate_right(arena, n)
        }
    } else {
        let p = get_r(arena, n).expect("right child exists");
        if height(arena, get_l(arena, p)) > height(arena, get_r(arena, p)) {
            log::trace!("avl: right-left rotation at node {n}");
            rotate_right_left(arena, n)
        } else {
            log::trace!("avl: left rotation at node {n}");
            rotate_left(arena, n)
        }
    };
    if root == n {
        top
    } else {
        root
    }
}

/// Walks from `from` up to the root, refreshing heights and subtree sizes
/// and rotating wherever the balance factor reaches two.
///
/// Returns the new root.
pub fn insert_fixup<K, V, N>(arena: &mut [N], mut root: u32, from: u32) -> u32
where
    N: AvlNodeLike<K, V>,
{
    let mut curr = Some(from);
    while let Some(n) = curr {
        let l = get_l(arena, n);
        let r = get_r(arena, n);
        let hl = height(arena, l);
        let hr = height(arena, r);
        let sl = subtree_size(arena, l);
        let sr = subtree_size(arena, r);
        set_height(arena, n, 1 + hl.max(hr));
        set_size_left(arena, n, sl);
        set_size_right(arena, n, sr);

        let p = get_p(arena, n);
        if let Some(p) = p {
            if get_l(arena, p) == Some(n) {
                set_size_left(arena, p, sl + sr + 1);
            } else {
                set_size_right(arena, p, sl + sr + 1);
            }
        }

        let delta = hl - hr;
        if delta.abs() >= 2 {
            root = rotate(arena, root, n, delta >= 2);
            // `n` now sits below the rotated top, which hangs from `p`.
            debug_assert_eq!(get_p(arena, n).and_then(|top| get_p(arena, top)), p);
        }
        curr = p;
    }
    root
}

fn attach<K, V, N>(arena: &mut [N], root: Option<u32>, n: u32, p: u32) -> Option<u32>
where
    N: AvlNodeLike<K, V>,
{
    let root = root.expect("root exists");
    set_p(arena, n, Some(p));
    Some(insert_fixup(arena, root, p))
}

/// Attaches `n` as the right child of the leaf slot under `p`, links it
/// right after `p` in the sorted ring and rebalances. Returns the new root.
pub fn insert_right<K, V, N>(arena: &mut [N], root: Option<u32>, n: u32, p: u32) -> Option<u32>
where
    N: AvlNodeLike<K, V>,
{
    debug_assert!(get_r(arena, p).is_none());
    set_r(arena, p, Some(n));
    ring::link_after(arena, Ring::Sorted, p, n);
    attach(arena, root, n, p)
}

/// Attaches `n` as the left child of the leaf slot under `p`, links it right
/// before `p` in the sorted ring and rebalances. Returns the new root.
pub fn insert_left<K, V, N>(arena: &mut [N], root: Option<u32>, n: u32, p: u32) -> Option<u32>
where
    N: AvlNodeLike<K, V>,
{
    debug_assert!(get_l(arena, p).is_none());
    set_l(arena, p, Some(n));
    ring::link_before(arena, Ring::Sorted, p, n);
    attach(arena, root, n, p)
}

/// 0-based position of `n` in ascending key order.
///
/// Every ancestor reached from its right child contributes itself and its
/// left subtree. O(height).
pub fn rank<K, V, N>(arena: &[N], n: u32) -> usize
where
    N: AvlNodeLike<K, V>,
{
    let mut rank = size_left(arena, n);
    let mut curr = n;
    while let Some(p) = get_p(arena, curr) {
        if get_r(arena, p) == Some(curr) {
            rank += size_left(arena, p) + 1;
        }
        curr = p;
    }
    rank
}

/// Node at 0-based position `k` in ascending key order.
pub fn select<K, V, N>(arena: &[N], root: Option<u32>, mut k: usize) -> Option<u32>
where
    N: AvlNodeLike<K, V>,
{
    let mut curr = root;
    while let Some(i) = curr {
        let sl = size_left(arena, i);
        if k < sl {
            curr = get_l(arena, i);
        } else if k == sl {
            return Some(i);
        } else {
            k -= sl + 1;
            curr = get_r(arena, i);
        }
    }
    None
}

/// Anchors of a tree as seen by [`assert_avl_tree`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Anchors {
    pub root: Option<u32>,
    pub min: Option<u32>,
    pub first_inserted: Option<u32>,
    pub len: usize,
}

fn validate_subtree<K, V, N>(arena: &[N], node: u32) -> Result<(i32, usize), String>
where
    N: AvlNodeLike<K, V>,
{
    let l = get_l(arena, node);
    let r = get_r(arena, node);

    let (hl, sl) = match l {
        Some(l) => {
            if get_p(arena, l) != Some(node) {
                return Err(format!("Broken parent link on left child of node {node}"));
            }
            validate_subtree(arena, l)?
        }
        None => (HEIGHT_NONE, 0),
    };
    let (hr, sr) = match r {
        Some(r) => {
            if get_p(arena, r) != Some(node) {
                return Err(format!("Broken parent link on right child of node {node}"));
            }
            validate_subtree(arena, r)?
        }
        None => (HEIGHT_NONE, 0),
    };

    let n = &arena[node as usize];
    let h = 1 + hl.max(hr);
    if n.height() != h {
        return Err(format!(
            "Height mismatch at node {node}: expected {h}, got {}",
            n.height()
        ));
    }
    if n.size_left() != sl || n.size_right() != sr {
        return Err(format!(
            "Size mismatch at node {node}: expected ({sl}, {sr}), got ({}, {})",
            n.size_left(),
            n.size_right()
        ));
    }
    if (hl - hr).abs() > 1 {
        return Err(format!("AVL balance violated at node {node}"));
    }
    Ok((h, sl + sr + 1))
}

fn validate_ring<K, V, N>(
    arena: &[N],
    ring: Ring,
    head: u32,
    expected: &[u32],
) -> Result<(), String>
where
    N: AvlNodeLike<K, V>,
{
    let mut curr = head;
    for (i, &want) in expected.iter().enumerate() {
        if curr != want {
            return Err(format!(
                "{ring:?} ring diverges at step {i}: expected node {want}, got {curr}"
            ));
        }
        let next = arena[curr as usize].next(ring);
        if arena[next as usize].prev(ring) != curr {
            return Err(format!("{ring:?} ring has a broken back link at node {next}"));
        }
        curr = next;
    }
    if curr != head {
        return Err(format!("{ring:?} ring does not wrap around to its head"));
    }
    Ok(())
}

/// Checks the shape, the memoized annotations and both rings.
///
/// Heights and sizes are re-derived bottom-up and compared with the stored
/// ones. The sorted ring must match the in-order walk of the shape; the
/// insertion ring must hold exactly the nodes of the tree.
pub fn assert_avl_tree<K, V, N, C>(arena: &[N], anchors: Anchors, comparator: &C) -> Result<(), String>
where
    N: AvlNodeLike<K, V>,
    C: Fn(&K, &K) -> i32,
{
    let Some(root) = anchors.root else {
        if anchors.min.is_some() || anchors.first_inserted.is_some() || anchors.len != 0 {
            return Err("Empty tree has dangling anchors".to_string());
        }
        return Ok(());
    };

    if get_p(arena, root).is_some() {
        return Err("Root has parent".to_string());
    }

    let (_, size) = validate_subtree(arena, root)?;
    if size != anchors.len {
        return Err(format!("Size mismatch: tree has {size} nodes, len is {}", anchors.len));
    }

    let mut in_order = Vec::with_capacity(size);
    let mut curr = first(arena, Some(root));
    while let Some(i) = curr {
        if let Some(&prev) = in_order.last() {
            let cmp = comparator(arena[prev as usize].key(), arena[i as usize].key());
            if cmp >= 0 {
                return Err("Node order violated".to_string());
            }
        }
        in_order.push(i);
        curr = next(arena, i);
    }

    if anchors.min != in_order.first().copied() {
        return Err("Cached minimum is not the leftmost node".to_string());
    }
    validate_ring(arena, Ring::Sorted, in_order[0], &in_order)?;

    let Some(head) = anchors.first_inserted else {
        return Err("Non-empty tree has no insertion head".to_string());
    };
    let mut seen = vec![false; arena.len()];
    for &i in &in_order {
        seen[i as usize] = true;
    }
    let mut chronological = Vec::with_capacity(size);
    let mut curr = head;
    for _ in 0..size {
        if !seen[curr as usize] {
            return Err(format!("Insertion ring visits node {curr} twice or off-tree"));
        }
        seen[curr as usize] = false;
        chronological.push(curr);
        curr = arena[curr as usize].next(Ring::Inserted);
    }
    validate_ring(arena, Ring::Inserted, head, &chronological)?;

    if ring::len(arena, Ring::Sorted, anchors.min) != size {
        return Err("Sorted ring length differs from tree size".to_string());
    }
    Ok(())
}

/// Debug printer for AVL trees.
pub fn print<K, V, N>(arena: &[N], node: Option<u32>, tab: &str) -> String
where
    K: Debug,
    V: Debug,
    N: AvlNodeLike<K, V>,
{
    match node {
        None => "∅".to_string(),
        Some(i) => {
            let n = &arena[i as usize];
            let left = print::<K, V, N>(arena, n.l(), &format!("{tab}  "));
            let right = print::<K, V, N>(arena, n.r(), &format!("{tab}  "));
            format!(
                "Node[{i}] [h={}, sl={}, sr={}] {{ {:?} = {:?} }}\n{tab}L={left}\n{tab}R={right}",
                n.height(),
                n.size_left(),
                n.size_right(),
                n.key(),
                n.value()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avl::types::AvlNode;
    use crate::types::default_comparator;

    /// Builds a tree the way `AvlTree::put` does, without collision handling.
    fn build(keys: &[i32]) -> (Vec<AvlNode<i32, ()>>, Anchors) {
        let mut arena: Vec<AvlNode<i32, ()>> = Vec::new();
        let mut anchors = Anchors::default();
        for &k in keys {
            let idx = arena.len() as u32;
            arena.push(AvlNode::new(idx, k, ()));
            anchors.first_inserted = Some(ring::push_back(
                &mut arena,
                Ring::Inserted,
                anchors.first_inserted,
                idx,
            ));
            anchors.len += 1;
            let Some(mut curr) = anchors.root else {
                anchors.root = Some(idx);
                anchors.min = Some(idx);
                continue;
            };
            loop {
                if k < arena[curr as usize].k {
                    match arena[curr as usize].l {
                        Some(l) => curr = l,
                        None => {
                            if anchors.min == Some(curr) {
                                anchors.min = Some(idx);
                            }
                            anchors.root = insert_left(&mut arena, anchors.root, idx, curr);
                            break;
                        }
                    }
                } else {
                    match arena[curr as usize].r {
                        Some(r) => curr = r,
                        None => {
                            anchors.root = insert_right(&mut arena, anchors.root, idx, curr);
                            break;
                        }
                    }
                }
            }
        }
        (arena, anchors)
    }

    fn shape(arena: &[AvlNode<i32, ()>], root: Option<u32>) -> (i32, Option<i32>, Option<i32>) {
        let root = root.unwrap();
        let n = &arena[root as usize];
        (
            n.k,
            n.l.map(|i| arena[i as usize].k),
            n.r.map(|i| arena[i as usize].k),
        )
    }

    #[test]
    fn three_node_rotations() {
        for keys in [[3, 2, 1], [1, 2, 3], [3, 1, 2], [1, 3, 2]] {
            let (arena, anchors) = build(&keys);
            assert_eq!(shape(&arena, anchors.root), (2, Some(1), Some(3)), "{keys:?}");
            let root = anchors.root.unwrap() as usize;
            assert_eq!(arena[root].h, 1);
            assert_eq!((arena[root].sl, arena[root].sr), (1, 1));
            assert_avl_tree(&arena, anchors, &default_comparator::<i32>).unwrap();
        }
    }

    #[test]
    fn fixup_keeps_sizes_above_rotation() {
        let (arena, anchors) = build(&[50, 25, 75, 10, 30, 5]);
        assert_avl_tree(&arena, anchors, &default_comparator::<i32>).unwrap();
        let (arena, anchors) = build(&[50, 25, 75, 60, 90, 95, 10]);
        assert_avl_tree(&arena, anchors, &default_comparator::<i32>).unwrap();
    }

    #[test]
    fn rank_and_select_agree() {
        let keys: Vec<i32> = (0..64).map(|i| (i * 37) % 64).collect();
        let (arena, anchors) = build(&keys);
        assert_avl_tree(&arena, anchors, &default_comparator::<i32>).unwrap();
        for (idx, node) in arena.iter().enumerate() {
            assert_eq!(rank(&arena, idx as u32), node.k as usize);
            assert_eq!(select(&arena, anchors.root, node.k as usize), Some(idx as u32));
        }
        assert_eq!(select(&arena, anchors.root, 64), None);
        assert_eq!(rank(&arena, anchors.root.unwrap()), arena[anchors.root.unwrap() as usize].sl);
        assert_eq!(rank(&arena, anchors.min.unwrap()), 0);
    }

    #[test]
    fn validator_catches_stale_annotations() {
        let (mut arena, anchors) = build(&[1, 2, 3]);
        let root = anchors.root.unwrap() as usize;
        arena[root].sl = 5;
        assert!(assert_avl_tree(&arena, anchors, &default_comparator::<i32>).is_err());
        arena[root].sl = 1;
        arena[root].h = 4;
        assert!(assert_avl_tree(&arena, anchors, &default_comparator::<i32>).is_err());
    }

    #[test]
    fn validator_catches_broken_ring() {
        let (mut arena, anchors) = build(&[1, 2, 3, 4]);
        let min = anchors.min.unwrap() as usize;
        let second = arena[min].next_sorted;
        let third = arena[second as usize].next_sorted;
        arena[min].next_sorted = third;
        assert!(assert_avl_tree(&arena, anchors, &default_comparator::<i32>).is_err());
    }

    #[test]
    fn print_shows_annotations() {
        let (arena, anchors) = build(&[2, 1]);
        let out = print::<i32, (), _>(&arena, anchors.root, "");
        assert!(out.starts_with("Node[0] [h=1, sl=1, sr=0] { 2 = () }"));
        assert!(out.contains("L=Node[1] [h=0, sl=0, sr=0] { 1 = () }"));
    }
}
