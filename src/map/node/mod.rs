mod iter;

#[cfg(test)]
mod test;

use compare::Compare;
use std::cmp::Ordering::*;
use std::mem::{replace, swap};

pub use self::iter::{Iter, IterMut};

pub type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Color {
    Red,
    Black,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dir {
    Left,
    Right,
}

impl Dir {
    fn opposite(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

pub trait LinkExt {
    type K;
    type V;
    fn as_node_ref(&self) -> Option<&Node<Self::K, Self::V>>;
}

impl<K, V> LinkExt for Link<K, V> {
    type K = K;
    type V = V;
    fn as_node_ref(&self) -> Option<&Node<K, V>> {
        self.as_ref().map(|node| &**node)
    }
}

#[derive(Clone)]
pub struct Node<K, V> {
    left: Link<K, V>,
    right: Link<K, V>,
    color: Color,
    key: K,
    value: V,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Node<K, V> {
        Node { left: None, right: None, color: Color::Red, key: key, value: value }
    }

    fn child(&self, dir: Dir) -> &Link<K, V> {
        match dir {
            Dir::Left => &self.left,
            Dir::Right => &self.right,
        }
    }

    fn child_mut(&mut self, dir: Dir) -> &mut Link<K, V> {
        match dir {
            Dir::Left => &mut self.left,
            Dir::Right => &mut self.right,
        }
    }

    /// Rotates the subtree toward `dir`, promoting the child on the opposite side.
    ///
    /// Colors are left untouched; callers repaint explicitly.
    fn rotate(node: &mut Box<Node<K, V>>, dir: Dir) {
        let mut save = match node.child_mut(dir.opposite()).take() {
            Some(child) => child,
            None => panic!("rotation without a child to promote"),
        };

        swap(node.child_mut(dir.opposite()), save.child_mut(dir));
        swap(node, &mut save);
        *node.child_mut(dir) = Some(save);
    }
}

fn is_red<K, V>(link: &Link<K, V>) -> bool {
    link.as_ref().map_or(false, |node| node.color == Color::Red)
}

fn red_violation<K, V>(link: &Link<K, V>) -> bool {
    match *link {
        Some(ref node) if node.color == Color::Red =>
            is_red(&node.left) || is_red(&node.right),
        _ => false,
    }
}

/// Inserts the entry into the tree, returning the value previously associated with the key,
/// if any. The root is repainted black afterwards.
pub fn insert<K, V, C>(link: &mut Link<K, V>, cmp: &C, key: K, value: V) -> Option<V>
    where C: Compare<K> {

    let old_value = insert_rec(link, cmp, key, value);
    if let Some(ref mut node) = *link { node.color = Color::Black; }
    old_value
}

fn insert_rec<K, V, C>(link: &mut Link<K, V>, cmp: &C, key: K, value: V) -> Option<V>
    where C: Compare<K> {

    match *link {
        None => {
            *link = Some(Box::new(Node::new(key, value)));
            None
        }
        Some(ref mut node) => {
            let old_value = match cmp.compare(&key, &node.key) {
                Equal => return Some(replace(&mut node.value, value)),
                Less => insert_rec(&mut node.left, cmp, key, value),
                Greater => insert_rec(&mut node.right, cmp, key, value),
            };

            if old_value.is_none() { fix_insert(node); }
            old_value
        }
    }
}

/// Repairs a red-red violation two levels below `node` on the unwind of an insertion.
fn fix_insert<K, V>(node: &mut Box<Node<K, V>>) {
    if node.color == Color::Red { return; }

    let dir = if red_violation(&node.left) {
        Dir::Left
    } else if red_violation(&node.right) {
        Dir::Right
    } else {
        return;
    };

    if is_red(node.child(dir.opposite())) {
        // red uncle: repaint and let the conflict bubble up
        node.color = Color::Red;
        if let Some(ref mut child) = *node.child_mut(Dir::Left) { child.color = Color::Black; }
        if let Some(ref mut child) = *node.child_mut(Dir::Right) { child.color = Color::Black; }
        return;
    }

    if let Some(ref mut child) = *node.child_mut(dir) {
        // straighten a zig-zag before the main rotation
        if is_red(child.child(dir.opposite())) { Node::rotate(child, dir); }
    }

    Node::rotate(node, dir.opposite());
    node.color = Color::Black;
    if let Some(ref mut child) = *node.child_mut(dir.opposite()) { child.color = Color::Red; }
}

/// Removes and returns the entry whose key is equal to the given key, if any. Any
/// black-height deficit reaching the root is absorbed and the root is repainted black.
pub fn remove<K, V, C, Q: ?Sized>(link: &mut Link<K, V>, cmp: &C, key: &Q) -> Option<(K, V)>
    where C: Compare<Q, K> {

    let (removed, _) = remove_rec(link, cmp, key);
    if let Some(ref mut node) = *link { node.color = Color::Black; }
    removed
}

/// The boolean is true when the subtree lost one unit of black height and the caller must
/// repair it.
fn remove_rec<K, V, C, Q: ?Sized>(link: &mut Link<K, V>, cmp: &C, key: &Q)
    -> (Option<(K, V)>, bool) where C: Compare<Q, K> {

    let ord = match *link {
        None => return (None, false),
        Some(ref node) => cmp.compare(key, &node.key),
    };

    match *link {
        Some(ref mut node) if ord != Equal => {
            let dir = if ord == Less { Dir::Left } else { Dir::Right };
            let (removed, deficit) = remove_rec(node.child_mut(dir), cmp, key);
            (removed, deficit && fix_deficit(node, dir))
        }
        _ => remove_node(link),
    }
}

fn remove_node<K, V>(link: &mut Link<K, V>) -> (Option<(K, V)>, bool) {
    if let Some(ref mut node) = *link {
        if node.left.is_some() && node.right.is_some() {
            // two children: pull up the in-order successor and remove its old slot
            let (succ, deficit) = remove_min(&mut node.right);

            match succ {
                Some((key, value)) => {
                    let removed =
                        (replace(&mut node.key, key), replace(&mut node.value, value));
                    return (Some(removed), deficit && fix_deficit(node, Dir::Right));
                }
                None => panic!("non-empty right subtree had no minimum"),
            }
        }
    }

    detach(link)
}

fn remove_min<K, V>(link: &mut Link<K, V>) -> (Option<(K, V)>, bool) {
    match *link {
        Some(ref mut node) if node.left.is_some() => {
            let (removed, deficit) = remove_min(&mut node.left);
            (removed, deficit && fix_deficit(node, Dir::Left))
        }
        _ => detach(link),
    }
}

/// Unlinks a node with at most one child. A lone child is necessarily red and takes the
/// node's place painted black; removing a childless black node reports a deficit.
fn detach<K, V>(link: &mut Link<K, V>) -> (Option<(K, V)>, bool) {
    match link.take() {
        None => (None, false),
        Some(node) => {
            let Node { left, right, color, key, value } = *node;

            match left.or(right) {
                Some(mut child) => {
                    child.color = Color::Black;
                    *link = Some(child);
                    (Some((key, value)), false)
                }
                None => (Some((key, value)), color == Color::Black),
            }
        }
    }
}

/// Rebalances `node` after its child toward `dir` lost one unit of black height.
/// Returns true if the subtree as a whole is still deficient.
fn fix_deficit<K, V>(node: &mut Box<Node<K, V>>, dir: Dir) -> bool {
    let opp = dir.opposite();

    if is_red(node.child(opp)) {
        // red sibling: rotate it on top, then repair below with a black sibling
        Node::rotate(node, dir);
        node.color = Color::Black;

        match *node.child_mut(dir) {
            Some(ref mut child) => {
                child.color = Color::Red;
                fix_deficit(child, dir)
            }
            None => panic!("red-black invariant violated: rotation lost the deficient side"),
        }
    } else {
        let (near_red, far_red) = match *node.child(opp) {
            Some(ref sibling) => (is_red(sibling.child(dir)), is_red(sibling.child(opp))),
            None => panic!("red-black invariant violated: deficient side has no sibling"),
        };

        if !near_red && !far_red {
            // repaint the sibling red; a red parent absorbs the deficit
            if let Some(ref mut sibling) = *node.child_mut(opp) {
                sibling.color = Color::Red;
            }

            if node.color == Color::Red {
                node.color = Color::Black;
                false
            } else {
                true
            }
        } else {
            if !far_red {
                // red near nephew: straighten into the far-nephew case
                if let Some(ref mut sibling) = *node.child_mut(opp) {
                    Node::rotate(sibling, opp);
                    sibling.color = Color::Black;
                    if let Some(ref mut child) = *sibling.child_mut(opp) {
                        child.color = Color::Red;
                    }
                }
            }

            let color = node.color;
            Node::rotate(node, dir);
            node.color = color;
            if let Some(ref mut child) = *node.child_mut(dir) { child.color = Color::Black; }
            if let Some(ref mut child) = *node.child_mut(opp) { child.color = Color::Black; }
            false
        }
    }
}

pub fn find<'a, K, V, C, Q: ?Sized>(link: &'a Link<K, V>, cmp: &C, key: &Q)
    -> Option<(&'a K, &'a V)> where C: Compare<Q, K> {

    let mut link = link;

    loop {
        match *link {
            None => return None,
            Some(ref node) => match cmp.compare(key, &node.key) {
                Equal => return Some((&node.key, &node.value)),
                Less => link = &node.left,
                Greater => link = &node.right,
            },
        }
    }
}

pub fn find_mut<'a, K, V, C, Q: ?Sized>(link: &'a mut Link<K, V>, cmp: &C, key: &Q)
    -> Option<(&'a K, &'a mut V)> where C: Compare<Q, K> {

    match *link {
        None => None,
        Some(ref mut node) => match cmp.compare(key, &node.key) {
            Equal => Some((&node.key, &mut node.value)),
            Less => find_mut(&mut node.left, cmp, key),
            Greater => find_mut(&mut node.right, cmp, key),
        },
    }
}

pub fn extremum<'a, K, V>(link: &'a Link<K, V>, dir: Dir) -> Option<(&'a K, &'a V)> {
    let mut link = link;
    let mut entry = None;

    while let Some(ref node) = *link {
        entry = Some((&node.key, &node.value));
        link = node.child(dir);
    }

    entry
}

pub fn extremum_mut<'a, K, V>(link: &'a mut Link<K, V>, dir: Dir) -> Option<(&'a K, &'a mut V)> {
    match *link {
        None => None,
        Some(ref mut node) => {
            if node.child(dir).is_some() {
                extremum_mut(node.child_mut(dir), dir)
            } else {
                Some((&node.key, &mut node.value))
            }
        }
    }
}
