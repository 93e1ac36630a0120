extern crate quickcheck;
extern crate rand;

use self::quickcheck::{Arbitrary, Gen, TestResult, quickcheck};
use self::rand::SeedableRng;
use self::rand::rngs::StdRng;
use self::rand::seq::SliceRandom;
use super::{Color, Link, Node};
use TreeMap;

/// An operation on a `TreeMap`.
#[derive(Clone, Debug)]
enum Op<K> where K: Clone + Ord {
    /// Insert a key into the map.
    Insert(K),
    /// Remove the key at index `n % map.len()` from the map.
    Remove(usize),
}

impl<K> Arbitrary for Op<K> where K: Arbitrary + Ord {
    fn arbitrary(gen: &mut Gen) -> Op<K> {
        if bool::arbitrary(gen) {
            Op::Insert(Arbitrary::arbitrary(gen))
        } else {
            Op::Remove(Arbitrary::arbitrary(gen))
        }
    }
}

impl<K> Op<K> where K: Clone + Ord {
    /// Perform the operation on the given map.
    fn exec(self, map: &mut TreeMap<K, ()>) {
        match self {
            Op::Insert(key) => { map.insert(key, ()); }
            Op::Remove(index) => if !map.is_empty() {
                let key = map.iter().nth(index % map.len()).unwrap().0.clone();
                map.remove(&key);
            },
        }
    }
}

/// Checks the red-black invariants: no red node has a red child, every root-to-leaf path
/// crosses the same number of black nodes, the root is black, keys ascend in order, and
/// the entry count agrees with `len`.
fn assert_red_black<K, V>(map: &TreeMap<K, V>) where K: Ord {
    fn black_height<K, V>(link: &Link<K, V>, parent_red: bool) -> usize {
        match *link {
            None => 1,
            Some(ref node) => {
                let red = node.color == Color::Red;
                if parent_red { assert!(!red, "red node has a red child"); }
                let left = black_height(&node.left, red);
                let right = black_height(&node.right, red);
                assert_eq!(left, right, "unequal black heights");
                left + if red { 0 } else { 1 }
            }
        }
    }

    if let Some(ref node) = map.root {
        assert_eq!(node.color, Color::Black, "root is not black");
    }

    black_height(&map.root, false);

    let mut it = map.iter();

    if let Some((mut prev, _)) = it.next() {
        for (key, _) in it {
            assert!(prev < key, "keys out of order");
            prev = key;
        }
    }

    assert_eq!(map.iter().count(), map.len());
}

fn node<K, V>(link: &Link<K, V>) -> &Node<K, V> {
    link.as_ref().unwrap()
}

fn map_of<K: Ord + Clone, V: Clone>(entries: &[(K, V)]) -> TreeMap<K, V> {
    let mut map = TreeMap::new();
    for &(ref k, ref v) in entries { map.insert(k.clone(), v.clone()); }
    map
}

fn keyed(keys: &[u32]) -> TreeMap<u32, ()> {
    let mut map = TreeMap::new();
    for &key in keys { map.insert(key, ()); }
    map
}

#[test]
fn singleton_has_black_root() {
    let map = TreeMap::singleton(1, "a");
    assert_eq!(map.len(), 1);

    let root = node(&map.root);
    assert_eq!(root.key, 1);
    assert_eq!(root.color, Color::Black);
    assert!(root.left.is_none());
    assert!(root.right.is_none());
}

#[test]
fn overwrite_leaves_structure_untouched() {
    let mut map = TreeMap::singleton(10, 233);
    assert_eq!(map.insert(10, 100), Some(233));
    assert_eq!(map.len(), 1);

    let root = node(&map.root);
    assert_eq!(root.key, 10);
    assert_eq!(root.value, 100);
    assert_eq!(root.color, Color::Black);
}

#[test]
fn new_leaves_start_red() {
    let map = map_of(&[(10, ()), (5, ()), (15, ())]);

    let root = node(&map.root);
    assert_eq!(root.color, Color::Black);
    assert_eq!(node(&root.left).color, Color::Red);
    assert_eq!(node(&root.right).color, Color::Red);
}

#[test]
fn insert_left_left_rotates_right() {
    let map = keyed(&[50, 40, 30]);

    let root = node(&map.root);
    assert_eq!(root.key, 40);
    assert_eq!(root.color, Color::Black);
    assert_eq!(node(&root.left).key, 30);
    assert_eq!(node(&root.left).color, Color::Red);
    assert_eq!(node(&root.right).key, 50);
    assert_eq!(node(&root.right).color, Color::Red);
    assert_red_black(&map);
}

#[test]
fn insert_right_right_rotates_left() {
    let map = keyed(&[50, 60, 70]);

    let root = node(&map.root);
    assert_eq!(root.key, 60);
    assert_eq!(root.color, Color::Black);
    assert_eq!(node(&root.left).key, 50);
    assert_eq!(node(&root.left).color, Color::Red);
    assert_eq!(node(&root.right).key, 70);
    assert_eq!(node(&root.right).color, Color::Red);
    assert_red_black(&map);
}

#[test]
fn insert_left_right_straightens_first() {
    let map = keyed(&[50, 40, 45]);

    let root = node(&map.root);
    assert_eq!(root.key, 45);
    assert_eq!(root.color, Color::Black);
    assert_eq!(node(&root.left).key, 40);
    assert_eq!(node(&root.left).color, Color::Red);
    assert_eq!(node(&root.right).key, 50);
    assert_eq!(node(&root.right).color, Color::Red);
    assert_red_black(&map);
}

#[test]
fn insert_right_left_straightens_first() {
    let map = keyed(&[50, 60, 55]);

    let root = node(&map.root);
    assert_eq!(root.key, 55);
    assert_eq!(root.color, Color::Black);
    assert_eq!(node(&root.left).key, 50);
    assert_eq!(node(&root.right).key, 60);
    assert_red_black(&map);
}

#[test]
fn red_uncle_recolors_without_rotating() {
    let map = keyed(&[10, 5, 15, 2]);

    let root = node(&map.root);
    assert_eq!(root.key, 10);
    assert_eq!(root.color, Color::Black);
    assert_eq!(node(&root.left).color, Color::Black);
    assert_eq!(node(&root.right).color, Color::Black);
    assert_eq!(node(&node(&root.left).left).key, 2);
    assert_eq!(node(&node(&root.left).left).color, Color::Red);
    assert_red_black(&map);
}

#[test]
fn recolor_then_rotate_cascade() {
    let map = keyed(&[7, 5, 10, 20, 15]);

    let root = node(&map.root);
    assert_eq!(root.key, 7);

    let right = node(&root.right);
    assert_eq!(right.key, 15);
    assert_eq!(right.color, Color::Black);
    assert_eq!(node(&right.left).key, 10);
    assert_eq!(node(&right.left).color, Color::Red);
    assert_eq!(node(&right.right).key, 20);
    assert_eq!(node(&right.right).color, Color::Red);
    assert_red_black(&map);
}

#[test]
fn remove_from_empty_is_a_noop() {
    let mut map: TreeMap<u32, ()> = TreeMap::new();
    assert_eq!(map.remove(&1), None);
    assert!(map.is_empty());
}

#[test]
fn remove_last_entry_empties_the_map() {
    let mut map = TreeMap::singleton(50, 1);
    assert_eq!(map.remove(&50), Some((50, 1)));
    assert!(map.root.is_none());
    assert_eq!(map.len(), 0);
}

#[test]
fn remove_red_leaf_detaches_it() {
    let mut map = keyed(&[50, 60, 40]);
    assert!(map.remove(&60).is_some());

    let root = node(&map.root);
    assert!(root.right.is_none());
    assert_eq!(node(&root.left).key, 40);
    assert_red_black(&map);
}

#[test]
fn remove_black_node_splices_red_child() {
    // 20B (10B, 30B) with 25R under 30
    let mut map = keyed(&[20, 10, 30, 25]);
    assert!(map.remove(&30).is_some());

    let root = node(&map.root);
    assert_eq!(root.key, 20);
    assert_eq!(node(&root.left).key, 10);
    assert_eq!(node(&root.right).key, 25);
    assert_eq!(node(&root.right).color, Color::Black);
    assert_red_black(&map);
}

#[test]
fn remove_with_two_children_substitutes_successor() {
    let mut map = map_of(&[(50, 1), (60, 2), (40, 3)]);
    assert_eq!(map.remove(&50), Some((50, 1)));

    let root = node(&map.root);
    assert_eq!(root.key, 60);
    assert_eq!(root.value, 2);
    assert_eq!(node(&root.left).key, 40);
    assert!(root.right.is_none());
    assert_red_black(&map);
}

#[test]
fn remove_interior_node_keeps_balance() {
    // 40B (20B (10R, 30R), 60B (50R, 80R)) after the inserts
    let mut map = keyed(&[40, 20, 60, 10, 30, 50, 80]);
    assert!(map.remove(&50).is_some());

    let right = node(&node(&map.root).right);
    assert_eq!(right.key, 60);
    assert!(right.left.is_none());
    assert_eq!(node(&right.right).key, 80);
    assert_eq!(node(&right.right).color, Color::Red);
    assert_red_black(&map);
}

#[test]
fn black_leaf_removal_recolors_sibling_under_red_parent() {
    // 10B (5B, 20R (15B, 25B (30R)))
    let mut map = keyed(&[10, 5, 20, 15, 25, 30]);
    map.remove(&30);
    map.remove(&15);

    let root = node(&map.root);
    assert_eq!(root.color, Color::Black);

    let right = node(&root.right);
    assert_eq!(right.key, 20);
    assert_eq!(right.color, Color::Black);
    assert!(right.left.is_none());
    assert_eq!(node(&right.right).key, 25);
    assert_eq!(node(&right.right).color, Color::Red);
    assert_red_black(&map);
}

#[test]
fn black_leaf_removal_recolors_left_sibling_under_red_parent() {
    let mut map = keyed(&[10, 5, 20, 15, 25, 30]);
    map.remove(&30);
    map.remove(&25);

    let root = node(&map.root);
    assert_eq!(root.color, Color::Black);

    let right = node(&root.right);
    assert_eq!(right.key, 20);
    assert_eq!(right.color, Color::Black);
    assert!(right.right.is_none());
    assert_eq!(node(&right.left).key, 15);
    assert_eq!(node(&right.left).color, Color::Red);
    assert_red_black(&map);
}

#[test]
fn black_leaf_removal_propagates_past_black_parent() {
    let mut map = keyed(&[10, 5, 20, 15, 25, 7, 1]);

    // force an all-black frontier so the deficit must climb
    {
        let root = map.root.as_mut().unwrap();
        root.left.as_mut().unwrap().left.as_mut().unwrap().color = Color::Black;
        root.left.as_mut().unwrap().right.as_mut().unwrap().color = Color::Black;
        root.right.as_mut().unwrap().left.as_mut().unwrap().color = Color::Black;
        root.right.as_mut().unwrap().right.as_mut().unwrap().color = Color::Black;
    }

    map.remove(&15);

    let root = node(&map.root);
    assert_eq!(root.color, Color::Black);

    let right = node(&root.right);
    assert_eq!(right.key, 20);
    assert_eq!(right.color, Color::Black);
    assert!(right.left.is_none());
    assert_eq!(node(&right.right).key, 25);
    assert_eq!(node(&right.right).color, Color::Red);
}

#[test]
fn random_inserts_and_removes_stay_balanced() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    for &size in &[2usize, 16, 64, 512] {
        let mut keys: Vec<usize> = (0..size).collect();
        keys.shuffle(&mut rng);

        let mut map = TreeMap::new();

        for &key in &keys {
            map.insert(key, ());
            assert_red_black(&map);
        }

        keys.shuffle(&mut rng);

        for &key in &keys {
            assert_eq!(map.remove(&key).map(|e| e.0), Some(key));
            assert_red_black(&map);
        }

        assert!(map.is_empty());
    }
}

#[test]
fn ops_preserve_invariants() {
    fn check(ops: Vec<Op<u32>>) -> TestResult {
        let mut map = TreeMap::new();

        for op in ops {
            op.exec(&mut map);
            assert_red_black(&map);
        }

        TestResult::passed()
    }

    quickcheck(check as fn(_) -> _);
}
