//! An ordered map based on a red-black tree.
//!
//! Lookup, insertion, and removal take O(log n) time in the worst case, and iteration
//! yields entries in ascending order of their keys.

extern crate compare;

pub mod map;

#[cfg(feature = "ordered_iter")]
mod ordered_iter;

pub use map::TreeMap;
