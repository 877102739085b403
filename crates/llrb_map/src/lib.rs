//! Sorted map on a left-leaning red-black tree.
//!
//! Insertion and deletion repair the tree on the way back up each recursive
//! call, using only three local primitives: rotate left, rotate right and
//! color flip. No global rebalancing pass is ever needed.

use std::collections::BTreeMap;

mod error;
mod iter;
mod map;
mod node;
mod validate;

pub use error::{InvariantError, MapError};
pub use iter::{Iter, Keys, Values};
pub use map::LlrbMap;
pub use validate::Stats;

/// Ordered map interface.
///
/// - Keys are unique.
/// - `insert` overwrites the existing value and returns the old one.
/// - `remove` on an absent key returns `None` and changes nothing.
pub trait OrderedMap {
    type Key: Ord;
    type Value;

    fn new() -> Self;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &Self::Key) -> Option<&Self::Value>;

    fn contains_key(&self, key: &Self::Key) -> bool {
        self.get(key).is_some()
    }

    fn insert(&mut self, key: Self::Key, value: Self::Value) -> Option<Self::Value>;

    fn remove(&mut self, key: &Self::Key) -> Option<Self::Value>;
}

/// Baseline for benchmarks and the oracle in tests.
impl<K: Ord, V> OrderedMap for BTreeMap<K, V> {
    type Key = K;
    type Value = V;

    fn new() -> Self {
        BTreeMap::new()
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn get(&self, key: &Self::Key) -> Option<&Self::Value> {
        BTreeMap::get(self, key)
    }

    fn insert(&mut self, key: Self::Key, value: Self::Value) -> Option<Self::Value> {
        BTreeMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &Self::Key) -> Option<Self::Value> {
        BTreeMap::remove(self, key)
    }
}
