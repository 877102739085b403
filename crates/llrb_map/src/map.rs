use std::cmp::Ordering;
use std::fmt;
use std::mem;

use tracing::trace;

use crate::OrderedMap;
use crate::error::MapError;
use crate::iter::{Iter, Keys, Values};
use crate::node::{Color, Link, Node, flip_colors, is_red, rotate_left, rotate_right};

/// Sorted map backed by a left-leaning red-black tree.
///
/// - Keys are unique; `put`/`insert` on an existing key overwrites its value.
/// - `get`, `put` and `delete` are `O(log n)` in the worst case.
/// - Every mutation rebalances on the way back up, so the tree satisfies all
///   invariants checked by [`validate`](Self::validate) between calls.
#[derive(Clone)]
pub struct LlrbMap<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K, V> LlrbMap<K, V> {
    pub const fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_deref(), self.len)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((&node.key, &node.value))
    }

    pub(crate) fn root(&self) -> Option<&Node<K, V>> {
        self.root.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn from_raw_parts(root: Link<K, V>, len: usize) -> Self {
        Self { root, len }
    }

    fn blacken_root(&mut self) {
        if let Some(root) = self.root.as_deref_mut() {
            root.color = Color::Black;
        }
    }

    /// Recolors the root red when both of its children are black, so the
    /// deletion helpers always descend from a red-adequate context.
    fn take_root_for_delete(&mut self) -> Option<Box<Node<K, V>>> {
        let mut root = self.root.take()?;
        if !is_red(&root.left) && !is_red(&root.right) {
            root.color = Color::Red;
        }
        Some(root)
    }
}

impl<K: Ord, V> LlrbMap<K, V> {
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            match key.cmp(&node.key) {
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => cur = node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut cur = self.root.as_deref_mut();
        while let Some(node) = cur {
            match key.cmp(&node.key) {
                Ordering::Less => cur = node.left.as_deref_mut(),
                Ordering::Greater => cur = node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.value),
            }
        }
        None
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Like [`get`](Self::get), for callers that may not have a key at all.
    pub fn try_get(&self, key: Option<&K>) -> Result<Option<&V>, MapError> {
        let key = key.ok_or(MapError::MissingKey)?;
        Ok(self.get(key))
    }

    /// Inserts `key` or overwrites its value.
    pub fn put(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    /// Inserts `key` or overwrites its value, returning the previous value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (root, old) = Self::insert_node(self.root.take(), key, value);
        self.root = Some(root);
        self.blacken_root();
        if old.is_none() {
            self.len += 1;
            trace!(len = self.len, "inserted new key");
        } else {
            trace!(len = self.len, "overwrote existing key");
        }
        old
    }

    /// Like [`insert`](Self::insert); a missing key leaves the map untouched.
    pub fn try_put(&mut self, key: Option<K>, value: V) -> Result<Option<V>, MapError> {
        let key = key.ok_or(MapError::MissingKey)?;
        Ok(self.insert(key, value))
    }

    /// Removes `key` if present.
    pub fn delete(&mut self, key: &K) {
        self.remove(key);
    }

    /// Removes `key` if present, returning its value.
    ///
    /// An absent key leaves the tree structurally unchanged.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        // The descent below assumes the key exists: it walks into the child on
        // the key's side without checking for an empty link.
        if !self.contains_key(key) {
            trace!(len = self.len, "remove missed");
            return None;
        }
        let root = self.take_root_for_delete()?;
        let (root, removed) = Self::remove_node(root, key);
        self.root = root;
        self.blacken_root();
        self.len -= 1;
        trace!(len = self.len, "removed key");
        Some(removed)
    }

    /// Removes and returns the entry with the smallest key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let root = self.take_root_for_delete()?;
        let (root, min) = Self::delete_min(root);
        self.root = root;
        self.blacken_root();
        self.len -= 1;
        trace!(len = self.len, "popped first key");
        let Node { key, value, .. } = *min;
        Some((key, value))
    }

    fn insert_node(h: Link<K, V>, key: K, value: V) -> (Box<Node<K, V>>, Option<V>) {
        let Some(mut h) = h else {
            return (Box::new(Node::new(key, value)), None);
        };

        let old = match key.cmp(&h.key) {
            Ordering::Less => {
                let (left, old) = Self::insert_node(h.left.take(), key, value);
                h.left = Some(left);
                old
            }
            Ordering::Greater => {
                let (right, old) = Self::insert_node(h.right.take(), key, value);
                h.right = Some(right);
                old
            }
            Ordering::Equal => Some(mem::replace(&mut h.value, value)),
        };

        if is_red(&h.right) && !is_red(&h.left) {
            h = rotate_left(h);
        }
        if is_red(&h.left) && h.left_left_is_red() {
            h = rotate_right(h);
        }
        if is_red(&h.left) && is_red(&h.right) {
            flip_colors(&mut h);
        }
        (h, old)
    }

    /// `key` must be present in the subtree rooted at `h`.
    fn remove_node(mut h: Box<Node<K, V>>, key: &K) -> (Link<K, V>, V) {
        let removed = if key < &h.key {
            if !is_red(&h.left) && !h.left_left_is_red() {
                h = Self::move_red_left(h);
            }
            let left = h.left.take().expect("key present in left subtree");
            let (left, removed) = Self::remove_node(left, key);
            h.left = left;
            removed
        } else {
            if is_red(&h.left) {
                h = rotate_right(h);
            }
            if key == &h.key && h.right.is_none() {
                // Without a right child this node is a bottom node with no left child either.
                let Node { value, .. } = *h;
                return (None, value);
            }
            if !is_red(&h.right) && !h.right_left_is_red() {
                h = Self::move_red_right(h);
            }
            let right = h.right.take().expect("key present at or right of this node");
            if key == &h.key {
                let (right, min) = Self::delete_min(right);
                h.right = right;
                let Node {
                    key: min_key,
                    value: min_value,
                    ..
                } = *min;
                h.key = min_key;
                mem::replace(&mut h.value, min_value)
            } else {
                let (right, removed) = Self::remove_node(right, key);
                h.right = right;
                removed
            }
        };

        (Some(Self::balance_after_delete(h)), removed)
    }

    /// Detaches the leftmost node of `h`, returning the rebalanced rest and the node.
    fn delete_min(mut h: Box<Node<K, V>>) -> (Link<K, V>, Box<Node<K, V>>) {
        if h.left.is_none() {
            let rest = h.right.take();
            return (rest, h);
        }
        if !is_red(&h.left) && !h.left_left_is_red() {
            h = Self::move_red_left(h);
        }
        let left = h.left.take().expect("move_red_left keeps a left child");
        let (left, min) = Self::delete_min(left);
        h.left = left;
        (Some(Self::balance_after_delete(h)), min)
    }

    /// `h` is red with two black children; makes `h.left` or one of its children red.
    fn move_red_left(mut h: Box<Node<K, V>>) -> Box<Node<K, V>> {
        flip_colors(&mut h);
        if h.right_left_is_red() {
            let right = h.right.take().expect("right_left_is_red implies a right child");
            h.right = Some(rotate_right(right));
            h = rotate_left(h);
            flip_colors(&mut h);
        }
        h
    }

    /// `h` is red with two black children; makes `h.right` or one of its children red.
    fn move_red_right(mut h: Box<Node<K, V>>) -> Box<Node<K, V>> {
        flip_colors(&mut h);
        if h.left_left_is_red() {
            h = rotate_right(h);
            flip_colors(&mut h);
        }
        h
    }

    fn balance_after_delete(mut h: Box<Node<K, V>>) -> Box<Node<K, V>> {
        if is_red(&h.right) {
            h = rotate_left(h);
        }
        if is_red(&h.left) && h.left_left_is_red() {
            h = rotate_right(h);
        }
        if is_red(&h.left) && is_red(&h.right) {
            flip_colors(&mut h);
        }
        h
    }
}

impl<K, V> Default for LlrbMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LlrbMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for LlrbMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for LlrbMap<K, V> {}

impl<K: Ord, V> FromIterator<(K, V)> for LlrbMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for LlrbMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a LlrbMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord, V> OrderedMap for LlrbMap<K, V> {
    type Key = K;
    type Value = V;

    fn new() -> Self {
        LlrbMap::new()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, key: &Self::Key) -> Option<&Self::Value> {
        LlrbMap::get(self, key)
    }

    fn insert(&mut self, key: Self::Key, value: Self::Value) -> Option<Self::Value> {
        LlrbMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &Self::Key) -> Option<Self::Value> {
        LlrbMap::remove(self, key)
    }
}
