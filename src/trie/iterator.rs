//! Lazy breadth-first iteration over stored entries.
//!
//! The iterator yields `(key, value)` pairs in breadth-first order, i.e.
//! shortest keys first. Prefix matching relies on this order, so it is part
//! of the contract, not an implementation accident.
//!
//! Iteration is lazy and restartable: the iterator holds no lock between
//! `next` calls and a fresh iterator can be created at any time. Entries
//! inserted or removed while iterating may or may not be observed.

use super::node::Node;
use std::collections::VecDeque;
use std::sync::Arc;

/// Breadth-first iterator over `(key, value)` pairs.
///
/// Created by [`Trie::iter`](crate::trie::Trie::iter) and
/// [`Trie::match_by_prefix`](crate::trie::Trie::match_by_prefix).
pub struct TrieIter<V> {
    queue: VecDeque<(Arc<Node<V>>, String)>,
}

impl<V> TrieIter<V> {
    pub(crate) fn new(start: Arc<Node<V>>, prefix: String) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back((start, prefix));
        Self { queue }
    }
}

impl<V: Clone> Iterator for TrieIter<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, path)) = self.queue.pop_front() {
            for (label, child) in node.children() {
                let mut child_path = String::with_capacity(path.len() + label.len_utf8());
                child_path.push_str(&path);
                child_path.push(label);
                self.queue.push_back((child, child_path));
            }
            if let Some(value) = node.value_cloned() {
                return Some((path, value));
            }
        }
        None
    }
}
