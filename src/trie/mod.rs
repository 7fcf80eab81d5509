//! Concurrent character-level trie.
//!
//! The trie maps non-empty string keys to arbitrary values. Each node holds
//! one character; a key's value lives at the node reached by walking its
//! characters from the root. Nodes cache the depth of their subtree, which
//! the search engine uses to prune branches that cannot possibly satisfy a
//! query's error budget.
//!
//! # Thread Safety
//!
//! Every node guards its own child set with a per-node lock, so lookups and
//! searches touching unrelated parts of the tree run in parallel with each
//! other and with mutations. `insert` and `remove` additionally serialize
//! through one trie-wide lock; this makes the bottom-up depth fix-up atomic
//! with respect to other structural changes, so a search started right after
//! a mutation returns always prunes against consistent depths.

mod iterator;
mod node;

pub use iterator::TrieIter;
pub(crate) use node::Node;

use crate::error::TrieError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Concurrent trie mapping string keys to values.
///
/// # Example
///
/// ```rust,ignore
/// use fuzztrie::prelude::*;
///
/// let trie = Trie::new();
/// trie.insert("manual", vec![1, 2])?;
/// assert_eq!(trie.lookup_exact("manual"), Some(vec![1, 2]));
/// ```
pub struct Trie<V> {
    root: Arc<Node<V>>,
    /// Serializes structural mutation and depth recomputation.
    structural: Mutex<()>,
    /// Number of stored keys.
    len: AtomicUsize,
}

impl<V> Trie<V> {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self {
            root: Node::new_root(),
            structural: Mutex::new(()),
            len: AtomicUsize::new(0),
        }
    }

    /// Build a trie from `(key, value)` pairs.
    ///
    /// Empty keys are rejected the same way [`insert`](Self::insert) rejects
    /// them; later pairs overwrite earlier pairs with the same key.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, TrieError>
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
    {
        let trie = Self::new();
        for (key, value) in entries {
            trie.insert(key.as_ref(), value)?;
        }
        Ok(trie)
    }

    /// Insert a key, returning the previously stored value if the key was
    /// already present.
    ///
    /// # Errors
    ///
    /// [`TrieError::EmptyKey`] if `key` is empty.
    pub fn insert(&self, key: &str, value: V) -> Result<Option<V>, TrieError> {
        if key.is_empty() {
            return Err(TrieError::EmptyKey);
        }

        let _guard = self.structural.lock();
        let mut node = Arc::clone(&self.root);
        for c in key.chars() {
            node = node.ensure_child(c);
        }
        let previous = node.replace_value(value);
        if previous.is_none() {
            self.len.fetch_add(1, Ordering::Relaxed);
        }
        Node::recompute_depths_upward(&node);
        trace!(key, update = previous.is_some(), "trie insert");
        Ok(previous)
    }

    /// Remove a key, returning its value.
    ///
    /// Returns `None` if the key is unknown or its node is not terminal.
    /// The maximal tail of nodes used by no other key is unlinked; a node
    /// survives if it is the root, is itself terminal, or has more than one
    /// child. Ancestor depths are recomputed afterwards.
    pub fn remove(&self, key: &str) -> Option<V> {
        let _guard = self.structural.lock();
        let node = self.descend(key)?;
        let removed = node.take_value()?;
        self.len.fetch_sub(1, Ordering::Relaxed);

        if node.child_count() == 0 {
            // Climb to the highest node of the now-dead chain, then detach
            // it from the first protected ancestor.
            let mut doomed = Arc::clone(&node);
            loop {
                let parent = match doomed.parent() {
                    Some(p) => p,
                    None => break,
                };
                if parent.is_root() || parent.is_terminal() || parent.child_count() > 1 {
                    match doomed.fragment() {
                        Some(label) => parent.unlink_child(label),
                        None => unreachable!("the root is never part of an unlink chain"),
                    }
                    Node::recompute_depths_upward(&parent);
                    trace!(key, "trie remove (tail unlinked)");
                    return Some(removed);
                }
                doomed = parent;
            }
        }

        Node::recompute_depths_upward(&node);
        trace!(key, "trie remove");
        Some(removed)
    }

    /// Whether the exact key is stored.
    pub fn contains_exact(&self, key: &str) -> bool {
        self.descend(key).is_some_and(|node| node.is_terminal())
    }

    /// Whether any stored key starts with `prefix`.
    ///
    /// An empty prefix matches every key, so this returns whether the trie
    /// is non-empty.
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        if prefix.is_empty() {
            return !self.is_empty();
        }
        // Every node lies on the path of at least one stored key, so
        // reaching the prefix node is sufficient.
        self.descend(prefix).is_some()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// Length in characters of the longest stored key.
    ///
    /// This is the root's cached reachable depth, kept consistent by every
    /// mutation before it returns.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Whether no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all entries.
    pub fn clear(&self) {
        let _guard = self.structural.lock();
        self.root.reset();
        self.len.store(0, Ordering::Relaxed);
    }

    pub(crate) fn root(&self) -> &Arc<Node<V>> {
        &self.root
    }

    fn descend(&self, key: &str) -> Option<Arc<Node<V>>> {
        let mut node = Arc::clone(&self.root);
        for c in key.chars() {
            node = node.child(c)?;
        }
        Some(node)
    }
}

impl<V: Clone> Trie<V> {
    /// Look up the exact key, cloning its value.
    pub fn lookup_exact(&self, key: &str) -> Option<V> {
        self.descend(key)?.value_cloned()
    }

    /// All `(key, value)` pairs whose key starts with `prefix`, in
    /// breadth-first (shortest-key-first) order.
    pub fn match_by_prefix(&self, prefix: &str) -> Vec<(String, V)> {
        match self.descend(prefix) {
            Some(node) => TrieIter::new(node, prefix.to_string()).collect(),
            None => Vec::new(),
        }
    }

    /// Lazy, restartable iterator over every stored entry, in breadth-first
    /// (shortest-key-first) order.
    pub fn iter(&self) -> TrieIter<V> {
        TrieIter::new(Arc::clone(&self.root), String::new())
    }
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, V: Clone> IntoIterator for &'a Trie<V> {
    type Item = (String, V);
    type IntoIter = TrieIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V> std::fmt::Debug for Trie<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trie").field("len", &self.len()).finish()
    }
}
