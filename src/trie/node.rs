//! Trie node representation.
//!
//! Each node stores a one-character fragment (the root's fragment is empty),
//! an optional terminal value, a sorted child edge list and the cached depth
//! of its subtree. The parent back-reference is a `Weak` pointer, so the
//! graph contains no reference-counted cycle and dropping the trie drops
//! every node.

use crate::matching::{is_word_separator, FoldedChar};
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::sync::{Arc, Weak};

/// One node of the trie.
///
/// # Thread Safety
///
/// The mutable part (children, value, depth) sits behind a per-node
/// `RwLock`, so lookups touching disjoint nodes proceed in parallel.
/// Structural mutations additionally hold the trie-wide lock owned by
/// [`Trie`](crate::trie::Trie), which makes the bottom-up depth fix-up
/// atomic with respect to other structural changes.
pub(crate) struct Node<V> {
    /// The node's character; `None` only at the root.
    fragment: Option<char>,
    /// Cached folded variants of `fragment`; `None` when folding is a
    /// no-op (or at the root).
    folded: Option<FoldedChar>,
    parent: Weak<Node<V>>,
    state: RwLock<NodeState<V>>,
}

struct NodeState<V> {
    /// Child edges, sorted by character. No two edges share a character.
    children: SmallVec<[(char, Arc<Node<V>>); 4]>,
    /// Terminal value; present iff some stored key ends at this node.
    value: Option<V>,
    /// Length of the longest character sequence reachable through this
    /// node, including its own fragment.
    depth: usize,
}

impl<V> Node<V> {
    /// Create the root node. The root has no fragment and no parent.
    pub(crate) fn new_root() -> Arc<Self> {
        Arc::new(Node {
            fragment: None,
            folded: None,
            parent: Weak::new(),
            state: RwLock::new(NodeState {
                children: SmallVec::new(),
                value: None,
                depth: 0,
            }),
        })
    }

    fn new_child(fragment: char, parent: &Arc<Self>) -> Arc<Self> {
        let folded = FoldedChar::of(fragment);
        Arc::new(Node {
            fragment: Some(fragment),
            folded: (!folded.is_trivial()).then_some(folded),
            parent: Arc::downgrade(parent),
            state: RwLock::new(NodeState {
                children: SmallVec::new(),
                value: None,
                depth: 1,
            }),
        })
    }

    pub(crate) fn fragment(&self) -> Option<char> {
        self.fragment
    }

    pub(crate) fn folded(&self) -> Option<&FoldedChar> {
        self.folded.as_ref()
    }

    /// Whether this node ends a word: the root's empty fragment counts as a
    /// boundary, as does any separator character.
    pub(crate) fn is_boundary(&self) -> bool {
        match self.fragment {
            None => true,
            Some(c) => is_word_separator(c),
        }
    }

    pub(crate) fn is_root(&self) -> bool {
        self.fragment.is_none()
    }

    pub(crate) fn parent(&self) -> Option<Arc<Self>> {
        self.parent.upgrade()
    }

    /// Look up the child labeled `c`.
    pub(crate) fn child(&self, c: char) -> Option<Arc<Self>> {
        let state = self.state.read();
        state
            .children
            .binary_search_by_key(&c, |(label, _)| *label)
            .ok()
            .map(|i| Arc::clone(&state.children[i].1))
    }

    /// Snapshot of the child edges, in character order.
    pub(crate) fn children(&self) -> SmallVec<[(char, Arc<Self>); 4]> {
        self.state.read().children.clone()
    }

    pub(crate) fn child_count(&self) -> usize {
        self.state.read().children.len()
    }

    pub(crate) fn is_terminal(&self) -> bool {
        self.state.read().value.is_some()
    }

    pub(crate) fn depth(&self) -> usize {
        self.state.read().depth
    }

    /// Return the child labeled `c`, creating it if absent.
    pub(crate) fn ensure_child(self: &Arc<Self>, c: char) -> Arc<Self> {
        let mut state = self.state.write();
        match state.children.binary_search_by_key(&c, |(label, _)| *label) {
            Ok(i) => Arc::clone(&state.children[i].1),
            Err(i) => {
                let child = Node::new_child(c, self);
                state.children.insert(i, (c, Arc::clone(&child)));
                child
            }
        }
    }

    /// Detach the child labeled `c`, if present.
    pub(crate) fn unlink_child(&self, c: char) {
        let mut state = self.state.write();
        if let Ok(i) = state.children.binary_search_by_key(&c, |(label, _)| *label) {
            state.children.remove(i);
        }
    }

    pub(crate) fn replace_value(&self, value: V) -> Option<V> {
        self.state.write().value.replace(value)
    }

    pub(crate) fn take_value(&self) -> Option<V> {
        self.state.write().value.take()
    }

    /// Recompute this node's depth from its children.
    ///
    /// `depth(n) = max(depth(child)) + len(fragment(n))`; a childless
    /// non-root node has depth 1, the empty root depth 0.
    fn recompute_depth(&self) {
        let mut state = self.state.write();
        let max_child = state
            .children
            .iter()
            .map(|(_, child)| child.depth())
            .max()
            .unwrap_or(0);
        let fragment_len = usize::from(self.fragment.is_some());
        state.depth = max_child + fragment_len;
    }

    /// Restore the depth invariant on `start` and every ancestor.
    ///
    /// Walks the parent chain iteratively; long keys never recurse.
    pub(crate) fn recompute_depths_upward(start: &Arc<Self>) {
        let mut current = Some(Arc::clone(start));
        while let Some(node) = current {
            node.recompute_depth();
            current = node.parent();
        }
    }

    /// Drop all children and reset the depth. Root-only, used by `clear`.
    pub(crate) fn reset(&self) {
        let mut state = self.state.write();
        state.children.clear();
        state.value = None;
        state.depth = 0;
    }
}

impl<V: Clone> Node<V> {
    pub(crate) fn value_cloned(&self) -> Option<V> {
        self.state.read().value.clone()
    }
}
