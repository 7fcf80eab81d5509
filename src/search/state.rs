//! The search-state machine: one partial alignment between a query and a
//! path from the trie root.
//!
//! States are immutable values; every transition constructs a new state, so
//! branches can fan out across threads without coordination. At each step
//! *all* children of the current node are explored — simultaneous
//! alignments are the mechanism by which errors are tolerated. Branches are
//! pruned against the nodes' cached depths, never collapsed to a single
//! best guess early.
//!
//! Per child, the first applicable transition wins, in this order:
//! continue (acronym word-skipping), match, resolve a pending swap, error,
//! reset. A state whose match conditions have become satisfiable enters
//! "gather" mode: it keeps walking with a frozen window to reach deeper
//! terminal nodes, and spawns exactly one fresh restart so a later, better
//! occurrence is never missed.
//!
//! The match window only grows on match and swap-resolution steps. Error
//! steps consume characters without extending it; characters eaten by
//! mid-alignment errors enter the window when a later match extends past
//! them, while leading and trailing error characters stay outside. This
//! keeps the "longer matched substring" ranking criterion honest: a window
//! can never be padded with gratuitous trailing errors.

use crate::matching::{compare, is_word_separator, FoldedChar, MatchOptions};
use crate::search::result::SearchResult;
use crate::search::strategy::SearchStrategy;
use crate::trie::Node;
use std::sync::Arc;

/// The invariant part of a search, shared by every state of one call.
pub(crate) struct SearchRequest {
    /// Query characters with precomputed folded variants.
    pub query: Vec<FoldedChar>,
    pub strategy: SearchStrategy,
    /// Maximum number of errors a candidate may accumulate.
    pub tolerance: usize,
    pub options: MatchOptions,
}

/// A recorded adjacent transposition waiting for its second half.
///
/// `expect` is the query index of the still-unmatched first character of
/// the swapped pair; it must match the very next child or the branch dies.
#[derive(Debug, Clone, Copy)]
struct PendingSwap {
    expect: usize,
}

/// One partial alignment. Cloned, never mutated in place.
pub(crate) struct SearchState<V> {
    request: Arc<SearchRequest>,
    node: Arc<Node<V>>,
    /// Characters walked from the root; equals the key at terminal nodes.
    path: Vec<char>,
    /// Query index this alignment restarts from (seeds with dropped
    /// leading characters restart past them).
    start_index: usize,
    /// Errors charged before the walk began.
    precharged: usize,
    query_index: usize,
    matched: usize,
    errors: usize,
    case_mismatches: usize,
    diacritic_mismatches: usize,
    /// Current match window as a half-open char range into `path`.
    window: Option<(usize, usize)>,
    /// Characters between the last word separator and the current node.
    separator_distance: usize,
    pending_swap: Option<PendingSwap>,
    swaps: usize,
    gather: bool,
}

impl<V> Clone for SearchState<V> {
    fn clone(&self) -> Self {
        Self {
            request: Arc::clone(&self.request),
            node: Arc::clone(&self.node),
            path: self.path.clone(),
            ..*self
        }
    }
}

impl<V: Clone> SearchState<V> {
    /// Initial alignment at the root, with the first `dropped` query
    /// characters skipped and charged as errors.
    pub(crate) fn seed(request: Arc<SearchRequest>, root: Arc<Node<V>>, dropped: usize) -> Self {
        Self {
            request,
            node: root,
            path: Vec::new(),
            start_index: dropped,
            precharged: dropped,
            query_index: dropped,
            matched: 0,
            errors: dropped,
            case_mismatches: 0,
            diacritic_mismatches: 0,
            window: None,
            separator_distance: 0,
            pending_swap: None,
            swaps: 0,
            gather: false,
        }
    }

    fn query_len(&self) -> usize {
        self.request.query.len()
    }

    /// Query characters not yet consumed by this alignment.
    fn trailing(&self) -> usize {
        match self.query_len().checked_sub(self.query_index) {
            Some(t) => t,
            // A query index past the end means the transition logic is
            // broken; this must never be absorbed as a miss.
            None => panic!(
                "search state consumed {} characters of a {}-character query",
                self.query_index,
                self.query_len()
            ),
        }
    }

    /// Whether the minimum-match and error conditions hold, regardless of
    /// where in the trie the state currently is.
    fn satisfiable(&self) -> bool {
        self.pending_swap.is_none()
            && self.matched >= self.query_len().saturating_sub(self.request.tolerance)
            && self.errors + self.trailing() <= self.request.tolerance
    }

    /// The success predicate: a defined window at a terminal node, enough
    /// matched characters, and errors (including unmatched trailing query
    /// characters) within the budget.
    pub(crate) fn is_success(&self) -> bool {
        self.window.is_some() && self.satisfiable() && self.node.is_terminal()
    }

    /// Generate all successor alignments of this state.
    pub(crate) fn successors(&self) -> Vec<SearchState<V>> {
        let mut next = Vec::new();
        let entering_gather = !self.gather && self.window.is_some() && self.satisfiable();
        let gathering = self.gather || entering_gather;
        let successful = self.is_success();

        // Error alternative (b): the query has a character the indexed data
        // lacks. Stays on this node, so it is generated once per state, not
        // per child.
        if self.may_branch_error() {
            let mut skip = self.clone();
            skip.query_index += 1;
            skip.errors += 1;
            skip.gather = gathering;
            next.push(skip);
        }

        for (label, child) in self.node.children() {
            if self.prune(&child) {
                continue;
            }
            if let Some(s) = self.try_continue(label, &child, gathering) {
                next.push(s);
                continue;
            }
            if let Some(s) = self.try_match(label, &child, gathering) {
                next.push(s);
                continue;
            }
            if let Some(s) = self.try_resolve_swap(label, &child, gathering) {
                next.push(s);
                continue;
            }
            if self.try_error(label, &child, gathering, &mut next) {
                continue;
            }
            if gathering {
                // A gather state keeps walking with a frozen window to
                // reach terminal nodes deeper in the key.
                let mut s = self.step(label, &child);
                s.gather = true;
                next.push(s);
            } else if !successful {
                next.push(self.reset(label, &child));
            }
        }

        if entering_gather {
            // Exactly one restart so a later, superior occurrence is still
            // found; subsequent gather steps do not spawn more.
            next.push(self.fresh_at_current());
        }

        next
    }

    /// Branch pruning: abandon a child whose subtree is too shallow to
    /// supply the key characters the rest of the query still requires.
    ///
    /// A pending swap still owes the key one character beyond the query
    /// index, which keeps the bound sound for the transposition strategies.
    fn prune(&self, child: &Node<V>) -> bool {
        let budget_left = self.request.tolerance - self.errors;
        let owed = self.trailing() + usize::from(self.pending_swap.is_some());
        let required = owed.saturating_sub(budget_left);
        child.depth() < required
    }

    /// Acronym word-skipping: move over characters inside the current word
    /// (and across separators) without consuming query characters.
    fn try_continue(
        &self,
        label: char,
        child: &Arc<Node<V>>,
        gathering: bool,
    ) -> Option<SearchState<V>> {
        if self.request.strategy != SearchStrategy::Acronym
            || self.window.is_none()
            || gathering
            || self.query_index >= self.query_len()
        {
            return None;
        }
        // At a word start the next query character must align; skipping is
        // only for the rest of the word and the separator run after it.
        if self.node.is_boundary() && !is_word_separator(label) {
            return None;
        }
        Some(self.step(label, child))
    }

    /// Consume one query character against a matching child.
    fn try_match(
        &self,
        label: char,
        child: &Arc<Node<V>>,
        gathering: bool,
    ) -> Option<SearchState<V>> {
        if self.pending_swap.is_some() {
            return None;
        }
        let q = self.request.query.get(self.query_index)?;
        if self.request.strategy == SearchStrategy::Acronym && !self.node.is_boundary() {
            return None;
        }
        let m = compare(label, child.folded(), q, self.request.options);
        if !m.any() {
            return None;
        }
        if self.window.is_none()
            && !self.request.strategy.may_start_match(
                self.node.is_boundary(),
                self.next_separator_distance(),
                self.errors,
            )
        {
            return None;
        }

        let mut s = self.step(label, child);
        s.extend_window();
        s.query_index += 1;
        s.matched += 1;
        if !m.exact {
            s.charge_fold_mismatch(m.case_fold, m.diacritic_fold);
        }
        s.gather = gathering;
        Some(s)
    }

    /// Second half of a recorded transposition: the swapped-out character
    /// must match this child, or the branch dies elsewhere.
    fn try_resolve_swap(
        &self,
        label: char,
        child: &Arc<Node<V>>,
        gathering: bool,
    ) -> Option<SearchState<V>> {
        let pending = self.pending_swap?;
        let q = &self.request.query[pending.expect];
        let m = compare(label, child.folded(), q, self.request.options);
        if !m.any() {
            return None;
        }
        let mut s = self.step(label, child);
        // The pair was charged as one error when recorded; both of its key
        // characters belong to the window now.
        s.window = Some(match s.window {
            Some((start, _)) => (start, s.path.len()),
            None => (s.path.len() - 2, s.path.len()),
        });
        s.matched += 2;
        s.pending_swap = None;
        if !m.exact {
            s.charge_fold_mismatch(m.case_fold, m.diacritic_fold);
        }
        s.gather = gathering;
        Some(s)
    }

    /// Spend one unit of the error budget on this child.
    ///
    /// For the transposition strategies this records a single pending-swap
    /// alignment; otherwise it branches into the misspelling and
    /// missing-from-query alternatives (the missing-from-key alternative is
    /// generated once per state in [`successors`](Self::successors)).
    ///
    /// Returns whether the error rule applied to this child.
    fn try_error(
        &self,
        label: char,
        child: &Arc<Node<V>>,
        gathering: bool,
        out: &mut Vec<SearchState<V>>,
    ) -> bool {
        if self.pending_swap.is_some() || self.errors >= self.request.tolerance {
            return false;
        }
        let strategy = self.request.strategy;

        if strategy.transposition_only() {
            if !strategy.allows_swap(self.swaps) {
                return false;
            }
            let Some(q_next) = self.request.query.get(self.query_index + 1) else {
                return false;
            };
            let m = compare(label, child.folded(), q_next, self.request.options);
            if !m.any() {
                return false;
            }
            let mut s = self.step(label, child);
            s.pending_swap = Some(PendingSwap {
                expect: self.query_index,
            });
            s.query_index += 2;
            s.errors += 1;
            s.swaps += 1;
            if !m.exact {
                s.charge_fold_mismatch(m.case_fold, m.diacritic_fold);
            }
            s.gather = gathering;
            out.push(s);
            return true;
        }

        if self.query_index >= self.query_len() {
            return false;
        }
        if self.window.is_none()
            && !strategy.may_start_error(
                self.node.is_boundary(),
                self.next_separator_distance(),
                self.errors,
            )
        {
            return false;
        }

        // (a) misspelling: advance both sides, mismatched.
        let mut sub = self.step(label, child);
        sub.query_index += 1;
        sub.errors += 1;
        sub.gather = gathering;
        out.push(sub);

        // (c) character missing from the query: advance only the trie side.
        let mut ins = self.step(label, child);
        ins.errors += 1;
        ins.gather = gathering;
        out.push(ins);

        true
    }

    /// Restart the alignment from this child with zero accumulated
    /// counters, so the walk finds a later, cleaner occurrence instead of
    /// giving up. The child itself is reconsidered as a match start.
    fn reset(&self, label: char, child: &Arc<Node<V>>) -> SearchState<V> {
        let fresh = self.fresh_at_current();
        match fresh.try_match(label, child, false) {
            Some(s) => s,
            None => fresh.step(label, child),
        }
    }

    /// A zero-counter copy of this state at the same node.
    fn fresh_at_current(&self) -> SearchState<V> {
        let mut s = self.clone();
        s.query_index = s.start_index;
        s.errors = s.precharged;
        s.matched = 0;
        s.case_mismatches = 0;
        s.diacritic_mismatches = 0;
        s.window = None;
        s.pending_swap = None;
        s.swaps = 0;
        s.gather = false;
        s
    }

    fn may_branch_error(&self) -> bool {
        self.pending_swap.is_none()
            && !self.request.strategy.transposition_only()
            && self.errors < self.request.tolerance
            && self.query_index < self.query_len()
            && (self.window.is_some()
                || self.request.strategy.may_start_error(
                    self.node.is_boundary(),
                    self.next_separator_distance(),
                    self.errors,
                ))
    }

    /// Move to a child node, updating the path and separator distance.
    fn step(&self, label: char, child: &Arc<Node<V>>) -> SearchState<V> {
        let mut s = self.clone();
        s.separator_distance = if self.node.is_boundary() {
            0
        } else {
            self.separator_distance + 1
        };
        s.node = Arc::clone(child);
        s.path.push(label);
        s
    }

    /// Open the match window at the character just stepped onto, or extend
    /// it to cover that character.
    fn extend_window(&mut self) {
        self.window = Some(match self.window {
            Some((start, _)) => (start, self.path.len()),
            None => (self.path.len() - 1, self.path.len()),
        });
    }

    /// Distance from the last word separator to a prospective child.
    fn next_separator_distance(&self) -> usize {
        if self.node.is_boundary() {
            0
        } else {
            self.separator_distance + 1
        }
    }

    fn charge_fold_mismatch(&mut self, case_fold: bool, diacritic_fold: bool) {
        if case_fold {
            self.case_mismatches += 1;
        } else if diacritic_fold {
            self.diacritic_mismatches += 1;
        } else {
            // Only the combined fold succeeded.
            self.case_mismatches += 1;
            self.diacritic_mismatches += 1;
        }
    }

    /// Build the result for a successful state.
    ///
    /// Returns `None` if the terminal value vanished under a concurrent
    /// remove; the candidate is simply dropped.
    pub(crate) fn build_result(&self) -> Option<SearchResult<V>> {
        let (start, mut end) = self.window?;
        if self.request.strategy == SearchStrategy::Acronym {
            // The acronym's matched span runs to the end of the word its
            // last character landed in.
            while end < self.path.len() && !is_word_separator(self.path[end]) {
                end += 1;
            }
        }
        let value = self.node.value_cloned()?;

        let word_start = self.path[..start]
            .iter()
            .rposition(|c| is_word_separator(*c))
            .map_or(0, |i| i + 1);
        let word_end = self.path[end..]
            .iter()
            .position(|c| is_word_separator(*c))
            .map_or(self.path.len(), |i| end + i);

        let total_errors = self.errors + self.trailing();
        let zero_errors = total_errors == 0;

        Some(SearchResult {
            key: self.path.iter().collect(),
            value,
            matched_substring: self.path[start..end].iter().collect(),
            matched_word: self.path[word_start..word_end].iter().collect(),
            matched_chars: self.matched,
            errors: total_errors,
            case_mismatches: self.case_mismatches,
            diacritic_mismatches: self.diacritic_mismatches,
            prefix_distance: start - word_start,
            whole_string: zero_errors && start == 0 && end == self.path.len(),
            whole_word: zero_errors && start == word_start && end == word_end,
        })
    }
}
