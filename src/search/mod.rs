//! Search orchestration: seeding, parallel fan-out, best-per-key merging
//! and final ranking.
//!
//! A search expands every seed state exactly one level (to the root's
//! direct children) and dispatches one task per resulting state, capping
//! parallelism to the root's branching factor. Each task walks its subtree
//! sequentially via an explicit worklist. Successes land in a results map
//! scoped to the call; a new result replaces the stored one for its key
//! only if strictly better by the ranking order, so ties keep whichever
//! arrived first.
//!
//! The search is synchronous end-to-end: the only suspension point is the
//! barrier join on the spawned tasks.

mod result;
mod state;
mod strategy;

pub use result::SearchResult;
pub use strategy::SearchStrategy;

use crate::error::SearchError;
use crate::matching::{FoldedChar, MatchOptions};
use crate::trie::Trie;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use state::{SearchRequest, SearchState};
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::thread;
use tracing::debug;

/// Best-result-per-key map for one search call.
///
/// The lock is scoped to the call, so unrelated concurrent searches never
/// contend with each other.
struct ResultMerger<V> {
    map: Mutex<FxHashMap<String, SearchResult<V>>>,
}

impl<V> ResultMerger<V> {
    fn new() -> Self {
        Self {
            map: Mutex::new(FxHashMap::default()),
        }
    }

    /// Compare-and-replace: a candidate displaces the stored result for its
    /// key only if strictly better; ties keep the incumbent.
    fn offer(&self, candidate: SearchResult<V>) {
        let mut map = self.map.lock();
        match map.entry(candidate.key.clone()) {
            Entry::Occupied(mut slot) => {
                if candidate.ranks_strictly_before(slot.get()) {
                    slot.insert(candidate);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
        }
    }

    fn into_sorted(self) -> Vec<SearchResult<V>> {
        let mut results: Vec<_> = self.map.into_inner().into_values().collect();
        results.sort_by(|a, b| a.compare_rank(b));
        results
    }
}

/// Walk one subtree sequentially, reporting every success to the merger.
fn walk<V: Clone>(start: SearchState<V>, merger: &ResultMerger<V>) {
    let mut worklist = vec![start];
    while let Some(state) = worklist.pop() {
        if state.is_success() {
            if let Some(result) = state.build_result() {
                merger.offer(result);
            }
        }
        worklist.extend(state.successors());
    }
}

impl<V: Clone + Send + Sync> Trie<V> {
    /// Error-tolerant search over the stored keys.
    ///
    /// Returns the best match per key, sorted best first. See
    /// [`SearchStrategy`] for the matching policies and
    /// [`SearchResult::compare_rank`] for the ranking order.
    ///
    /// # Errors
    ///
    /// [`SearchError::EmptyQuery`] if `query` is empty;
    /// [`SearchError::ToleranceOutOfRange`] if `tolerance` exceeds the
    /// query length.
    pub fn search(
        &self,
        query: &str,
        tolerance: usize,
        strategy: SearchStrategy,
        options: MatchOptions,
    ) -> Result<Vec<SearchResult<V>>, SearchError> {
        let folded: Vec<FoldedChar> = query.chars().map(FoldedChar::of).collect();
        if folded.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        if tolerance > folded.len() {
            return Err(SearchError::ToleranceOutOfRange {
                tolerance,
                query_length: folded.len(),
            });
        }

        let query_length = folded.len();
        let request = Arc::new(SearchRequest {
            query: folded,
            strategy,
            tolerance,
            options,
        });

        // Leading-error seeding: for substring matching, one extra state
        // per dropped-prefix length catches errors at the very start of the
        // query. Anchored strategies cover leading errors through their own
        // start preconditions.
        let mut seeds = vec![SearchState::seed(
            Arc::clone(&request),
            Arc::clone(self.root()),
            0,
        )];
        if strategy == SearchStrategy::SubstringAnywhere {
            for dropped in 1..=tolerance.min(query_length - 1) {
                seeds.push(SearchState::seed(
                    Arc::clone(&request),
                    Arc::clone(self.root()),
                    dropped,
                ));
            }
        }

        // Expand each seed one level so there is one task per first-level
        // branch; the root itself is never terminal for a non-empty query.
        let first_level: Vec<SearchState<V>> =
            seeds.iter().flat_map(|seed| seed.successors()).collect();

        debug!(
            query,
            tolerance,
            ?strategy,
            branches = first_level.len(),
            "search dispatch"
        );

        let merger = ResultMerger::new();
        thread::scope(|scope| {
            for state in first_level {
                let merger = &merger;
                scope.spawn(move || walk(state, merger));
            }
        });

        let results = merger.into_sorted();
        debug!(query, results = results.len(), "search complete");
        Ok(results)
    }

    /// Exact substring search: zero errors, matching anywhere.
    pub fn search_substring(&self, query: &str) -> Result<Vec<SearchResult<V>>, SearchError> {
        self.search(
            query,
            0,
            SearchStrategy::SubstringAnywhere,
            MatchOptions::default(),
        )
    }
}
