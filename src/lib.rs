//! # fuzztrie
//!
//! An in-memory, character-level trie with exact, prefix, substring and
//! error-tolerant search over indexed strings, each mapped to an arbitrary
//! value (for example a posting list of documents containing a token).
//!
//! The matching engine walks the shared tree with an explicit multi-branch
//! state machine: at every step all children are explored as simultaneous
//! alignments, bounded by a per-query error budget and pruned against each
//! node's cached subtree depth. Several matching policies (substring
//! anywhere, word-prefix anchoring, acronym alignment, transposition-only
//! typo detection, case and diacritic folding) share one engine, with
//! results merged under a best-match-per-key rule and ranked.
//!
//! ## Example
//!
//! ```rust,ignore
//! use fuzztrie::prelude::*;
//!
//! let trie = Trie::new();
//! trie.insert("manual", vec![1])?;
//! trie.insert("linux manual", vec![2])?;
//!
//! let results = trie.search(
//!     "manaul",
//!     2,
//!     SearchStrategy::SubstringAnywhere,
//!     MatchOptions::new(),
//! )?;
//! assert_eq!(results[0].key, "manual");
//! ```
//!
//! ## Concurrency
//!
//! Each node guards its own child set, so unrelated reads and writes
//! proceed in parallel; structural mutations additionally serialize through
//! one trie-wide lock that keeps the depth invariant consistent. A search
//! fans out across the root's branches with one task per branch and joins
//! before returning; mutation never suspends.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod matching;
pub mod search;
pub mod trie;

pub use error::{SearchError, TrieError};
pub use matching::{CharMatch, MatchOptions};
pub use search::{SearchResult, SearchStrategy};
pub use trie::{Trie, TrieIter};

/// Common imports for convenient usage.
pub mod prelude {
    pub use crate::error::{SearchError, TrieError};
    pub use crate::matching::MatchOptions;
    pub use crate::search::{SearchResult, SearchStrategy};
    pub use crate::trie::Trie;
}
