//! Error types for trie mutation and search.

use thiserror::Error;

/// Errors returned by trie mutation operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// The key passed to an insert was empty.
    ///
    /// Every stored key must contain at least one character; the root's
    /// empty fragment is reserved as the word-boundary sentinel.
    #[error("Key is empty")]
    EmptyKey,
}

/// Errors that reject a search request before any search state is built.
///
/// These are argument-validation failures: retrying with the same arguments
/// will fail again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The query string was empty.
    #[error("Query is empty")]
    EmptyQuery,

    /// The error tolerance exceeds the query length.
    ///
    /// A tolerance larger than the query would accept candidates consisting
    /// entirely of errors.
    #[error("Error tolerance {tolerance} exceeds query length {query_length}")]
    ToleranceOutOfRange {
        /// The rejected tolerance.
        tolerance: usize,
        /// Length of the query, in characters.
        query_length: usize,
    },
}
