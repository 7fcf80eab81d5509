//! Character comparison primitives for trie search.
//!
//! A node fragment and a query character are compared under a set of
//! [`MatchOptions`]; the outcome records which comparisons succeeded so the
//! search can keep separate case- and diacritic-mismatch counts.

mod fold;

pub use fold::{fold_case, strip_diacritic, FoldedChar};

/// Options controlling how characters are compared during a search.
///
/// Both folds are off by default. Options are cheap to copy and are fixed
/// for the duration of one search call.
///
/// # Example
///
/// ```rust,ignore
/// use fuzztrie::prelude::*;
///
/// let options = MatchOptions::new().case_insensitive(true);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOptions {
    case_insensitive: bool,
    diacritic_insensitive: bool,
}

impl MatchOptions {
    /// Create options with all folds disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable case-insensitive comparison.
    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    /// Enable or disable diacritic-insensitive comparison.
    pub fn diacritic_insensitive(mut self, enabled: bool) -> Self {
        self.diacritic_insensitive = enabled;
        self
    }

    /// Whether case folding is enabled.
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Whether diacritic folding is enabled.
    pub fn is_diacritic_insensitive(&self) -> bool {
        self.diacritic_insensitive
    }
}

/// Outcome of comparing one node fragment against one query character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharMatch {
    /// The raw fragments are equal.
    pub exact: bool,
    /// Equal after case folding (only computed when enabled).
    pub case_fold: bool,
    /// Equal after diacritic stripping (only computed when enabled).
    pub diacritic_fold: bool,
    /// Equal after both folds (only computed when both are enabled).
    pub case_and_diacritic_fold: bool,
}

impl CharMatch {
    /// True iff any enabled comparison succeeded.
    pub fn any(&self) -> bool {
        self.exact || self.case_fold || self.diacritic_fold || self.case_and_diacritic_fold
    }
}

/// Compare a node fragment against a query character.
///
/// `fragment` is the node's raw character and `folded` its cached folded
/// variants; the cache is absent when folding is a no-op for the fragment,
/// in which case the raw character stands in for every folded form. The
/// query side always carries precomputed folds.
pub fn compare(
    fragment: char,
    folded: Option<&FoldedChar>,
    query: &FoldedChar,
    options: MatchOptions,
) -> CharMatch {
    let (lower, stripped, lower_stripped) = match folded {
        Some(f) => (f.lower, f.stripped, f.lower_stripped),
        None => (fragment, fragment, fragment),
    };

    let exact = fragment == query.raw;
    let case_fold = options.case_insensitive && lower == query.lower;
    let diacritic_fold = options.diacritic_insensitive && stripped == query.stripped;
    let case_and_diacritic_fold = options.case_insensitive
        && options.diacritic_insensitive
        && lower_stripped == query.lower_stripped;

    CharMatch {
        exact,
        case_fold,
        diacritic_fold,
        case_and_diacritic_fold,
    }
}

/// Whether a character acts as a word separator.
///
/// Whitespace and punctuation separate words; the root's empty fragment is
/// treated as a boundary by the caller.
pub fn is_word_separator(c: char) -> bool {
    !c.is_alphanumeric()
}
