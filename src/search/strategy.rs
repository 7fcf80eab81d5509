//! Matching strategies: policies on where a match may start and which
//! kinds of error are admissible.

/// Policy controlling where matching may start or continue and how the
/// error budget may be spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Match may start and continue at any position in a key.
    SubstringAnywhere,
    /// Matching may only begin immediately after a word separator.
    WordPrefix,
    /// Like [`WordPrefix`](Self::WordPrefix), but part of the error budget
    /// may be spent on leading characters, bounded by the distance from the
    /// last separator.
    FuzzyWordPrefix,
    /// Match may start anywhere but must reach the minimum required match
    /// length.
    FuzzyWordPostfix,
    /// Errors are restricted to a single pair of swapped adjacent
    /// characters.
    AdjacentTransposition,
    /// Errors are restricted to swapped adjacent character pairs, any
    /// number of them within the budget.
    AnyTransposition,
    /// Each query character must align to the first letter of a successive
    /// word.
    Acronym,
}

impl SearchStrategy {
    /// Whether the error budget may only be spent on transpositions.
    pub(crate) fn transposition_only(self) -> bool {
        matches!(
            self,
            SearchStrategy::AdjacentTransposition | SearchStrategy::AnyTransposition
        )
    }

    /// Whether a further swap may be recorded after `swaps` already were.
    pub(crate) fn allows_swap(self, swaps: usize) -> bool {
        match self {
            SearchStrategy::AdjacentTransposition => swaps == 0,
            SearchStrategy::AnyTransposition => true,
            _ => false,
        }
    }

    /// Whether a match window may open at a position `separator_distance`
    /// characters after the last word boundary, with `errors_spent` errors
    /// already charged.
    pub(crate) fn may_start_match(
        self,
        at_word_start: bool,
        separator_distance: usize,
        errors_spent: usize,
    ) -> bool {
        match self {
            SearchStrategy::SubstringAnywhere
            | SearchStrategy::FuzzyWordPostfix
            | SearchStrategy::AdjacentTransposition
            | SearchStrategy::AnyTransposition => true,
            SearchStrategy::WordPrefix | SearchStrategy::Acronym => at_word_start,
            SearchStrategy::FuzzyWordPrefix => separator_distance <= errors_spent,
        }
    }

    /// Whether an error may open a match window at this position.
    ///
    /// Substring search never starts a window on an error; the orchestrator
    /// seeds states with dropped leading query characters instead, which
    /// covers leading errors without a per-node error fan-out.
    pub(crate) fn may_start_error(
        self,
        at_word_start: bool,
        separator_distance: usize,
        errors_spent: usize,
    ) -> bool {
        match self {
            SearchStrategy::SubstringAnywhere => false,
            SearchStrategy::WordPrefix | SearchStrategy::Acronym => at_word_start,
            SearchStrategy::FuzzyWordPrefix => separator_distance <= errors_spent,
            SearchStrategy::FuzzyWordPostfix
            | SearchStrategy::AdjacentTransposition
            | SearchStrategy::AnyTransposition => true,
        }
    }
}
