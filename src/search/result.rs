//! Search results and their ranking order.

use std::cmp::Ordering;

/// One ranked search match.
///
/// At most one result is retained per distinct key: the best-ranked
/// alignment found for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<V> {
    /// The stored key the match was found in.
    pub key: String,
    /// The value stored under `key`.
    pub value: V,
    /// The span of `key` aligned against the query.
    pub matched_substring: String,
    /// The full word (or words) containing the match window.
    pub matched_word: String,
    /// Number of query characters matched.
    pub matched_chars: usize,
    /// Number of errors charged against the budget, including unmatched
    /// trailing query characters.
    pub errors: usize,
    /// Characters matched only through case folding.
    pub case_mismatches: usize,
    /// Characters matched only through diacritic folding.
    pub diacritic_mismatches: usize,
    /// Offset from the start of the containing word to the start of the
    /// match window.
    pub prefix_distance: usize,
    /// The window covers the whole key, with zero errors.
    pub whole_string: bool,
    /// The window covers a whole word, with zero errors.
    pub whole_word: bool,
}

impl<V> SearchResult<V> {
    /// Compare two results by match quality; `Less` means `self` ranks
    /// first.
    ///
    /// Order: smaller prefix distance, longer matched substring, shorter
    /// containing word, whole-word match before not, shorter overall
    /// string, fewer errors.
    pub fn compare_rank(&self, other: &Self) -> Ordering {
        self.prefix_distance
            .cmp(&other.prefix_distance)
            .then_with(|| {
                char_len(&other.matched_substring).cmp(&char_len(&self.matched_substring))
            })
            .then_with(|| char_len(&self.matched_word).cmp(&char_len(&other.matched_word)))
            .then_with(|| (!self.whole_word).cmp(&!other.whole_word))
            .then_with(|| char_len(&self.key).cmp(&char_len(&other.key)))
            .then_with(|| self.errors.cmp(&other.errors))
    }

    /// Whether `self` is strictly better than `other`; ties are not.
    pub(crate) fn ranks_strictly_before(&self, other: &Self) -> bool {
        self.compare_rank(other) == Ordering::Less
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(
        key: &str,
        substring: &str,
        word: &str,
        prefix_distance: usize,
        whole_word: bool,
        errors: usize,
    ) -> SearchResult<()> {
        SearchResult {
            key: key.to_string(),
            value: (),
            matched_substring: substring.to_string(),
            matched_word: word.to_string(),
            matched_chars: char_len(substring).saturating_sub(errors),
            errors,
            case_mismatches: 0,
            diacritic_mismatches: 0,
            prefix_distance,
            whole_string: whole_word && key == substring,
            whole_word,
        }
    }

    #[test]
    fn test_prefix_distance_dominates() {
        let at_start = result("linux manual", "manual", "manual", 0, true, 0);
        let offset = result("unmanual", "manual", "unmanual", 2, false, 0);
        assert_eq!(at_start.compare_rank(&offset), Ordering::Less);
    }

    #[test]
    fn test_longer_substring_beats_shorter() {
        let long = result("manuals", "manuals", "manuals", 0, true, 0);
        let short = result("manuals", "manual", "manuals", 0, false, 0);
        assert_eq!(long.compare_rank(&short), Ordering::Less);
    }

    #[test]
    fn test_shorter_word_beats_longer() {
        let short_word = result("linux manual", "manual", "manual", 0, true, 0);
        let long_word = result("manuals", "manual", "manuals", 0, false, 0);
        assert_eq!(short_word.compare_rank(&long_word), Ordering::Less);
    }

    #[test]
    fn test_shorter_string_breaks_word_tie() {
        let whole = result("manual", "manual", "manual", 0, true, 0);
        let in_phrase = result("linux manual", "manual", "manual", 0, true, 0);
        assert_eq!(whole.compare_rank(&in_phrase), Ordering::Less);
    }

    #[test]
    fn test_fewer_errors_is_last_resort() {
        let clean = result("manual", "manual", "manual", 0, true, 0);
        let noisy = result("manual", "manual", "manual", 0, true, 1);
        assert_eq!(clean.compare_rank(&noisy), Ordering::Less);
        assert!(!noisy.ranks_strictly_before(&clean));
        assert!(!clean.ranks_strictly_before(&clean.clone()), "ties are not strict");
    }
}
