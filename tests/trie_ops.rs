//! Public-surface storage tests.

use fuzztrie::prelude::*;

#[test]
fn test_insert_update_and_count() {
    let trie = Trie::new();
    assert_eq!(trie.insert("token", vec![1u32]), Ok(None));
    assert_eq!(trie.insert("token", vec![1, 2]), Ok(Some(vec![1])));
    assert_eq!(trie.len(), 1);
    assert_eq!(trie.lookup_exact("token"), Some(vec![1, 2]));
}

#[test]
fn test_empty_key_is_invalid_argument() {
    let trie: Trie<u32> = Trie::new();
    assert_eq!(trie.insert("", 1), Err(TrieError::EmptyKey));
}

#[test]
fn test_prefix_queries() {
    let trie = Trie::from_entries([("car", 1), ("cart", 2), ("dog", 3)]).unwrap();

    assert!(trie.contains_prefix("ca"));
    assert!(trie.contains_prefix("cart"));
    assert!(!trie.contains_prefix("cat"));
    assert!(trie.contains_prefix(""));

    let matches = trie.match_by_prefix("car");
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].0, "car", "shortest key first");
}

#[test]
fn test_contains_exact_ignores_prefix_nodes() {
    let trie = Trie::from_entries([("cart", 1)]).unwrap();
    assert!(trie.contains_exact("cart"));
    assert!(!trie.contains_exact("car"));
}

#[test]
fn test_iteration_is_lazy_and_restartable() {
    let trie = Trie::from_entries([("a", 1), ("ab", 2), ("abc", 3)]).unwrap();

    let mut iter = trie.iter();
    assert_eq!(iter.next().map(|(k, _)| k), Some("a".to_string()));

    // A second iterator starts over, unaffected by the first.
    let all: Vec<_> = (&trie).into_iter().map(|(k, _)| k).collect();
    assert_eq!(all, vec!["a", "ab", "abc"]);
}

#[test]
fn test_clear_resets_everything() {
    let trie = Trie::from_entries([("x", 1), ("yz", 2)]).unwrap();
    trie.clear();
    assert!(trie.is_empty());
    assert_eq!(trie.depth(), 0);
    assert!(trie.search_substring("x").unwrap().is_empty());
}
