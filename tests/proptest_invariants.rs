//! Property-based tests for trie storage invariants.

use fuzztrie::prelude::*;
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::HashMap;

/// Keys over a small alphabet so prefixes collide often.
fn key_strategy() -> impl Strategy<Value = String> {
    "[abc]{1,8}"
}

proptest! {
    #[test]
    fn prop_insert_then_lookup_roundtrip(entries in vec((key_strategy(), any::<u32>()), 1..40)) {
        let trie = Trie::new();
        let mut model: HashMap<String, u32> = HashMap::new();

        for (key, value) in &entries {
            let previous = trie.insert(key, *value).unwrap();
            prop_assert_eq!(previous, model.insert(key.clone(), *value));
        }

        prop_assert_eq!(trie.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(trie.lookup_exact(key), Some(*value));
        }
    }

    #[test]
    fn prop_remove_never_disturbs_other_keys(
        entries in vec((key_strategy(), any::<u32>()), 1..40),
        removals in vec(key_strategy(), 0..20),
    ) {
        let trie = Trie::new();
        let mut model: HashMap<String, u32> = HashMap::new();
        for (key, value) in &entries {
            trie.insert(key, *value).unwrap();
            model.insert(key.clone(), *value);
        }

        for key in &removals {
            prop_assert_eq!(trie.remove(key), model.remove(key));
        }

        prop_assert_eq!(trie.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(trie.lookup_exact(key), Some(*value));
        }
    }

    #[test]
    fn prop_root_depth_tracks_longest_key(
        entries in vec(key_strategy(), 1..40),
        removals in vec(key_strategy(), 0..20),
    ) {
        let trie = Trie::new();
        let mut model: HashMap<String, ()> = HashMap::new();
        for key in &entries {
            trie.insert(key, 0u8).unwrap();
            model.insert(key.clone(), ());
        }
        for key in &removals {
            trie.remove(key);
            model.remove(key);
        }

        let longest = model.keys().map(|k| k.chars().count()).max().unwrap_or(0);
        prop_assert_eq!(trie.depth(), longest);
    }

    #[test]
    fn prop_iteration_yields_every_entry_shortest_first(
        entries in vec((key_strategy(), any::<u32>()), 1..40),
    ) {
        let trie = Trie::new();
        let mut model: HashMap<String, u32> = HashMap::new();
        for (key, value) in &entries {
            trie.insert(key, *value).unwrap();
            model.insert(key.clone(), *value);
        }

        let collected: Vec<(String, u32)> = trie.iter().collect();
        prop_assert_eq!(collected.len(), model.len());
        for window in collected.windows(2) {
            prop_assert!(window[0].0.chars().count() <= window[1].0.chars().count());
        }
        for (key, value) in collected {
            prop_assert_eq!(model.get(&key), Some(&value));
        }
    }

    #[test]
    fn prop_exact_key_always_found_by_substring_search(
        entries in vec(key_strategy(), 1..25),
    ) {
        let trie = Trie::new();
        for key in &entries {
            trie.insert(key, 0u8).unwrap();
        }
        for key in &entries {
            let results = trie.search_substring(key).unwrap();
            prop_assert!(
                results.iter().any(|r| &r.key == key),
                "stored key {:?} not found by its own substring search",
                key
            );
        }
    }
}
