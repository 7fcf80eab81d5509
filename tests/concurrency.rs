//! Concurrent mutation and search behavior.

use fuzztrie::prelude::*;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_concurrent_inserts_of_distinct_keys() {
    const WRITERS: usize = 16;
    const KEYS_PER_WRITER: usize = 25;

    let trie: Arc<Trie<usize>> = Arc::new(Trie::new());
    let barrier = Arc::new(Barrier::new(WRITERS));

    let mut handles = vec![];
    for w in 0..WRITERS {
        let trie = Arc::clone(&trie);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for k in 0..KEYS_PER_WRITER {
                let key = format!("writer{w}key{k}");
                trie.insert(&key, w * KEYS_PER_WRITER + k).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let total = WRITERS * KEYS_PER_WRITER;
    assert_eq!(trie.len(), total);
    assert_eq!(trie.match_by_prefix("").len(), total);
}

#[test]
fn test_concurrent_removes_observe_consistent_absence() {
    const KEYS: usize = 64;

    let trie: Arc<Trie<usize>> = Arc::new(Trie::new());
    for k in 0..KEYS {
        trie.insert(&format!("key{k}"), k).unwrap();
    }

    let barrier = Arc::new(Barrier::new(KEYS));
    let mut handles = vec![];
    for k in 0..KEYS {
        let trie = Arc::clone(&trie);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            let key = format!("key{k}");
            assert_eq!(trie.remove(&key), Some(k));
            assert_eq!(trie.lookup_exact(&key), None);
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(trie.is_empty());
    assert!(trie.match_by_prefix("").is_empty());
}

#[test]
fn test_searches_run_against_concurrent_writes() {
    let trie: Arc<Trie<usize>> = Arc::new(Trie::new());
    for k in 0..100 {
        trie.insert(&format!("stable{k}"), k).unwrap();
    }

    let writer = {
        let trie = Arc::clone(&trie);
        thread::spawn(move || {
            for k in 0..200 {
                trie.insert(&format!("churn{k}"), k).unwrap();
                if k % 2 == 0 {
                    trie.remove(&format!("churn{}", k / 2));
                }
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let trie = Arc::clone(&trie);
            thread::spawn(move || {
                for k in 0..50 {
                    let results = trie.search_substring(&format!("stable{k}")).unwrap();
                    // Stable keys are never mutated, so every search must
                    // find its key regardless of concurrent churn.
                    assert!(results.iter().any(|r| r.key == format!("stable{k}")));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn test_mutation_restores_depth_before_returning() {
    let trie: Trie<u32> = Trie::new();
    trie.insert("short", 1).unwrap();
    trie.insert("a considerably longer key", 2).unwrap();
    assert_eq!(trie.depth(), "a considerably longer key".chars().count());

    trie.remove("a considerably longer key");
    // The depth used for search pruning is already consistent here.
    assert_eq!(trie.depth(), 5);
    let results = trie.search_substring("short").unwrap();
    assert_eq!(results.len(), 1);
}
