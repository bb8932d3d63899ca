//! Integration tests for sharing vectors across threads.
//!
//! These tests verify that `PersistentVector` works correctly with the
//! `arc` feature enabled, providing thread-safe access to immutable data
//! across multiple threads.

#![cfg(feature = "arc")]
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use pvector::PersistentVector;
use rstest::rstest;
use std::sync::Arc;
use std::thread;

static_assertions::assert_impl_all!(PersistentVector<i32>: Send, Sync);

#[rstest]
fn test_vector_cross_thread_structural_sharing() {
    let original: Arc<PersistentVector<i32>> = Arc::new((0..100).collect());

    let handles: Vec<_> = (0..4)
        .map(|index| {
            let vector_clone = Arc::clone(&original);
            thread::spawn(move || {
                // Each thread modifies a different element
                let modified = vector_clone.set(index * 10, 999).unwrap();
                assert_eq!(modified.get(index * 10), Some(&999));
                // Original should be unchanged
                assert_eq!(vector_clone.get(index * 10), Some(&((index * 10) as i32)));
                modified
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Thread panicked"))
        .collect();

    for (index, vector) in results.iter().enumerate() {
        assert_eq!(vector.get(index * 10), Some(&999));
        assert_eq!(
            vector.get(0),
            if index == 0 { Some(&999) } else { Some(&0) }
        );
    }

    for index in 0..100 {
        assert_eq!(original.get(index), Some(&(index as i32)));
    }
}

#[rstest]
fn test_vector_moved_between_threads() {
    let vector: PersistentVector<usize> = (0..1000).collect();

    let handle = thread::spawn(move || {
        let mut evolver = vector.evolver();
        evolver.extend(1000..2000);
        (vector, evolver.into_persistent())
    });
    let (vector, extended) = handle.join().expect("Thread panicked");

    assert_eq!(vector.len(), 1000);
    assert_eq!(extended.len(), 2000);
    assert_eq!(extended.get(1500), Some(&1500));
}
