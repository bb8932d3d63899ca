//! Persistent (immutable) vector and its transient evolver.
//!
//! - [`PersistentVector`]: immutable vector backed by a 32-way trie plus a
//!   tail buffer
//! - [`Evolver`]: transient view for batching edits with copy-on-write
//! - [`Transform`]: replace-or-discard instruction for a single index
//!
//! # Structural Sharing
//!
//! Every operation that "changes" a vector returns a new one that shares
//! all untouched nodes with its input. Old versions stay valid and
//! unchanged for as long as anyone holds them.
//!
//! # Examples
//!
//! ```rust
//! use pvector::persistent::{PersistentVector, Transform};
//!
//! let vector: PersistentVector<i32> = (0..100).collect();
//! assert_eq!(vector.get(50), Some(&50));
//!
//! // Structural sharing: the original vector is preserved
//! let updated = vector.set(50, 999).unwrap();
//! assert_eq!(vector.get(50), Some(&50));
//! assert_eq!(updated.get(50), Some(&999));
//!
//! let shorter = updated.transform(0, Transform::Discard).unwrap();
//! assert_eq!(shorter.get(49), Some(&999));
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod evolver;
mod iter;
mod node;
mod transform;
mod vector;

pub use evolver::Evolver;
pub use iter::PersistentVectorIntoIterator;
pub use iter::PersistentVectorIterator;
pub use transform::Transform;
pub use vector::PersistentVector;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod reference_counter_tests {
    use super::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_make_mut_copies_only_when_shared() {
        let mut reference_counter: ReferenceCounter<Vec<i32>> = ReferenceCounter::new(vec![1]);
        let before = ReferenceCounter::as_ptr(&reference_counter);

        ReferenceCounter::make_mut(&mut reference_counter).push(2);
        assert_eq!(ReferenceCounter::as_ptr(&reference_counter), before);

        let shared = reference_counter.clone();
        ReferenceCounter::make_mut(&mut reference_counter).push(3);
        assert_ne!(ReferenceCounter::as_ptr(&reference_counter), before);
        assert_eq!(*shared, vec![1, 2]);
        assert_eq!(*reference_counter, vec![1, 2, 3]);
    }

    #[rstest]
    fn test_reference_counter_strong_count() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
        let reference_counter_clone = reference_counter.clone();
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 2);
        drop(reference_counter_clone);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
    }
}
