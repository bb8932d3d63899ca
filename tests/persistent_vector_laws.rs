//! Property-based tests for PersistentVector laws.
//!
//! Random operation sequences are applied in lockstep to a `Vec` and to a
//! `PersistentVector`; after every step the two must agree and the previous
//! version of the vector must be unchanged.

use pvector::{PersistentVector, Transform, VectorError};
use proptest::prelude::*;

// =============================================================================
// Lockstep model
// =============================================================================

#[derive(Debug, Clone)]
enum Operation {
    Append(i32),
    Extend(Vec<i32>),
    Set(usize, i32),
    Delete(usize),
    TransformSet(usize, i32),
    TransformDiscard(usize),
    Slice(isize, isize),
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => any::<i32>().prop_map(Operation::Append),
        2 => prop::collection::vec(any::<i32>(), 0..80).prop_map(Operation::Extend),
        2 => (any::<usize>(), any::<i32>()).prop_map(|(index, value)| Operation::Set(index, value)),
        2 => any::<usize>().prop_map(Operation::Delete),
        1 => (any::<usize>(), any::<i32>())
            .prop_map(|(index, value)| Operation::TransformSet(index, value)),
        1 => any::<usize>().prop_map(Operation::TransformDiscard),
        1 => (-120isize..120, -120isize..120).prop_map(|(start, stop)| Operation::Slice(start, stop)),
    ]
}

/// Slices a `Vec` with sequence-slicing rules.
fn slice_model(model: &[i32], start: isize, stop: isize) -> Vec<i32> {
    let length = model.len() as isize;
    let clamp = |bound: isize| {
        let bound = if bound < 0 { bound + length } else { bound };
        bound.clamp(0, length) as usize
    };
    let (start, stop) = (clamp(start), clamp(stop));
    if start >= stop {
        Vec::new()
    } else {
        model[start..stop].to_vec()
    }
}

/// Applies `operation` to both sides. Indices are reduced modulo the length;
/// an empty model checks the out-of-range error instead.
fn apply(
    model: &[i32],
    vector: &PersistentVector<i32>,
    operation: &Operation,
) -> (Vec<i32>, PersistentVector<i32>) {
    let mut next = model.to_vec();
    let out_of_range = |index: usize| VectorError::IndexOutOfRange {
        index,
        length: model.len(),
    };

    let result = match operation {
        Operation::Append(value) => {
            next.push(*value);
            vector.append(*value)
        }
        Operation::Extend(values) => {
            next.extend(values.iter().copied());
            vector.extend(values.iter().copied())
        }
        Operation::Set(index, value) | Operation::TransformSet(index, value) => {
            if model.is_empty() {
                assert_eq!(vector.set(*index, *value), Err(out_of_range(*index)));
                vector.clone()
            } else {
                let index = index % model.len();
                next[index] = *value;
                if matches!(operation, Operation::Set(..)) {
                    vector.set(index, *value).unwrap()
                } else {
                    vector.transform(index, *value).unwrap()
                }
            }
        }
        Operation::Delete(index) | Operation::TransformDiscard(index) => {
            if model.is_empty() {
                assert_eq!(vector.delete(*index), Err(out_of_range(*index)));
                vector.clone()
            } else {
                let index = index % model.len();
                next.remove(index);
                if matches!(operation, Operation::Delete(..)) {
                    vector.delete(index).unwrap()
                } else {
                    vector.transform(index, Transform::Discard).unwrap()
                }
            }
        }
        Operation::Slice(start, stop) => {
            next = slice_model(model, *start, *stop);
            vector.slice(*start, *stop)
        }
    };

    (next, result)
}

fn assert_equivalent(model: &[i32], vector: &PersistentVector<i32>) {
    vector.check_invariants();
    assert_eq!(vector.len(), model.len());
    for (index, element) in model.iter().enumerate() {
        assert_eq!(vector.get(index), Some(element));
    }
    assert_eq!(vector.get(model.len()), None);
    assert!(vector.iter().eq(model.iter()));
    assert!(vector.iter().rev().eq(model.iter().rev()));

    // Every slice is quadratic, so only small vectors get the full sweep.
    if model.len() < 50 {
        for start in 0..=model.len() {
            for stop in start..=model.len() {
                assert_eq!(
                    vector.slice(start as isize, stop as isize),
                    model[start..stop]
                );
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// The vector behaves like a `Vec` under any operation sequence, and
    /// every operation leaves its receiver unchanged.
    #[test]
    fn prop_lockstep_with_vec(
        initial in prop::collection::vec(any::<i32>(), 0..100),
        operations in prop::collection::vec(operation_strategy(), 1..40)
    ) {
        let mut model = initial.clone();
        let mut vector: PersistentVector<i32> = initial.into_iter().collect();
        assert_equivalent(&model, &vector);

        for operation in &operations {
            let before = vector.to_vec();
            let (next_model, next_vector) = apply(&model, &vector, operation);

            prop_assert_eq!(&vector.to_vec(), &before);
            vector.check_invariants();
            assert_equivalent(&next_model, &next_vector);

            model = next_model;
            vector = next_vector;
        }
    }
}

// =============================================================================
// Basic Laws
// =============================================================================

proptest! {
    /// Round trip: collecting a vector's elements rebuilds an equal vector.
    #[test]
    fn prop_round_trip(elements in prop::collection::vec(any::<i32>(), 0..300)) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        let rebuilt: PersistentVector<i32> = vector.to_vec().into_iter().collect();
        prop_assert_eq!(&rebuilt, &vector);
        prop_assert_eq!(vector.to_vec(), elements);
    }

    /// Bulk construction and repeated appends produce equal vectors.
    #[test]
    fn prop_collect_equals_append_fold(elements in prop::collection::vec(any::<i32>(), 0..300)) {
        let collected: PersistentVector<i32> = elements.iter().copied().collect();
        let appended = elements
            .iter()
            .fold(PersistentVector::new(), |vector, element| vector.append(*element));
        appended.check_invariants();
        prop_assert_eq!(collected, appended);
    }

    /// `transform` with a value is `set`; with `Discard` it is `delete`.
    #[test]
    fn prop_transform_matches_set_and_delete(
        elements in prop::collection::vec(any::<i32>(), 1..200),
        seed: usize,
        value: i32
    ) {
        let vector: PersistentVector<i32> = elements.into_iter().collect();
        let index = seed % vector.len();

        prop_assert_eq!(vector.transform(index, value), vector.set(index, value));
        prop_assert_eq!(vector.transform(index, Transform::Discard), vector.delete(index));
    }

    /// Set then get returns the new value and leaves other indices alone.
    #[test]
    fn prop_get_set_law(
        elements in prop::collection::vec(any::<i32>(), 1..200),
        seed: usize,
        value: i32
    ) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        let index = seed % vector.len();
        let updated = vector.set(index, value).unwrap();

        prop_assert_eq!(updated.get(index), Some(&value));
        for (other, element) in elements.iter().enumerate() {
            if other != index {
                prop_assert_eq!(updated.get(other), Some(element));
            }
        }
    }

    /// Appending then deleting the last element restores the vector.
    #[test]
    fn prop_append_delete_last_law(
        elements in prop::collection::vec(any::<i32>(), 0..200),
        value: i32
    ) {
        let vector: PersistentVector<i32> = elements.into_iter().collect();
        let appended = vector.append(value);
        let restored = appended.delete(vector.len()).unwrap();
        restored.check_invariants();
        prop_assert_eq!(restored, vector);
    }

    /// Concatenation agrees with `Vec` concatenation.
    #[test]
    fn prop_concat_law(
        left in prop::collection::vec(any::<i32>(), 0..100),
        right in prop::collection::vec(any::<i32>(), 0..100)
    ) {
        let joined = PersistentVector::from(left.clone()) + PersistentVector::from(right.clone());
        let expected: Vec<i32> = left.into_iter().chain(right).collect();
        joined.check_invariants();
        prop_assert_eq!(joined, expected);
    }

    /// Equal vectors compare and order like their element sequences.
    #[test]
    fn prop_ordering_matches_vec(
        left in prop::collection::vec(0..4i32, 0..6),
        right in prop::collection::vec(0..4i32, 0..6)
    ) {
        let left_vector = PersistentVector::from(left.clone());
        let right_vector = PersistentVector::from(right.clone());
        prop_assert_eq!(left_vector.cmp(&right_vector), left.cmp(&right));
        prop_assert_eq!(left_vector == right_vector, left == right);
    }
}
