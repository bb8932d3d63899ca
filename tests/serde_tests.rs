#![cfg(feature = "serde")]

//! Integration tests for serde support in pvector.

use pvector::PersistentVector;
use rstest::rstest;

#[rstest]
fn test_vector_json_roundtrip() {
    let vector: PersistentVector<i32> = (1..=100).collect();
    let json = serde_json::to_string(&vector).unwrap();
    let restored: PersistentVector<i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(vector, restored);
    restored.check_invariants();
}

#[rstest]
fn test_vector_serializes_as_sequence() {
    let vector = PersistentVector::from(vec![1, 2, 3]);
    assert_eq!(serde_json::to_string(&vector).unwrap(), "[1,2,3]");

    let empty: PersistentVector<i32> = PersistentVector::new();
    assert_eq!(serde_json::to_string(&empty).unwrap(), "[]");
}

#[rstest]
fn test_vector_nested_structures() {
    let inner1: PersistentVector<i32> = (1..=3).collect();
    let inner2: PersistentVector<i32> = (4..=6).collect();
    let outer: PersistentVector<PersistentVector<i32>> = vec![inner1, inner2].into_iter().collect();

    let json = serde_json::to_string(&outer).unwrap();
    assert_eq!(json, "[[1,2,3],[4,5,6]]");
    let restored: PersistentVector<PersistentVector<i32>> = serde_json::from_str(&json).unwrap();
    assert_eq!(outer, restored);
}

#[rstest]
fn test_vector_type_mismatch_error() {
    let result: Result<PersistentVector<i32>, _> = serde_json::from_str(r#"["a", "b"]"#);
    assert!(result.is_err());

    let result: Result<PersistentVector<i32>, _> = serde_json::from_str(r#"{"a": 1}"#);
    assert!(result.is_err());
}
