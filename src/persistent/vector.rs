//! Persistent (immutable) vector based on a 32-way trie with a tail buffer.
//!
//! This module provides [`PersistentVector`], an immutable dynamic array
//! that uses structural sharing for efficient operations.
//!
//! # Overview
//!
//! `PersistentVector` is a 32-way branching trie in the style of Clojure's
//! `PersistentVector`. It provides:
//!
//! - O(log32 N) random access (effectively O(1) for practical sizes)
//! - O(log32 N) `append` (amortized O(1) with the tail buffer)
//! - O(log32 N) `set`
//! - O(N - i) `delete(i)`, O(1) amortized when deleting the last element
//! - O(1) `len`, `is_empty` and `clone`
//!
//! All operations return new vectors without modifying the original,
//! and structural sharing ensures memory efficiency.
//!
//! # Internal Structure
//!
//! The vector consists of:
//! - A root node (32-way branching trie) holding every full 32-element block
//! - A tail buffer (1 to 32 elements when non-empty) holding the rest
//!
//! # Examples
//!
//! ```rust
//! use pvector::PersistentVector;
//!
//! let vector = PersistentVector::new()
//!     .append(1)
//!     .append(2)
//!     .append(3);
//!
//! assert_eq!(vector.get(0), Some(&1));
//! assert_eq!(vector.get(2), Some(&3));
//!
//! // Structural sharing: the original vector is preserved
//! let extended = vector.append(4);
//! assert_eq!(vector.len(), 3);
//! assert_eq!(extended.len(), 4);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Index};

use log::trace;

use super::ReferenceCounter;
use super::evolver::Evolver;
use super::iter::{PersistentVectorIntoIterator, PersistentVectorIterator};
use super::node::{
    BITS_PER_LEVEL, BRANCHING_FACTOR, Chunk, Node, shift_for, single_chunk, tail_offset_for,
};
use crate::error::{Result, VectorError};

// =============================================================================
// PersistentVector Definition
// =============================================================================

/// A persistent (immutable) vector based on a 32-way trie.
///
/// `PersistentVector` is an immutable data structure that uses structural
/// sharing to efficiently support functional programming patterns. Every
/// "modifying" operation returns a new vector; the receiver never changes.
///
/// # Time Complexity
///
/// | Operation    | Complexity                      |
/// |--------------|---------------------------------|
/// | `new`        | O(1)                            |
/// | `get`        | O(log32 N)                      |
/// | `append`     | O(log32 N) amortized O(1)       |
/// | `set`        | O(log32 N)                      |
/// | `delete(i)`  | O(N - i)                        |
/// | `slice`      | O(log32 N) from 0, else O(K)    |
/// | `len`        | O(1)                            |
/// | `iter`       | O(1) to create, O(N) to iterate |
///
/// # Examples
///
/// ```rust
/// use pvector::PersistentVector;
///
/// let vector: PersistentVector<i32> = (0..100).collect();
/// assert_eq!(vector.len(), 100);
/// assert_eq!(vector.get(50), Some(&50));
/// ```
pub struct PersistentVector<T> {
    /// Total number of elements
    length: usize,
    /// Level of the root node (5 for a root whose children are leaves)
    shift: usize,
    /// Root of the trie
    root: ReferenceCounter<Node<T>>,
    /// Trailing elements not yet pushed into the trie
    tail: ReferenceCounter<Chunk<T>>,
}

impl<T> Clone for PersistentVector<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            length: self.length,
            shift: self.shift,
            root: self.root.clone(),
            tail: self.tail.clone(),
        }
    }
}

impl<T> PersistentVector<T> {
    /// Creates a new empty vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = PersistentVector::new();
    /// assert!(vector.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            length: 0,
            shift: BITS_PER_LEVEL,
            root: ReferenceCounter::new(Node::empty_branch()),
            tail: ReferenceCounter::new(Chunk::new()),
        }
    }

    /// Returns the number of elements in the vector.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the vector contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    const fn tail_offset(&self) -> usize {
        tail_offset_for(self.length)
    }

    /// Returns a reference to the element at the given index, or `None` when
    /// `index >= len()`.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.get(2), Some(&3));
    /// assert_eq!(vector.get(10), None);
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.length {
            return None;
        }

        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            self.tail.get(index - tail_offset)
        } else {
            self.root.get(self.shift, index)
        }
    }

    /// Returns a reference to the element at the given index.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::IndexOutOfRange`] when `index >= len()`.
    pub fn try_get(&self, index: usize) -> Result<&T> {
        self.get(index)
            .ok_or_else(|| VectorError::index_out_of_range(index, self.length))
    }

    /// Returns a reference to the first element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns a reference to the last element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.length.checked_sub(1).and_then(|index| self.get(index))
    }

    /// Returns an iterator over references to the elements, front to back.
    ///
    /// The iterator is double-ended and exact-size, and calling `iter` again
    /// restarts from the first element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=3).collect();
    /// let reversed: Vec<&i32> = vector.iter().rev().collect();
    /// assert_eq!(reversed, vec![&3, &2, &1]);
    /// ```
    #[inline]
    pub fn iter(&self) -> PersistentVectorIterator<'_, T> {
        PersistentVectorIterator::new(self, 0, self.length)
    }

    /// Iterates over the elements in `start..stop`; both bounds must be at
    /// most `len()`.
    pub(crate) fn iter_range(&self, start: usize, stop: usize) -> PersistentVectorIterator<'_, T> {
        PersistentVectorIterator::new(self, start, stop.max(start))
    }

    /// Returns the 32-element block containing `index`, sliced to the
    /// elements it actually holds.
    pub(crate) fn chunk_for(&self, index: usize) -> &[T] {
        match self.chunk_handle_for(index) {
            Some(chunk) => chunk.as_slice(),
            None => &[],
        }
    }

    /// Returns the shared buffer of the block containing `index`.
    pub(crate) fn chunk_handle_for(&self, index: usize) -> Option<&ReferenceCounter<Chunk<T>>> {
        if index >= self.tail_offset() {
            Some(&self.tail)
        } else {
            self.root.leaf_chunk(self.shift, index)
        }
    }

    /// Returns the index of the first element equal to `value`.
    pub fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|element| element == value)
    }

    /// Returns the number of elements equal to `value`.
    pub fn count(&self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.iter().filter(|element| *element == value).count()
    }

    /// Asserts the structural invariants of the vector.
    ///
    /// Checks the size accounting between trie and tail, that the trie is
    /// packed from the left with only full leaves, that the root sits at the
    /// smallest level able to hold the trie, and that a non-empty vector
    /// always has a non-empty tail.
    ///
    /// # Panics
    ///
    /// Panics when any invariant is violated.
    pub fn check_invariants(&self) {
        let tail_offset = self.tail_offset();

        assert!(self.tail.len() <= BRANCHING_FACTOR);
        assert_eq!(self.length == 0, self.tail.is_empty());
        assert_eq!(tail_offset + self.tail.len(), self.length);
        assert_eq!(self.shift, shift_for(tail_offset));

        if tail_offset == 0 {
            assert!(self.root.is_empty_branch());
        } else {
            assert_eq!(self.root.check_subtree(self.shift, true), tail_offset);
        }
    }
}

impl<T: Clone> PersistentVector<T> {
    /// Creates a vector holding a copy of `elements`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::PersistentVector;
    ///
    /// let vector = PersistentVector::from_slice(&[1, 2, 3]);
    /// assert_eq!(vector, [1, 2, 3]);
    /// ```
    #[must_use]
    pub fn from_slice(elements: &[T]) -> Self {
        build_persistent_vector_from_vec(elements.to_vec())
    }

    /// Returns a new vector with `element` added at the end.
    ///
    /// # Complexity
    ///
    /// O(log32 N) worst case; O(1) while the tail has room.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::PersistentVector;
    ///
    /// let vector = PersistentVector::new().append(1).append(2);
    /// assert_eq!(vector, [1, 2]);
    /// ```
    #[must_use]
    pub fn append(&self, element: T) -> Self {
        if self.tail.len() < BRANCHING_FACTOR {
            let mut new_tail: Chunk<T> = (*self.tail).clone();
            new_tail.push(element);
            Self {
                length: self.length + 1,
                shift: self.shift,
                root: self.root.clone(),
                tail: ReferenceCounter::new(new_tail),
            }
        } else {
            self.push_tail_to_root(element)
        }
    }

    /// Moves the full tail into the trie and starts a new tail with `element`.
    fn push_tail_to_root(&self, element: T) -> Self {
        let tail_offset = self.tail_offset();
        let tail_leaf = ReferenceCounter::new(Node::Leaf(self.tail.clone()));

        let (root, shift) = if (tail_offset >> self.shift) >= BRANCHING_FACTOR {
            let shift = self.shift + BITS_PER_LEVEL;
            trace!(target: "pvector", "trie grew a level, shift now {shift}");
            (
                ReferenceCounter::new(Node::branch_of(
                    self.root.clone(),
                    Node::new_path(self.shift, tail_leaf),
                )),
                shift,
            )
        } else {
            (
                ReferenceCounter::new(self.root.with_tail_pushed(self.shift, tail_offset, tail_leaf)),
                self.shift,
            )
        };

        Self {
            length: self.length + 1,
            shift,
            root,
            tail: ReferenceCounter::new(single_chunk(element)),
        }
    }

    /// Returns a new vector with every element of `elements` appended in order.
    ///
    /// The appends run through a private [`Evolver`], so a bulk extend does
    /// not copy a path per element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::PersistentVector;
    ///
    /// let vector = PersistentVector::from(vec![1, 2]);
    /// assert_eq!(vector.extend([3, 4]), [1, 2, 3, 4]);
    /// assert_eq!(vector, [1, 2]);
    /// ```
    #[must_use]
    pub fn extend<I: IntoIterator<Item = T>>(&self, elements: I) -> Self {
        let mut evolver = self.evolver();
        evolver.extend(elements);
        evolver.into_persistent()
    }

    /// Returns a new vector with the element at `index` replaced by `element`.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::IndexOutOfRange`] when `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=3).collect();
    /// let updated = vector.set(1, 20).unwrap();
    /// assert_eq!(updated, [1, 20, 3]);
    /// assert_eq!(vector, [1, 2, 3]);
    /// ```
    pub fn set(&self, index: usize, element: T) -> Result<Self> {
        VectorError::check_index(index, self.length)?;

        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            let mut new_tail: Chunk<T> = (*self.tail).clone();
            new_tail[index - tail_offset] = element;
            Ok(Self {
                length: self.length,
                shift: self.shift,
                root: self.root.clone(),
                tail: ReferenceCounter::new(new_tail),
            })
        } else {
            Ok(Self {
                length: self.length,
                shift: self.shift,
                root: ReferenceCounter::new(self.root.path_clone_and_set(self.shift, index, element)),
                tail: self.tail.clone(),
            })
        }
    }

    /// Returns a new vector with several indexed replacements applied in
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::IndexOutOfRange`] for the first update whose
    /// index is out of range. No partial result is produced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=4).collect();
    /// assert_eq!(vector.mset([(0, 10), (3, 40)]).unwrap(), [10, 2, 3, 40]);
    /// ```
    pub fn mset<I: IntoIterator<Item = (usize, T)>>(&self, updates: I) -> Result<Self> {
        let mut evolver = self.evolver();
        for (index, element) in updates {
            evolver.set(index, element)?;
        }
        Ok(evolver.into_persistent())
    }

    /// Returns a new vector without the element at `index`; later elements
    /// shift down by one.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::IndexOutOfRange`] when `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=4).collect();
    /// assert_eq!(vector.delete(1).unwrap(), [1, 3, 4]);
    /// ```
    pub fn delete(&self, index: usize) -> Result<Self> {
        VectorError::check_index(index, self.length)?;

        if index + 1 == self.length {
            return Ok(self.truncated(index));
        }

        let mut evolver = self.evolver();
        evolver.delete(index)?;
        Ok(evolver.into_persistent())
    }

    /// Returns a new vector without the first element equal to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::ValueNotFound`] when no element is equal.
    pub fn remove(&self, value: &T) -> Result<Self>
    where
        T: PartialEq,
    {
        let index = self.index_of(value).ok_or(VectorError::ValueNotFound)?;
        self.delete(index)
    }

    /// Returns the elements in `start..stop` as a new vector.
    ///
    /// Bounds follow sequence-slicing rules: a negative bound counts from
    /// the end, bounds are clamped to `[0, len()]`, and `start >= stop`
    /// yields an empty vector. A slice starting at 0 shares its whole
    /// structure with the receiver.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..10).collect();
    /// assert_eq!(vector.slice(2, 5), [2, 3, 4]);
    /// assert_eq!(vector.slice(-3, 100), [7, 8, 9]);
    /// assert!(vector.slice(5, 2).is_empty());
    /// ```
    #[must_use]
    pub fn slice(&self, start: isize, stop: isize) -> Self {
        let start = resolve_bound(start, self.length);
        let stop = resolve_bound(stop, self.length);

        if start >= stop {
            return Self::new();
        }
        if start == 0 {
            return self.truncated(stop);
        }
        self.iter_range(start, stop).cloned().collect()
    }

    /// Returns a new vector with the elements of `other` after those of `self`.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        self.extend(other.iter().cloned())
    }

    /// Returns a new vector holding `times` back-to-back copies of `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::PersistentVector;
    ///
    /// let vector = PersistentVector::from(vec![1, 2]);
    /// assert_eq!(vector.repeat(3), [1, 2, 1, 2, 1, 2]);
    /// assert!(vector.repeat(0).is_empty());
    /// ```
    #[must_use]
    pub fn repeat(&self, times: usize) -> Self {
        if times == 0 {
            return Self::new();
        }

        let mut evolver = self.evolver();
        for _ in 1..times {
            evolver.extend(self.iter().cloned());
        }
        evolver.into_persistent()
    }

    /// Copies the elements into a `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Creates an [`Evolver`] seeded with this vector.
    ///
    /// The evolver batches edits with in-place mutation of the nodes it owns;
    /// this vector is never affected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=3).collect();
    /// let mut evolver = vector.evolver();
    /// evolver.append(4).append(5);
    /// assert_eq!(evolver.persistent(), [1, 2, 3, 4, 5]);
    /// assert_eq!(vector, [1, 2, 3]);
    /// ```
    #[must_use]
    pub fn evolver(&self) -> Evolver<T> {
        Evolver::from_vector(self.clone())
    }

    fn truncated(&self, length: usize) -> Self {
        let mut truncated = self.clone();
        truncated.truncate_in_place(length);
        truncated
    }

    // =========================================================================
    // In-place primitives used by the evolver
    // =========================================================================

    /// Appends `element`, mutating exclusively owned nodes and cloning the
    /// shared ones on the way.
    pub(crate) fn push_in_place(&mut self, element: T) {
        if self.tail.len() < BRANCHING_FACTOR {
            ReferenceCounter::make_mut(&mut self.tail).push(element);
        } else {
            let tail_offset = self.tail_offset();
            let full_tail =
                std::mem::replace(&mut self.tail, ReferenceCounter::new(single_chunk(element)));
            let leaf = ReferenceCounter::new(Node::Leaf(full_tail));

            if (tail_offset >> self.shift) >= BRANCHING_FACTOR {
                self.root = ReferenceCounter::new(Node::branch_of(
                    self.root.clone(),
                    Node::new_path(self.shift, leaf),
                ));
                self.shift += BITS_PER_LEVEL;
                trace!(target: "pvector", "trie grew a level, shift now {}", self.shift);
            } else {
                Node::push_tail_in_place(&mut self.root, self.shift, tail_offset, leaf);
            }
        }
        self.length += 1;
    }

    /// Replaces the element at `index` (already bounds-checked) and returns
    /// the previous one.
    pub(crate) fn replace_in_place(&mut self, index: usize, element: T) -> T {
        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            std::mem::replace(
                &mut ReferenceCounter::make_mut(&mut self.tail)[index - tail_offset],
                element,
            )
        } else {
            Node::replace_in_place(&mut self.root, self.shift, index, element)
        }
    }

    /// Shortens the vector to `length` elements; does nothing if it is
    /// already that short.
    pub(crate) fn truncate_in_place(&mut self, length: usize) {
        if length >= self.length {
            return;
        }
        if length == 0 {
            *self = Self::new();
            return;
        }

        let new_tail_offset = tail_offset_for(length);
        if new_tail_offset == self.tail_offset() {
            ReferenceCounter::make_mut(&mut self.tail).truncate(length - new_tail_offset);
            self.length = length;
            return;
        }

        // The new tail is the leaf at the new tail offset; take its buffer
        // before cutting the trie so the cut does not keep it alive.
        let new_tail = self
            .root
            .leaf_chunk(self.shift, new_tail_offset)
            .cloned()
            .unwrap_or_default();

        if new_tail_offset == 0 {
            self.root = ReferenceCounter::new(Node::empty_branch());
            self.shift = BITS_PER_LEVEL;
        } else {
            let new_shift = shift_for(new_tail_offset);
            while self.shift > new_shift {
                let Some(first) = self.root.first_child().cloned() else {
                    break;
                };
                self.root = first;
                self.shift -= BITS_PER_LEVEL;
                trace!(target: "pvector", "trie lost a level, shift now {}", self.shift);
            }
            Node::truncate_in_place(&mut self.root, self.shift, new_tail_offset);
        }

        self.tail = new_tail;
        let tail_length = length - new_tail_offset;
        if self.tail.len() > tail_length {
            ReferenceCounter::make_mut(&mut self.tail).truncate(tail_length);
        }
        self.length = length;
    }
}

/// Maps a possibly negative slice bound onto `[0, length]`.
fn resolve_bound(bound: isize, length: usize) -> usize {
    usize::try_from(bound).map_or_else(
        |_| length.saturating_sub(bound.unsigned_abs()),
        |bound| bound.min(length),
    )
}

// =============================================================================
// Bulk construction
// =============================================================================

/// Builds a vector from a `Vec` in one bottom-up pass, without requiring Clone.
fn build_persistent_vector_from_vec<T>(elements: Vec<T>) -> PersistentVector<T> {
    if elements.is_empty() {
        return PersistentVector::new();
    }

    let length = elements.len();
    let root_size = tail_offset_for(length);

    let mut elements = elements;
    let tail_elements = elements.split_off(root_size);
    let (root, shift) = build_root_from_elements(elements);

    PersistentVector {
        length,
        shift,
        root,
        tail: ReferenceCounter::new(tail_elements.into_iter().collect()),
    }
}

/// Builds the trie from a multiple-of-32 run of elements.
fn build_root_from_elements<T>(elements: Vec<T>) -> (ReferenceCounter<Node<T>>, usize) {
    if elements.is_empty() {
        return (ReferenceCounter::new(Node::empty_branch()), BITS_PER_LEVEL);
    }

    let mut current_level: Vec<ReferenceCounter<Node<T>>> =
        Vec::with_capacity(elements.len() / BRANCHING_FACTOR);
    let mut iter = elements.into_iter();
    loop {
        let chunk: Chunk<T> = iter.by_ref().take(BRANCHING_FACTOR).collect();
        if chunk.is_empty() {
            break;
        }
        current_level.push(ReferenceCounter::new(Node::Leaf(ReferenceCounter::new(chunk))));
    }

    let mut shift = BITS_PER_LEVEL;
    while current_level.len() > BRANCHING_FACTOR {
        let mut next_level = Vec::with_capacity(current_level.len().div_ceil(BRANCHING_FACTOR));
        let mut nodes = current_level.into_iter();
        loop {
            let children: arrayvec::ArrayVec<_, BRANCHING_FACTOR> =
                nodes.by_ref().take(BRANCHING_FACTOR).collect();
            if children.is_empty() {
                break;
            }
            next_level.push(ReferenceCounter::new(Node::Branch(children)));
        }
        current_level = next_level;
        shift += BITS_PER_LEVEL;
    }

    (
        ReferenceCounter::new(Node::Branch(current_level.into_iter().collect())),
        shift,
    )
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for PersistentVector<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for PersistentVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let elements: Vec<T> = iter.into_iter().collect();
        build_persistent_vector_from_vec(elements)
    }
}

impl<T> From<Vec<T>> for PersistentVector<T> {
    fn from(elements: Vec<T>) -> Self {
        build_persistent_vector_from_vec(elements)
    }
}

impl<T: Clone> From<&[T]> for PersistentVector<T> {
    fn from(elements: &[T]) -> Self {
        Self::from_slice(elements)
    }
}

impl<T: Clone> IntoIterator for PersistentVector<T> {
    type Item = T;
    type IntoIter = PersistentVectorIntoIterator<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        PersistentVectorIntoIterator::new(self)
    }
}

impl<'a, T> IntoIterator for &'a PersistentVector<T> {
    type Item = &'a T;
    type IntoIter = PersistentVectorIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Index<usize> for PersistentVector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        self.get(index).unwrap_or_else(|| {
            panic!(
                "index {index} out of range for vector of length {}",
                self.length
            )
        })
    }
}

impl<T: PartialEq> PartialEq for PersistentVector<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.length != other.length {
            return false;
        }
        if ReferenceCounter::ptr_eq(&self.root, &other.root)
            && ReferenceCounter::ptr_eq(&self.tail, &other.tail)
        {
            return true;
        }
        self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for PersistentVector<T> {}

impl<T: PartialEq> PartialEq<[T]> for PersistentVector<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.length == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq> PartialEq<&[T]> for PersistentVector<T> {
    fn eq(&self, other: &&[T]) -> bool {
        *self == **other
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for PersistentVector<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        *self == other[..]
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for PersistentVector<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        *self == other[..]
    }
}

impl<T: PartialOrd> PartialOrd for PersistentVector<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for PersistentVector<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

/// Computes a hash value for this vector.
///
/// The length is hashed first, then each element in order, so equal vectors
/// hash equally whatever their internal layout.
///
/// # Examples
///
/// ```rust
/// use pvector::PersistentVector;
/// use std::collections::HashMap;
///
/// let mut map: HashMap<PersistentVector<i32>, &str> = HashMap::new();
/// let key: PersistentVector<i32> = (1..=3).collect();
/// map.insert(key.clone(), "value");
/// assert_eq!(map.get(&key), Some(&"value"));
/// ```
impl<T: Hash> Hash for PersistentVector<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentVector<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for PersistentVector<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

impl<T: Clone> Add for PersistentVector<T> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.concat(&other)
    }
}

impl<T: Clone> Add<&PersistentVector<T>> for &PersistentVector<T> {
    type Output = PersistentVector<T>;

    fn add(self, other: &PersistentVector<T>) -> PersistentVector<T> {
        self.concat(other)
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for PersistentVector<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentVectorVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<T> PersistentVectorVisitor<T> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for PersistentVectorVisitor<T>
where
    T: serde::Deserialize<'de>,
{
    type Value = PersistentVector<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        const MAX_PREALLOCATE: usize = 4096;
        let capacity = seq.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
        let mut elements = Vec::with_capacity(capacity);
        while let Some(element) = seq.next_element()? {
            elements.push(element);
        }
        Ok(build_persistent_vector_from_vec(elements))
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for PersistentVector<T>
where
    T: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentVectorVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
