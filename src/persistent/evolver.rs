//! Transient builder for batches of edits to a [`PersistentVector`].
//!
//! An [`Evolver`] starts from a persistent vector and edits a private working
//! copy of it. Nodes the working copy shares with anyone else are cloned the
//! first time an edit passes through them; nodes it owns exclusively are
//! mutated in place. Freezing with [`Evolver::persistent`] hands out a vector
//! that shares the working nodes, so the next edit through any of them
//! copies it again and the frozen vector never observes later edits.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Index;
use std::rc::Rc;

use log::debug;

use super::iter::PersistentVectorIterator;
use super::vector::PersistentVector;
use crate::error::{Result, VectorError};

// =============================================================================
// Evolver Definition
// =============================================================================

/// A transient (temporarily mutable) view of a [`PersistentVector`].
///
/// # Design
///
/// - The vector the evolver was created from is never modified.
/// - `PhantomData<Rc<()>>` ensures `!Send` and `!Sync` even with the `arc`
///   feature enabled.
/// - `persistent` may be called any number of times; each call returns an
///   immutable snapshot of the current contents.
///
/// # Examples
///
/// ```rust
/// use pvector::PersistentVector;
///
/// let vector: PersistentVector<i32> = (1..=4).collect();
///
/// let mut evolver = vector.evolver();
/// evolver.append(5);
/// evolver.set(0, 10).unwrap();
/// evolver.delete(1).unwrap();
///
/// let updated = evolver.persistent();
/// assert_eq!(updated, [10, 3, 4, 5]);
/// assert_eq!(vector, [1, 2, 3, 4]);
/// ```
pub struct Evolver<T> {
    /// Vector the evolver was created from
    original: PersistentVector<T>,
    /// Current contents; exclusively owned nodes are edited in place
    working: PersistentVector<T>,
    /// Whether any edit has been applied
    dirty: bool,
    /// Marker to ensure `!Send` and `!Sync`.
    _marker: PhantomData<Rc<()>>,
}

static_assertions::assert_not_impl_any!(Evolver<i32>: Send, Sync);
static_assertions::assert_not_impl_any!(Evolver<String>: Send, Sync);

#[cfg(feature = "arc")]
mod arc_send_sync_verification_evolver {
    use super::Evolver;
    use std::sync::Arc;

    static_assertions::assert_not_impl_any!(Evolver<Arc<i32>>: Send, Sync);
}

// =============================================================================
// Evolver Implementation
// =============================================================================

impl<T> Evolver<T> {
    /// Creates an evolver over an empty vector.
    #[must_use]
    pub fn new() -> Self {
        Self::from_vector(PersistentVector::new())
    }

    pub(crate) fn from_vector(vector: PersistentVector<T>) -> Self {
        Self {
            original: vector.clone(),
            working: vector,
            dirty: false,
            _marker: PhantomData,
        }
    }

    /// Returns the number of elements currently held.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.working.len()
    }

    /// Returns `true` if the evolver currently holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    /// Returns a reference to the element at `index`, or `None` when out of
    /// range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.working.get(index)
    }

    /// Returns an iterator over the current contents.
    pub fn iter(&self) -> PersistentVectorIterator<'_, T> {
        self.working.iter()
    }

    /// Returns `true` once any edit has been applied, even if later edits
    /// restored the original contents.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the vector this evolver was created from.
    #[inline]
    #[must_use]
    pub const fn original(&self) -> &PersistentVector<T> {
        &self.original
    }

    /// Returns an immutable snapshot of the current contents.
    ///
    /// When nothing has been edited this is the original vector itself. The
    /// evolver stays usable; later edits copy any node they would otherwise
    /// share with the snapshot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::PersistentVector;
    ///
    /// let mut evolver = PersistentVector::from(vec![1, 2]).evolver();
    /// evolver.append(3);
    /// let snapshot = evolver.persistent();
    ///
    /// evolver.set(0, 100).unwrap();
    /// assert_eq!(snapshot, [1, 2, 3]);
    /// assert_eq!(evolver.persistent(), [100, 2, 3]);
    /// ```
    #[must_use]
    pub fn persistent(&self) -> PersistentVector<T> {
        if self.dirty {
            debug!(
                target: "pvector",
                "freezing evolver with {} elements",
                self.working.len()
            );
            self.working.clone()
        } else {
            self.original.clone()
        }
    }

    /// Consumes the evolver and returns its contents as a persistent vector.
    #[must_use]
    pub fn into_persistent(self) -> PersistentVector<T> {
        if self.dirty {
            debug!(
                target: "pvector",
                "finishing evolver with {} elements",
                self.working.len()
            );
            self.working
        } else {
            self.original
        }
    }
}

impl<T: Clone> Evolver<T> {
    /// Appends `element` at the end.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::Evolver;
    ///
    /// let mut evolver = Evolver::new();
    /// evolver.append(1).append(2);
    /// assert_eq!(evolver.len(), 2);
    /// ```
    pub fn append(&mut self, element: T) -> &mut Self {
        self.working.push_in_place(element);
        self.dirty = true;
        self
    }

    /// Appends every element of `elements` in order.
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, elements: I) -> &mut Self {
        for element in elements {
            self.working.push_in_place(element);
            self.dirty = true;
        }
        self
    }

    /// Replaces the element at `index` and returns the previous element.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::IndexOutOfRange`] when `index >= len()`; the
    /// evolver is left untouched.
    pub fn set(&mut self, index: usize, element: T) -> Result<T> {
        VectorError::check_index(index, self.working.len())?;
        let previous = self.working.replace_in_place(index, element);
        self.dirty = true;
        Ok(previous)
    }

    /// Removes the element at `index` and returns it; later elements shift
    /// down by one.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::IndexOutOfRange`] when `index >= len()`; the
    /// evolver is left untouched.
    pub fn delete(&mut self, index: usize) -> Result<T> {
        let length = self.working.len();
        let removed = self
            .working
            .get(index)
            .cloned()
            .ok_or_else(|| VectorError::index_out_of_range(index, length))?;

        let rest: Vec<T> = self.working.iter_range(index + 1, length).cloned().collect();
        self.working.truncate_in_place(index);
        for element in rest {
            self.working.push_in_place(element);
        }

        self.dirty = true;
        Ok(removed)
    }

    /// Removes the first element equal to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::ValueNotFound`] when no element is equal.
    pub fn remove(&mut self, value: &T) -> Result<()>
    where
        T: PartialEq,
    {
        let index = self
            .working
            .index_of(value)
            .ok_or(VectorError::ValueNotFound)?;
        self.delete(index).map(|_| ())
    }
}

impl<T> Default for Evolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Extend<T> for Evolver<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, elements: I) {
        Self::extend(self, elements);
    }
}

impl<T> Index<usize> for Evolver<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.working[index]
    }
}

impl<T: fmt::Debug> fmt::Debug for Evolver<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Evolver")
            .field("elements", &self.working)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_evolver_is_clean() {
        let evolver: Evolver<i32> = Evolver::new();
        assert!(evolver.is_empty());
        assert!(!evolver.is_dirty());
    }

    #[rstest]
    fn test_clean_freeze_returns_original() {
        let vector: PersistentVector<i32> = (0..50).collect();
        let evolver = vector.evolver();
        assert_eq!(evolver.persistent(), vector);
        assert_eq!(evolver.into_persistent(), vector);
    }

    #[rstest]
    fn test_dirty_is_sticky() {
        let vector = PersistentVector::from(vec![1, 2, 3]);
        let mut evolver = vector.evolver();
        evolver.set(0, 5).unwrap();
        evolver.set(0, 1).unwrap();
        assert!(evolver.is_dirty());
        assert_eq!(evolver.persistent(), vector);
    }

    #[rstest]
    fn test_failed_edits_leave_evolver_clean() {
        let vector = PersistentVector::from(vec![1, 2, 3]);
        let mut evolver = vector.evolver();

        assert_eq!(
            evolver.set(3, 0),
            Err(VectorError::IndexOutOfRange {
                index: 3,
                length: 3
            })
        );
        assert!(evolver.delete(7).is_err());
        assert_eq!(evolver.remove(&9), Err(VectorError::ValueNotFound));
        assert!(!evolver.is_dirty());
    }

    #[rstest]
    fn test_set_returns_previous_and_delete_returns_removed() {
        let mut evolver = PersistentVector::from(vec!['a', 'b', 'c']).evolver();
        assert_eq!(evolver.set(1, 'x'), Ok('b'));
        assert_eq!(evolver.delete(0), Ok('a'));
        assert_eq!(evolver.persistent(), ['x', 'c']);
    }

    #[rstest]
    fn test_edits_do_not_leak_into_original_or_snapshots() {
        let vector: PersistentVector<usize> = (0..100).collect();
        let mut evolver = vector.evolver();

        evolver.set(3, 300).unwrap();
        let first = evolver.persistent();
        evolver.set(3, 3000).unwrap();
        evolver.append(100);
        let second = evolver.persistent();
        evolver.delete(0).unwrap();

        assert_eq!(vector.get(3), Some(&3));
        assert_eq!(vector.len(), 100);
        assert_eq!(first.get(3), Some(&300));
        assert_eq!(first.len(), 100);
        assert_eq!(second.get(3), Some(&3000));
        assert_eq!(second.len(), 101);
        assert_eq!(evolver.get(2), Some(&3000));
        vector.check_invariants();
        first.check_invariants();
        second.check_invariants();
    }

    #[rstest]
    fn test_extend_trait() {
        let mut evolver = Evolver::new();
        Extend::extend(&mut evolver, 0..40);
        assert_eq!(evolver.len(), 40);
        assert_eq!(evolver[39], 39);
    }

    #[rstest]
    fn test_debug_output() {
        let mut evolver = Evolver::new();
        evolver.append(1);
        assert_eq!(
            format!("{evolver:?}"),
            "Evolver { elements: [1], dirty: true }"
        );
    }
}
