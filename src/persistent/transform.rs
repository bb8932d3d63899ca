//! Single-index transformations of a [`PersistentVector`].
//!
//! A transformation either replaces the element at an index or removes it.
//! Removal is requested with [`Transform::Discard`], a variant of its own, so
//! no element value can ever be mistaken for it.

use super::vector::PersistentVector;
use crate::error::Result;

/// What to do with the element at a transformed index.
///
/// Any plain value converts into [`Transform::Set`], so callers can pass
/// either a value or [`Transform::Discard`] to
/// [`PersistentVector::transform`].
///
/// # Examples
///
/// ```rust
/// use pvector::{PersistentVector, Transform};
///
/// let vector = PersistentVector::from(vec![5, 6, 7]);
/// assert_eq!(vector.transform(1, 60).unwrap(), [5, 60, 7]);
/// assert_eq!(vector.transform(1, Transform::Discard).unwrap(), [5, 7]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform<T> {
    /// Replace the element with the given value.
    Set(T),
    /// Remove the element; later elements shift down by one.
    Discard,
}

impl<T> From<T> for Transform<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

impl<T: Clone> PersistentVector<T> {
    /// Returns a new vector with the element at `index` replaced or removed.
    ///
    /// `transform(i, v)` is `set(i, v)` and `transform(i, Transform::Discard)`
    /// is `delete(i)`.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::IndexOutOfRange`](crate::VectorError::IndexOutOfRange)
    /// when `index >= len()`.
    pub fn transform<V: Into<Transform<T>>>(&self, index: usize, value: V) -> Result<Self> {
        match value.into() {
            Transform::Set(element) => self.set(index, element),
            Transform::Discard => self.delete(index),
        }
    }

    /// Like [`transform`](Self::transform), with the decision computed from
    /// the current element.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::IndexOutOfRange`](crate::VectorError::IndexOutOfRange)
    /// when `index >= len()`; `function` is not called in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pvector::{PersistentVector, Transform};
    ///
    /// let vector = PersistentVector::from(vec![1, 2, 3]);
    /// let doubled = vector.transform_with(2, |x| Transform::Set(x * 2)).unwrap();
    /// assert_eq!(doubled, [1, 2, 6]);
    ///
    /// let dropped = vector
    ///     .transform_with(0, |x| if *x < 2 { Transform::Discard } else { Transform::Set(*x) })
    ///     .unwrap();
    /// assert_eq!(dropped, [2, 3]);
    /// ```
    pub fn transform_with<F>(&self, index: usize, function: F) -> Result<Self>
    where
        F: FnOnce(&T) -> Transform<T>,
    {
        let decision = function(self.try_get(index)?);
        self.transform(index, decision)
    }
}
