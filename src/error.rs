//! Error types for persistent vector operations.
//!
//! Every fallible operation in this crate reports failure through
//! [`VectorError`]. Failures are local and synchronous: the receiver of a
//! failed operation is always left exactly as it was.

use log::debug;

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, VectorError>;

/// Represents errors that can occur when reading or editing a vector.
///
/// # Examples
///
/// ```rust
/// use pvector::{PersistentVector, VectorError};
///
/// let vector: PersistentVector<i32> = (1..=3).collect();
/// assert_eq!(
///     vector.set(3, 0).unwrap_err(),
///     VectorError::IndexOutOfRange { index: 3, length: 3 }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VectorError {
    /// An index addressed a position outside `[0, length)`.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The length of the vector at the time of the call.
        length: usize,
    },
    /// A value-based removal found no equal element.
    ValueNotFound,
}

impl VectorError {
    /// Builds an [`VectorError::IndexOutOfRange`] and records it in the log.
    pub(crate) fn index_out_of_range(index: usize, length: usize) -> Self {
        let error = Self::IndexOutOfRange { index, length };
        debug!(target: "pvector", "{error}");
        error
    }

    /// Fails with [`VectorError::IndexOutOfRange`] unless `index < length`.
    pub(crate) fn check_index(index: usize, length: usize) -> Result<()> {
        if index < length {
            Ok(())
        } else {
            Err(Self::index_out_of_range(index, length))
        }
    }
}

impl std::fmt::Display for VectorError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, length } => write!(
                formatter,
                "index {index} out of range for vector of length {length}"
            ),
            Self::ValueNotFound => write!(formatter, "value not found in vector"),
        }
    }
}

impl std::error::Error for VectorError {}
