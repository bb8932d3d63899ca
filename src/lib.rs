//! # pvector
//!
//! A persistent (immutable) vector with structural sharing, plus a
//! transient evolver for batching edits.
//!
//! ## Overview
//!
//! - **`PersistentVector`**: 32-way trie with a tail buffer. Reads, appends
//!   and updates are O(log32 N); every update returns a new vector and
//!   leaves the receiver untouched.
//! - **`Evolver`**: a mutable view seeded from a vector. It edits the nodes
//!   it owns in place and copies shared nodes on first write, then freezes
//!   back into a `PersistentVector`.
//! - **`Transform`**: replace or discard the element at an index in one
//!   call.
//!
//! ## Feature Flags
//!
//! - `arc`: use `Arc` instead of `Rc`, making vectors `Send + Sync`
//! - `serde`: `Serialize` and `Deserialize` for `PersistentVector`
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`] facade under the `pvector` target.
//! No logger is installed by this crate.
//!
//! ## Example
//!
//! ```rust
//! use pvector::prelude::*;
//!
//! let vector: PersistentVector<i32> = (1..=3).collect();
//!
//! let mut evolver = vector.evolver();
//! evolver.append(4).set(0, 10).unwrap();
//! let evolved = evolver.persistent();
//!
//! assert_eq!(vector, [1, 2, 3]);
//! assert_eq!(evolved, [10, 2, 3, 4]);
//! assert_eq!(evolved.transform(1, Transform::Discard).unwrap(), [10, 3, 4]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use pvector::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::VectorError;
    pub use crate::persistent::*;
}

pub mod error;
pub mod persistent;

pub use error::{Result, VectorError};
pub use persistent::{
    Evolver, PersistentVector, PersistentVectorIntoIterator, PersistentVectorIterator, Transform,
};
