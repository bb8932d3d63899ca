//! Iterators over [`PersistentVector`].
//!
//! Both iterators walk the vector one 32-element block at a time: a block is
//! located with a single root-to-leaf descent and then consumed without
//! further lookups, which keeps a full pass at O(N).

use std::iter::FusedIterator;

use super::ReferenceCounter;
use super::node::{Chunk, MASK};
use super::vector::PersistentVector;

/// An iterator over references to elements of a [`PersistentVector`].
///
/// Double-ended and exact-size. Created by [`PersistentVector::iter`].
pub struct PersistentVectorIterator<'a, T> {
    /// Vector being iterated
    vector: &'a PersistentVector<T>,
    /// Index of the next element yielded from the front
    front: usize,
    /// One past the index of the next element yielded from the back
    back: usize,
    /// Unconsumed part of the block containing `front`
    front_chunk: &'a [T],
    /// Unconsumed part of the block containing `back - 1`
    back_chunk: &'a [T],
}

impl<'a, T> PersistentVectorIterator<'a, T> {
    pub(crate) fn new(vector: &'a PersistentVector<T>, start: usize, stop: usize) -> Self {
        Self {
            vector,
            front: start,
            back: stop,
            front_chunk: &[],
            back_chunk: &[],
        }
    }
}

impl<T> Clone for PersistentVectorIterator<'_, T> {
    fn clone(&self) -> Self {
        Self {
            vector: self.vector,
            front: self.front,
            back: self.back,
            front_chunk: self.front_chunk,
            back_chunk: self.back_chunk,
        }
    }
}

impl<'a, T> Iterator for PersistentVectorIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }

        if self.front_chunk.is_empty() {
            self.front_chunk = self
                .vector
                .chunk_for(self.front)
                .get(self.front & MASK..)
                .unwrap_or_default();
        }

        let (element, rest) = self.front_chunk.split_first()?;
        self.front_chunk = rest;
        self.front += 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front.min(self.back);
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for PersistentVectorIterator<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }

        if self.back_chunk.is_empty() {
            let last = self.back - 1;
            self.back_chunk = self
                .vector
                .chunk_for(last)
                .get(..=(last & MASK))
                .unwrap_or_default();
        }

        let (element, rest) = self.back_chunk.split_last()?;
        self.back_chunk = rest;
        self.back -= 1;
        Some(element)
    }
}

impl<T> ExactSizeIterator for PersistentVectorIterator<'_, T> {}

impl<T> FusedIterator for PersistentVectorIterator<'_, T> {}

/// An owning iterator over elements of a [`PersistentVector`].
///
/// Leaves may be shared with other vectors, so elements are cloned out of
/// them rather than moved.
pub struct PersistentVectorIntoIterator<T> {
    vector: PersistentVector<T>,
    front: usize,
    back: usize,
    front_chunk: Option<ReferenceCounter<Chunk<T>>>,
    back_chunk: Option<ReferenceCounter<Chunk<T>>>,
}

impl<T> PersistentVectorIntoIterator<T> {
    pub(crate) fn new(vector: PersistentVector<T>) -> Self {
        let back = vector.len();
        Self {
            vector,
            front: 0,
            back,
            front_chunk: None,
            back_chunk: None,
        }
    }
}

impl<T: Clone> Iterator for PersistentVectorIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front >= self.back {
            return None;
        }

        if self.front_chunk.is_none() || self.front & MASK == 0 {
            self.front_chunk = self.vector.chunk_handle_for(self.front).cloned();
        }

        let element = self.front_chunk.as_ref()?.get(self.front & MASK)?.clone();
        self.front += 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front.min(self.back);
        (remaining, Some(remaining))
    }
}

impl<T: Clone> DoubleEndedIterator for PersistentVectorIntoIterator<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front >= self.back {
            return None;
        }

        let last = self.back - 1;
        if self.back_chunk.is_none() || last & MASK == MASK {
            self.back_chunk = self.vector.chunk_handle_for(last).cloned();
        }

        let element = self.back_chunk.as_ref()?.get(last & MASK)?.clone();
        self.back = last;
        Some(element)
    }
}

impl<T: Clone> ExactSizeIterator for PersistentVectorIntoIterator<T> {}

impl<T: Clone> FusedIterator for PersistentVectorIntoIterator<T> {}
