//! Trie nodes and the radix arithmetic shared by the vector and the evolver.
//!
//! A node at level `L` (leaves are at level 0) picks the child for a global
//! index with `(index >> L) & MASK`. Branches hold their children densely
//! packed from the left; every leaf that lives in the trie is full. Only the
//! rightmost path of the trie may contain partially filled branches.

use arrayvec::ArrayVec;

use super::ReferenceCounter;

/// Bits of the index consumed per trie level.
pub(crate) const BITS_PER_LEVEL: usize = 5;

/// Branching factor (2^5 = 32).
pub(crate) const BRANCHING_FACTOR: usize = 1 << BITS_PER_LEVEL;

/// Bit mask for extracting the slot within a node.
pub(crate) const MASK: usize = BRANCHING_FACTOR - 1;

/// A fixed-capacity element buffer, used for leaves and for the tail.
pub(crate) type Chunk<T> = ArrayVec<T, BRANCHING_FACTOR>;

type Children<T> = ArrayVec<ReferenceCounter<Node<T>>, BRANCHING_FACTOR>;

/// Returns the index of the first element held by the tail of a vector with
/// `length` elements. Everything below it lives in the trie.
#[inline]
pub(crate) const fn tail_offset_for(length: usize) -> usize {
    if length < BRANCHING_FACTOR {
        0
    } else {
        ((length - 1) >> BITS_PER_LEVEL) << BITS_PER_LEVEL
    }
}

/// Returns the smallest shift whose root can address `trie_length` elements.
pub(crate) const fn shift_for(trie_length: usize) -> usize {
    let mut shift = BITS_PER_LEVEL;
    while trie_length > 0 && ((trie_length - 1) >> shift) >= BRANCHING_FACTOR {
        shift += BITS_PER_LEVEL;
    }
    shift
}

#[inline]
const fn slot(index: usize, level: usize) -> usize {
    (index >> level) & MASK
}

/// Builds a chunk holding exactly one element.
pub(crate) fn single_chunk<T>(element: T) -> Chunk<T> {
    let mut chunk = Chunk::new();
    chunk.push(element);
    chunk
}

/// Internal node of the trie.
///
/// Leaves keep their elements behind their own reference counter so that a
/// full tail can become a leaf (and the last leaf can become the tail again)
/// without copying any element.
pub(crate) enum Node<T> {
    /// Interior node; children are one level closer to the leaves.
    Branch(Children<T>),
    /// Leaf node holding up to 32 elements.
    Leaf(ReferenceCounter<Chunk<T>>),
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Branch(children) => Self::Branch(children.clone()),
            Self::Leaf(elements) => Self::Leaf(elements.clone()),
        }
    }
}

impl<T> Node<T> {
    /// Creates an empty branch node, the root of a vector whose elements all
    /// fit in the tail.
    pub(crate) const fn empty_branch() -> Self {
        Self::Branch(ArrayVec::new_const())
    }

    /// Creates a branch holding exactly two children.
    pub(crate) fn branch_of(left: ReferenceCounter<Self>, right: ReferenceCounter<Self>) -> Self {
        let mut children = ArrayVec::new();
        children.push(left);
        children.push(right);
        Self::Branch(children)
    }

    pub(crate) fn first_child(&self) -> Option<&ReferenceCounter<Self>> {
        match self {
            Self::Branch(children) => children.first(),
            Self::Leaf(_) => None,
        }
    }

    /// Returns the leaf buffer holding `index`, descending from `level`.
    ///
    /// The caller has already checked that `index` addresses the trie part of
    /// the vector; `None` only comes back for indices past the trie's end.
    pub(crate) fn leaf_chunk(&self, level: usize, index: usize) -> Option<&ReferenceCounter<Chunk<T>>> {
        let mut node = self;
        let mut level = level;

        loop {
            match node {
                Self::Branch(children) => {
                    node = children.get(slot(index, level))?.as_ref();
                    level = level.checked_sub(BITS_PER_LEVEL)?;
                }
                Self::Leaf(elements) => return Some(elements),
            }
        }
    }

    /// Returns the element at `index`, descending from `level`.
    pub(crate) fn get(&self, level: usize, index: usize) -> Option<&T> {
        self.leaf_chunk(level, index)
            .and_then(|elements| elements.get(index & MASK))
    }

    /// Wraps `leaf` in single-child branches until it sits at `level`.
    pub(crate) fn new_path(level: usize, leaf: ReferenceCounter<Self>) -> ReferenceCounter<Self> {
        let mut node = leaf;
        let mut current = 0;
        while current < level {
            let mut children = ArrayVec::new();
            children.push(node);
            node = ReferenceCounter::new(Self::Branch(children));
            current += BITS_PER_LEVEL;
        }
        node
    }

    /// Returns a copy of this node with `leaf` grafted at `tail_offset`.
    ///
    /// Only the nodes on the path to the new leaf are copied; every other
    /// subtree is shared with `self`.
    pub(crate) fn with_tail_pushed(
        &self,
        level: usize,
        tail_offset: usize,
        leaf: ReferenceCounter<Self>,
    ) -> Self {
        let Self::Branch(children) = self else {
            unreachable!("tail pushed below the leaf level");
        };

        let subindex = slot(tail_offset, level);
        let mut new_children = children.clone();

        if level == BITS_PER_LEVEL {
            debug_assert_eq!(subindex, children.len());
            new_children.push(leaf);
        } else if let Some(child) = children.get(subindex) {
            new_children[subindex] = ReferenceCounter::new(child.with_tail_pushed(
                level - BITS_PER_LEVEL,
                tail_offset,
                leaf,
            ));
        } else {
            new_children.push(Self::new_path(level - BITS_PER_LEVEL, leaf));
        }

        Self::Branch(new_children)
    }

    /// Grafts `leaf` at `tail_offset`, cloning only the nodes on the path that
    /// are shared with someone else.
    pub(crate) fn push_tail_in_place(
        node: &mut ReferenceCounter<Self>,
        level: usize,
        tail_offset: usize,
        leaf: ReferenceCounter<Self>,
    ) {
        let Self::Branch(children) = ReferenceCounter::make_mut(node) else {
            unreachable!("tail pushed below the leaf level");
        };

        let subindex = slot(tail_offset, level);
        if level == BITS_PER_LEVEL {
            debug_assert_eq!(subindex, children.len());
            children.push(leaf);
        } else if subindex < children.len() {
            Self::push_tail_in_place(
                &mut children[subindex],
                level - BITS_PER_LEVEL,
                tail_offset,
                leaf,
            );
        } else {
            children.push(Self::new_path(level - BITS_PER_LEVEL, leaf));
        }
    }

    /// Cuts the subtree down to its first `trie_length` elements.
    ///
    /// `trie_length` must be a non-zero multiple of the branching factor that
    /// this node can address from `level`.
    pub(crate) fn truncate_in_place(node: &mut ReferenceCounter<Self>, level: usize, trie_length: usize) {
        let needed = ((trie_length - 1) >> level) + 1;
        let Self::Branch(children) = ReferenceCounter::make_mut(node) else {
            return;
        };

        children.truncate(needed);
        if level > BITS_PER_LEVEL
            && let Some(last) = children.last_mut()
        {
            let remaining = trie_length - ((needed - 1) << level);
            Self::truncate_in_place(last, level - BITS_PER_LEVEL, remaining);
        }
    }

    /// Walks the subtree asserting the shape invariants and returns the
    /// number of elements it holds.
    pub(crate) fn check_subtree(&self, level: usize, rightmost: bool) -> usize {
        match self {
            Self::Leaf(elements) => {
                assert_eq!(level, 0, "leaf found above the leaf level");
                assert_eq!(elements.len(), BRANCHING_FACTOR, "partial leaf in the trie");
                elements.len()
            }
            Self::Branch(children) => {
                assert!(level > 0, "branch found at the leaf level");
                assert!(!children.is_empty(), "empty interior branch");
                if !rightmost {
                    assert_eq!(children.len(), BRANCHING_FACTOR, "partial branch off the right edge");
                }
                let last = children.len() - 1;
                children
                    .iter()
                    .enumerate()
                    .map(|(position, child)| {
                        child.check_subtree(level - BITS_PER_LEVEL, rightmost && position == last)
                    })
                    .sum()
            }
        }
    }

    pub(crate) fn is_empty_branch(&self) -> bool {
        matches!(self, Self::Branch(children) if children.is_empty())
    }
}

impl<T: Clone> Node<T> {
    /// Returns a copy of this node with the element at `index` replaced.
    ///
    /// Every node from here down to the target leaf is copied; all sibling
    /// subtrees are shared with `self`.
    pub(crate) fn path_clone_and_set(&self, level: usize, index: usize, element: T) -> Self {
        match self {
            Self::Branch(children) => {
                let subindex = slot(index, level);
                let mut new_children = children.clone();
                new_children[subindex] = ReferenceCounter::new(children[subindex].path_clone_and_set(
                    level - BITS_PER_LEVEL,
                    index,
                    element,
                ));
                Self::Branch(new_children)
            }
            Self::Leaf(elements) => {
                let mut new_elements: Chunk<T> = (**elements).clone();
                new_elements[index & MASK] = element;
                Self::Leaf(ReferenceCounter::new(new_elements))
            }
        }
    }

    /// Replaces the element at `index` and returns the previous one.
    ///
    /// Nodes on the path are mutated directly when this tree is their only
    /// owner and cloned first otherwise.
    pub(crate) fn replace_in_place(
        node: &mut ReferenceCounter<Self>,
        level: usize,
        index: usize,
        element: T,
    ) -> T {
        match ReferenceCounter::make_mut(node) {
            Self::Branch(children) => Self::replace_in_place(
                &mut children[slot(index, level)],
                level - BITS_PER_LEVEL,
                index,
                element,
            ),
            Self::Leaf(elements) => std::mem::replace(
                &mut ReferenceCounter::make_mut(elements)[index & MASK],
                element,
            ),
        }
    }
}
