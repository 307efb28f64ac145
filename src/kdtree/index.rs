use std::fmt;
use std::marker::PhantomData;

use crate::error::{KdIndexError, Result};
use crate::kdtree::builder::build;
use crate::kdtree::{KDTreeIndex, KDTreeNode};
use crate::point::Positioned;
use crate::r#type::CoordNum;

/// An immutable K-d tree that owns its values.
///
/// The tree is built once from a list of positioned values and then answers read-only queries
/// through [`KDTreeIndex`]. Replacing the content goes through [`rebuild`][Self::rebuild], which
/// swaps in a whole new node graph only after it has been fully built.
#[derive(Debug, Clone, PartialEq)]
pub struct KDTree<T, N: CoordNum = f64> {
    root: KDTreeNode<T>,
    dimension: usize,
    num_items: usize,
    phantom: PhantomData<N>,
}

/// A borrowed view of a [`KDTree`].
///
/// The view is `Copy`. Results of [`KDTreeIndex`] queries borrow the view itself, so bind it to a
/// variable to keep them around; [`root`][KDTreeRef::root] hands out the node graph for the whole
/// lifetime of the underlying tree.
#[derive(Debug, PartialEq)]
pub struct KDTreeRef<'a, T, N: CoordNum = f64> {
    root: &'a KDTreeNode<T>,
    dimension: usize,
    num_items: usize,
    phantom: PhantomData<N>,
}

impl<T, N: CoordNum> Clone for KDTreeRef<'_, T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, N: CoordNum> Copy for KDTreeRef<'_, T, N> {}

impl<T: Positioned<N>, N: CoordNum> KDTree<T, N> {
    /// Create an empty tree of the given dimension.
    pub fn try_new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(KdIndexError::InvalidDimension(dimension));
        }
        Ok(Self::from_parts(KDTreeNode::Empty, dimension, 0))
    }

    /// Create a tree of the given dimension and build it from `items`.
    ///
    /// Fails if the dimension is zero or if any item's coordinate vector does not have exactly
    /// `dimension` entries.
    pub fn try_new_with_items(dimension: usize, items: impl IntoIterator<Item = T>) -> Result<Self> {
        let mut tree = Self::try_new(dimension)?;
        tree.rebuild(items)?;
        Ok(tree)
    }

    /// Discard the current node graph and build a new one from `items`.
    ///
    /// The items are validated before anything is replaced; on error the tree keeps its
    /// previous content.
    pub fn rebuild(&mut self, items: impl IntoIterator<Item = T>) -> Result<()> {
        let items: Vec<T> = items.into_iter().collect();
        let num_items = items.len();
        self.root = build(items, self.dimension)?;
        self.num_items = num_items;
        Ok(())
    }
}

impl<T, N: CoordNum> KDTree<T, N> {
    pub(crate) fn from_parts(root: KDTreeNode<T>, dimension: usize, num_items: usize) -> Self {
        Self {
            root,
            dimension,
            num_items,
            phantom: PhantomData,
        }
    }

    /// Take ownership of the root node.
    pub fn into_root(self) -> KDTreeNode<T> {
        self.root
    }

    /// Borrow this tree as a [`KDTreeRef`].
    pub fn as_ref(&self) -> KDTreeRef<'_, T, N> {
        KDTreeRef {
            root: &self.root,
            dimension: self.dimension,
            num_items: self.num_items,
            phantom: PhantomData,
        }
    }
}

impl<T: Positioned<N>, N: CoordNum> KDTreeIndex<T, N> for KDTree<T, N> {
    fn root(&self) -> &KDTreeNode<T> {
        &self.root
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.num_items
    }
}

impl<'a, T, N: CoordNum> KDTreeRef<'a, T, N> {
    /// The root node, borrowed from the underlying tree rather than from this view.
    pub fn root(&self) -> &'a KDTreeNode<T> {
        self.root
    }
}

impl<T: Positioned<N>, N: CoordNum> KDTreeIndex<T, N> for KDTreeRef<'_, T, N> {
    fn root(&self) -> &KDTreeNode<T> {
        self.root
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.num_items
    }
}

impl<T: fmt::Display, N: CoordNum> fmt::Display for KDTree<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "KDTree of {} dimensions, {{Tree: {}}}",
            self.dimension, self.root
        )
    }
}
