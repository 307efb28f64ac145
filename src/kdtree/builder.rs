use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::error::{KdIndexError, Result};
use crate::kdtree::{KDTree, KDTreeIndex, KDTreeNode};
use crate::point::distance::check_dimension;
use crate::point::Positioned;
use crate::r#type::CoordNum;

/// A builder to create a [`KDTree`].
///
/// Items are collected with [`add`][Self::add] and validated all at once in
/// [`finish`][Self::finish]; a builder with a bad item never produces a tree.
#[derive(Debug, Clone)]
pub struct KDTreeBuilder<T, N: CoordNum = f64> {
    dimension: usize,
    items: Vec<T>,
    phantom: PhantomData<N>,
}

impl<T: Positioned<N>, N: CoordNum> KDTreeBuilder<T, N> {
    /// Create a new builder for a tree of the given dimension.
    pub fn new(dimension: usize) -> Result<Self> {
        Self::with_capacity(dimension, 0)
    }

    /// Create a new builder for a tree of the given dimension, with room for `capacity` items.
    pub fn with_capacity(dimension: usize, capacity: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(KdIndexError::InvalidDimension(dimension));
        }
        Ok(Self {
            dimension,
            items: Vec::with_capacity(capacity),
            phantom: PhantomData,
        })
    }

    /// Add an item to the index, returning its insertion index.
    pub fn add(&mut self, item: T) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    /// The number of items added so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no items were added.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume this builder, validating every item and performing the median partition.
    pub fn finish(self) -> Result<KDTree<T, N>> {
        let num_items = self.items.len();
        let root = build(self.items, self.dimension)?;
        let tree = KDTree::from_parts(root, self.dimension, num_items);
        log::debug!(
            "built KD-tree of {} items in {} dimensions, depth {}",
            num_items,
            self.dimension,
            tree.depth()
        );
        Ok(tree)
    }
}

impl<T: Positioned<N>, N: CoordNum> Extend<T> for KDTreeBuilder<T, N> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

/// Validate every item against `dimension`, then build the node graph.
pub(crate) fn build<T: Positioned<N>, N: CoordNum>(
    items: Vec<T>,
    dimension: usize,
) -> Result<KDTreeNode<T>> {
    for item in items.iter() {
        check_dimension(dimension, item.dimension())?;
        if let Some(index) = (0..dimension).find(|&axis| !item.coordinate(axis).is_finite()) {
            return Err(KdIndexError::InvalidCoordinate { index });
        }
    }
    Ok(partition(items, 0, dimension))
}

/// Recursively median-partition `items`, splitting on `axis` at this level.
///
/// Each level halves the item count, so the recursion depth is logarithmic in the input size no
/// matter how the coordinates are distributed.
fn partition<T: Positioned<N>, N: CoordNum>(
    mut items: Vec<T>,
    axis: usize,
    dimension: usize,
) -> KDTreeNode<T> {
    // Stable, so items tied on this axis keep their relative order
    items.sort_by(|a, b| {
        a.coordinate(axis)
            .partial_cmp(&b.coordinate(axis))
            .unwrap_or(Ordering::Equal)
    });

    let mid = items.len() / 2;
    let right = items.split_off((mid + 1).min(items.len()));
    let Some(value) = items.pop() else {
        return KDTreeNode::Empty;
    };

    let next_axis = (axis + 1) % dimension;
    let left = partition(items, next_axis, dimension);
    let right = partition(right, next_axis, dimension);
    KDTreeNode::new(value, left, right)
}
