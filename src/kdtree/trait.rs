use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rand::Rng;

use crate::error::{KdIndexError, Result};
use crate::kdtree::traversal::{take_nearest, Candidate, WorkList};
use crate::kdtree::KDTreeNode;
use crate::point::distance::{axis_distance, check_dimension, squared_distance_to};
use crate::point::Positioned;
use crate::r#type::{widen, CoordNum};

/// A trait for searching and accessing data out of a KDTree.
pub trait KDTreeIndex<T: Positioned<N>, N: CoordNum = f64>: Sized {
    /// The root node of this tree.
    fn root(&self) -> &KDTreeNode<T>;

    /// The number of coordinates every value in this tree has.
    fn dimension(&self) -> usize;

    /// The number of values in this tree.
    fn len(&self) -> usize;

    /// Returns `true` if this tree holds no values.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The height of this tree.
    fn depth(&self) -> usize {
        self.root().depth()
    }

    /// Search for the `k` values closest to `target`.
    ///
    /// Results are ordered by ascending distance. When several values tie at the `k`-th
    /// distance, the ones returned are picked at random with the thread-local RNG; use
    /// [`nearest_k_with_rng`][Self::nearest_k_with_rng] to control that choice.
    ///
    /// ```
    /// use kd_index::kdtree::{KDTree, KDTreeIndex};
    ///
    /// let points = vec![[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [3.0, 0.0, 0.0]];
    /// let tree = KDTree::try_new_with_items(3, points).unwrap();
    /// let nearest = tree.nearest_k(2, &[0.0, 0.0, 0.0]).unwrap();
    /// assert_eq!(nearest, vec![&[1.0, 0.0, 0.0], &[2.0, 0.0, 0.0]]);
    /// ```
    fn nearest_k(&self, k: usize, target: &[N]) -> Result<Vec<&T>> {
        self.nearest_k_with_rng(k, target, &mut rand::thread_rng())
    }

    /// Search for the `k` values closest to `target`, breaking ties at the `k`-th distance with
    /// `rng`.
    ///
    /// Fails with [`DimensionMismatch`][KdIndexError::DimensionMismatch] if `target` does not
    /// have [`dimension`][Self::dimension] coordinates. `k == 0` returns an empty list without
    /// visiting the tree.
    fn nearest_k_with_rng<R: Rng + ?Sized>(
        &self,
        k: usize,
        target: &[N],
        rng: &mut R,
    ) -> Result<Vec<&T>> {
        check_target(self.dimension(), target)?;
        if k == 0 {
            return Ok(vec![]);
        }

        let dimension = self.dimension();
        let mut candidates = BinaryHeap::new();
        let mut work = WorkList::new(self.root());

        while let Some(visit) = work.pop() {
            candidates.push(Reverse(Candidate {
                distance: squared_distance_to(visit.value, target),
                seq: candidates.len(),
                value: visit.value,
            }));

            let next_axis = (visit.axis + 1) % dimension;
            let nearer_is_left = match (visit.left.value(), visit.right.value()) {
                (None, None) => continue,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (Some(left), Some(right)) => {
                    axis_distance(left, target, visit.axis)
                        < axis_distance(right, target, visit.axis)
                }
            };
            let nearer = if nearer_is_left { visit.left } else { visit.right };
            let Some(nearer_value) = nearer.value() else {
                continue;
            };

            let cut = axis_distance(nearer_value, target, visit.axis);
            let nearer_distance = squared_distance_to(nearer_value, target);
            if candidates.len() + 1 < k || cut * cut <= nearer_distance {
                work.push_both(visit.left, visit.right, next_axis);
            } else {
                work.push(nearer, next_axis);
            }
        }

        log::trace!(
            "nearest_k visited {} of {} values for k = {}",
            work.visited(),
            self.len(),
            k
        );
        let sorted = std::iter::from_fn(|| candidates.pop().map(|Reverse(c)| c));
        Ok(take_nearest(sorted, k, rng))
    }

    /// Search for every value within `radius` of `target`, inclusive.
    ///
    /// Results are ordered by ascending distance. Fails with
    /// [`NegativeRadius`][KdIndexError::NegativeRadius] if `radius` is negative or NaN, and with
    /// [`DimensionMismatch`][KdIndexError::DimensionMismatch] if `target` has the wrong length.
    ///
    /// ```
    /// use kd_index::kdtree::{KDTree, KDTreeIndex};
    ///
    /// let points = vec![[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [3.0, 0.0, 0.0]];
    /// let tree = KDTree::try_new_with_items(3, points).unwrap();
    /// let within = tree.within(2.0, &[0.0, 0.0, 0.0]).unwrap();
    /// assert_eq!(within, vec![&[1.0, 0.0, 0.0], &[2.0, 0.0, 0.0]]);
    /// ```
    fn within(&self, radius: N, target: &[N]) -> Result<Vec<&T>> {
        if radius.is_nan() || radius < N::zero() {
            return Err(KdIndexError::NegativeRadius(widen(radius)));
        }
        check_target(self.dimension(), target)?;

        let dimension = self.dimension();
        let r2 = radius * radius;
        let mut found = BinaryHeap::new();
        let mut work = WorkList::new(self.root());

        while let Some(visit) = work.pop() {
            let next_axis = (visit.axis + 1) % dimension;
            let distance = squared_distance_to(visit.value, target);

            if distance <= r2 {
                found.push(Reverse(Candidate {
                    distance,
                    seq: found.len(),
                    value: visit.value,
                }));
                work.push_both(visit.left, visit.right, next_axis);
                continue;
            }

            let cut = axis_distance(visit.value, target, visit.axis);
            if cut * cut <= distance {
                work.push_both(visit.left, visit.right, next_axis);
            } else if target[visit.axis] < visit.value.coordinate(visit.axis) {
                work.push(visit.left, next_axis);
            } else {
                work.push(visit.right, next_axis);
            }
        }

        log::trace!(
            "within visited {} of {} values, found {}",
            work.visited(),
            self.len(),
            found.len()
        );
        Ok(std::iter::from_fn(|| found.pop().map(|Reverse(c)| c.value)).collect())
    }

    /// Search for the `k` values closest to `item`, leaving out values equal to `item` itself.
    fn nearest_k_excluding(&self, k: usize, item: &T) -> Result<Vec<&T>>
    where
        T: PartialEq,
    {
        let mut nearest = self.nearest_k(k.saturating_add(1), &item.coordinates())?;
        nearest.retain(|value| *value != item);
        nearest.truncate(k);
        Ok(nearest)
    }

    /// Search for every value within `radius` of `item`, leaving out values equal to `item`
    /// itself.
    fn within_excluding(&self, radius: N, item: &T) -> Result<Vec<&T>>
    where
        T: PartialEq,
    {
        let mut within = self.within(radius, &item.coordinates())?;
        within.retain(|value| *value != item);
        Ok(within)
    }
}

fn check_target<N: CoordNum>(dimension: usize, target: &[N]) -> Result<()> {
    check_dimension(dimension, target.len())?;
    if let Some(index) = target.iter().position(|c| !c.is_finite()) {
        return Err(KdIndexError::InvalidCoordinate { index });
    }
    Ok(())
}
