//! Work-list and candidate bookkeeping shared by the tree queries and the linear scan.

use std::cmp::Ordering;
use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::kdtree::KDTreeNode;
use crate::r#type::{cast, CoordNum};

/// Squared distances closer than this are treated as ties.
pub const TIE_TOLERANCE: f64 = 1e-33;

/// A value tagged with its squared distance to the query target.
///
/// Candidates order by distance, then by the order in which they were found, so draining a heap
/// of candidates is deterministic even when distances are equal.
#[derive(Debug)]
pub(crate) struct Candidate<'a, T, N: CoordNum> {
    pub(crate) distance: N,
    pub(crate) seq: usize,
    pub(crate) value: &'a T,
}

impl<T, N: CoordNum> PartialEq for Candidate<'_, T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T, N: CoordNum> Eq for Candidate<'_, T, N> {}

impl<T, N: CoordNum> Ord for Candidate<'_, T, N> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Non-finite coordinates are rejected on build and on query, so distances are never NaN
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
            .then(self.seq.cmp(&other.seq))
    }
}

impl<T, N: CoordNum> PartialOrd for Candidate<'_, T, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// FIFO queue of subtrees still to visit, each tagged with the split axis of its root.
///
/// Empty subtrees are never enqueued.
#[derive(Debug)]
pub(crate) struct WorkList<'a, T> {
    queue: VecDeque<(&'a KDTreeNode<T>, usize)>,
    visited: usize,
}

impl<'a, T> WorkList<'a, T> {
    pub(crate) fn new(root: &'a KDTreeNode<T>) -> Self {
        let mut work = Self {
            queue: VecDeque::new(),
            visited: 0,
        };
        work.push(root, 0);
        work
    }

    #[inline]
    pub(crate) fn push(&mut self, node: &'a KDTreeNode<T>, axis: usize) {
        if !node.is_empty() {
            self.queue.push_back((node, axis));
        }
    }

    #[inline]
    pub(crate) fn push_both(&mut self, left: &'a KDTreeNode<T>, right: &'a KDTreeNode<T>, axis: usize) {
        self.push(left, axis);
        self.push(right, axis);
    }

    /// The next populated node in visiting order, with its value, children and split axis.
    #[inline]
    pub(crate) fn pop(&mut self) -> Option<Visit<'a, T>> {
        while let Some((node, axis)) = self.queue.pop_front() {
            if let KDTreeNode::Node { value, left, right } = node {
                self.visited += 1;
                return Some(Visit {
                    value,
                    left,
                    right,
                    axis,
                });
            }
        }
        None
    }

    /// The number of populated nodes popped so far.
    pub(crate) fn visited(&self) -> usize {
        self.visited
    }
}

/// A populated node taken off the [`WorkList`].
#[derive(Debug)]
pub(crate) struct Visit<'a, T> {
    pub(crate) value: &'a T,
    pub(crate) left: &'a KDTreeNode<T>,
    pub(crate) right: &'a KDTreeNode<T>,
    pub(crate) axis: usize,
}

/// Take up to `k` values from candidates sorted by ascending distance.
///
/// Candidates are grouped into runs of tied distances. A run that fits in the remaining room is
/// taken whole. The run that would overflow `k` is shuffled and only as many values as fit are
/// kept, so ties at the boundary are broken uniformly at random.
pub(crate) fn take_nearest<'a, T, N, R>(
    sorted: impl IntoIterator<Item = Candidate<'a, T, N>>,
    k: usize,
    rng: &mut R,
) -> Vec<&'a T>
where
    N: CoordNum,
    R: Rng + ?Sized,
{
    let tolerance = cast::<N>(TIE_TOLERANCE);
    let mut sorted = sorted.into_iter().peekable();
    let mut result = Vec::new();

    while result.len() < k {
        let Some(first) = sorted.next() else {
            break;
        };
        let mut group = vec![first.value];
        while let Some(tie) =
            sorted.next_if(|c| (c.distance - first.distance).abs() < tolerance)
        {
            group.push(tie.value);
        }

        let room = k - result.len();
        if group.len() > room {
            group.shuffle(rng);
            group.truncate(room);
        }
        result.extend(group);
    }

    result
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn candidates<'a>(values: &'a [(f64, u32)]) -> Vec<Candidate<'a, u32, f64>> {
        values
            .iter()
            .enumerate()
            .map(|(seq, (distance, value))| Candidate {
                distance: *distance,
                seq,
                value,
            })
            .collect()
    }

    #[test]
    fn candidates_order_by_distance_then_seq() {
        let values = [(2.0, 0), (1.0, 1), (1.0, 2)];
        let mut sorted = candidates(&values);
        sorted.sort();
        let order: Vec<u32> = sorted.iter().map(|c| *c.value).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn takes_whole_groups_that_fit() {
        let values = [(0.0, 0), (1.0, 1), (1.0, 2), (4.0, 3)];
        let mut rng = StdRng::seed_from_u64(7);
        let taken = take_nearest(candidates(&values), 3, &mut rng);
        assert_eq!(taken, vec![&0, &1, &2]);

        let taken = take_nearest(candidates(&values), 10, &mut rng);
        assert_eq!(taken, vec![&0, &1, &2, &3]);

        assert!(take_nearest(candidates(&values), 0, &mut rng).is_empty());
    }

    #[test]
    fn boundary_group_is_sampled() {
        let values = [(0.0, 0), (1.0, 1), (1.0, 2), (1.0, 3), (1.0, 4), (9.0, 5)];
        let mut seen = HashSet::new();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let taken = take_nearest(candidates(&values), 3, &mut rng);
            assert_eq!(taken.len(), 3);
            assert_eq!(taken[0], &0);
            assert!(taken[1..].iter().all(|v| (1..=4).contains(*v)));
            assert_ne!(taken[1], taken[2]);
            seen.extend(taken[1..].iter().map(|v| **v));
        }
        // Every tied value gets picked eventually
        assert_eq!(seen, HashSet::from([1, 2, 3, 4]));
    }

    #[test]
    fn worklist_skips_empty_nodes() {
        let leaf = KDTreeNode::new(1u32, KDTreeNode::Empty, KDTreeNode::Empty);
        let empty = KDTreeNode::Empty;
        let mut work = WorkList::new(&leaf);
        work.push(&empty, 1);
        let visit = work.pop().unwrap();
        assert_eq!(visit.value, &1);
        assert_eq!(visit.axis, 0);
        assert!(work.pop().is_none());
        assert_eq!(work.visited(), 1);
    }
}
