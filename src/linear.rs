//! Linear-scan versions of the tree queries.
//!
//! These visit every item on every call. They share validation, ordering and tie handling with
//! [`KDTreeIndex`][crate::kdtree::KDTreeIndex], which makes them the reference the tree is
//! checked against, and a reasonable choice for a handful of items.

use rand::Rng;

use crate::error::{KdIndexError, Result};
use crate::kdtree::traversal::{take_nearest, Candidate};
use crate::point::Positioned;
use crate::r#type::{widen, CoordNum};

/// The `k` items closest to `target`, by ascending distance, with ties at the `k`-th distance
/// broken by `rng`.
///
/// Fails with [`DimensionMismatch`][KdIndexError::DimensionMismatch] if any item's dimension
/// differs from the length of `target`.
pub fn nearest_k<'a, T, N, R>(
    items: &'a [T],
    k: usize,
    target: &[N],
    rng: &mut R,
) -> Result<Vec<&'a T>>
where
    T: Positioned<N>,
    N: CoordNum,
    R: Rng + ?Sized,
{
    let mut candidates = scan(items, target)?;
    if k == 0 {
        return Ok(vec![]);
    }
    candidates.sort_unstable();
    Ok(take_nearest(candidates, k, rng))
}

/// Every item within `radius` of `target`, inclusive, by ascending distance.
pub fn within<'a, T, N>(items: &'a [T], radius: N, target: &[N]) -> Result<Vec<&'a T>>
where
    T: Positioned<N>,
    N: CoordNum,
{
    if radius.is_nan() || radius < N::zero() {
        return Err(KdIndexError::NegativeRadius(widen(radius)));
    }
    let r2 = radius * radius;
    let mut candidates = scan(items, target)?;
    candidates.retain(|c| c.distance <= r2);
    candidates.sort_unstable();
    Ok(candidates.into_iter().map(|c| c.value).collect())
}

fn scan<'a, T, N>(items: &'a [T], target: &[N]) -> Result<Vec<Candidate<'a, T, N>>>
where
    T: Positioned<N>,
    N: CoordNum,
{
    if let Some(index) = target.iter().position(|c| !c.is_finite()) {
        return Err(KdIndexError::InvalidCoordinate { index });
    }
    items
        .iter()
        .enumerate()
        .map(|(seq, value)| {
            let distance = value.squared_euclidean_distance(target)?;
            let non_finite = (0..target.len()).find(|&axis| !value.coordinate(axis).is_finite());
            if let Some(index) = non_finite {
                return Err(KdIndexError::InvalidCoordinate { index });
            }
            Ok(Candidate {
                distance,
                seq,
                value,
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn collinear() -> Vec<[f64; 3]> {
        vec![[3.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]
    }

    #[test]
    fn nearest_k_orders_by_distance() {
        let items = collinear();
        let mut rng = StdRng::seed_from_u64(0);
        let nearest = nearest_k(&items, 4, &[0.0, 0.0, 0.0], &mut rng).unwrap();
        assert_eq!(
            nearest,
            vec![&[1.0, 0.0, 0.0], &[2.0, 0.0, 0.0], &[3.0, 0.0, 0.0]]
        );
        assert!(nearest_k(&items, 0, &[0.0, 0.0, 0.0], &mut rng)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn within_is_inclusive() {
        let items = collinear();
        assert_eq!(
            within(&items, 1.0, &[1.0, 0.0, 0.0]).unwrap(),
            vec![&[1.0, 0.0, 0.0], &[2.0, 0.0, 0.0]]
        );
        assert!(within(&items, 0.4, &[1.5, 0.0, 0.0]).unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_input() {
        let items = collinear();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            nearest_k(&items, 1, &[0.0, 0.0], &mut rng).unwrap_err(),
            KdIndexError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        );
        assert_eq!(
            within(&items, -1.0, &[0.0, 0.0, 0.0]).unwrap_err(),
            KdIndexError::NegativeRadius(-1.0)
        );
        assert!(matches!(
            within(&items, f64::NAN, &[0.0, 0.0, 0.0]),
            Err(KdIndexError::NegativeRadius(_))
        ));
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        let mut rng = StdRng::seed_from_u64(0);
        let items = vec![[f64::INFINITY], [0.0], [1.0]];
        assert_eq!(
            nearest_k(&items, 2, &[0.5], &mut rng).unwrap_err(),
            KdIndexError::InvalidCoordinate { index: 0 }
        );
        let items = vec![[0.0], [1.0]];
        assert_eq!(
            within(&items, 1.0, &[f64::NEG_INFINITY]).unwrap_err(),
            KdIndexError::InvalidCoordinate { index: 0 }
        );
        // An infinite radius is still a valid radius
        assert_eq!(within(&items, f64::INFINITY, &[0.0]).unwrap().len(), 2);
    }
}
