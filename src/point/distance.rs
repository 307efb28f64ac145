//! Distance primitives over raw coordinate slices.
//!
//! These back the provided methods of [`Positioned`][crate::Positioned]. The checked variants
//! validate slice lengths; the tree's hot path uses [`squared_distance_to`] after validating the
//! query once.

use geo_0_31::algorithm::{Distance, HaversineMeasure};
use geo_0_31::Point;

use crate::error::{KdIndexError, Result};
use crate::point::Positioned;
use crate::r#type::{widen, CoordNum};

/// Mean radius of the Earth in kilometers, used for great-circle distances when a positioned
/// object does not carry its own sphere radius.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Squared Euclidean distance between two coordinate vectors of equal length.
pub fn squared_euclidean<N: CoordNum>(a: &[N], b: &[N]) -> Result<N> {
    check_dimension(a.len(), b.len())?;
    Ok(a.iter()
        .zip(b)
        .map(|(&x, &y)| y - x)
        .fold(N::zero(), |sum, d| sum + d * d))
}

/// Euclidean distance between two coordinate vectors of equal length.
pub fn euclidean<N: CoordNum>(a: &[N], b: &[N]) -> Result<N> {
    Ok(squared_euclidean(a, b)?.sqrt())
}

/// Great-circle distance between two `[latitude, longitude]` positions given in degrees, on a
/// sphere of the given radius. The result is in the unit of `radius`.
pub fn haversine<N: CoordNum>(a: &[N], b: &[N], radius: N) -> Result<N> {
    if a.len() != 2 || b.len() != 2 {
        return Err(KdIndexError::UnsupportedOperation(format!(
            "Haversine distance needs [latitude, longitude] pairs, got {} and {} coordinates",
            a.len(),
            b.len()
        )));
    }

    // geo takes (lon, lat) and returns the unit of the measure's radius
    let from = Point::new(a[1], a[0]);
    let to = Point::new(b[1], b[0]);
    Ok(HaversineMeasure::new(widen(radius)).distance(from, to))
}

/// Squared distance from a positioned object to a target whose length is already known to match.
#[inline]
pub(crate) fn squared_distance_to<N: CoordNum, P: Positioned<N> + ?Sized>(
    item: &P,
    target: &[N],
) -> N {
    target
        .iter()
        .enumerate()
        .fold(N::zero(), |sum, (axis, &t)| {
            let d = t - item.coordinate(axis);
            sum + d * d
        })
}

/// Absolute distance between the target and an item along a single axis.
#[inline]
pub(crate) fn axis_distance<N: CoordNum, P: Positioned<N> + ?Sized>(
    item: &P,
    target: &[N],
    axis: usize,
) -> N {
    (target[axis] - item.coordinate(axis)).abs()
}

#[inline]
pub(crate) fn check_dimension(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(KdIndexError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
