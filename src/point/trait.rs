use std::rc::Rc;
use std::sync::Arc;

use crate::error::Result;
use crate::point::distance::{self, EARTH_RADIUS_KM};
use crate::r#type::{cast, CoordNum};

/// An object located in a fixed-dimension coordinate space.
///
/// Implementors expose their coordinates by value, one axis at a time, so nothing a caller does
/// with the returned numbers can reach back into the object. The coordinates of a positioned
/// object must not change once it has been handed to a [`KDTree`][crate::kdtree::KDTree].
pub trait Positioned<N: CoordNum = f64> {
    /// The number of coordinates of this object.
    fn dimension(&self) -> usize;

    /// The coordinate along `axis`.
    ///
    /// `axis` must be in `0..self.dimension()`; implementations may panic otherwise.
    fn coordinate(&self, axis: usize) -> N;

    /// Radius of the sphere this object lives on, for great-circle distances.
    ///
    /// `None` means the object was not placed on a particular sphere, in which case
    /// [`haversine_distance`][Self::haversine_distance] falls back to Earth's radius.
    fn sphere_radius(&self) -> Option<N> {
        None
    }

    /// An owned copy of the full coordinate vector.
    fn coordinates(&self) -> Vec<N> {
        (0..self.dimension()).map(|axis| self.coordinate(axis)).collect()
    }

    /// Sum of the squared per-axis differences to `reference`.
    ///
    /// Fails with [`DimensionMismatch`][crate::KdIndexError::DimensionMismatch] if `reference`
    /// does not have exactly [`dimension`][Self::dimension] coordinates.
    fn squared_euclidean_distance(&self, reference: &[N]) -> Result<N> {
        distance::check_dimension(self.dimension(), reference.len())?;
        Ok(distance::squared_distance_to(self, reference))
    }

    /// Straight-line distance to `reference`.
    fn euclidean_distance(&self, reference: &[N]) -> Result<N> {
        Ok(self.squared_euclidean_distance(reference)?.sqrt())
    }

    /// Great-circle distance to `reference`.
    ///
    /// Both this object and `reference` must be `[latitude, longitude]` pairs in degrees on the
    /// same sphere; anything else fails with
    /// [`UnsupportedOperation`][crate::KdIndexError::UnsupportedOperation].
    fn haversine_distance(&self, reference: &[N]) -> Result<N> {
        let radius = self
            .sphere_radius()
            .unwrap_or_else(|| cast(EARTH_RADIUS_KM));
        distance::haversine(&self.coordinates(), reference, radius)
    }
}

impl<N: CoordNum, const D: usize> Positioned<N> for [N; D] {
    fn dimension(&self) -> usize {
        D
    }

    fn coordinate(&self, axis: usize) -> N {
        self[axis]
    }
}

impl<N: CoordNum> Positioned<N> for Vec<N> {
    fn dimension(&self) -> usize {
        self.len()
    }

    fn coordinate(&self, axis: usize) -> N {
        self[axis]
    }
}

macro_rules! impl_positioned_for_pointer {
    ($($ptr:ty),*) => {
        $(
            impl<N: CoordNum, P: Positioned<N> + ?Sized> Positioned<N> for $ptr {
                fn dimension(&self) -> usize {
                    (**self).dimension()
                }

                fn coordinate(&self, axis: usize) -> N {
                    (**self).coordinate(axis)
                }

                fn sphere_radius(&self) -> Option<N> {
                    (**self).sphere_radius()
                }
            }
        )*
    };
}

impl_positioned_for_pointer!(&P, Box<P>, Rc<P>, Arc<P>);
