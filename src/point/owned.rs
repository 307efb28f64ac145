use std::fmt;

use geo_traits::CoordTrait;

use crate::error::{KdIndexError, Result};
use crate::point::Positioned;
use crate::r#type::CoordNum;

/// An owned, validated position in `D`-dimensional space.
///
/// The coordinate vector is copied on construction and never handed out mutably, so a `Point`
/// stored in a tree cannot be moved by its creator.
#[derive(Debug, Clone, PartialEq)]
pub struct Point<N: CoordNum = f64> {
    coords: Box<[N]>,
    sphere_radius: Option<N>,
}

impl<N: CoordNum> Point<N> {
    /// Create a point from its coordinates.
    ///
    /// Fails if the vector is empty or any slot is NaN or infinite.
    pub fn try_new(coords: impl Into<Vec<N>>) -> Result<Self> {
        let coords = validate(coords.into())?;
        Ok(Self {
            coords,
            sphere_radius: None,
        })
    }

    /// Create a `[latitude, longitude]` point (degrees) on a sphere.
    ///
    /// `sphere_radius` defaults to the Earth's radius in kilometers.
    pub fn try_new_geographic(latitude: N, longitude: N, sphere_radius: Option<N>) -> Result<Self> {
        let coords = validate(vec![latitude, longitude])?;
        Ok(Self {
            coords,
            sphere_radius: Some(
                sphere_radius.unwrap_or_else(|| crate::r#type::cast(crate::EARTH_RADIUS_KM)),
            ),
        })
    }

    /// Create a point from any [`CoordTrait`], keeping every dimension the coordinate has.
    pub fn from_coord(coord: &impl CoordTrait<T = N>) -> Result<Self> {
        let size = coord.dim().size();
        Self::try_new((0..size).map(|n| coord.nth_or_panic(n)).collect::<Vec<_>>())
    }

    /// The coordinates of this point.
    pub fn coords(&self) -> &[N] {
        &self.coords
    }
}

fn validate<N: CoordNum>(coords: Vec<N>) -> Result<Box<[N]>> {
    if coords.is_empty() {
        return Err(KdIndexError::InvalidDimension(0));
    }
    if let Some(index) = coords.iter().position(|c| !c.is_finite()) {
        return Err(KdIndexError::InvalidCoordinate { index });
    }
    Ok(coords.into_boxed_slice())
}

impl<N: CoordNum> Positioned<N> for Point<N> {
    fn dimension(&self) -> usize {
        self.coords.len()
    }

    fn coordinate(&self, axis: usize) -> N {
        self.coords[axis]
    }

    fn sphere_radius(&self) -> Option<N> {
        self.sphere_radius
    }

    fn coordinates(&self) -> Vec<N> {
        self.coords.to_vec()
    }
}

impl<N: CoordNum> TryFrom<Vec<N>> for Point<N> {
    type Error = KdIndexError;

    fn try_from(coords: Vec<N>) -> Result<Self> {
        Self::try_new(coords)
    }
}

impl<N: CoordNum, const D: usize> TryFrom<[N; D]> for Point<N> {
    type Error = KdIndexError;

    fn try_from(coords: [N; D]) -> Result<Self> {
        Self::try_new(coords.to_vec())
    }
}

impl<N: CoordNum> fmt::Display for Point<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point{:?}", self.coords)
    }
}

#[cfg(test)]
mod test {
    use geo_traits::Dimensions;

    use super::*;

    struct Xyz(f64, f64, f64);

    impl CoordTrait for Xyz {
        type T = f64;

        fn dim(&self) -> Dimensions {
            Dimensions::Xyz
        }

        fn x(&self) -> Self::T {
            self.0
        }

        fn y(&self) -> Self::T {
            self.1
        }

        fn nth_or_panic(&self, n: usize) -> Self::T {
            match n {
                0 => self.0,
                1 => self.1,
                2 => self.2,
                _ => panic!("Invalid index of coord"),
            }
        }
    }

    #[test]
    fn test_try_new() {
        let p = Point::try_new(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(p.dimension(), 3);
        assert_eq!(p.coords(), &[1.0, 2.0, 3.0]);
        assert_eq!(p.sphere_radius(), None);
    }

    #[test]
    fn test_rejects_empty_and_non_finite() {
        assert_eq!(
            Point::<f64>::try_new(vec![]).unwrap_err(),
            KdIndexError::InvalidDimension(0)
        );
        assert_eq!(
            Point::try_new(vec![1.0, f64::NAN]).unwrap_err(),
            KdIndexError::InvalidCoordinate { index: 1 }
        );
        assert_eq!(
            Point::try_new(vec![f64::INFINITY, 1.0]).unwrap_err(),
            KdIndexError::InvalidCoordinate { index: 0 }
        );
    }

    #[test]
    fn test_source_vector_is_copied() {
        let mut source = vec![1.0, 2.0];
        let p = Point::try_new(source.clone()).unwrap();
        source[0] = 42.0;
        let mut copy = p.coordinates();
        copy[1] = 42.0;
        assert_eq!(p.coords(), &[1.0, 2.0]);
    }

    #[test]
    fn test_geographic() {
        let earth = Point::try_new_geographic(41.824, -71.4128, None).unwrap();
        assert_eq!(earth.sphere_radius(), Some(6371.0));

        let unit = Point::try_new_geographic(0.0, 0.0, Some(1.0)).unwrap();
        let d: f64 = unit.haversine_distance(&[0.0, 90.0]).unwrap();
        assert!((d - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_from_coord() {
        let p = Point::from_coord(&Xyz(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(p.coords(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_try_from_array() {
        let p = Point::try_from([3.0f32, 4.0]).unwrap();
        assert_eq!(p.euclidean_distance(&[0.0, 0.0]).unwrap(), 5.0);
    }
}
