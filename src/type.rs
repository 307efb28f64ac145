use std::fmt::{Debug, Display};

use geo_0_31::CoordFloat;
use num_traits::{Float, FloatConst, FromPrimitive};

/// A trait for types that can be used as coordinates of a positioned object.
///
/// This trait is sealed and cannot be implemented for external types. Queries compare squared
/// distances against a fixed tolerance and hand great-circle distances to `geo`, which only behaves
/// predictably for the IEEE float types.
pub trait CoordNum:
    private::Sealed
    + Float
    + FloatConst
    + CoordFloat
    + FromPrimitive
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + 'static
{
}

impl CoordNum for f32 {}

impl CoordNum for f64 {}

/// Cast an `f64` constant into the coordinate type.
///
/// All constants in this crate fit in an `f32`, so the fallback is never taken in practice.
#[inline]
pub(crate) fn cast<N: CoordNum>(value: f64) -> N {
    N::from(value).unwrap_or_else(N::nan)
}

/// Widen a coordinate value to `f64` for error reporting.
#[inline]
pub(crate) fn widen<N: CoordNum>(value: N) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
