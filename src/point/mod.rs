//! Positioned objects: anything with a fixed-length coordinate vector that can measure its
//! distance to a reference position.

pub mod distance;
mod owned;
mod r#trait;

pub use distance::EARTH_RADIUS_KM;
pub use owned::Point;
pub use r#trait::Positioned;
