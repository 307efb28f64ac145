#![doc = include_str!("../README.md")]

mod error;
pub mod kdtree;
pub mod linear;
pub mod point;
mod r#type;

pub use error::{KdIndexError, Result};
pub use point::{Point, Positioned, EARTH_RADIUS_KM};
pub use r#type::CoordNum;
