//! An implementation of an immutable, exact K-d tree over positioned objects.

#![warn(missing_docs)]

mod builder;
mod index;
mod node;
mod r#trait;
pub(crate) mod traversal;

pub use builder::KDTreeBuilder;
pub use index::{KDTree, KDTreeRef};
pub use node::{Direction, KDTreeNode, Values};
pub use r#trait::KDTreeIndex;
pub use traversal::TIE_TOLERANCE;
