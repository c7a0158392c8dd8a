//! Location grid lookup.
//!
//! Resolves a point to the deepest grid cell whose bounding box contains it,
//! falling back to the nearest cell centerpoint, using an R-tree index.

mod distance;
mod index;
pub mod loader;
mod normalize;
mod resolver;
mod store;

pub use distance::distance_miles;
pub use index::GridIndex;
pub use normalize::normalize_longitude;
pub use resolver::{GridResolver, ResolveError};
pub use store::{GridStore, Neighborhood, StoreError};
