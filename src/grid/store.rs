//! Query capability the resolver needs from a grid dataset.

use thiserror::Error;

use crate::models::GridCell;

/// Failure reported by a backing store while answering a query
#[derive(Debug, Error)]
#[error("grid store query failed: {0}")]
pub struct StoreError(pub String);

/// Centerpoint search window around a query point.
///
/// Edges are whole degrees padded by one on every side; candidates must lie
/// strictly inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighborhood {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl Neighborhood {
    pub fn around(longitude: f64, latitude: f64) -> Self {
        Self {
            north: latitude.ceil() + 1.0,
            south: latitude.floor() - 1.0,
            west: longitude.floor() - 1.0,
            east: longitude.ceil() + 1.0,
        }
    }

    /// Strict test, a centerpoint on an edge is outside
    pub fn surrounds(&self, longitude: f64, latitude: f64) -> bool {
        self.west < longitude
            && longitude < self.east
            && self.south < latitude
            && latitude < self.north
    }
}

/// Read-only access to grid cells.
///
/// Implementations must be safe to query from many readers at once; the
/// resolver never mutates the store.
pub trait GridStore {
    /// The deepest-level cell whose closed bounding box contains the point.
    fn best_containing(&self, longitude: f64, latitude: f64)
        -> Result<Option<GridCell>, StoreError>;

    /// Cells above level 1 whose centerpoint lies strictly inside the window.
    fn centerpoints_within(&self, window: &Neighborhood) -> Result<Vec<GridCell>, StoreError>;
}

impl<S: GridStore + ?Sized> GridStore for &S {
    fn best_containing(
        &self,
        longitude: f64,
        latitude: f64,
    ) -> Result<Option<GridCell>, StoreError> {
        (**self).best_containing(longitude, latitude)
    }

    fn centerpoints_within(&self, window: &Neighborhood) -> Result<Vec<GridCell>, StoreError> {
        (**self).centerpoints_within(window)
    }
}

impl<S: GridStore + ?Sized> GridStore for std::sync::Arc<S> {
    fn best_containing(
        &self,
        longitude: f64,
        latitude: f64,
    ) -> Result<Option<GridCell>, StoreError> {
        (**self).best_containing(longitude, latitude)
    }

    fn centerpoints_within(&self, window: &Neighborhood) -> Result<Vec<GridCell>, StoreError> {
        (**self).centerpoints_within(window)
    }
}
