//! Point to grid cell resolution.
//!
//! Flow: longitude correction → deepest containing cell → nearest
//! centerpoint in the surrounding window → not found.

use thiserror::Error;

use super::distance::distance_miles;
use super::normalize::normalize_longitude;
use super::store::{GridStore, Neighborhood, StoreError};
use crate::models::{GridCell, GridId};

/// Grid resolution errors.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Neither a containing cell nor a nearby centerpoint exists
    #[error("no location grid found")]
    NotFound,

    #[error("coordinates must be finite numbers, got {latitude},{longitude}")]
    InvalidInput { longitude: f64, latitude: f64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolves points to grid ids against an owned store.
///
/// The store lives exactly as long as the resolver. Share a resolver
/// across threads with an `Arc` when the store is `Sync`.
pub struct GridResolver<S> {
    store: S,
}

impl<S: GridStore> GridResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Resolve a raw (possibly out-of-range) point to a grid id
    pub fn resolve(&self, longitude: f64, latitude: f64) -> Result<GridId, ResolveError> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(ResolveError::InvalidInput { longitude, latitude });
        }

        let longitude = normalize_longitude(longitude);

        if let Some(cell) = self.store.best_containing(longitude, latitude)? {
            return Ok(cell.grid_id);
        }

        self.nearest_centerpoint(longitude, latitude)?
            .map(|cell| cell.grid_id)
            .ok_or(ResolveError::NotFound)
    }

    /// Closest level > 1 centerpoint in the window around the point.
    ///
    /// Expects an already corrected longitude. On equal distances the
    /// store's first candidate wins.
    pub fn nearest_centerpoint(
        &self,
        longitude: f64,
        latitude: f64,
    ) -> Result<Option<GridCell>, StoreError> {
        let window = Neighborhood::around(longitude, latitude);
        let candidates = self.store.centerpoints_within(&window)?;

        let mut nearest: Option<(f64, GridCell)> = None;
        for cell in candidates {
            let distance = distance_miles(cell.longitude, cell.latitude, longitude, latitude);
            match &nearest {
                Some((best, _)) if *best <= distance => {}
                _ => nearest = Some((distance, cell)),
            }
        }

        Ok(nearest.map(|(_, cell)| cell))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give the store back, ending the resolver's scope
    pub fn into_store(self) -> S {
        self.store
    }
}
