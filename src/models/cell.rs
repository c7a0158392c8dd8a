//! Grid cell records as stored in the location grid dataset.

use geo::{coord, Intersects, Rect};
use serde::{Deserialize, Serialize};

/// Opaque grid cell identifier
pub type GridId = i64;

/// A single cell of the hierarchical location grid.
///
/// Column names match the `location_grid` table so dataset exports
/// deserialize directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub grid_id: GridId,

    /// Resolution rank, 1 is the coarsest
    pub level: u32,

    /// Centerpoint longitude
    pub longitude: f64,

    /// Centerpoint latitude
    pub latitude: f64,

    pub north_latitude: f64,
    pub south_latitude: f64,
    pub west_longitude: f64,
    pub east_longitude: f64,
}

impl GridCell {
    /// Bounding box as a rect with x = longitude, y = latitude
    pub fn bounds(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.west_longitude, y: self.south_latitude },
            coord! { x: self.east_longitude, y: self.north_latitude },
        )
    }

    /// All coordinates and box edges are real numbers
    pub fn is_finite(&self) -> bool {
        [
            self.longitude,
            self.latitude,
            self.north_latitude,
            self.south_latitude,
            self.west_longitude,
            self.east_longitude,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Closed bounding box test, edges count as inside.
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        self.bounds()
            .intersects(&coord! { x: longitude, y: latitude })
    }
}

/// A (longitude, latitude) pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinates {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> GridCell {
        GridCell {
            grid_id: 7,
            level: 2,
            longitude: -74.0,
            latitude: 40.5,
            north_latitude: 41.0,
            south_latitude: 40.0,
            west_longitude: -75.0,
            east_longitude: -73.0,
        }
    }

    #[test]
    fn test_contains_interior() {
        assert!(cell().contains(-74.2, 40.3));
    }

    #[test]
    fn test_contains_edges_inclusive() {
        let c = cell();
        assert!(c.contains(-74.0, 41.0));
        assert!(c.contains(-74.0, 40.0));
        assert!(c.contains(-75.0, 40.5));
        assert!(c.contains(-73.0, 40.5));
        assert!(c.contains(-75.0, 40.0));
    }

    #[test]
    fn test_is_finite() {
        assert!(cell().is_finite());
        let nan_center = GridCell { longitude: f64::NAN, ..cell() };
        assert!(!nan_center.is_finite());
        let open_edge = GridCell { east_longitude: f64::INFINITY, ..cell() };
        assert!(!open_edge.is_finite());
    }

    #[test]
    fn test_contains_outside() {
        let c = cell();
        assert!(!c.contains(-72.99, 40.5));
        assert!(!c.contains(-74.0, 41.0001));
    }
}
