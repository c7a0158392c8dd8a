//! Address and coordinate lookups answering in the flat `{lng, lat, grid_id}`
//! / `{error}` shape served to callers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geocoding::AddressGeocoder;
use crate::grid::{GridIndex, GridResolver, GridStore, ResolveError};
use crate::models::GridId;

/// Result of a lookup, serialized as a flat object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupResponse {
    Found { lng: f64, lat: f64, grid_id: GridId },
    Error { error: String },
}

impl LookupResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Combines an address geocoder with a grid resolver
pub struct GridLookupService<G, S> {
    geocoder: G,
    resolver: GridResolver<S>,
}

impl<G: AddressGeocoder, S: GridStore> GridLookupService<G, S> {
    pub fn new(geocoder: G, resolver: GridResolver<S>) -> Self {
        Self { geocoder, resolver }
    }

    pub fn resolver(&self) -> &GridResolver<S> {
        &self.resolver
    }

    /// Geocode a free-text address, then resolve its grid cell
    pub async fn geocode_address(&self, address: &str) -> LookupResponse {
        if address.trim().is_empty() {
            return LookupResponse::error("Address parameter is required");
        }

        let coords = match self.geocoder.geocode(address).await {
            Ok(Some(coords)) => coords,
            Ok(None) => {
                return LookupResponse::error(format!(
                    "Could not geocode address '{}' using Nominatim",
                    address
                ))
            }
            Err(e) => {
                warn!("Geocoding '{}' failed: {}", address, e);
                return LookupResponse::error(format!(
                    "Could not geocode address '{}' using Nominatim",
                    address
                ));
            }
        };

        match self.resolver.resolve(coords.lng, coords.lat) {
            Ok(grid_id) => {
                debug!("'{}' -> grid {}", address, grid_id);
                LookupResponse::Found {
                    lng: coords.lng,
                    lat: coords.lat,
                    grid_id,
                }
            }
            Err(ResolveError::NotFound) => LookupResponse::error(format!(
                "Address geocoded to {},{} but no location grid found for those coordinates",
                coords.lat, coords.lng
            )),
            Err(e) => LookupResponse::error(e.to_string()),
        }
    }

    /// Resolve raw coordinates. The response echoes the caller's values,
    /// not the corrected longitude.
    pub fn geocode_coordinates(
        &self,
        longitude: Option<f64>,
        latitude: Option<f64>,
    ) -> LookupResponse {
        let (Some(lng), Some(lat)) = (longitude, latitude) else {
            return LookupResponse::error("Both longitude and latitude parameters are required");
        };

        match self.resolver.resolve(lng, lat) {
            Ok(grid_id) => LookupResponse::Found { lng, lat, grid_id },
            Err(ResolveError::NotFound) => LookupResponse::error(format!(
                "No location grid found for coordinates {},{}",
                lat, lng
            )),
            Err(e) => LookupResponse::error(e.to_string()),
        }
    }
}

/// Description of one exposed lookup operation
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescription {
    pub name: &'static str,
    pub description: &'static str,
    pub required: &'static [&'static str],
}

/// The operations a remote caller can invoke
pub fn tool_descriptions() -> Vec<ToolDescription> {
    vec![
        ToolDescription {
            name: "geocode_address",
            description: "Geocode an address to get longitude, latitude, and grid ID",
            required: &["address"],
        },
        ToolDescription {
            name: "geocode_coordinates",
            description: "Get grid ID for given longitude and latitude coordinates",
            required: &["longitude", "latitude"],
        },
    ]
}

/// The grid dataset as a readable resource
#[derive(Debug, Clone, Serialize)]
pub struct DatasetResource {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub cells: usize,
    /// Cell count per level
    pub levels: BTreeMap<u32, usize>,
}

/// Resources a remote caller can read, currently the loaded grid
pub fn resource_descriptions(index: &GridIndex) -> Vec<DatasetResource> {
    vec![DatasetResource {
        uri: "location-grid://database",
        name: "Location Grid Database",
        description: "Location Grid Database - Contains grid cells with coordinates and boundaries",
        cells: index.len(),
        levels: index.levels().clone(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::GeocodeError;
    use crate::grid::GridIndex;
    use crate::models::{Coordinates, GridCell};
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Geocoder answering from a fixed table
    struct StubGeocoder {
        known: HashMap<&'static str, Coordinates>,
    }

    #[async_trait]
    impl AddressGeocoder for StubGeocoder {
        async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
            if address == "offline" {
                return Err(GeocodeError::Status(503));
            }
            Ok(self.known.get(address).copied())
        }
    }

    fn service() -> GridLookupService<StubGeocoder, GridIndex> {
        let index = GridIndex::build(vec![GridCell {
            grid_id: 1,
            level: 3,
            longitude: -74.0,
            latitude: 40.5,
            north_latitude: 41.0,
            south_latitude: 40.0,
            west_longitude: -75.0,
            east_longitude: -73.0,
        }]);
        let geocoder = StubGeocoder {
            known: HashMap::from([
                ("New York City", Coordinates::new(-74.0060152, 40.7127281)),
                ("Point Nemo", Coordinates::new(-123.393333, -48.876667)),
            ]),
        };
        GridLookupService::new(geocoder, GridResolver::new(index))
    }

    #[tokio::test]
    async fn test_address_found() {
        let resp = service().geocode_address("New York City").await;
        assert_eq!(
            resp,
            LookupResponse::Found {
                lng: -74.0060152,
                lat: 40.7127281,
                grid_id: 1
            }
        );
    }

    #[tokio::test]
    async fn test_address_required() {
        let resp = service().geocode_address("   ").await;
        assert_eq!(resp, LookupResponse::error("Address parameter is required"));
    }

    #[tokio::test]
    async fn test_padded_address_passed_through() {
        let resp = service().geocode_address(" Atlantis ").await;
        assert_eq!(
            resp,
            LookupResponse::error("Could not geocode address ' Atlantis ' using Nominatim")
        );
    }

    #[tokio::test]
    async fn test_address_not_geocoded() {
        let svc = service();
        for address in ["Atlantis", "offline"] {
            let resp = svc.geocode_address(address).await;
            assert_eq!(
                resp,
                LookupResponse::error(format!(
                    "Could not geocode address '{}' using Nominatim",
                    address
                ))
            );
        }
    }

    #[tokio::test]
    async fn test_address_without_grid() {
        let resp = service().geocode_address("Point Nemo").await;
        assert_eq!(
            resp,
            LookupResponse::error(
                "Address geocoded to -48.876667,-123.393333 but no location grid found for those coordinates"
            )
        );
    }

    #[test]
    fn test_coordinates_echo_raw_input() {
        let resp = service().geocode_coordinates(Some(-74.0060152), Some(40.7127281));
        assert_eq!(
            resp,
            LookupResponse::Found {
                lng: -74.0060152,
                lat: 40.7127281,
                grid_id: 1
            }
        );
    }

    #[test]
    fn test_coordinates_required() {
        let svc = service();
        let expected = LookupResponse::error("Both longitude and latitude parameters are required");
        assert_eq!(svc.geocode_coordinates(None, Some(1.0)), expected);
        assert_eq!(svc.geocode_coordinates(Some(1.0), None), expected);
    }

    #[test]
    fn test_coordinates_not_found() {
        let resp = service().geocode_coordinates(Some(100.5), Some(-20.25));
        assert_eq!(
            resp,
            LookupResponse::error("No location grid found for coordinates -20.25,100.5")
        );
    }

    #[test]
    fn test_response_shapes() {
        let found = LookupResponse::Found {
            lng: 1.5,
            lat: 2.5,
            grid_id: 42,
        };
        assert_eq!(
            serde_json::to_value(&found).unwrap(),
            serde_json::json!({"lng": 1.5, "lat": 2.5, "grid_id": 42})
        );
        assert_eq!(
            serde_json::to_value(LookupResponse::error("nope")).unwrap(),
            serde_json::json!({"error": "nope"})
        );
    }

    #[test]
    fn test_resource_describes_loaded_grid() {
        let svc = service();
        let resources = resource_descriptions(svc.resolver().store());
        assert_eq!(resources.len(), 1);

        let grid = &resources[0];
        assert_eq!(grid.uri, "location-grid://database");
        assert_eq!(grid.name, "Location Grid Database");
        assert_eq!(grid.cells, 1);
        assert_eq!(grid.levels, BTreeMap::from([(3, 1)]));
        assert_eq!(
            serde_json::to_value(grid).unwrap()["levels"],
            serde_json::json!({"3": 1})
        );
    }

    #[test]
    fn test_tool_descriptions() {
        let names: Vec<&str> = tool_descriptions().iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["geocode_address", "geocode_coordinates"]);
    }
}
