//! Free-text address geocoding.

mod nominatim;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Coordinates;

pub use nominatim::NominatimClient;

/// Geocoding failures other than "no result"
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid geocoder url: {0}")]
    InvalidUrl(String),

    #[error("geocoder returned status {0}")]
    Status(u16),

    #[error("invalid geocoder response: {0}")]
    InvalidResponse(String),
}

/// Turns an address into coordinates.
///
/// `Ok(None)` means the service answered but knows no such place.
#[async_trait]
pub trait AddressGeocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

#[async_trait]
impl<G: AddressGeocoder + ?Sized> AddressGeocoder for Box<G> {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        (**self).geocode(address).await
    }
}
