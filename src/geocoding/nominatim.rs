//! Nominatim search client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{AddressGeocoder, GeocodeError};
use crate::config::NominatimConfig;
use crate::models::Coordinates;

/// Single-result address lookups against a Nominatim instance
pub struct NominatimClient {
    client: Client,
    search_url: Url,
}

/// Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct SearchHit {
    lon: String,
    lat: String,
}

impl NominatimClient {
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let search_url = format!("{}/search", config.base_url.trim_end_matches('/'));
        let search_url = Url::parse(&search_url)
            .map_err(|e| GeocodeError::InvalidUrl(format!("{}: {}", search_url, e)))?;

        Ok(Self { client, search_url })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}

#[async_trait]
impl AddressGeocoder for NominatimClient {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("format", "json")
            .append_pair("limit", "1");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| {
                warn!("Nominatim request for '{}' failed: {}", address, e);
                e
            })?;

        if !response.status().is_success() {
            warn!(
                "Nominatim query for '{}' failed with status {}",
                address,
                response.status()
            );
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let hits: Vec<SearchHit> = response.json().await?;
        let coords = hits.first().map(parse_hit).transpose()?;

        debug!("Nominatim '{}' -> {:?}", address, coords);
        Ok(coords)
    }
}

fn parse_hit(hit: &SearchHit) -> Result<Coordinates, GeocodeError> {
    let lng = hit
        .lon
        .parse::<f64>()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad lon '{}'", hit.lon)))?;
    let lat = hit
        .lat
        .parse::<f64>()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad lat '{}'", hit.lat)))?;
    Ok(Coordinates::new(lng, lat))
}
