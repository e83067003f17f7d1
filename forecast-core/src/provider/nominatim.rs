//! Reverse geocoding through Nominatim (OpenStreetMap). No key required.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    ForecastError,
    model::{Address, GeoPoint},
    provider::{Feed, Geocoder, truncate_body},
};

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const USER_AGENT: &str = concat!("forecast-cli/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    state: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    county: Option<String>,
}

impl From<NominatimAddress> for Address {
    fn from(addr: NominatimAddress) -> Self {
        Address {
            state: addr.state,
            city: addr.city,
            town: addr.town,
            village: addr.village,
            county: addr.county,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    base_url: String,
    http: Client,
}

impl NominatimClient {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).user_agent(USER_AGENT).build()?;
        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), http })
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn reverse(&self, point: GeoPoint) -> Result<Address, ForecastError> {
        let feed = Feed::ReverseGeocode;
        let url = format!("{}/reverse", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("format", "json".to_string()),
                ("lat", point.latitude.to_string()),
                ("lon", point.longitude.to_string()),
                ("accept-language", "ko".to_string()),
            ])
            .send()
            .await
            .map_err(|source| ForecastError::Transport { feed, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| ForecastError::Transport { feed, source })?;

        if !status.is_success() {
            tracing::debug!(%status, body = %truncate_body(&body), "reverse geocode rejected");
            return Err(ForecastError::HttpStatus { feed, status: status.as_u16() });
        }

        decode_reverse(&body)
    }
}

/// A response without an `address` object (open sea, for instance) is an
/// empty address, not an error.
pub fn decode_reverse(body: &str) -> Result<Address, ForecastError> {
    let parsed: NominatimResponse = serde_json::from_str(body).map_err(|e| {
        ForecastError::malformed(Feed::ReverseGeocode, format!("{e}; body: {}", truncate_body(body)))
    })?;

    let address = parsed.address.map(Address::from).unwrap_or_default();
    tracing::debug!(?address, "reverse geocoded");
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_address_components() {
        let body = r#"{
            "place_id": 1,
            "display_name": "권선구, 수원시, 경기도, 대한민국",
            "address": { "city": "수원시", "borough": "권선구", "state": "경기도", "country_code": "kr" }
        }"#;

        let address = decode_reverse(body).unwrap();
        assert_eq!(address.state.as_deref(), Some("경기도"));
        assert_eq!(address.city.as_deref(), Some("수원시"));
        assert_eq!(address.town, None);
        assert_eq!(address.county, None);
    }

    #[test]
    fn missing_address_is_empty() {
        let address = decode_reverse(r#"{"error":"Unable to geocode"}"#).unwrap();
        assert_eq!(address, Address::default());
    }

    #[test]
    fn garbage_is_malformed() {
        let err = decode_reverse("<html>").unwrap_err();
        assert_eq!(err.feed(), Some(Feed::ReverseGeocode));
        assert!(err.is_malformed());
    }
}
