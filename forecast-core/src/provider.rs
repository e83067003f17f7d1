use crate::{
    Config, ForecastError,
    model::{
        Address, AirReading, GeoPoint, GridCell, IssuanceSlot, MidSummaries, MidTemperatures,
        RawSample,
    },
    provider::{airkorea::AirKoreaClient, kma::KmaClient, nominatim::NominatimClient},
    region::Region,
    slot::MidIssuance,
};
use async_trait::async_trait;
use serde::Serialize;
use std::{fmt::Debug, time::Duration};

pub mod airkorea;
pub mod kma;
pub mod nominatim;
pub(crate) mod portal;

/// The upstream calls a forecast makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    ShortRange,
    MidTemperature,
    MidLand,
    ReverseGeocode,
    AirQuality,
}

impl Feed {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feed::ShortRange => "short-range forecast",
            Feed::MidTemperature => "mid-range temperature",
            Feed::MidLand => "mid-range outlook",
            Feed::ReverseGeocode => "reverse geocoding",
            Feed::AirQuality => "air quality",
        }
    }

    pub const fn all() -> &'static [Feed] {
        &[
            Feed::ShortRange,
            Feed::MidTemperature,
            Feed::MidLand,
            Feed::ReverseGeocode,
            Feed::AirQuality,
        ]
    }
}

impl std::fmt::Display for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grid-indexed forecast provider.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    /// All samples of one short-range issuance for one grid cell.
    async fn short_range(
        &self,
        grid: GridCell,
        slot: &IssuanceSlot,
    ) -> Result<Vec<RawSample>, ForecastError>;

    async fn mid_temperatures(
        &self,
        region: &Region,
        issuance: &MidIssuance,
    ) -> Result<MidTemperatures, ForecastError>;

    async fn mid_summaries(
        &self,
        region: &Region,
        issuance: &MidIssuance,
    ) -> Result<MidSummaries, ForecastError>;
}

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn reverse(&self, point: GeoPoint) -> Result<Address, ForecastError>;
}

/// Real-time air quality for one province.
#[async_trait]
pub trait AirQualitySource: Send + Sync + Debug {
    /// Latest reading for `sido` (e.g. "경기"), or `None` when no station reported.
    async fn current(&self, sido: &str) -> Result<Option<AirReading>, ForecastError>;
}

/// Construct the forecast provider from config.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastSource>> {
    let service_key = config.service_key().ok_or(ForecastError::MissingServiceKey)?;
    let client = KmaClient::new(service_key, config.timeout())?;
    Ok(Box::new(client))
}

/// Construct the reverse geocoder from config.
pub fn geocoder_from_config(config: &Config) -> anyhow::Result<Box<dyn Geocoder>> {
    let client = NominatimClient::new(config.timeout())?;
    Ok(Box::new(client))
}

/// Construct the air quality provider. Shares the forecast service key.
pub fn air_source_from_config(config: &Config) -> anyhow::Result<Box<dyn AirQualitySource>> {
    let service_key = config.service_key().ok_or(ForecastError::MissingServiceKey)?;
    let client = AirKoreaClient::new(service_key, config.timeout())?;
    Ok(Box::new(client))
}

/// Cut long bodies down for error messages, on a char boundary.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn feed_names_are_distinct() {
        let mut names: Vec<&str> = Feed::all().iter().map(Feed::as_str).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Feed::all().len());
    }

    #[test]
    fn source_from_config_errors_when_missing_key() {
        let cfg = Config::default();
        let err = source_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No service key configured"));
    }

    #[test]
    fn source_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.service_key = Some("KEY".to_string());
        assert!(source_from_config(&cfg).is_ok());
    }

    #[test]
    fn air_source_needs_the_service_key() {
        assert!(air_source_from_config(&Config::default()).is_err());

        let cfg = Config { service_key: Some("KEY".into()), ..Config::default() };
        assert!(air_source_from_config(&cfg).is_ok());
    }

    #[test]
    fn feeds_serialize_in_snake_case() {
        assert_eq!(serde_json::to_value(Feed::AirQuality).unwrap(), "air_quality");
        assert_eq!(serde_json::to_value(Feed::ReverseGeocode).unwrap(), "reverse_geocode");
    }

    #[test]
    fn geocoder_from_config_needs_no_key() {
        assert!(geocoder_from_config(&Config::default()).is_ok());
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "가".repeat(300);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
