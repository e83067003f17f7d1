//! Real-time province air quality from the AirKorea service on
//! apis.data.go.kr.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::{
    ForecastError,
    model::AirReading,
    provider::{AirQualitySource, Feed, portal},
};

pub const DEFAULT_BASE_URL: &str = "https://apis.data.go.kr/B552584";

const SIDO_MEASUREMENT_PATH: &str = "/ArpltnInforInqireSvc/getCtprvnRltmMesureDnsty";

#[derive(Debug, Clone)]
pub struct AirKoreaClient {
    service_key: String,
    base_url: String,
    http: Client,
}

impl AirKoreaClient {
    pub fn new(service_key: String, timeout: Duration) -> reqwest::Result<Self> {
        Self::with_base_url(service_key, DEFAULT_BASE_URL, timeout)
    }

    pub fn with_base_url(
        service_key: String,
        base_url: &str,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { service_key, base_url: base_url.trim_end_matches('/').to_string(), http })
    }
}

#[async_trait]
impl AirQualitySource for AirKoreaClient {
    async fn current(&self, sido: &str) -> Result<Option<AirReading>, ForecastError> {
        let url = format!("{}{}", self.base_url, SIDO_MEASUREMENT_PATH);
        let params = [
            ("serviceKey", self.service_key.clone()),
            ("sidoName", sido.to_string()),
            ("returnType", "json".to_string()),
            ("numOfRows", "1".to_string()),
            ("pageNo", "1".to_string()),
            ("ver", "1.3".to_string()),
        ];
        let body = portal::get_body(&self.http, Feed::AirQuality, &url, &params).await?;
        decode_air_quality(&body)
    }
}

/// Decode the first station of a province listing. No stations is `None`.
pub fn decode_air_quality(body: &str) -> Result<Option<AirReading>, ForecastError> {
    let items: Vec<Map<String, Value>> = portal::unwrap_items(Feed::AirQuality, body)?;

    let Some(item) = items.into_iter().next() else {
        return Ok(None);
    };

    let reading = AirReading {
        station: text(&item, "stationName"),
        data_time: text(&item, "dataTime"),
        khai_grade: text(&item, "khaiGrade"),
        pm10: measurement(&item, "pm10Value"),
        pm25: measurement(&item, "pm25Value"),
        o3: measurement(&item, "o3Value"),
        no2: measurement(&item, "no2Value"),
    };
    tracing::debug!(?reading, "decoded air quality");
    Ok(Some(reading))
}

fn text(item: &Map<String, Value>, field: &str) -> Option<String> {
    match item.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Offline stations report `-` instead of a number.
fn measurement(item: &Map<String, Value>, field: &str) -> Option<f64> {
    match item.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
