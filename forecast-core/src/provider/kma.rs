//! Client for the public short-range and mid-range forecast services on
//! apis.data.go.kr.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::{
    ForecastError,
    model::{Category, GridCell, IssuanceSlot, MidSummaries, MidTemperatures, RawSample},
    provider::{Feed, ForecastSource, portal},
    region::Region,
    slot::MidIssuance,
};

pub const DEFAULT_BASE_URL: &str = "https://apis.data.go.kr/1360000";

const SHORT_RANGE_PATH: &str = "/VilageFcstInfoService_2.0/getVilageFcst";
const MID_TEMPERATURE_PATH: &str = "/MidFcstInfoService/getMidTa";
const MID_LAND_PATH: &str = "/MidFcstInfoService/getMidLandFcst";

/// One issuance for one cell is well under this many rows.
const SHORT_RANGE_ROWS: &str = "1000";

#[derive(Debug, Clone)]
pub struct KmaClient {
    service_key: String,
    base_url: String,
    http: Client,
}

impl KmaClient {
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

    async fn fetch(&self, feed: Feed, path: &str, params: &[(&str, String)]) -> Result<String, ForecastError> {
        let url = format!("{}{}", self.base_url, path);
        let mut query = vec![
            ("serviceKey", self.service_key.clone()),
            ("pageNo", "1".to_string()),
            ("dataType", "JSON".to_string()),
        ];
        query.extend_from_slice(params);
        portal::get_body(&self.http, feed, &url, &query).await
    }
}

#[async_trait]
impl ForecastSource for KmaClient {
    async fn short_range(
        &self,
        grid: GridCell,
        slot: &IssuanceSlot,
    ) -> Result<Vec<RawSample>, ForecastError> {
        let params = [
            ("numOfRows", SHORT_RANGE_ROWS.to_string()),
            ("base_date", slot.base_date()),
            ("base_time", slot.base_time()),
            ("nx", grid.x.to_string()),
            ("ny", grid.y.to_string()),
        ];
        let body = self.fetch(Feed::ShortRange, SHORT_RANGE_PATH, &params).await?;
        decode_short_range(&body)
    }

    async fn mid_temperatures(
        &self,
        region: &Region,
        issuance: &MidIssuance,
    ) -> Result<MidTemperatures, ForecastError> {
        let params = [
            ("numOfRows", "10".to_string()),
            ("regId", region.id.clone()),
            ("tmFc", issuance.tm_fc()),
        ];
        let body = self.fetch(Feed::MidTemperature, MID_TEMPERATURE_PATH, &params).await?;
        decode_mid_temperatures(&body)
    }

    async fn mid_summaries(
        &self,
        region: &Region,
        issuance: &MidIssuance,
    ) -> Result<MidSummaries, ForecastError> {
        let params = [
            ("numOfRows", "10".to_string()),
            ("regId", region.land_id.clone()),
            ("tmFc", issuance.tm_fc()),
        ];
        let body = self.fetch(Feed::MidLand, MID_LAND_PATH, &params).await?;
        decode_mid_summaries(&body)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShortRangeItem {
    category: String,
    fcst_date: String,
    fcst_time: String,
    #[serde(deserialize_with = "string_or_number")]
    fcst_value: String,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("expected string or number, got {other}"))),
    }
}

/// Decode a short-range response. Categories the engine does not use are dropped.
pub fn decode_short_range(body: &str) -> Result<Vec<RawSample>, ForecastError> {
    let items: Vec<ShortRangeItem> = portal::unwrap_items(Feed::ShortRange, body)?;
    let total = items.len();

    let samples: Vec<RawSample> = items
        .into_iter()
        .filter_map(|item| {
            Some(RawSample {
                category: Category::from_code(&item.category)?,
                forecast_date: item.fcst_date,
                forecast_time: item.fcst_time,
                value: item.fcst_value,
            })
        })
        .collect();

    tracing::debug!(total, kept = samples.len(), "decoded short-range samples");
    Ok(samples)
}

/// Decode a mid-range temperature response (`taMinN` / `taMaxN` fields).
pub fn decode_mid_temperatures(body: &str) -> Result<MidTemperatures, ForecastError> {
    let items: Vec<Map<String, Value>> = portal::unwrap_items(Feed::MidTemperature, body)?;
    let mut temps = MidTemperatures::default();

    let Some(item) = items.into_iter().next() else {
        return Ok(temps);
    };

    for (field, value) in &item {
        let Some(reading) = numeric(value) else { continue };
        if let Some(index) = day_index(field, "taMin", "") {
            temps.lows.insert(index, reading);
        } else if let Some(index) = day_index(field, "taMax", "") {
            temps.highs.insert(index, reading);
        }
    }

    Ok(temps)
}

/// Decode a mid-range land outlook (`wfNPm` for near days, `wfN` beyond).
pub fn decode_mid_summaries(body: &str) -> Result<MidSummaries, ForecastError> {
    let items: Vec<Map<String, Value>> = portal::unwrap_items(Feed::MidLand, body)?;
    let mut summaries = MidSummaries::default();

    let Some(item) = items.into_iter().next() else {
        return Ok(summaries);
    };

    for (field, value) in &item {
        let Value::String(text) = value else { continue };
        let index = day_index(field, "wf", "Pm").or_else(|| day_index(field, "wf", ""));
        if let Some(index) = index {
            summaries.by_index.insert(index, text.clone());
        }
    }

    Ok(summaries)
}

/// `taMin5` with prefix `taMin` gives 5; `wf4Pm` with prefix `wf`, suffix `Pm` gives 4.
fn day_index(field: &str, prefix: &str, suffix: &str) -> Option<u8> {
    let rest = field.strip_prefix(prefix)?.strip_suffix(suffix)?;
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
