//! Plumbing shared by the apis.data.go.kr services.
//!
//! Every response is wrapped in `response.header.resultCode`; anything other
//! than `00` (normal) or `03` (no data) is a provider-side failure.

use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    ForecastError,
    provider::{Feed, truncate_body},
};

const RESULT_OK: &str = "00";
const RESULT_NO_DATA: &str = "03";

/// GET `url` and return the body of a 2xx response.
pub(crate) async fn get_body(
    http: &Client,
    feed: Feed,
    url: &str,
    params: &[(&str, String)],
) -> Result<String, ForecastError> {
    let res = http
        .get(url)
        .query(params)
        .send()
        .await
        .map_err(|source| ForecastError::Transport { feed, source })?;

    let status = res.status();
    let body = res.text().await.map_err(|source| ForecastError::Transport { feed, source })?;

    if !status.is_success() {
        tracing::debug!(%feed, %status, body = %truncate_body(&body), "provider rejected request");
        return Err(ForecastError::HttpStatus { feed, status: status.as_u16() });
    }

    Ok(body)
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: Option<EnvelopeResponse<T>>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeResponse<T> {
    header: Option<EnvelopeHeader>,
    body: Option<EnvelopeBody<T>>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeHeader {
    #[serde(rename = "resultCode")]
    result_code: Option<String>,
    #[serde(rename = "resultMsg", default)]
    result_msg: String,
}

#[derive(Debug, Deserialize)]
struct EnvelopeBody<T> {
    items: Option<Items<T>>,
}

/// `items` is a bare array (air quality), an object with `item` (forecasts),
/// or an empty string when there is nothing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Items<T> {
    Bare(Vec<T>),
    List { item: Option<OneOrMany<T>> },
    Blank(serde::de::IgnoredAny),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Items<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Items::Bare(items) | Items::List { item: Some(OneOrMany::Many(items)) } => items,
            Items::List { item: Some(OneOrMany::One(item)) } => vec![item],
            Items::List { item: None } | Items::Blank(_) => Vec::new(),
        }
    }
}

/// Validate the envelope and pull out the items.
pub(crate) fn unwrap_items<T: DeserializeOwned>(
    feed: Feed,
    body: &str,
) -> Result<Vec<T>, ForecastError> {
    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| {
        ForecastError::malformed(feed, format!("{e}; body: {}", truncate_body(body)))
    })?;

    let response = envelope
        .response
        .ok_or_else(|| ForecastError::malformed(feed, "missing `response`"))?;
    let header = response
        .header
        .ok_or_else(|| ForecastError::malformed(feed, "missing `response.header`"))?;
    let code = header
        .result_code
        .ok_or_else(|| ForecastError::malformed(feed, "missing `header.resultCode`"))?;

    match code.as_str() {
        RESULT_OK => {}
        RESULT_NO_DATA => {
            tracing::debug!(%feed, "provider has no data for this request");
            return Ok(Vec::new());
        }
        _ => {
            return Err(ForecastError::ProviderStatus { feed, code, message: header.result_msg });
        }
    }

    Ok(response.body.and_then(|b| b.items).map(Items::into_vec).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value, json};

    fn body(items: Value) -> String {
        json!({
            "response": {
                "header": { "resultCode": "00", "resultMsg": "NORMAL_SERVICE" },
                "body": { "items": items }
            }
        })
        .to_string()
    }

    fn count(items: Value) -> usize {
        unwrap_items::<Map<String, Value>>(Feed::AirQuality, &body(items)).unwrap().len()
    }

    #[test]
    fn accepts_every_items_shape() {
        assert_eq!(count(json!([{ "a": 1 }, { "a": 2 }])), 2);
        assert_eq!(count(json!({ "item": [{ "a": 1 }, { "a": 2 }, { "a": 3 }] })), 3);
        assert_eq!(count(json!({ "item": { "a": 1 } })), 1);
        assert_eq!(count(json!({})), 0);
        assert_eq!(count(json!("")), 0);
        assert_eq!(count(json!([])), 0);
    }

    #[test]
    fn missing_body_is_empty() {
        let text = json!({ "response": { "header": { "resultCode": "00" } } }).to_string();
        let items: Vec<Map<String, Value>> = unwrap_items(Feed::ShortRange, &text).unwrap();
        assert!(items.is_empty());
    }
}
