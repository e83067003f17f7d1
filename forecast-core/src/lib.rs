//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Clients for the national forecast and air quality services and a
//!   reverse geocoder
//! - The pure pipeline that turns raw samples into current, hourly and
//!   weekly views plus outfit and activity advice
//!
//! Everything except [`engine::ForecastService::fetch`] is synchronous and
//! deterministic for a given clock value.

pub mod activity;
pub mod air;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod horizon;
pub mod merge;
pub mod metrics;
pub mod model;
pub mod outfit;
pub mod provider;
pub mod region;
pub mod slot;

pub use config::Config;
pub use engine::{DegradedFeed, FeedBatches, ForecastQuery, ForecastReport, ForecastService, assemble};
pub use error::ForecastError;
pub use model::{Condition, GeoPoint, GridCell, RawSample};
pub use provider::{AirQualitySource, Feed, ForecastSource, Geocoder};
