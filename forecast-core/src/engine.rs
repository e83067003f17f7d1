//! Ties the pure pipeline to the provider clients.
//!
//! [`ForecastService::fetch`] is the only place that talks to the network;
//! [`assemble`] turns whatever came back into a report and never fails.
//!
//! Only the short-range feed is required. Any failure of the other feeds is
//! recorded in [`FeedBatches::degraded`] and the report is built without them.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    Config, ForecastError,
    activity::{ActivityAdvice, suggest},
    air::{AirSummary, sido_for, summarize},
    grid::project,
    horizon::{build_hourly, build_weekly, current_point},
    merge::{merge, resolve_current},
    model::{
        Address, AirReading, DailySummary, GeoPoint, GridCell, HourlyPoint, IssuanceSlot, MidSummaries,
        MidTemperatures, RawSample, ResolvedCurrent,
    },
    outfit::{Recommendation, condition_comment, recommend},
    provider::{
        AirQualitySource, Feed, ForecastSource, Geocoder, air_source_from_config,
        geocoder_from_config, source_from_config,
    },
    region::{Region, RegionTable},
    slot::{MidIssuance, select_mid_issuance, select_slot},
};

/// Everything derived from the location and clock before any request is made.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastQuery {
    pub point: GeoPoint,
    pub now: NaiveDateTime,
    pub grid: GridCell,
    pub slot: IssuanceSlot,
    pub mid_issuance: MidIssuance,
}

impl ForecastQuery {
    /// `now` is provider-local wall-clock time (KST).
    pub fn new(point: GeoPoint, now: NaiveDateTime) -> Self {
        Self {
            point,
            now,
            grid: project(point),
            slot: select_slot(now),
            mid_issuance: select_mid_issuance(now),
        }
    }
}

/// An optional feed that failed, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DegradedFeed {
    pub feed: Feed,
    pub reason: String,
}

/// Raw upstream results. `None` means the feed was unavailable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedBatches {
    pub samples: Vec<RawSample>,
    pub mid_temperatures: Option<MidTemperatures>,
    pub mid_summaries: Option<MidSummaries>,
    pub address: Option<Address>,
    pub air: Option<AirReading>,
    /// Optional feeds that failed, in request order.
    pub degraded: Vec<DegradedFeed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advice {
    pub outfit: Recommendation,
    pub activities: ActivityAdvice,
    pub comment: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    pub location: Region,
    pub grid: GridCell,
    pub slot: IssuanceSlot,
    pub mid_issuance: MidIssuance,
    pub current: ResolvedCurrent,
    pub hourly: Vec<HourlyPoint>,
    pub weekly: Vec<DailySummary>,
    pub advice: Advice,
    pub air: AirSummary,
    pub degraded: Vec<DegradedFeed>,
}

/// Build the report from already-fetched batches.
pub fn assemble(query: &ForecastQuery, batches: &FeedBatches, regions: &RegionTable) -> ForecastReport {
    let location = regions.resolve(batches.address.as_ref()).clone();
    let merged = merge(&batches.samples);

    let hourly = build_hourly(&merged, &query.slot, query.now);
    let condition = current_point(&hourly).map(|p| p.condition).unwrap_or_default();
    let current = resolve_current(&merged, &query.slot, condition);

    let weekly = build_weekly(
        query.now.date(),
        &current,
        &merged,
        batches.mid_temperatures.as_ref(),
        batches.mid_summaries.as_ref(),
    );

    let advice = Advice {
        outfit: recommend(current.temperature, current.apparent_temperature, condition),
        activities: suggest(condition),
        comment: condition_comment(condition),
    };

    let air = summarize(sido_for(batches.address.as_ref()), batches.air.as_ref());

    ForecastReport {
        location,
        grid: query.grid,
        slot: query.slot,
        mid_issuance: query.mid_issuance,
        current,
        hourly,
        weekly,
        advice,
        air,
        degraded: batches.degraded.clone(),
    }
}

#[derive(Debug)]
pub struct ForecastService {
    source: Box<dyn ForecastSource>,
    geocoder: Box<dyn Geocoder>,
    air: Option<Box<dyn AirQualitySource>>,
    regions: RegionTable,
}

impl ForecastService {
    pub fn new(
        source: Box<dyn ForecastSource>,
        geocoder: Box<dyn Geocoder>,
        regions: RegionTable,
    ) -> Self {
        Self { source, geocoder, air: None, regions }
    }

    /// Also fetch province air quality for every forecast.
    pub fn with_air_quality(mut self, air: Box<dyn AirQualitySource>) -> Self {
        self.air = Some(air);
        self
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let service = Self::new(
            source_from_config(config)?,
            geocoder_from_config(config)?,
            config.region_table(),
        );
        Ok(service.with_air_quality(air_source_from_config(config)?))
    }

    pub fn regions(&self) -> &RegionTable {
        &self.regions
    }

    /// Fetch all feeds for `query`.
    ///
    /// Geocoding and the short-range feed run together; the mid-range and air
    /// quality feeds follow once the region is known.
    pub async fn fetch(&self, query: &ForecastQuery) -> Result<FeedBatches, ForecastError> {
        tracing::info!(grid = %query.grid, slot = %query.slot, "fetching forecast");
        let mut degraded = Vec::new();

        let (address, samples) = tokio::join!(
            self.geocoder.reverse(query.point),
            self.source.short_range(query.grid, &query.slot),
        );
        let samples = samples?;
        let address = degrade(Feed::ReverseGeocode, address, &mut degraded);

        let region = self.regions.resolve(address.as_ref());
        let sido = sido_for(address.as_ref());
        tracing::info!(region = %region.name, id = %region.id, sido, "resolved region");

        let air = async {
            match &self.air {
                Some(air) => Some(air.current(sido).await),
                None => None,
            }
        };
        let (mid_temperatures, mid_summaries, air) = tokio::join!(
            self.source.mid_temperatures(region, &query.mid_issuance),
            self.source.mid_summaries(region, &query.mid_issuance),
            air,
        );

        let mid_temperatures = degrade(Feed::MidTemperature, mid_temperatures, &mut degraded);
        let mid_summaries = degrade(Feed::MidLand, mid_summaries, &mut degraded);
        let air = air.and_then(|result| degrade(Feed::AirQuality, result, &mut degraded)).flatten();

        Ok(FeedBatches { samples, mid_temperatures, mid_summaries, address, air, degraded })
    }

    /// Full report for `point` at `now`. Supplying `prefetched` skips the network.
    pub async fn forecast(
        &self,
        point: GeoPoint,
        now: NaiveDateTime,
        prefetched: Option<FeedBatches>,
    ) -> Result<ForecastReport, ForecastError> {
        let query = ForecastQuery::new(point, now);
        let batches = match prefetched {
            Some(batches) => batches,
            None => self.fetch(&query).await?,
        };
        Ok(assemble(&query, &batches, &self.regions))
    }
}

/// Optional feeds never fail the forecast. The failure is logged and kept
/// so the report can say what is missing.
fn degrade<T>(
    feed: Feed,
    result: Result<T, ForecastError>,
    degraded: &mut Vec<DegradedFeed>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(%feed, error = %err, "optional feed unavailable, continuing without it");
            degraded.push(DegradedFeed { feed, reason: err.to_string() });
            None
        }
    }
}
