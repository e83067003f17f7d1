//! Hourly and weekly views built from the merged slot table.
//!
//! The weekly view blends three horizons, each with its own source and its
//! own missing-data story:
//!
//! | offset | high / low | condition |
//! |---|---|---|
//! | 0 | first day-max / day-min of the feed | local-noon slot |
//! | 1..=3 | day-max / day-min for that date, else min/max of hourly temps | local-noon slot |
//! | 4..=7 | mid-range numeric feed (`0` = no data) | mid-range text feed |

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike};
use std::{collections::BTreeMap, ops::RangeInclusive};

use crate::{
    merge::{MergedSamples, TimeSlotRecord},
    model::{
        Category, Condition, DailySummary, HorizonBand, HourlyPoint, IssuanceSlot,
        MidSummaries, MidTemperatures, ResolvedCurrent, SlotKey,
    },
};

pub const HOURLY_LEN: usize = 24;
pub const WEEKLY_LEN: u64 = 8;

const NEAR_RANGE: RangeInclusive<u64> = 1..=3;

/// The mid-range numeric feed's day index runs one ahead of the weekly offset.
const MID_TEMPERATURE_INDEX_SHIFT: u64 = 1;

const NOON: &str = "1200";

/// Precipitation-type code meaning "no precipitation".
const PRECIP_NONE: &str = "0";

const WEEKDAY_LABELS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

/// Checked in order, first substring match wins.
const SUMMARY_KEYWORDS: [(&str, Condition); 7] = [
    ("맑음", Condition::Clear),
    ("구름많음", Condition::PartlyCloudy),
    ("흐림", Condition::Cloudy),
    ("비", Condition::Rain),
    ("소나기", Condition::Rain),
    ("눈", Condition::Snow),
    ("번개", Condition::Thunder),
];

/// Display condition for one slot. Any precipitation wins over sky state.
pub fn slot_condition(record: &TimeSlotRecord) -> Condition {
    match record.get(Category::PrecipType).map(str::trim) {
        Some(code) if code != PRECIP_NONE => Condition::Rain,
        _ => sky_condition(record.get(Category::SkyState)),
    }
}

fn sky_condition(code: Option<&str>) -> Condition {
    match code.map(str::trim) {
        Some("3") => Condition::PartlyCloudy,
        Some("4") => Condition::Cloudy,
        _ => Condition::Clear,
    }
}

/// Classify a mid-range text summary such as `"구름많고 비"`.
pub fn classify_summary(summary: &str) -> Condition {
    SUMMARY_KEYWORDS
        .iter()
        .find(|(keyword, _)| summary.contains(keyword))
        .map(|&(_, condition)| condition)
        .unwrap_or(Condition::PartlyCloudy)
}

/// Up to 24 slots starting at the first key whose time of day is at or after
/// the current hour. No wraparound: fewer remaining slots give a shorter list.
pub fn build_hourly(
    merged: &MergedSamples,
    slot: &IssuanceSlot,
    now: NaiveDateTime,
) -> Vec<HourlyPoint> {
    let now_hour = format!("{:02}00", now.hour());
    let current_key = slot.key();

    let start = merged
        .slots()
        .keys()
        .position(|key| key.time_part() >= now_hour.as_str())
        .unwrap_or(0);

    merged
        .slots()
        .iter()
        .skip(start)
        .take(HOURLY_LEN)
        .map(|(key, record)| HourlyPoint {
            key: key.clone(),
            hour_label: key.hour_label().to_string(),
            temperature: record.number(Category::Temp),
            condition: slot_condition(record),
            is_current: *key == current_key,
        })
        .collect()
}

/// The point marked current, else the first one.
pub fn current_point(hourly: &[HourlyPoint]) -> Option<&HourlyPoint> {
    hourly.iter().find(|p| p.is_current).or_else(|| hourly.first())
}

/// Eight daily rows starting at `today`.
pub fn build_weekly(
    today: NaiveDate,
    current: &ResolvedCurrent,
    merged: &MergedSamples,
    mid_temperatures: Option<&MidTemperatures>,
    mid_summaries: Option<&MidSummaries>,
) -> Vec<DailySummary> {
    (0..WEEKLY_LEN)
        .filter_map(|offset| {
            let date = today.checked_add_days(Days::new(offset))?;
            let date_key = date.format("%Y%m%d").to_string();

            let (high, low, condition, band) = if offset == 0 {
                (
                    current.day_max,
                    current.day_min,
                    noon_condition(merged, &date_key),
                    HorizonBand::Today,
                )
            } else if NEAR_RANGE.contains(&offset) {
                let (high, low) = near_range_extremes(merged, &date_key);
                (high, low, noon_condition(merged, &date_key), HorizonBand::NearRange)
            } else {
                let index = offset + MID_TEMPERATURE_INDEX_SHIFT;
                let reading = |table: Option<&BTreeMap<u8, f64>>| {
                    let index = u8::try_from(index).ok()?;
                    table?.get(&index).copied().filter(|v| *v != 0.0)
                };
                let high = reading(mid_temperatures.map(|m| &m.highs));
                let low = reading(mid_temperatures.map(|m| &m.lows));
                let summary = u8::try_from(offset)
                    .ok()
                    .and_then(|i| mid_summaries?.by_index.get(&i))
                    .map(String::as_str)
                    .unwrap_or("");
                (high, low, classify_summary(summary), HorizonBand::MidRange)
            };

            Some(DailySummary {
                date,
                day_label: WEEKDAY_LABELS[date.weekday().num_days_from_sunday() as usize],
                high,
                low,
                condition,
                band,
            })
        })
        .collect()
}

/// Condition at local noon of `date_key`, clear when that slot is absent.
fn noon_condition(merged: &MergedSamples, date_key: &str) -> Condition {
    merged
        .slot(&SlotKey::new(date_key, NOON))
        .map(slot_condition)
        .unwrap_or_default()
}

/// Exact day-max/day-min when both exist, else the span of hourly temperatures.
fn near_range_extremes(merged: &MergedSamples, date_key: &str) -> (Option<f64>, Option<f64>) {
    if let (Some(high), Some(low)) = (merged.day_max_on(date_key), merged.day_min_on(date_key)) {
        return (Some(high), Some(low));
    }

    merged
        .temperatures_on(date_key)
        .fold(None, |acc: Option<(f64, f64)>, t| match acc {
            None => Some((t, t)),
            Some((hi, lo)) => Some((hi.max(t), lo.min(t))),
        })
        .map_or((None, None), |(hi, lo)| (Some(hi), Some(lo)))
}
