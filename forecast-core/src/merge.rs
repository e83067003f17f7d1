//! Folds the flat short-range sample list into a time-keyed table.
//!
//! Two consumers read the result differently: the timeline wants every value
//! at its own slot, while the "current" view wants the first value of a
//! category in feed order when the queried slot is missing. [`MergedSamples`]
//! keeps both.

use std::collections::BTreeMap;

use crate::{
    metrics::apparent_temp,
    model::{Category, Condition, IssuanceSlot, RawSample, ResolvedCurrent, SlotKey},
};

/// Category values observed at one forecast instant. Any subset may be present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSlotRecord {
    values: BTreeMap<Category, String>,
}

impl TimeSlotRecord {
    pub fn get(&self, category: Category) -> Option<&str> {
        self.values.get(&category).map(String::as_str)
    }

    pub fn number(&self, category: Category) -> Option<f64> {
        self.get(category).and_then(parse_number)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// First day-max / day-min seen for one forecast date.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct DayExtremes {
    max: Option<f64>,
    min: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedSamples {
    slots: BTreeMap<SlotKey, TimeSlotRecord>,
    first_values: BTreeMap<Category, String>,
    day_extremes: BTreeMap<String, DayExtremes>,
}

/// Fold `samples` in input order.
///
/// Within a slot a later sample of the same category replaces an earlier one.
/// The per-category and per-date extremum lookups are first-wins.
pub fn merge(samples: &[RawSample]) -> MergedSamples {
    let mut merged = MergedSamples::default();

    for sample in samples {
        merged
            .slots
            .entry(sample.key())
            .or_default()
            .values
            .insert(sample.category, sample.value.clone());

        merged
            .first_values
            .entry(sample.category)
            .or_insert_with(|| sample.value.clone());

        let extremum = match sample.category {
            Category::DayMax | Category::DayMin => parse_number(&sample.value),
            _ => continue,
        };
        let Some(value) = extremum else {
            tracing::debug!(?sample, "skipping unparseable extremum");
            continue;
        };

        let day = merged.day_extremes.entry(sample.forecast_date.clone()).or_default();
        let target = if sample.category == Category::DayMax { &mut day.max } else { &mut day.min };
        if target.is_none() {
            *target = Some(value);
        }
    }

    tracing::debug!(samples = samples.len(), slots = merged.slots.len(), "merged samples");
    merged
}

impl MergedSamples {
    pub fn slots(&self) -> &BTreeMap<SlotKey, TimeSlotRecord> {
        &self.slots
    }

    pub fn slot(&self, key: &SlotKey) -> Option<&TimeSlotRecord> {
        self.slots.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// First value of `category` anywhere in the input.
    pub fn first(&self, category: Category) -> Option<f64> {
        self.first_values.get(&category).and_then(|v| parse_number(v))
    }

    /// First day-max sample forecast for `date` (`YYYYMMDD`).
    pub fn day_max_on(&self, date: &str) -> Option<f64> {
        self.day_extremes.get(date).and_then(|d| d.max)
    }

    /// First day-min sample forecast for `date` (`YYYYMMDD`).
    pub fn day_min_on(&self, date: &str) -> Option<f64> {
        self.day_extremes.get(date).and_then(|d| d.min)
    }

    /// Every hourly temperature forecast for `date` (`YYYYMMDD`), in time order.
    pub fn temperatures_on<'a>(&'a self, date: &'a str) -> impl Iterator<Item = f64> + 'a {
        self.slots
            .iter()
            .filter(move |(key, _)| key.date_part() == date)
            .filter_map(|(_, record)| record.number(Category::Temp))
    }
}

/// Resolve the "now" view for `slot`.
///
/// Temperature, humidity and apparent temperature prefer the value at the
/// exact issuance slot and fall back to the first value of that category in
/// feed order. A missing apparent temperature is derived from temperature and
/// humidity. Day max/min are always the first occurrence.
pub fn resolve_current(
    merged: &MergedSamples,
    slot: &IssuanceSlot,
    condition: Condition,
) -> ResolvedCurrent {
    let key = slot.key();
    let at_slot_or_first = |category| {
        merged
            .slot(&key)
            .and_then(|record| record.number(category))
            .or_else(|| merged.first(category))
    };

    let temperature = at_slot_or_first(Category::Temp);
    let humidity = at_slot_or_first(Category::Humidity);
    let apparent_temperature = at_slot_or_first(Category::ApparentTemp).or_else(|| {
        let (t, rh) = (temperature?, humidity?);
        Some(f64::from(apparent_temp(t, rh)))
    });

    ResolvedCurrent {
        temperature,
        humidity,
        apparent_temperature,
        day_max: merged.first(Category::DayMax),
        day_min: merged.first(Category::DayMin),
        condition,
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
