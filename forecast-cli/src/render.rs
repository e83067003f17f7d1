//! Plain-text rendering of a [`ForecastReport`].

use std::fmt::{self, Write};

use forecast_core::{
    ForecastReport,
    activity::Activity,
    air::AirSummary,
    model::{DailySummary, HorizonBand, HourlyPoint, TemperatureUnit},
};

const MISSING: &str = "정보 없음";

fn temp(value: Option<f64>, unit: TemperatureUnit) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{:.0}{}", unit.convert(v), unit.symbol()))
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.0}%"))
}

fn reading(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v} {unit}"))
}

fn hour_label(point: &HourlyPoint) -> String {
    if point.is_current { "지금".to_string() } else { format!("{}시", point.hour_label) }
}

fn day_label(day: &DailySummary) -> String {
    match day.band {
        HorizonBand::Today => format!("오늘({})", day.day_label),
        _ => format!("{} {}", day.date.format("%m/%d"), day.day_label),
    }
}

fn list(items: &[&str]) -> String {
    if items.is_empty() { "-".to_string() } else { items.join(", ") }
}

fn activities(items: &[Activity]) -> String {
    items.iter().map(|a| format!("{} {}", a.icon, a.label)).collect::<Vec<_>>().join(", ")
}

fn air(out: &mut impl Write, air: &AirSummary) -> fmt::Result {
    writeln!(out, "\n대기질 ({})", air.sido)?;
    writeln!(out, "  통합대기등급: {}", air.grade_label)?;
    writeln!(out, "  미세먼지(PM10): {}", reading(air.pm10, "㎍/㎥"))?;
    writeln!(out, "  초미세먼지(PM2.5): {}", reading(air.pm25, "㎍/㎥"))?;
    writeln!(out, "  오존(O₃): {}", reading(air.o3, "ppm"))?;
    writeln!(out, "  이산화질소(NO₂): {}", reading(air.no2, "ppm"))?;
    writeln!(out, "  {}", air.tip)
}

pub fn report(out: &mut impl Write, report: &ForecastReport, unit: TemperatureUnit) -> fmt::Result {
    let current = &report.current;
    let condition = current.condition;

    writeln!(out, "📍 {} ({})  발표 {}", report.location.name, report.grid, report.slot)?;
    writeln!(out)?;
    writeln!(
        out,
        "{} {}  {}  체감 {}  습도 {}",
        condition.icon(),
        condition.label(),
        temp(current.temperature, unit),
        temp(current.apparent_temperature, unit),
        percent(current.humidity),
    )?;
    writeln!(out, "최고 {} / 최저 {}", temp(current.day_max, unit), temp(current.day_min, unit))?;
    writeln!(out, "{}", report.advice.comment)?;

    writeln!(out, "\n시간별")?;
    if report.hourly.is_empty() {
        writeln!(out, "  {MISSING}")?;
    }
    for point in &report.hourly {
        writeln!(
            out,
            "  {:>4}  {} {}",
            hour_label(point),
            point.condition.icon(),
            temp(point.temperature, unit)
        )?;
    }

    writeln!(out, "\n주간")?;
    for day in &report.weekly {
        writeln!(
            out,
            "  {}  {} {} / {}",
            day_label(day),
            day.condition.icon(),
            temp(day.high, unit),
            temp(day.low, unit),
        )?;
    }

    let outfit = &report.advice.outfit;
    writeln!(out, "\n옷차림")?;
    writeln!(out, "  기본: {}", list(&outfit.base))?;
    writeln!(out, "  추가: {}", list(&outfit.optional))?;
    writeln!(out, "  {}", outfit.advisory)?;

    let advice = &report.advice.activities;
    writeln!(out, "\n활동")?;
    writeln!(out, "  {} {}", advice.summary, advice.suggestion)?;
    if !advice.indoor.is_empty() {
        writeln!(out, "  실내: {}", activities(&advice.indoor))?;
    }
    if !advice.outdoor.is_empty() {
        writeln!(out, "  실외: {}", activities(&advice.outdoor))?;
    }

    air(out, &report.air)?;

    if !report.degraded.is_empty() {
        writeln!(out, "\n일부 정보를 가져오지 못했습니다")?;
        for degraded in &report.degraded {
            writeln!(out, "  {}: {}", degraded.feed, degraded.reason)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use forecast_core::{
        DegradedFeed, Feed, FeedBatches, ForecastQuery, RawSample, assemble,
        model::{AirReading, Category, SEOUL_CITY_HALL},
        region::RegionTable,
    };

    fn render_batches(batches: FeedBatches, unit: TemperatureUnit) -> String {
        let now = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(14, 30, 0).unwrap();
        let query = ForecastQuery::new(SEOUL_CITY_HALL, now);
        let mut text = String::new();
        report(&mut text, &assemble(&query, &batches, &RegionTable::default()), unit).unwrap();
        text
    }

    fn render_at(samples: Vec<RawSample>) -> String {
        render_batches(FeedBatches { samples, ..FeedBatches::default() }, TemperatureUnit::Celsius)
    }

    #[test]
    fn missing_values_say_so() {
        let text = render_at(Vec::new());
        assert!(text.contains("서울특별시"));
        assert!(text.contains("최고 정보 없음 / 최저 정보 없음"));
        assert!(text.contains("대기질 (서울)"));
        assert!(text.contains("통합대기등급: 정보없음"));
        assert!(!text.contains("가져오지 못했습니다"));
    }

    #[test]
    fn current_hour_is_labelled_now() {
        let text = render_at(vec![
            RawSample::new(Category::Temp, "20240501", "1400", "21"),
            RawSample::new(Category::Temp, "20240501", "1500", "22"),
        ]);
        assert!(text.contains("지금"));
        assert!(text.contains("15시"));
        assert!(text.contains("21°C"));
    }

    #[test]
    fn fahrenheit_preference_converts_temperatures() {
        let batches = FeedBatches {
            samples: vec![RawSample::new(Category::Temp, "20240501", "1400", "20")],
            ..FeedBatches::default()
        };
        let text = render_batches(batches, TemperatureUnit::Fahrenheit);
        assert!(text.contains("68°F"));
        assert!(!text.contains("20°C"));
    }

    #[test]
    fn air_quality_and_degraded_feeds_are_listed() {
        let batches = FeedBatches {
            air: Some(AirReading {
                khai_grade: Some("1".into()),
                pm10: Some(18.0),
                ..AirReading::default()
            }),
            degraded: vec![DegradedFeed {
                feed: Feed::ReverseGeocode,
                reason: "reverse geocoding request failed with HTTP status 429".into(),
            }],
            ..FeedBatches::default()
        };
        let text = render_batches(batches, TemperatureUnit::Celsius);

        assert!(text.contains("통합대기등급: 좋음"));
        assert!(text.contains("미세먼지(PM10): 18 ㎍/㎥"));
        assert!(text.contains("초미세먼지(PM2.5): 정보 없음"));
        assert!(text.contains("reverse geocoding: reverse geocoding request failed with HTTP status 429"));
    }
}
