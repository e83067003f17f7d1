//! Decoded provider payloads run through the whole pure pipeline.

use chrono::{NaiveDate, NaiveDateTime};
use forecast_core::{
    Condition, FeedBatches, ForecastQuery, assemble,
    model::{Address, HorizonBand, SEOUL_CITY_HALL},
    provider::{
        airkorea::decode_air_quality,
        kma::{decode_mid_summaries, decode_mid_temperatures, decode_short_range},
    },
    region::RegionTable,
};
use serde_json::{Value, json};

fn at(hh: u32, mm: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 12, 2).unwrap().and_hms_opt(hh, mm, 0).unwrap()
}

fn envelope(items: Value) -> String {
    json!({
        "response": {
            "header": { "resultCode": "00", "resultMsg": "NORMAL_SERVICE" },
            "body": { "dataType": "JSON", "items": { "item": items } }
        }
    })
    .to_string()
}

fn item(category: &str, date: &str, time: &str, value: &str) -> Value {
    json!({ "category": category, "fcstDate": date, "fcstTime": time, "fcstValue": value })
}

/// A cold, snowy December afternoon in Seoul followed by three days of hourly data.
fn short_range_payload() -> String {
    let mut items = vec![
        item("TMN", "20241202", "0600", "-6"),
        item("TMX", "20241202", "1500", "1"),
        item("SKY", "20241202", "1200", "4"),
        item("PTY", "20241202", "1200", "3"),
    ];
    for hour in 14..24 {
        let time = format!("{hour:02}00");
        items.push(item("TMP", "20241202", &time, "0"));
        items.push(item("REH", "20241202", &time, "70"));
        items.push(item("WCT", "20241202", &time, "-4"));
        items.push(item("SKY", "20241202", &time, "4"));
        items.push(item("PTY", "20241202", &time, "3"));
    }
    for (date, temps) in [
        ("20241203", [-5, -1, 2]),
        ("20241204", [-3, 1, 4]),
        ("20241205", [-2, 3, 6]),
    ] {
        for (time, t) in ["0600", "1200", "1800"].iter().zip(temps) {
            items.push(item("TMP", date, time, &t.to_string()));
            items.push(item("SKY", date, time, "1"));
            items.push(item("PTY", date, time, "0"));
        }
    }
    items.push(item("TMN", "20241203", "0600", "-7"));
    items.push(item("TMX", "20241203", "1500", "3"));
    envelope(Value::Array(items))
}

fn batches() -> FeedBatches {
    let mid_ta = envelope(json!({ "regId": "11B10101",
        "taMin5": -4, "taMax5": 5, "taMin6": 0, "taMax6": 0,
        "taMin7": -2, "taMax7": 6, "taMin8": -1, "taMax8": 7 }));
    let mid_land = envelope(json!([{ "regId": "11B00000",
        "wf4Pm": "맑음", "wf5Pm": "흐리고 눈", "wf6Pm": "구름많음", "wf7Pm": "흐리고 비/눈" }]));
    let air = json!({ "response": {
        "header": { "resultCode": "00", "resultMsg": "NORMAL_SERVICE" },
        "body": { "items": [{ "stationName": "중구", "khaiGrade": "1",
            "pm10Value": "22", "pm25Value": "9", "o3Value": "0.021", "no2Value": "-" }] }
    }})
    .to_string();

    FeedBatches {
        samples: decode_short_range(&short_range_payload()).unwrap(),
        mid_temperatures: Some(decode_mid_temperatures(&mid_ta).unwrap()),
        mid_summaries: Some(decode_mid_summaries(&mid_land).unwrap()),
        address: Some(Address {
            state: Some("서울특별시".into()),
            city: Some("서울특별시".into()),
            ..Address::default()
        }),
        air: decode_air_quality(&air).unwrap(),
        degraded: Vec::new(),
    }
}

#[test]
fn snowy_afternoon_end_to_end() {
    let query = ForecastQuery::new(SEOUL_CITY_HALL, at(14, 20));
    let report = assemble(&query, &batches(), &RegionTable::default());

    assert_eq!(report.location.id, "11B10101");
    assert_eq!(report.slot.base_time(), "1400");

    // current
    assert_eq!(report.current.temperature, Some(0.0));
    assert_eq!(report.current.apparent_temperature, Some(-4.0));
    assert_eq!(report.current.day_max, Some(1.0));
    assert_eq!(report.current.day_min, Some(-6.0));
    assert_eq!(report.current.condition, Condition::Rain);

    // hourly
    assert!(report.hourly.len() <= 24);
    assert_eq!(report.hourly[0].hour_label, "14");
    assert!(report.hourly[0].is_current);
    assert!(report.hourly.windows(2).all(|w| w[0].key < w[1].key));

    // weekly
    let weekly = &report.weekly;
    assert_eq!(weekly.len(), 8);
    assert_eq!(weekly[0].band, HorizonBand::Today);
    assert_eq!(weekly[0].day_label, "월");
    assert_eq!(weekly[0].condition, Condition::Rain);
    assert_eq!((weekly[1].high, weekly[1].low), (Some(3.0), Some(-7.0)));
    assert_eq!((weekly[2].high, weekly[2].low), (Some(4.0), Some(-3.0)));
    assert_eq!(weekly[2].condition, Condition::Clear);
    assert_eq!(weekly[3].band, HorizonBand::NearRange);
    assert_eq!((weekly[4].high, weekly[4].low), (Some(5.0), Some(-4.0)));
    assert_eq!(weekly[4].condition, Condition::Clear);
    assert_eq!((weekly[5].high, weekly[5].low), (None, None));
    assert_eq!(weekly[5].condition, Condition::Snow);
    assert_eq!(weekly[6].condition, Condition::PartlyCloudy);
    assert_eq!(weekly[7].condition, Condition::Rain);
    assert_eq!((weekly[7].high, weekly[7].low), (Some(7.0), Some(-1.0)));

    // advice: 0 degrees sits in the coldest-but-one band, rain extras, wind chill of 4
    let outfit = &report.advice.outfit;
    assert!(!outfit.base.is_empty());
    assert!(outfit.optional.contains(&"우산"));
    assert!(outfit.optional.contains(&"따뜻한 목도리"));
    assert!(report.advice.activities.suggestion.starts_with("실내활동"));

    // air
    assert_eq!(report.air.sido, "서울");
    assert_eq!(report.air.grade_label, "좋음");
    assert_eq!(report.air.pm25, Some(9.0));
    assert_eq!(report.air.no2, None);
    assert!(report.degraded.is_empty());
}

#[test]
fn report_serializes_to_json() {
    let query = ForecastQuery::new(SEOUL_CITY_HALL, at(14, 20));
    let report = assemble(&query, &batches(), &RegionTable::default());
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["location"]["name"], "서울특별시");
    assert_eq!(value["current"]["condition"], "rain");
    assert_eq!(value["weekly"][5]["high"], Value::Null);
    assert_eq!(value["weekly"][0]["band"], "today");
    assert_eq!(value["air"]["grade"], "good");
    assert_eq!(value["air"]["no2"], Value::Null);
    assert_eq!(value["degraded"], json!([]));
}

#[test]
fn empty_short_range_still_reports() {
    let query = ForecastQuery::new(SEOUL_CITY_HALL, at(1, 5));
    let batches = FeedBatches {
        samples: decode_short_range(
            &json!({ "response": { "header": { "resultCode": "03", "resultMsg": "NO_DATA" } } })
                .to_string(),
        )
        .unwrap(),
        ..FeedBatches::default()
    };
    let report = assemble(&query, &batches, &RegionTable::default());

    assert_eq!(report.slot.base_date(), "20241201");
    assert_eq!(report.slot.base_time(), "2300");
    assert!(report.hourly.is_empty());
    assert_eq!(report.weekly.len(), 8);
    assert_eq!(report.current.condition, Condition::Clear);
}
