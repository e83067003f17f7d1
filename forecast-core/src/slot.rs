//! Picks which forecast run to query for a given wall-clock time.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::Serialize;
use std::fmt;

use crate::model::IssuanceSlot;

/// Short-range issuance hours, ascending.
pub const ISSUANCE_HOURS: [u32; 8] = [2, 5, 8, 11, 14, 17, 20, 23];

/// Minutes after the hour before an issuance becomes queryable.
pub const PUBLISH_DELAY_MINUTES: u32 = 10;

/// Mid-range issuance hours.
const MID_MORNING_HOUR: u32 = 6;
const MID_EVENING_HOUR: u32 = 18;

/// Provider wall-clock offset from UTC (KST).
const PROVIDER_UTC_OFFSET_SECS: i32 = 9 * 3600;

/// Current wall-clock time in the provider's zone.
pub fn provider_now() -> NaiveDateTime {
    to_provider_time(Utc::now())
}

/// Wall-clock time in the provider's zone at `utc`.
pub fn to_provider_time(utc: DateTime<Utc>) -> NaiveDateTime {
    match FixedOffset::east_opt(PROVIDER_UTC_OFFSET_SECS) {
        Some(kst) => utc.with_timezone(&kst).naive_local(),
        None => utc.naive_utc(),
    }
}

/// Latest short-range issuance already published at `now`.
///
/// Before 02:10 nothing from today is available yet, so 23:00 of the previous
/// day is returned.
pub fn select_slot(now: NaiveDateTime) -> IssuanceSlot {
    let (hour, minute) = (now.hour(), now.minute());

    let selected = ISSUANCE_HOURS
        .iter()
        .rev()
        .copied()
        .find(|&h| hour > h || (hour == h && minute >= PUBLISH_DELAY_MINUTES));

    let slot = match selected {
        Some(h) => IssuanceSlot::new(now.date(), h),
        None => IssuanceSlot::new(previous_day(now.date()), ISSUANCE_HOURS[7]),
    };

    tracing::debug!(%now, %slot, "selected issuance slot");
    slot
}

/// A mid-range issuance (`tmFc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MidIssuance {
    date: NaiveDate,
    hour: u32,
}

impl MidIssuance {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// `YYYYMMDDHHMM`.
    pub fn tm_fc(&self) -> String {
        format!("{}{:02}00", self.date.format("%Y%m%d"), self.hour)
    }
}

impl fmt::Display for MidIssuance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tm_fc())
    }
}

/// Latest mid-range issuance published at `now` (06:00 or 18:00).
pub fn select_mid_issuance(now: NaiveDateTime) -> MidIssuance {
    let hour = now.hour();
    if hour < MID_MORNING_HOUR {
        MidIssuance { date: previous_day(now.date()), hour: MID_EVENING_HOUR }
    } else if hour < MID_EVENING_HOUR {
        MidIssuance { date: now.date(), hour: MID_MORNING_HOUR }
    } else {
        MidIssuance { date: now.date(), hour: MID_EVENING_HOUR }
    }
}

fn previous_day(date: NaiveDate) -> NaiveDate {
    date.pred_opt().unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn provider_time_is_nine_hours_ahead_across_midnight() {
        let utc = Utc.with_ymd_and_hms(2024, 5, 1, 15, 30, 0).unwrap();
        assert_eq!(to_provider_time(utc), at("2024-05-02", 0, 30));
    }

    fn at(date: &str, hh: u32, mm: u32) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap()
    }

    fn slot_of(date: &str, hh: u32, mm: u32) -> (String, String) {
        let slot = select_slot(at(date, hh, mm));
        (slot.base_date(), slot.base_time())
    }

    #[test]
    fn around_first_issuance() {
        assert_eq!(slot_of("2024-05-02", 2, 9), ("20240501".into(), "2300".into()));
        assert_eq!(slot_of("2024-05-02", 2, 10), ("20240502".into(), "0200".into()));
        assert_eq!(slot_of("2024-05-02", 2, 11), ("20240502".into(), "0200".into()));
    }

    #[test]
    fn every_issuance_boundary() {
        for (i, &h) in ISSUANCE_HOURS.iter().enumerate() {
            let expected = format!("{h:02}00");
            assert_eq!(slot_of("2024-05-02", h, 10).1, expected, "at {h}:10");
            assert_eq!(slot_of("2024-05-02", h, 59).1, expected, "at {h}:59");

            let before = slot_of("2024-05-02", h, 9);
            if i == 0 {
                assert_eq!(before, ("20240501".into(), "2300".into()));
            } else {
                assert_eq!(before.1, format!("{:02}00", ISSUANCE_HOURS[i - 1]), "at {h}:09");
                assert_eq!(before.0, "20240502");
            }
        }
    }

    #[test]
    fn late_evening_uses_same_day() {
        for mm in [10, 30, 59] {
            assert_eq!(slot_of("2024-05-02", 23, mm), ("20240502".into(), "2300".into()));
        }
        // 23:00-23:09 is still the 20:00 run.
        assert_eq!(slot_of("2024-05-02", 23, 0), ("20240502".into(), "2000".into()));
    }

    #[test]
    fn after_midnight_uses_previous_day() {
        for (hh, mm) in [(0, 0), (0, 30), (1, 59), (2, 0), (2, 9)] {
            assert_eq!(slot_of("2024-05-02", hh, mm), ("20240501".into(), "2300".into()));
        }
    }

    #[test]
    fn wraps_across_month_and_year() {
        assert_eq!(slot_of("2024-03-01", 1, 0), ("20240229".into(), "2300".into()));
        assert_eq!(slot_of("2025-01-01", 0, 5), ("20241231".into(), "2300".into()));
    }

    #[test]
    fn slot_key_matches_base_fields() {
        let slot = select_slot(at("2024-05-02", 14, 30));
        assert_eq!(slot.key().as_str(), "202405021400");
    }

    #[test]
    fn mid_issuance_windows() {
        assert_eq!(select_mid_issuance(at("2024-05-02", 5, 59)).tm_fc(), "202405011800");
        assert_eq!(select_mid_issuance(at("2024-05-02", 6, 0)).tm_fc(), "202405020600");
        assert_eq!(select_mid_issuance(at("2024-05-02", 17, 59)).tm_fc(), "202405020600");
        assert_eq!(select_mid_issuance(at("2024-05-02", 18, 0)).tm_fc(), "202405021800");
    }
}
