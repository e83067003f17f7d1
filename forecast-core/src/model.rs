use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Geographic coordinate in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Seoul City Hall. Used when no location is configured.
pub const SEOUL_CITY_HALL: GeoPoint = GeoPoint::new(37.5665, 126.9780);

/// Short-range provider grid indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nx={} ny={}", self.x, self.y)
    }
}

/// Which short-range forecast run is being queried.
///
/// Only constructed by [`crate::slot::select_slot`], so `hour` is always one
/// of the eight issuance hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IssuanceSlot {
    date: NaiveDate,
    hour: u32,
}

impl IssuanceSlot {
    pub(crate) fn new(date: NaiveDate, hour: u32) -> Self {
        Self { date, hour }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// `YYYYMMDD`, as the provider expects `base_date`.
    pub fn base_date(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }

    /// Zero-padded `HHMM`, as the provider expects `base_time`.
    pub fn base_time(&self) -> String {
        format!("{:02}00", self.hour)
    }

    pub fn key(&self) -> SlotKey {
        SlotKey::new(&self.base_date(), &self.base_time())
    }
}

impl fmt::Display for IssuanceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.base_date(), self.base_time())
    }
}

/// `forecastDate + forecastTime`, e.g. `202405011500`.
///
/// Both halves are fixed-width zero-padded digits, so the derived lexical
/// ordering is chronological.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SlotKey(String);

impl SlotKey {
    pub fn new(date: &str, time: &str) -> Self {
        Self(format!("{date}{time}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn date_part(&self) -> &str {
        self.0.get(..8).unwrap_or("")
    }

    pub fn time_part(&self) -> &str {
        self.0.get(8..).unwrap_or("")
    }

    /// Two-digit hour, e.g. `"15"`.
    pub fn hour_label(&self) -> &str {
        self.0.get(8..10).unwrap_or("")
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Short-range sample categories the engine consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Temp,
    Humidity,
    SkyState,
    PrecipType,
    ApparentTemp,
    DayMax,
    DayMin,
}

impl Category {
    /// Provider category code, e.g. `TMP`.
    pub fn code(&self) -> &'static str {
        match self {
            Category::Temp => "TMP",
            Category::Humidity => "REH",
            Category::SkyState => "SKY",
            Category::PrecipType => "PTY",
            Category::ApparentTemp => "WCT",
            Category::DayMax => "TMX",
            Category::DayMin => "TMN",
        }
    }

    /// Returns `None` for categories the engine ignores (wind, rainfall amount, ...).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "TMP" => Some(Category::Temp),
            "REH" => Some(Category::Humidity),
            "SKY" => Some(Category::SkyState),
            "PTY" => Some(Category::PrecipType),
            "WCT" => Some(Category::ApparentTemp),
            "TMX" => Some(Category::DayMax),
            "TMN" => Some(Category::DayMin),
            _ => None,
        }
    }
}

/// One value from the short-range feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSample {
    pub category: Category,
    pub forecast_date: String,
    pub forecast_time: String,
    pub value: String,
}

impl RawSample {
    pub fn new(category: Category, date: &str, time: &str, value: &str) -> Self {
        Self {
            category,
            forecast_date: date.to_string(),
            forecast_time: time.to_string(),
            value: value.to_string(),
        }
    }

    pub fn key(&self) -> SlotKey {
        SlotKey::new(&self.forecast_date, &self.forecast_time)
    }
}

/// Display condition shared by the hourly, weekly and advice outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Rain,
    Snow,
    Thunder,
}

impl Condition {
    pub fn icon(&self) -> &'static str {
        match self {
            Condition::Clear => "☀️",
            Condition::PartlyCloudy => "⛅",
            Condition::Cloudy => "☁️",
            Condition::Rain => "🌧️",
            Condition::Snow => "❄️",
            Condition::Thunder => "⛈️",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Condition::Clear => "맑음",
            Condition::PartlyCloudy => "구름많음",
            Condition::Cloudy => "흐림",
            Condition::Rain => "비",
            Condition::Snow => "눈",
            Condition::Thunder => "뇌우",
        }
    }
}

/// The single "now" view.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResolvedCurrent {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub day_max: Option<f64>,
    pub day_min: Option<f64>,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPoint {
    pub key: SlotKey,
    pub hour_label: String,
    pub temperature: Option<f64>,
    pub condition: Condition,
    pub is_current: bool,
}

/// Which data horizon a weekly entry was sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizonBand {
    Today,
    NearRange,
    MidRange,
}

/// One weekly row. `None` high/low means the horizon had no data for that day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub day_label: &'static str,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub condition: Condition,
    pub band: HorizonBand,
}

/// Mid-range numeric feed, keyed by the feed's own day index (`taMin3` -> 3).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MidTemperatures {
    pub lows: BTreeMap<u8, f64>,
    pub highs: BTreeMap<u8, f64>,
}

/// Mid-range text feed, keyed by the feed's own day index (`wf4Pm` -> 4).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MidSummaries {
    pub by_index: BTreeMap<u8, String>,
}

/// Address components returned by reverse geocoding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    /// Province, e.g. "경기도".
    pub state: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub county: Option<String>,
}

/// Latest province-level air quality measurement.
///
/// Pollutant readings reported as `-` (station offline) are `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AirReading {
    pub station: Option<String>,
    pub data_time: Option<String>,
    /// Integrated air quality grade code, `1` (good) to `4` (very bad).
    pub khai_grade: Option<String>,
    /// PM10 in ㎍/㎥.
    pub pm10: Option<f64>,
    /// PM2.5 in ㎍/㎥.
    pub pm25: Option<f64>,
    /// Ozone in ppm.
    pub o3: Option<f64>,
    /// Nitrogen dioxide in ppm.
    pub no2: Option<f64>,
}

/// How temperatures are shown to the user. Reports always carry Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
}

impl TemperatureUnit {
    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
    }

    pub fn convert(self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureUnit::Celsius => f.write_str("섭씨 (°C)"),
            TemperatureUnit::Fahrenheit => f.write_str("화씨 (°F)"),
        }
    }
}
