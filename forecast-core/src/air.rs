//! Province-level air quality: which province to ask for, and how to read
//! the integrated grade.

use serde::Serialize;

use crate::model::{Address, AirReading};

/// Substring of the geocoded region and the province name the air feed
/// expects. First match wins.
const SIDO_KEYWORDS: &[(&str, &str)] = &[
    ("경기", "경기"),
    ("인천", "인천"),
    ("부산", "부산"),
    ("대구", "대구"),
    ("광주", "광주"),
    ("울산", "울산"),
    ("대전", "대전"),
];

pub const DEFAULT_SIDO: &str = "서울";

pub const NO_DATA_LABEL: &str = "정보없음";
pub const NO_DATA_TIP: &str = "현재 공기질 정보를 불러올 수 없습니다. 잠시 후 다시 시도해주세요.";

/// Province name for the air feed. Uses the first non-empty of state, city
/// and county.
pub fn sido_for(address: Option<&Address>) -> &'static str {
    let region = address.and_then(|a| {
        [&a.state, &a.city, &a.county]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    });

    let Some(region) = region else {
        return DEFAULT_SIDO;
    };

    SIDO_KEYWORDS
        .iter()
        .find(|(keyword, _)| region.contains(keyword))
        .map(|(_, sido)| *sido)
        .unwrap_or(DEFAULT_SIDO)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AirGrade {
    Good,
    Moderate,
    Bad,
    VeryBad,
}

impl AirGrade {
    /// `"1"` to `"4"`. Placeholders such as `-` or `통신장애` give `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(AirGrade::Good),
            "2" => Some(AirGrade::Moderate),
            "3" => Some(AirGrade::Bad),
            "4" => Some(AirGrade::VeryBad),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AirGrade::Good => "좋음",
            AirGrade::Moderate => "보통",
            AirGrade::Bad => "나쁨",
            AirGrade::VeryBad => "매우나쁨",
        }
    }

    pub fn tip(self) -> &'static str {
        match self {
            AirGrade::Good => "🍃 오늘은 공기가 매우 좋습니다! 야외활동 적극 추천합니다.",
            AirGrade::Moderate => "🌿 공기질이 비교적 양호합니다. 산책하기 좋은 날이에요.",
            AirGrade::Bad => "😷 공기가 다소 나쁩니다. 외출시 마스크를 착용하세요.",
            AirGrade::VeryBad => "🚫 매우 나쁨! 가급적 외출을 피하시고 실내에 머무르세요.",
        }
    }
}

/// What the report shows about air quality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirSummary {
    pub sido: &'static str,
    pub grade: Option<AirGrade>,
    pub grade_label: &'static str,
    pub tip: &'static str,
    pub data_time: Option<String>,
    pub pm10: Option<f64>,
    pub pm25: Option<f64>,
    pub o3: Option<f64>,
    pub no2: Option<f64>,
}

pub fn summarize(sido: &'static str, reading: Option<&AirReading>) -> AirSummary {
    let grade = reading.and_then(|r| r.khai_grade.as_deref()).and_then(AirGrade::from_code);

    AirSummary {
        sido,
        grade,
        grade_label: grade.map_or(NO_DATA_LABEL, AirGrade::label),
        tip: grade.map_or(NO_DATA_TIP, AirGrade::tip),
        data_time: reading.and_then(|r| r.data_time.clone()),
        pm10: reading.and_then(|r| r.pm10),
        pm25: reading.and_then(|r| r.pm25),
        o3: reading.and_then(|r| r.o3),
        no2: reading.and_then(|r| r.no2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(name: &str) -> Address {
        Address { state: Some(name.into()), ..Address::default() }
    }

    #[test]
    fn sido_from_province() {
        assert_eq!(sido_for(Some(&state("경기도"))), "경기");
        assert_eq!(sido_for(Some(&state("부산광역시"))), "부산");
        assert_eq!(sido_for(Some(&state("광주광역시"))), "광주");
        assert_eq!(sido_for(Some(&state("서울특별시"))), "서울");
    }

    #[test]
    fn sido_falls_back_through_city_and_county() {
        let address = Address { state: Some(" ".into()), city: Some("인천광역시".into()), ..Address::default() };
        assert_eq!(sido_for(Some(&address)), "인천");

        let address = Address { county: Some("대전광역시".into()), ..Address::default() };
        assert_eq!(sido_for(Some(&address)), "대전");
    }

    #[test]
    fn unknown_or_missing_region_is_seoul() {
        assert_eq!(sido_for(None), DEFAULT_SIDO);
        assert_eq!(sido_for(Some(&Address::default())), DEFAULT_SIDO);
        assert_eq!(sido_for(Some(&state("제주특별자치도"))), DEFAULT_SIDO);
    }

    #[test]
    fn grade_codes() {
        assert_eq!(AirGrade::from_code("1"), Some(AirGrade::Good));
        assert_eq!(AirGrade::from_code(" 4 "), Some(AirGrade::VeryBad));
        assert_eq!(AirGrade::from_code("5"), None);
        assert_eq!(AirGrade::from_code("-"), None);
        assert_eq!(AirGrade::from_code("통신장애"), None);
        assert_eq!(AirGrade::Bad.label(), "나쁨");
        assert!(AirGrade::Bad.tip().contains("마스크"));
    }

    #[test]
    fn summary_of_a_reading() {
        let reading = AirReading {
            khai_grade: Some("2".into()),
            data_time: Some("2024-05-01 14:00".into()),
            pm10: Some(41.0),
            pm25: Some(18.0),
            o3: Some(0.043),
            no2: None,
            ..AirReading::default()
        };
        let summary = summarize("서울", Some(&reading));

        assert_eq!(summary.grade, Some(AirGrade::Moderate));
        assert_eq!(summary.grade_label, "보통");
        assert!(summary.tip.contains("산책"));
        assert_eq!(summary.pm10, Some(41.0));
        assert_eq!(summary.no2, None);
    }

    #[test]
    fn missing_reading_or_grade_says_so() {
        let summary = summarize("부산", None);
        assert_eq!(summary.grade, None);
        assert_eq!(summary.grade_label, NO_DATA_LABEL);
        assert_eq!(summary.tip, NO_DATA_TIP);

        let reading = AirReading { khai_grade: Some("통신장애".into()), pm10: Some(30.0), ..AirReading::default() };
        let summary = summarize("부산", Some(&reading));
        assert_eq!(summary.grade_label, NO_DATA_LABEL);
        assert_eq!(summary.pm10, Some(30.0));
    }
}
