//! Clothing recommendation and advisory text.

use serde::Serialize;

use crate::model::Condition;

/// An inclusive temperature band and what to wear in it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutfitBand {
    pub min: i32,
    pub max: i32,
    pub base: &'static [&'static str],
    pub optional: &'static [&'static str],
}

impl OutfitBand {
    pub fn contains(&self, temp_c: f64) -> bool {
        f64::from(self.min) <= temp_c && temp_c <= f64::from(self.max)
    }
}

/// Checked top to bottom, first containing band wins. Integer bands tile
/// -50..=50 with no overlap.
pub const OUTFIT_BANDS: [OutfitBand; 9] = [
    OutfitBand {
        min: 27,
        max: 50,
        base: &["민소매", "반팔 티셔츠", "얇은 반바지", "얇은 원피스"],
        optional: &["선크림", "선글라스", "얇은 모자", "쿨링 스프레이", "양산"],
    },
    OutfitBand {
        min: 23,
        max: 26,
        base: &["반팔 티셔츠", "린넨 셔츠", "얇은 긴바지", "반바지"],
        optional: &["양산", "얇은 아우터 (아침저녁)", "선크림"],
    },
    OutfitBand {
        min: 20,
        max: 22,
        base: &["얇은 긴팔", "반팔 티셔츠", "청바지", "면바지"],
        optional: &["가벼운 니트", "가벼운 재킷", "얇은 가디건"],
    },
    OutfitBand {
        min: 17,
        max: 19,
        base: &["얇은 니트", "얇은 점퍼", "긴바지"],
        optional: &["모자", "가벼운 바람막이"],
    },
    OutfitBand {
        min: 12,
        max: 16,
        base: &["맨투맨", "후드티", "니트", "긴바지"],
        optional: &["가벼운 목도리", "트렌치코트", "바람막이"],
    },
    OutfitBand {
        min: 6,
        max: 11,
        base: &["두꺼운 니트", "코트", "청바지", "기모바지"],
        optional: &["목도리", "두꺼운 재킷", "얇은 패딩"],
    },
    OutfitBand {
        min: 1,
        max: 5,
        base: &["패딩", "두꺼운 코트", "니트", "히트텍"],
        optional: &["장갑", "목도리", "귀마개", "핫팩"],
    },
    OutfitBand {
        min: -10,
        max: 0,
        base: &["롱패딩", "두꺼운 니트", "히트텍", "부츠"],
        optional: &["귀마개", "핫팩", "눈길 방지 신발", "두꺼운 목도리", "장갑"],
    },
    OutfitBand {
        min: -50,
        max: -11,
        base: &["롱패딩", "기모 히트텍", "눈길 부츠"],
        optional: &["귀마개", "핫팩", "손난로", "스키장갑", "두꺼운 목도리"],
    },
];

const RAIN_EXTRAS: [&str; 2] = ["우산", "장화"];
const SNOW_EXTRAS: [&str; 3] = ["미끄럼 방지 신발", "장갑", "우산"];
const WIND_CHILL_EXTRAS: [&str; 2] = ["따뜻한 목도리", "장갑"];

/// Wind-chill extras apply at or below this temperature...
const WIND_CHILL_MAX_TEMP: f64 = 4.0;
/// ...when it feels at least this much colder than it is.
const WIND_CHILL_MIN_GAP: f64 = 3.0;

const DEFAULT_ADVISORY: &str = "오늘의 옷차림을 확인해 보세요.";

/// One advisory line. `min_temp: None` matches any temperature, including unknown.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AdvisoryRule {
    conditions: &'static [Condition],
    min_temp: Option<f64>,
    text: &'static str,
}

/// Checked top to bottom, first match wins.
const ADVISORY_RULES: [AdvisoryRule; 7] = [
    AdvisoryRule {
        conditions: &[Condition::Rain],
        min_temp: None,
        text: "🌧️ 비가 와요. 우산 꼭 챙기세요!",
    },
    AdvisoryRule {
        conditions: &[Condition::Snow],
        min_temp: None,
        text: "❄️ 눈이 옵니다. 미끄럼 방지 신발 추천!",
    },
    AdvisoryRule {
        conditions: &[Condition::PartlyCloudy, Condition::Cloudy],
        min_temp: None,
        text: "⛅ 흐린 날씨예요. 가벼운 겉옷을 준비하세요.",
    },
    AdvisoryRule {
        conditions: &[Condition::Clear],
        min_temp: Some(26.0),
        text: "☀️ 매우 더워요! 시원하게 입으세요.",
    },
    AdvisoryRule {
        conditions: &[Condition::Clear],
        min_temp: Some(15.0),
        text: "🌤️ 선선한 맑은 날입니다.",
    },
    AdvisoryRule {
        conditions: &[Condition::Clear],
        min_temp: Some(5.0),
        text: "🍂 쌀쌀해요. 따뜻한 옷차림 필요!",
    },
    AdvisoryRule {
        conditions: &[Condition::Clear],
        min_temp: Some(f64::NEG_INFINITY),
        text: "🧊 매우 추워요! 방한용품 챙기세요.",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub base: Vec<&'static str>,
    pub optional: Vec<&'static str>,
    pub advisory: &'static str,
}

/// First band containing `temp_c`.
pub fn band_for(temp_c: f64) -> Option<&'static OutfitBand> {
    OUTFIT_BANDS.iter().find(|band| band.contains(temp_c))
}

/// Outfit for the current conditions.
///
/// Condition and wind-chill extras are appended after the band's own
/// optional items, never replacing them. With no temperature, or one outside
/// every band, both lists start empty.
pub fn recommend(
    temp_c: Option<f64>,
    apparent_c: Option<f64>,
    condition: Condition,
) -> Recommendation {
    let band = temp_c.and_then(band_for);
    let base = band.map(|b| b.base.to_vec()).unwrap_or_default();
    let mut optional = band.map(|b| b.optional.to_vec()).unwrap_or_default();

    match condition {
        Condition::Rain => optional.extend(RAIN_EXTRAS),
        Condition::Snow => optional.extend(SNOW_EXTRAS),
        _ => {}
    }

    if let (Some(temp), Some(apparent)) = (temp_c, apparent_c) {
        if temp <= WIND_CHILL_MAX_TEMP && temp - apparent >= WIND_CHILL_MIN_GAP {
            optional.extend(WIND_CHILL_EXTRAS);
        }
    }

    Recommendation { base, optional, advisory: advisory(temp_c, condition) }
}

/// One-line outfit tip for the condition and temperature.
pub fn advisory(temp_c: Option<f64>, condition: Condition) -> &'static str {
    ADVISORY_RULES
        .iter()
        .find(|rule| {
            rule.conditions.contains(&condition)
                && match rule.min_temp {
                    None => true,
                    Some(min) => temp_c.is_some_and(|t| t >= min),
                }
        })
        .map_or(DEFAULT_ADVISORY, |rule| rule.text)
}

/// Short remark shown next to the current conditions.
pub fn condition_comment(condition: Condition) -> &'static str {
    match condition {
        Condition::Clear => "맑은 날이에요! 자외선 주의하세요.",
        Condition::PartlyCloudy => "구름이 조금 있어요.",
        Condition::Cloudy => "흐린 날씨예요. 우산은 필요 없겠네요.",
        Condition::Rain => "비가 와요. 우산을 꼭 챙기세요!",
        Condition::Snow => "눈이 내려요. 길이 미끄러우니 조심하세요.",
        Condition::Thunder => "오늘 날씨를 확인해 보세요.",
    }
}
