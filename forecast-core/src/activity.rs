//! Activity suggestions for the current condition.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::model::Condition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub icon: &'static str,
    pub label: &'static str,
}

const fn activity(icon: &'static str, label: &'static str) -> Activity {
    Activity { icon, label }
}

pub const INDOOR_ACTIVITIES: [Activity; 10] = [
    activity("📚", "독서"),
    activity("🎬", "영화 관람"),
    activity("💪", "헬스"),
    activity("🖼️", "전시회"),
    activity("🎲", "보드게임"),
    activity("👩‍🍳", "요리"),
    activity("🏊‍♀️", "실내 수영"),
    activity("☕", "카페 공부"),
    activity("🪴", "식물 가꾸기"),
    activity("🧘‍♂️", "스트레칭"),
];

pub const OUTDOOR_ACTIVITIES: [Activity; 10] = [
    activity("🚶", "산책"),
    activity("🚴", "자전거"),
    activity("🧺", "피크닉"),
    activity("🏕️", "캠핑"),
    activity("☕", "야외 카페"),
    activity("📷", "사진 찍기"),
    activity("🥾", "등산"),
    activity("🏃‍♂️", "달리기"),
    activity("🐶", "반려견 산책"),
    activity("🛍️", "야시장"),
];

/// Which activity lists to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityFilter {
    #[default]
    All,
    Indoor,
    Outdoor,
}

impl ActivityFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityFilter::All => "all",
            ActivityFilter::Indoor => "indoor",
            ActivityFilter::Outdoor => "outdoor",
        }
    }
}

impl fmt::Display for ActivityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityFilter {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "all" => Ok(ActivityFilter::All),
            "indoor" => Ok(ActivityFilter::Indoor),
            "outdoor" => Ok(ActivityFilter::Outdoor),
            _ => Err(anyhow::anyhow!(
                "Unknown activity filter '{value}'. Supported filters: all, indoor, outdoor."
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityAdvice {
    pub summary: &'static str,
    pub suggestion: &'static str,
    pub indoor: Vec<Activity>,
    pub outdoor: Vec<Activity>,
}

impl ActivityAdvice {
    /// Drop the lists `filter` excludes.
    pub fn filtered(mut self, filter: ActivityFilter) -> Self {
        match filter {
            ActivityFilter::All => {}
            ActivityFilter::Indoor => self.outdoor.clear(),
            ActivityFilter::Outdoor => self.indoor.clear(),
        }
        self
    }
}

/// Summary line, suggestion and both activity lists for `condition`.
pub fn suggest(condition: Condition) -> ActivityAdvice {
    let (summary, suggestion) = match condition {
        Condition::Clear => ("오늘은 활동하기 좋은 날씨예요!", "실외활동 추천☀️"),
        Condition::PartlyCloudy | Condition::Cloudy => ("흐린 날씨네요.", "산책이나 실내활동 추천☁️"),
        Condition::Rain => ("비가 오고 있어요.", "실내활동 추천☔"),
        Condition::Snow => ("눈이 내려요!", "조심히 외출하세요❄️"),
        Condition::Thunder => ("날씨 변화가 잦아요.", "하늘을 확인하고 계획하세요."),
    };

    ActivityAdvice {
        summary,
        suggestion,
        indoor: INDOOR_ACTIVITIES.to_vec(),
        outdoor: OUTDOOR_ACTIVITIES.to_vec(),
    }
}
