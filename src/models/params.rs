//! 推荐请求参数

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// 星期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

/// 时段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

/// 季节
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

macro_rules! impl_str_enum {
    ($ty:ty, $label:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| format!("无效的{}: {}", $label, s))
            }
        }
    };
}

impl_str_enum!(DayOfWeek, "星期");
impl_str_enum!(TimeOfDay, "时段");
impl_str_enum!(Season, "季节");

/// 推荐请求参数
///
/// 每次请求新建，字段全部可选，`userId` / `dayOfWeek` / `timeOfDay`
/// 由 [`RecommendationParams::validate`] 在调用前检查。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<DayOfWeek>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_work: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_home: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub was_training: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payday_distance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub past_buys: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub past_recency: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_gap: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_recurring: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_popularity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_activity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_activity_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_event_participants: Option<i64>,
}

impl RecommendationParams {
    /// 用三个必填字段创建参数
    pub fn new(user_id: impl Into<String>, day_of_week: DayOfWeek, time_of_day: TimeOfDay) -> Self {
        Self {
            user_id: Some(user_id.into()),
            day_of_week: Some(day_of_week),
            time_of_day: Some(time_of_day),
            ..Default::default()
        }
    }

    /// 检查必填字段，空字符串的 userId 视为缺失
    pub fn validate(&self) -> AppResult<()> {
        let mut missing = Vec::new();
        if self.user_id.as_deref().map_or(true, str::is_empty) {
            missing.push("userId");
        }
        if self.day_of_week.is_none() {
            missing.push("dayOfWeek");
        }
        if self.time_of_day.is_none() {
            missing.push("timeOfDay");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::MissingRequiredFields { missing })
        }
    }

    /// 日志里使用的用户标识
    pub fn user_label(&self) -> &str {
        self.user_id.as_deref().unwrap_or("<unknown>")
    }

    /// 是否为多人订单场景
    pub fn is_group_order(&self) -> bool {
        self.calendar_event_participants.map_or(false, |n| n > 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_all_required_present() {
        let params = RecommendationParams::new("u1", DayOfWeek::Tuesday, TimeOfDay::Afternoon);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_each_missing_field() {
        let params = RecommendationParams {
            user_id: Some(String::new()),
            time_of_day: Some(TimeOfDay::Night),
            ..Default::default()
        };
        match params.validate() {
            Err(AppError::MissingRequiredFields { missing }) => {
                assert_eq!(missing, vec!["userId", "dayOfWeek"]);
            }
            other => panic!("期望缺少必填字段错误，实际: {:?}", other),
        }
    }

    #[test]
    fn test_whitespace_user_id_is_present() {
        let params = RecommendationParams::new(" ", DayOfWeek::Sunday, TimeOfDay::Night);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_message() {
        let params = RecommendationParams::default();
        let message = params.validate().unwrap_err().to_string();
        assert_eq!(message, "Missing required fields: userId, dayOfWeek, timeOfDay");
    }

    #[test]
    fn test_enum_parsing_is_case_insensitive() {
        assert_eq!("tuesday".parse::<DayOfWeek>().unwrap(), DayOfWeek::Tuesday);
        assert_eq!("Evening".parse::<TimeOfDay>().unwrap(), TimeOfDay::Evening);
        assert_eq!(" winter ".parse::<Season>().unwrap(), Season::Winter);
        assert!("someday".parse::<DayOfWeek>().is_err());
    }

    #[test]
    fn test_camel_case_json() {
        let params: RecommendationParams = serde_json::from_str(
            r#"{"userId":"u1","dayOfWeek":"Friday","timeOfDay":"evening","atWork":false,"calendarEventParticipants":4}"#,
        )
        .unwrap();
        assert_eq!(params.day_of_week, Some(DayOfWeek::Friday));
        assert_eq!(params.at_work, Some(false));
        assert!(params.is_group_order());

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["timeOfDay"], "evening");
        assert!(json.get("rain").is_none());
    }
}
