//! 模型返回的建议卡片
//!
//! 反序列化之后必须经过 [`Suggestion::validate`]，模型输出在这里才算可信。

use reqwest::Url;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, AppResult, ParseError};

/// items 数量下限
pub const MIN_ITEMS: usize = 2;
/// items 数量上限
pub const MAX_ITEMS: usize = 5;

/// 分类图标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionIcon {
    #[serde(rename = "football&popcorn")]
    FootballPopcorn,
    #[serde(rename = "sushi")]
    Sushi,
    #[serde(rename = "burger")]
    Burger,
    #[serde(rename = "salad")]
    Salad,
    #[serde(rename = "dessert")]
    Dessert,
}

impl SuggestionIcon {
    pub const ALL: [SuggestionIcon; 5] = [
        SuggestionIcon::FootballPopcorn,
        SuggestionIcon::Sushi,
        SuggestionIcon::Burger,
        SuggestionIcon::Salad,
        SuggestionIcon::Dessert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionIcon::FootballPopcorn => "football&popcorn",
            SuggestionIcon::Sushi => "sushi",
            SuggestionIcon::Burger => "burger",
            SuggestionIcon::Salad => "salad",
            SuggestionIcon::Dessert => "dessert",
        }
    }
}

/// 参与多人订单的朋友
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friend {
    pub name: String,
    pub avatar: String,
}

/// 多人订单信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub friends: Vec<Friend>,
}

/// 单个商品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub image: String,
    pub description: String,
    pub price: f64,
}

/// 建议卡片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// 背景色，十六进制或颜色名
    pub background: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
    pub title: String,
    pub items: Vec<SuggestionItem>,
    pub icon: SuggestionIcon,
    /// 预计送达时间（秒）
    #[serde(deserialize_with = "deserialize_whole_number")]
    pub time: u64,
}

impl Suggestion {
    /// 从 JSON 值解析并校验
    pub fn from_value(value: serde_json::Value) -> AppResult<Self> {
        let suggestion: Suggestion = serde_json::from_value(value)?;
        suggestion.validate()?;
        Ok(suggestion)
    }

    /// 校验 schema 之外 serde 表达不了的约束
    pub fn validate(&self) -> AppResult<()> {
        if !(MIN_ITEMS..=MAX_ITEMS).contains(&self.items.len()) {
            return Err(ParseError::InvalidItemCount(self.items.len()).into());
        }

        for (i, item) in self.items.iter().enumerate() {
            check_url(&format!("items[{}].image", i), &item.image)?;
            if !item.price.is_finite() || item.price <= 0.0 {
                return Err(AppError::schema_violation(
                    format!("items[{}].price", i),
                    format!("price must be positive, got {}", item.price),
                ));
            }
        }

        if let Some(group) = &self.group {
            if group.friends.is_empty() {
                return Err(AppError::schema_violation(
                    "group.friends",
                    "expected at least 1 friend",
                ));
            }
            for (i, friend) in group.friends.iter().enumerate() {
                check_url(&format!("group.friends[{}].avatar", i), &friend.avatar)?;
            }
        }

        if self.time == 0 {
            return Err(AppError::schema_violation("time", "time must be positive"));
        }

        Ok(())
    }

    /// 商品总价
    pub fn total_price(&self) -> f64 {
        self.items.iter().map(|item| item.price).sum()
    }
}

/// 接受 `1800` 和 `1800.0`，拒绝负数和小数
fn deserialize_whole_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u64::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative integer, got {}",
            value
        )));
    }
    Ok(value as u64)
}

fn check_url(field: &str, value: &str) -> AppResult<()> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| AppError::schema_violation(field, format!("invalid url '{}': {}", value, e)))
}
