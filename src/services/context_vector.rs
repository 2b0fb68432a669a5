//! 上下文向量
//!
//! 把请求参数压平成 `key: value, key: value` 形式，直接拼进提示词。

use std::fmt::Display;

use crate::models::RecommendationParams;

/// 构建上下文向量
///
/// - 顺序固定，与 CSV 表头一致
/// - `None` 字段不输出
/// - 布尔值输出为 `1` / `0`
pub fn build_context_vector(params: &RecommendationParams) -> String {
    let mut context = ContextVector::default();

    context.push("userId", params.user_id.as_ref());
    context.push("dayOfWeek", params.day_of_week.as_ref());
    context.push("timeOfDay", params.time_of_day.as_ref());
    context.flag("atWork", params.at_work);
    context.flag("atHome", params.at_home);
    context.flag("wasTraining", params.was_training);
    context.push("temperature", params.temperature.as_ref());
    context.flag("rain", params.rain);
    context.push("season", params.season.as_ref());
    context.push("paydayDistance", params.payday_distance.as_ref());
    context.flag("holiday", params.holiday);
    context.push("itemId", params.item_id.as_ref());
    context.push("price", params.price.as_ref());
    context.push("category", params.category.as_ref());
    context.push("brand", params.brand.as_ref());
    context.push("pastBuys", params.past_buys.as_ref());
    context.push("pastRecency", params.past_recency.as_ref());
    context.push("avgGap", params.avg_gap.as_ref());
    context.push("avgQuantity", params.avg_quantity.as_ref());
    context.flag("isRecurring", params.is_recurring);
    context.push("itemPopularity", params.item_popularity.as_ref());
    context.push("healthActivityType", params.health_activity_type.as_ref());
    context.push("healthActivityDuration", params.health_activity_duration.as_ref());
    context.push("healthGoal", params.health_goal.as_ref());
    context.push("calendarEventType", params.calendar_event_type.as_ref());
    context.push(
        "calendarEventParticipants",
        params.calendar_event_participants.as_ref(),
    );

    context.entries.join(", ")
}

#[derive(Default)]
struct ContextVector {
    entries: Vec<String>,
}

impl ContextVector {
    fn push<T: Display>(&mut self, key: &str, value: Option<T>) {
        if let Some(value) = value {
            self.entries.push(format!("{}: {}", key, value));
        }
    }

    fn flag(&mut self, key: &str, value: Option<bool>) {
        self.push(key, value.map(u8::from));
    }
}
