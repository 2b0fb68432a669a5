//! 建议卡片的 JSON Schema
//!
//! 发给提供方用于约束输出；本地校验由 `Suggestion::validate` 负责，
//! 两边的约束保持一致。

use serde_json::{json, Value};

use crate::models::{SuggestionIcon, MAX_ITEMS, MIN_ITEMS};

/// Schema 名称（OpenAI json_schema 模式需要）
pub const SCHEMA_NAME: &str = "wolt_suggestion";

/// 构建建议卡片的 JSON Schema
pub fn suggestion_schema() -> Value {
    let icons: Vec<&str> = SuggestionIcon::ALL.iter().map(|icon| icon.as_str()).collect();

    json!({
        "type": "object",
        "properties": {
            "background": {
                "type": "string",
                "description": "Background color as hex code (e.g., '#FF6B6B') or color name (e.g., 'blue')"
            },
            "group": {
                "type": "object",
                "description": "Optional group information - only include if this is a group order (calendarEventParticipants > 1)",
                "properties": {
                    "friends": {
                        "type": "array",
                        "minItems": 1,
                        "description": "Array of friends participating in the group order",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string", "description": "Friend's name" },
                                "avatar": {
                                    "type": "string",
                                    "format": "uri",
                                    "description": "URL to friend's avatar image"
                                }
                            },
                            "required": ["name", "avatar"]
                        }
                    }
                },
                "required": ["friends"]
            },
            "title": {
                "type": "string",
                "description": "Short, personalized title explaining why this suggestion is relevant, e.g., 'Perfect post-workout refuel' or 'Based on your Tuesday usual'"
            },
            "items": {
                "type": "array",
                "minItems": MIN_ITEMS,
                "maxItems": MAX_ITEMS,
                "description": "Array of 2-5 food items that form a cohesive order. Items should complement each other (e.g., main dish + sides + drink, or a logical grocery basket). Each item should have an image URL, description, and price",
                "items": {
                    "type": "object",
                    "properties": {
                        "image": {
                            "type": "string",
                            "format": "uri",
                            "description": "URL to the food item image"
                        },
                        "description": {
                            "type": "string",
                            "description": "Description of the food item, e.g., 'Chicken & Quinoa Protein Bowl with fresh vegetables'"
                        },
                        "price": {
                            "type": "number",
                            "exclusiveMinimum": 0,
                            "description": "Price of the item in local currency, e.g., 16.20"
                        }
                    },
                    "required": ["image", "description", "price"]
                }
            },
            "icon": {
                "type": "string",
                "enum": icons,
                "description": "Icon type matching the food category: 'football&popcorn' for snacks/events, 'sushi' for Japanese, 'burger' for fast food, 'salad' for healthy options, 'dessert' for sweets"
            },
            "time": {
                "type": "integer",
                "minimum": 1,
                "description": "Estimated delivery time in seconds (typically 1200-3600, i.e., 20-60 minutes)"
            }
        },
        "required": ["background", "title", "items", "icon", "time"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_bounds_match_model() {
        let schema = suggestion_schema();
        assert_eq!(schema["properties"]["items"]["minItems"], 2);
        assert_eq!(schema["properties"]["items"]["maxItems"], 5);
        assert_eq!(schema["properties"]["icon"]["enum"].as_array().unwrap().len(), 5);
        assert_eq!(schema["properties"]["icon"]["enum"][0], "football&popcorn");
    }

    #[test]
    fn test_group_is_optional() {
        let schema = suggestion_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(!required.contains(&"group"));
        assert!(required.contains(&"items"));
    }
}
