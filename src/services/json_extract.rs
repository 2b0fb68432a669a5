//! 从模型的纯文本回复里取出 JSON 对象
//!
//! 模型经常在 JSON 外面包一层 markdown 代码块或者前后加几句话，
//! 这里先去掉代码块标记，再取第一个完整的顶层 `{...}`。
//! 这是尽力而为的修复，不是通用 JSON 解析器：括号本身不配对的回复
//! 只能退回到"第一个 `{` 到最后一个 `}`"，结果多半解析失败。

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::ParseError;

fn leading_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^```(?:json)?\s*").expect("valid regex"))
}

fn trailing_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*```$").expect("valid regex"))
}

/// 去掉首尾的 markdown 代码块标记
pub fn strip_code_fences(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(m) = leading_fence().find(cleaned) {
        cleaned = &cleaned[m.end()..];
    }
    if let Some(m) = trailing_fence().find(cleaned) {
        cleaned = &cleaned[..m.start()];
    }
    cleaned.trim()
}

/// 找到第一个括号配对完整的顶层对象
///
/// 计数时跳过 JSON 字符串里的括号（处理转义）。
pub fn find_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// 第一个 `{` 到最后一个 `}` 之间的内容
fn greedy_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// 从回复文本中解析出第一个 JSON 对象
pub fn extract_json_object(text: &str) -> Result<Value, ParseError> {
    let cleaned = strip_code_fences(text);
    let candidate = find_balanced_object(cleaned)
        .or_else(|| greedy_object_span(cleaned))
        .ok_or(ParseError::NoJsonFound)?;
    Ok(serde_json::from_str(candidate)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_json_fence() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  ```JSON {\"a\":1}```  "), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_extract_with_surrounding_text() {
        let text = "Here is your suggestion:\n{\"title\": \"Hi\", \"n\": {\"x\": 1}}\nEnjoy!";
        assert_eq!(
            extract_json_object(text).unwrap(),
            json!({"title": "Hi", "n": {"x": 1}})
        );
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let text = r#"{"title": "curly } brace \" {", "ok": true} trailing {junk}"#;
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["title"], "curly } brace \" {");
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn test_only_first_top_level_object() {
        let text = "{\"a\": 1} and then {\"b\": 2}";
        assert_eq!(extract_json_object(text).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_no_json() {
        assert!(matches!(
            extract_json_object("sorry, I can't help with that"),
            Err(ParseError::NoJsonFound)
        ));
    }

    #[test]
    fn test_unbalanced_falls_back_to_greedy_span() {
        // 只有开括号多了一个，平衡扫描失败，贪婪区间同样不是合法 JSON
        let text = "{\"a\": {\"b\": 1}";
        assert!(find_balanced_object(text).is_none());
        assert!(matches!(
            extract_json_object(text),
            Err(ParseError::InvalidJson(_))
        ));
    }
}
