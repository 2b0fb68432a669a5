//! 演示数据 CSV 加载
//!
//! 固定表头，每行转成一个 [`RecommendationParams`]。
//! 列数与表头不一致的行直接跳过；字段无法转换的行保留为无效行，
//! 由调用方写入结果文件。

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::warn;

use crate::error::{AppResult, FileError};
use crate::models::params::RecommendationParams;

/// CSV 表头
pub const CSV_HEADER: [&str; 26] = [
    "userId",
    "dayOfWeek",
    "timeOfDay",
    "atWork",
    "atHome",
    "wasTraining",
    "temperature",
    "rain",
    "season",
    "paydayDistance",
    "holiday",
    "itemId",
    "price",
    "category",
    "brand",
    "pastBuys",
    "pastRecency",
    "avgGap",
    "avgQuantity",
    "isRecurring",
    "itemPopularity",
    "healthActivityType",
    "healthActivityDuration",
    "healthGoal",
    "calendarEventType",
    "calendarEventParticipants",
];

/// CSV 原始行，全部按字符串读取
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CsvRow {
    pub user_id: String,
    pub day_of_week: String,
    pub time_of_day: String,
    pub at_work: String,
    pub at_home: String,
    pub was_training: String,
    pub temperature: String,
    pub rain: String,
    pub season: String,
    pub payday_distance: String,
    pub holiday: String,
    pub item_id: String,
    pub price: String,
    pub category: String,
    pub brand: String,
    pub past_buys: String,
    pub past_recency: String,
    pub avg_gap: String,
    pub avg_quantity: String,
    pub is_recurring: String,
    pub item_popularity: String,
    pub health_activity_type: String,
    pub health_activity_duration: String,
    pub health_goal: String,
    pub calendar_event_type: String,
    pub calendar_event_participants: String,
}

/// 单行的加载结果
#[derive(Debug, Clone)]
pub struct LoadedRow {
    /// 行号（从 0 开始，不含表头和被跳过的行）
    pub index: usize,
    pub params: Result<RecommendationParams, String>,
}

/// CSV 加载结果
#[derive(Debug, Clone, Default)]
pub struct CsvLoad {
    pub rows: Vec<LoadedRow>,
    /// 列数不匹配被跳过的行数
    pub skipped: usize,
}

impl CsvLoad {
    /// 可用的参数及其行号
    pub fn valid(&self) -> impl Iterator<Item = (usize, &RecommendationParams)> {
        self.rows
            .iter()
            .filter_map(|row| row.params.as_ref().ok().map(|p| (row.index, p)))
    }

    /// 无法转换的行
    pub fn invalid(&self) -> impl Iterator<Item = (usize, &str)> {
        self.rows
            .iter()
            .filter_map(|row| row.params.as_ref().err().map(|e| (row.index, e.as_str())))
    }
}

/// 从文件加载
pub fn load_params_csv(path: &Path, max_rows: usize) -> AppResult<CsvLoad> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(FileError::NotFound { path: display }.into());
    }
    let file = std::fs::File::open(path).map_err(|source| FileError::ReadFailed {
        path: display.clone(),
        source,
    })?;
    parse_params_csv(file, max_rows).map_err(|reason| {
        FileError::CsvParseFailed {
            path: display,
            reason,
        }
        .into()
    })
}

/// 从任意 reader 解析
pub fn parse_params_csv<R: Read>(reader: R, max_rows: usize) -> Result<CsvLoad, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let header_count = headers.iter().filter(|h| !h.is_empty()).count();
    if header_count == 0 {
        return Err("CSV file has empty header row".to_string());
    }

    let mut load = CsvLoad::default();
    let mut seen_any = false;

    for (line_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| e.to_string())?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        seen_any = true;

        // 表头算第 1 行
        let line_no = line_idx + 2;
        if record.len() != header_count {
            warn!(
                "⚠️ 第 {} 行: 期望 {} 列，实际 {} 列，跳过",
                line_no,
                header_count,
                record.len()
            );
            load.skipped += 1;
            continue;
        }

        if load.rows.len() >= max_rows {
            break;
        }

        let index = load.rows.len();
        let params = record
            .deserialize::<CsvRow>(Some(&headers))
            .map_err(|e| e.to_string())
            .and_then(|row| csv_row_to_params(&row, index));

        if let Err(e) = &params {
            warn!("⚠️ 第 {} 行解析失败: {}", line_no, e);
        }
        load.rows.push(LoadedRow { index, params });
    }

    if !seen_any {
        return Err("CSV file must have at least a header and one data row".to_string());
    }

    Ok(load)
}

/// 把一行 CSV 转成请求参数
///
/// 必填部分缺失时使用默认值：userId → `user{index}`，温度 → 20，发薪日距离 → 0。
pub fn csv_row_to_params(row: &CsvRow, index: usize) -> Result<RecommendationParams, String> {
    let mut params = RecommendationParams {
        user_id: Some(if row.user_id.is_empty() {
            format!("user{}", index)
        } else {
            row.user_id.clone()
        }),
        day_of_week: parse_opt("dayOfWeek", &row.day_of_week)?,
        time_of_day: parse_opt("timeOfDay", &row.time_of_day)?,
        at_work: Some(flag(&row.at_work)),
        at_home: Some(flag(&row.at_home)),
        was_training: Some(flag(&row.was_training)),
        temperature: Some(parse_or("temperature", &row.temperature, 20.0)?),
        rain: Some(flag(&row.rain)),
        season: parse_opt("season", &row.season)?,
        payday_distance: Some(parse_or("paydayDistance", &row.payday_distance, 0)?),
        holiday: Some(flag(&row.holiday)),
        ..Default::default()
    };

    params.item_id = non_empty(&row.item_id);
    params.price = parse_opt("price", &row.price)?;
    params.category = non_empty(&row.category);
    params.brand = non_empty(&row.brand);
    params.past_buys = parse_opt("pastBuys", &row.past_buys)?;
    params.past_recency = parse_opt("pastRecency", &row.past_recency)?;
    params.avg_gap = parse_opt("avgGap", &row.avg_gap)?;
    params.avg_quantity = parse_opt("avgQuantity", &row.avg_quantity)?;
    if !row.is_recurring.is_empty() {
        params.is_recurring = Some(flag(&row.is_recurring));
    }
    params.item_popularity = parse_opt("itemPopularity", &row.item_popularity)?;
    params.health_activity_type = non_empty(&row.health_activity_type);
    params.health_activity_duration =
        parse_opt("healthActivityDuration", &row.health_activity_duration)?;
    params.health_goal = non_empty(&row.health_goal);
    params.calendar_event_type = non_empty(&row.calendar_event_type);
    params.calendar_event_participants =
        parse_opt("calendarEventParticipants", &row.calendar_event_participants)?;

    Ok(params)
}

fn flag(value: &str) -> bool {
    value == "1"
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_opt<T>(field: &str, value: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|e| format!("字段 {} 无法解析 '{}': {}", field, value, e))
}

fn parse_or<T>(field: &str, value: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_opt(field, value)?.unwrap_or(default))
}

/// 读取 CSV 前若干行，作为提示词里的参考数据
pub fn csv_excerpt(path: &Path, max_lines: usize) -> AppResult<String> {
    let content = std::fs::read_to_string(path).map_err(|source| FileError::ReadFailed {
        path: path.display().to_string(),
        source,
    })?;
    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(max_lines)
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::params::{DayOfWeek, Season, TimeOfDay};

    fn csv_with(rows: &[&str]) -> String {
        let mut content = CSV_HEADER.join(",");
        for row in rows {
            content.push('\n');
            content.push_str(row);
        }
        content
    }

    const FULL_ROW: &str = "user42,Tuesday,afternoon,1,0,1,18.5,0,autumn,3,0,i552,16.2,lunch,HealthyBites,10,2,3,1,1,0.8,running,30,weight_loss,team_lunch,4";

    #[test]
    fn test_full_row() {
        let load = parse_params_csv(csv_with(&[FULL_ROW]).as_bytes(), 100).unwrap();
        assert_eq!(load.rows.len(), 1);
        let params = load.rows[0].params.as_ref().unwrap();
        assert_eq!(params.user_id.as_deref(), Some("user42"));
        assert_eq!(params.day_of_week, Some(DayOfWeek::Tuesday));
        assert_eq!(params.time_of_day, Some(TimeOfDay::Afternoon));
        assert_eq!(params.at_work, Some(true));
        assert_eq!(params.at_home, Some(false));
        assert_eq!(params.temperature, Some(18.5));
        assert_eq!(params.season, Some(Season::Autumn));
        assert_eq!(params.price, Some(16.2));
        assert_eq!(params.is_recurring, Some(true));
        assert_eq!(params.calendar_event_participants, Some(4));
    }

    #[test]
    fn test_defaults_for_empty_fields() {
        let row = ",Monday,morning,0,1,0,,0,,,0,,,,,,,,,,,,,,,";
        let load = parse_params_csv(csv_with(&[row]).as_bytes(), 100).unwrap();
        let params = load.rows[0].params.as_ref().unwrap();
        assert_eq!(params.user_id.as_deref(), Some("user0"));
        assert_eq!(params.temperature, Some(20.0));
        assert_eq!(params.payday_distance, Some(0));
        assert_eq!(params.season, None);
        assert_eq!(params.item_id, None);
        assert_eq!(params.is_recurring, None);
        assert_eq!(params.past_buys, None);
    }

    #[test]
    fn test_quoted_values_with_commas() {
        let row = "\"user,1\",Friday,evening,0,1,0,12,1,winter,7,1,,,\"snack, \"\"late\"\"\",,,,,,,,,,,,";
        let load = parse_params_csv(csv_with(&[row]).as_bytes(), 100).unwrap();
        let params = load.rows[0].params.as_ref().unwrap();
        assert_eq!(params.user_id.as_deref(), Some("user,1"));
        assert_eq!(params.category.as_deref(), Some("snack, \"late\""));
    }

    #[test]
    fn test_mismatched_column_count_skipped() {
        let load = parse_params_csv(
            csv_with(&["user1,Monday,morning", FULL_ROW]).as_bytes(),
            100,
        )
        .unwrap();
        assert_eq!(load.skipped, 1);
        assert_eq!(load.rows.len(), 1);
        assert_eq!(load.rows[0].index, 0);
    }

    #[test]
    fn test_invalid_enum_kept_as_invalid_row() {
        let bad = FULL_ROW.replace("Tuesday", "Caturday");
        let load = parse_params_csv(csv_with(&[&bad, FULL_ROW]).as_bytes(), 100).unwrap();
        assert_eq!(load.rows.len(), 2);
        assert_eq!(load.invalid().count(), 1);
        assert_eq!(load.valid().map(|(i, _)| i).collect::<Vec<_>>(), vec![1]);
        let (_, reason) = load.invalid().next().unwrap();
        assert!(reason.contains("dayOfWeek"));
    }

    #[test]
    fn test_max_rows_limit() {
        let load =
            parse_params_csv(csv_with(&[FULL_ROW, FULL_ROW, FULL_ROW]).as_bytes(), 2).unwrap();
        assert_eq!(load.rows.len(), 2);
    }

    #[test]
    fn test_header_only_is_error() {
        assert!(parse_params_csv(csv_with(&[]).as_bytes(), 10).is_err());
    }
}
