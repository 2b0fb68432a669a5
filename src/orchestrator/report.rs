//! 批处理结果文件

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::error::{AppResult, FileError};
use crate::models::{RecommendationParams, Suggestion};
use crate::orchestrator::batch_processor::BatchItemResult;

/// 汇总信息
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_rows: usize,
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub timestamp: String,
}

/// 单行结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowResult {
    pub row_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<RecommendationParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Suggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub success: bool,
}

/// 整次运行的结果
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub results: Vec<RowResult>,
}

impl RunReport {
    /// 合并无效行和批处理结果
    ///
    /// `row_indices[i]` 是第 i 个批处理输入对应的 CSV 行号。
    pub fn build(
        total_rows: usize,
        invalid_rows: Vec<(usize, String)>,
        row_indices: &[usize],
        batch_results: Vec<BatchItemResult>,
    ) -> Self {
        let mut results: Vec<RowResult> = invalid_rows
            .into_iter()
            .map(|(row_index, error)| RowResult {
                row_index,
                params: None,
                result: None,
                error: Some(error),
                success: false,
            })
            .collect();

        results.extend(batch_results.into_iter().map(|r| RowResult {
            row_index: row_indices.get(r.index).copied().unwrap_or(r.index),
            params: Some(r.params),
            result: r.result,
            error: r.error,
            success: r.success,
        }));

        results.sort_by_key(|r| r.row_index);

        let successful = results.iter().filter(|r| r.success).count();
        let summary = RunSummary {
            total_rows,
            processed: results.len(),
            successful,
            failed: results.len() - successful,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        Self { summary, results }
    }

    /// 成功率（百分比）
    pub fn success_rate(&self) -> f64 {
        if self.summary.processed == 0 {
            0.0
        } else {
            self.summary.successful as f64 / self.summary.processed as f64 * 100.0
        }
    }

    /// 写入 JSON 文件
    pub async fn write_to(&self, path: &Path) -> AppResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json)
            .await
            .map_err(|source| FileError::WriteFailed {
                path: path.display().to_string(),
                source,
            })?;
        Ok(())
    }
}
