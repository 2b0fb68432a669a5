//! 批量建议处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **分批**：把参数列表按 `batch_size` 切成若干批
//! 2. **限速**：批内顺序请求，请求之间固定间隔；两批之间再停一段时间
//! 3. **收集**：每个输入对应一个结果，带原始索引，单条失败不影响整批
//! 4. **进度**：单条和整批的结果都通过 channel 发送 [`BatchEvent`]，
//!    由调用方决定怎么展示（命令行里是 `utils::logging::log_event`）
//!
//! 没有并发，也不重试失败的条目。

use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::config::Config;
use crate::models::{RecommendationParams, Suggestion};
use crate::services::SuggestionService;
use crate::utils::logging::log_batch_start;

/// 批处理参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// 每批条数，至少为 1
    pub batch_size: usize,
    /// 批内两次请求之间的间隔
    pub delay_between_requests: Duration,
    /// 两批之间的间隔
    pub delay_between_batches: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: 10,
            delay_between_requests: Duration::from_millis(500),
            delay_between_batches: Duration::from_millis(2000),
        }
    }
}

impl From<&Config> for BatchOptions {
    fn from(config: &Config) -> Self {
        Self {
            batch_size: config.batch_size,
            delay_between_requests: config.delay_between_requests(),
            delay_between_batches: config.delay_between_batches(),
        }
    }
}

/// 批处理进度事件
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// 单条成功
    ItemSucceeded {
        index: usize,
        user_id: String,
        title: String,
        item_count: usize,
    },
    /// 单条失败
    ItemFailed {
        index: usize,
        user_id: String,
        error: String,
    },
    /// 一批完成
    BatchCompleted {
        batch_number: usize,
        total_batches: usize,
        successful: usize,
        failed: usize,
    },
}

/// 单条处理结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemResult {
    /// 在输入列表中的位置
    pub index: usize,
    pub params: RecommendationParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Suggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub success: bool,
}

/// 批量处理器
pub struct BatchProcessor<'a> {
    service: &'a SuggestionService,
    options: BatchOptions,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(service: &'a SuggestionService, options: BatchOptions) -> Self {
        Self {
            service,
            options: BatchOptions {
                batch_size: options.batch_size.max(1),
                ..options
            },
        }
    }

    /// 处理全部参数
    ///
    /// 返回值与输入一一对应，顺序相同。
    pub async fn run(
        &self,
        params: Vec<RecommendationParams>,
        events: Option<&UnboundedSender<BatchEvent>>,
    ) -> Vec<BatchItemResult> {
        let total = params.len();
        let batch_size = self.options.batch_size;
        let total_batches = total.div_ceil(batch_size);
        let mut results = Vec::with_capacity(total);

        for (batch_idx, chunk) in params.chunks(batch_size).enumerate() {
            let batch_number = batch_idx + 1;
            let batch_start = batch_idx * batch_size;
            log_batch_start(
                batch_number,
                total_batches,
                batch_start + 1,
                batch_start + chunk.len(),
                total,
            );

            let mut successful = 0;
            let mut failed = 0;

            for (offset, item) in chunk.iter().enumerate() {
                if offset > 0 {
                    pause(self.options.delay_between_requests).await;
                }

                let index = batch_start + offset;
                let result = self.process_one(index, item, events).await;
                if result.success {
                    successful += 1;
                } else {
                    failed += 1;
                }
                results.push(result);
            }

            emit(
                events,
                BatchEvent::BatchCompleted {
                    batch_number,
                    total_batches,
                    successful,
                    failed,
                },
            );

            if batch_number < total_batches {
                debug!("等待 {:?} 后开始下一批", self.options.delay_between_batches);
                pause(self.options.delay_between_batches).await;
            }
        }

        results
    }

    async fn process_one(
        &self,
        index: usize,
        params: &RecommendationParams,
        events: Option<&UnboundedSender<BatchEvent>>,
    ) -> BatchItemResult {
        let user_id = params.user_label().to_string();

        match self.service.get_suggestion(params).await {
            Ok(suggestion) => {
                emit(
                    events,
                    BatchEvent::ItemSucceeded {
                        index,
                        user_id,
                        title: suggestion.title.clone(),
                        item_count: suggestion.items.len(),
                    },
                );
                BatchItemResult {
                    index,
                    params: params.clone(),
                    result: Some(suggestion),
                    error: None,
                    success: true,
                }
            }
            Err(e) => {
                let message = e.to_string();
                emit(
                    events,
                    BatchEvent::ItemFailed {
                        index,
                        user_id,
                        error: message.clone(),
                    },
                );
                BatchItemResult {
                    index,
                    params: params.clone(),
                    result: None,
                    error: Some(message),
                    success: false,
                }
            }
        }
    }
}

fn emit(events: Option<&UnboundedSender<BatchEvent>>, event: BatchEvent) {
    if let Some(tx) = events {
        // 接收端已关闭时丢弃事件即可
        let _ = tx.send(event);
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let config = Config {
            batch_size: 3,
            delay_between_requests_ms: 10,
            delay_between_batches_ms: 20,
            ..Default::default()
        };
        let options = BatchOptions::from(&config);
        assert_eq!(options.batch_size, 3);
        assert_eq!(options.delay_between_requests, Duration::from_millis(10));
        assert_eq!(options.delay_between_batches, Duration::from_millis(20));
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = BatchItemResult {
            index: 2,
            params: RecommendationParams::default(),
            result: None,
            error: Some("boom".to_string()),
            success: false,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["index"], 2);
        assert_eq!(value["error"], "boom");
        assert!(value.get("result").is_none());
    }
}
