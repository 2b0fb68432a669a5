//! 建议生成服务 - 业务能力层
//!
//! 只负责"一组参数 → 一张建议卡片"，不关心批处理
//!
//! 流程：
//! 1. 检查必填字段（失败直接返回，不发请求）
//! 2. 结构化生成 + 本地校验
//! 3. 失败时兜底一次：纯文本生成 → 去代码块 → 取 JSON → 同一套校验
//! 4. 兜底也失败时，错误同时带上兜底错误和原始错误

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clients::{client_from_config, LlmClient};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{RecommendationParams, Suggestion};
use crate::services::json_extract::extract_json_object;
use crate::services::prompt::{build_fallback_prompt, build_prompt};
use crate::services::schema::suggestion_schema;
use crate::utils::logging::truncate_text;

/// 建议生成服务
pub struct SuggestionService {
    client: Arc<dyn LlmClient>,
    schema: Value,
    reference_data: Option<String>,
}

impl SuggestionService {
    /// 按配置创建服务，未配置 API Key 时返回配置错误
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Ok(Self::with_client(client_from_config(config)?))
    }

    /// 使用指定客户端创建服务
    pub fn with_client(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            schema: suggestion_schema(),
            reference_data: None,
        }
    }

    /// 在提示词里附带参考数据（例如 CSV 片段）
    pub fn with_reference_data(mut self, data: impl Into<String>) -> Self {
        self.reference_data = Some(data.into());
        self
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    /// 生成一张建议卡片
    pub async fn get_suggestion(&self, params: &RecommendationParams) -> AppResult<Suggestion> {
        params.validate()?;

        let prompt = build_prompt(params, self.reference_data.as_deref());
        debug!(
            "[{}] 提示词长度: {} 字符，模型: {}",
            params.user_label(),
            prompt.len(),
            self.client.model_name()
        );

        let original = match self.generate_structured(&prompt).await {
            Ok(suggestion) => return Ok(suggestion),
            Err(e) => e,
        };

        warn!(
            "[{}] ⚠️ 结构化生成失败，改用纯文本兜底: {}",
            params.user_label(),
            original
        );

        match self.generate_fallback(&prompt).await {
            Ok(suggestion) => {
                info!("[{}] ✓ 兜底解析成功", params.user_label());
                Ok(suggestion)
            }
            Err(fallback) => Err(AppError::SuggestionFailed {
                fallback: Box::new(fallback),
                original: Box::new(original),
            }),
        }
    }

    /// 结构化生成 + 本地校验（包括 items 数量）
    async fn generate_structured(&self, prompt: &str) -> AppResult<Suggestion> {
        let value = self.client.generate_object(prompt, &self.schema).await?;
        Suggestion::from_value(value)
    }

    /// 纯文本生成 + 手动解析
    async fn generate_fallback(&self, prompt: &str) -> AppResult<Suggestion> {
        let text = self
            .client
            .generate_text(&build_fallback_prompt(prompt))
            .await?;
        debug!("兜底响应: {}", truncate_text(&text, 200));

        let value = extract_json_object(&text)?;
        Suggestion::from_value(value)
    }
}
