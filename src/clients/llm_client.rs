/// LLM 客户端接口
///
/// 服务层只依赖这个 trait，具体提供方（Gemini / OpenAI 兼容服务）
/// 以及测试里的假客户端都实现它。
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::clients::gemini_client::GeminiClient;
use crate::clients::openai_client::OpenAiClient;
use crate::config::{Config, LlmProvider};
use crate::error::AppResult;

/// 采样参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 4000,
        }
    }
}

impl From<&Config> for GenerationSettings {
    fn from(config: &Config) -> Self {
        Self {
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 模型名称（用于日志和错误信息）
    fn model_name(&self) -> &str;

    /// 结构化生成：要求输出符合 `schema`，返回解析好的 JSON
    async fn generate_object(&self, prompt: &str, schema: &Value) -> AppResult<Value>;

    /// 纯文本生成
    async fn generate_text(&self, prompt: &str) -> AppResult<String>;
}

/// 按配置创建客户端
///
/// 未配置 API Key 时直接返回配置错误，不会发出任何请求。
pub fn client_from_config(config: &Config) -> AppResult<Arc<dyn LlmClient>> {
    let api_key = config.require_api_key()?;
    let settings = GenerationSettings::from(config);

    let client: Arc<dyn LlmClient> = match config.llm_provider {
        LlmProvider::Gemini => Arc::new(GeminiClient::new(
            api_key,
            config.api_base_url(),
            config.model_name(),
            settings,
        )),
        LlmProvider::OpenAi => Arc::new(OpenAiClient::new(
            api_key,
            config.api_base_url(),
            config.model_name(),
            settings,
        )),
    };

    Ok(client)
}
