//! OpenAI 兼容服务客户端
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 结构化模式使用 `response_format: json_schema`

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::clients::llm_client::{GenerationSettings, LlmClient};
use crate::error::{AppError, AppResult, LlmError};
use crate::services::schema::SCHEMA_NAME;

/// OpenAI 兼容客户端
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model_name: String,
    settings: GenerationSettings,
}

impl OpenAiClient {
    /// 创建新的客户端
    pub fn new(
        api_key: &str,
        api_base_url: impl Into<String>,
        model_name: impl Into<String>,
        settings: GenerationSettings,
    ) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: model_name.into(),
            settings,
        }
    }

    /// 发送单条用户消息，返回模型回复内容
    async fn complete(&self, prompt: &str, response_format: Option<ResponseFormat>) -> AppResult<String> {
        debug!(
            "调用 LLM API，模型: {}，结构化: {}",
            self.model_name,
            response_format.is_some()
        );
        debug!("用户消息长度: {} 字符", prompt.len());

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| LlmError::RequestBuild(e.to_string()))?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(self.settings.temperature)
            .max_tokens(self.settings.max_tokens);
        if let Some(format) = response_format {
            builder.response_format(format);
        }
        let request = builder
            .build()
            .map_err(|e| LlmError::RequestBuild(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate_object(&self, prompt: &str, schema: &Value) -> AppResult<Value> {
        let format = ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: Some("Wolt Instinct suggestion card".to_string()),
                name: SCHEMA_NAME.to_string(),
                schema: Some(schema.clone()),
                strict: None,
            },
        };
        let content = self.complete(prompt, Some(format)).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn generate_text(&self, prompt: &str) -> AppResult<String> {
        self.complete(prompt, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 需要真实的 OpenAI 兼容服务：
    /// ```bash
    /// OPENAI_API_KEY=... cargo test test_openai_generate_text -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_openai_generate_text() {
        let _ = tracing_subscriber::fmt::try_init();

        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        let client = OpenAiClient::new(
            &api_key,
            "https://api.openai.com/v1",
            "gpt-4o-mini",
            GenerationSettings::default(),
        );

        let response = client.generate_text("Reply with the single word: pong").await;
        match response {
            Ok(text) => {
                println!("LLM 响应: {}", text);
                assert!(!text.is_empty());
            }
            Err(e) => panic!("LLM 调用失败: {}", e),
        }
    }
}
