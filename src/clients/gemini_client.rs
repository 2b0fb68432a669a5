//! Gemini generateContent 客户端
//!
//! 结构化模式通过 `generationConfig.responseMimeType = application/json`
//! 和 `responseJsonSchema` 让服务端约束输出。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::clients::llm_client::{GenerationSettings, LlmClient};
use crate::error::{AppError, AppResult, LlmError};

/// Gemini 客户端
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
    settings: GenerationSettings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_json_schema: Option<&'a Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    pub fn new(
        api_key: impl Into<String>,
        api_base_url: impl Into<String>,
        model_name: impl Into<String>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            model_name: model_name.into(),
            settings,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base_url, self.model_name
        )
    }

    fn build_request<'a>(&self, prompt: &'a str, schema: Option<&'a Value>) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                max_output_tokens: self.settings.max_tokens,
                response_mime_type: schema.map(|_| "application/json"),
                response_json_schema: schema,
            },
        }
    }

    /// 发送请求并取出第一个候选的文本
    async fn generate(&self, prompt: &str, schema: Option<&Value>) -> AppResult<String> {
        debug!(
            "调用 Gemini API，模型: {}，结构化: {}",
            self.model_name,
            schema.is_some()
        );
        debug!("提示词长度: {} 字符", prompt.len());

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_request(prompt, schema))
            .send()
            .await
            .map_err(|e| {
                warn!("Gemini API 调用失败: {}", e);
                AppError::llm_api_failed(&self.model_name, e)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|env| env.error.message)
                .unwrap_or(body);
            warn!("Gemini API 返回错误 {}: {}", status, message);
            return Err(LlmError::BadResponse {
                model: self.model_name.clone(),
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        let text = extract_text(parsed).ok_or_else(|| LlmError::EmptyContent {
            model: self.model_name.clone(),
        })?;

        debug!("Gemini API 调用成功");
        Ok(text)
    }
}

/// 拼接第一个候选的所有文本片段
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason != "STOP" {
            debug!("Gemini finishReason: {}", reason);
        }
    }

    let text: String = candidate
        .content?
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate_object(&self, prompt: &str, schema: &Value) -> AppResult<Value> {
        let text = self.generate(prompt, Some(schema)).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn generate_text(&self, prompt: &str) -> AppResult<String> {
        self.generate(prompt, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> GeminiClient {
        GeminiClient::new(
            "test-api-key",
            "https://generativelanguage.googleapis.com/v1beta/",
            "gemini-2.5-flash",
            GenerationSettings::default(),
        )
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            client().endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_structured_request_body() {
        let schema = json!({"type": "object"});
        let client = client();
        let body = serde_json::to_value(client.build_request("hello", Some(&schema))).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 4000);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseJsonSchema"], schema);
    }

    #[test]
    fn test_text_request_has_no_schema() {
        let client = client();
        let body = serde_json::to_value(client.build_request("hello", None)).unwrap();
        assert!(body["generationConfig"].get("responseMimeType").is_none());
        assert!(body["generationConfig"].get("responseJsonSchema").is_none());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"a\":" }, { "text": " 1}" }] },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(extract_text(response).as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_extract_text_empty() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(extract_text(response).is_none());
    }
}
