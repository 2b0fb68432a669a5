use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 请求参数缺少必填字段
    #[error("Missing required fields: {}", missing.join(", "))]
    MissingRequiredFields { missing: Vec<&'static str> },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),

    /// 响应解析 / 校验错误
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),

    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),

    /// 结构化生成与兜底解析都失败
    #[error("生成建议失败: {fallback}. Original error: {original}")]
    SuggestionFailed {
        fallback: Box<AppError>,
        original: Box<AppError>,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 未配置 API Key
    #[error("未配置 {provider} API Key，请设置 {hint} 环境变量")]
    MissingApiKey {
        provider: String,
        hint: &'static str,
    },

    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: &'static str,
    },

    /// 未知的 LLM 提供方
    #[error("未知的 LLM 提供方: {0}")]
    UnknownProvider(String),
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败（网络 / 客户端错误）
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// API 返回错误响应
    #[error("LLM API返回错误响应 (模型: {model}, 状态码: {status}): {message}")]
    BadResponse {
        model: String,
        status: u16,
        message: String,
    },

    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },

    /// 构建请求失败
    #[error("构建LLM请求失败: {0}")]
    RequestBuild(String),
}

/// 响应解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    /// 文本中找不到 JSON 对象
    #[error("No JSON found in response")]
    NoJsonFound,

    /// JSON 语法错误
    #[error("Failed to parse JSON response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// items 数量不在 2-5 之间
    #[error("Invalid items count: expected 2-5 items, got {0}")]
    InvalidItemCount(usize),

    /// 其他不符合 schema 的字段
    #[error("Schema violation at `{field}`: {reason}")]
    SchemaViolation { field: String, reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },

    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// CSV 解析失败
    #[error("CSV解析失败 ({path}): {reason}")]
    CsvParseFailed { path: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 创建 schema 校验错误
    pub fn schema_violation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Parse(ParseError::SchemaViolation {
            field: field.into(),
            reason: reason.into(),
        })
    }

    /// 是否为调用前就能发现的错误（参数 / 配置）
    pub fn is_precondition(&self) -> bool {
        matches!(self, AppError::MissingRequiredFields { .. } | AppError::Config(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(ParseError::InvalidJson(err))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_lists_fields() {
        let err = AppError::MissingRequiredFields {
            missing: vec!["userId", "timeOfDay"],
        };
        assert_eq!(err.to_string(), "Missing required fields: userId, timeOfDay");
        assert!(err.is_precondition());
    }

    #[test]
    fn test_suggestion_failed_includes_both_errors() {
        let err = AppError::SuggestionFailed {
            fallback: Box::new(AppError::Parse(ParseError::NoJsonFound)),
            original: Box::new(AppError::Llm(LlmError::EmptyContent {
                model: "gemini-2.5-flash".to_string(),
            })),
        };
        let msg = err.to_string();
        assert!(msg.contains("No JSON found in response"));
        assert!(msg.contains("LLM返回内容为空"));
        assert!(!err.is_precondition());
    }
}
