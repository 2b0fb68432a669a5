//! 程序配置
//!
//! 加载顺序：默认值 → TOML 文件（可选）→ 环境变量。
//! 配置通过参数显式传入服务层，库代码本身不读取环境变量。

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppResult, ConfigError, FileError};

/// LLM 提供方
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini 原生 generateContent 接口
    #[default]
    Gemini,
    /// 兼容 OpenAI chat completions 的服务
    OpenAi,
}

impl LlmProvider {
    /// 默认 API 地址
    pub fn default_api_base(self) -> &'static str {
        match self {
            LlmProvider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            LlmProvider::OpenAi => "https://api.openai.com/v1",
        }
    }

    /// 未配置 `llm_model_name` 时使用的模型
    pub fn default_model(self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini-2.5-flash",
            LlmProvider::OpenAi => "gpt-4o-mini",
        }
    }

    /// 读取 API Key 的环境变量，按优先级排列
    pub fn api_key_vars(self) -> &'static [&'static str] {
        match self {
            LlmProvider::Gemini => &["GEMINI_API_KEY", "GOOGLE_GENERATIVE_AI_API_KEY", "LLM_API_KEY"],
            LlmProvider::OpenAi => &["OPENAI_API_KEY", "LLM_API_KEY"],
        }
    }

    fn api_key_hint(self) -> &'static str {
        match self {
            LlmProvider::Gemini => "GEMINI_API_KEY、GOOGLE_GENERATIVE_AI_API_KEY 或 LLM_API_KEY",
            LlmProvider::OpenAi => "OPENAI_API_KEY 或 LLM_API_KEY",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::Gemini => write!(f, "gemini"),
            LlmProvider::OpenAi => write!(f, "openai"),
        }
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            "openai" | "openai-compatible" => Ok(LlmProvider::OpenAi),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_provider: LlmProvider,
    pub llm_api_key: Option<String>,
    /// 为空时使用提供方的默认地址
    pub llm_api_base_url: Option<String>,
    /// 为空时使用提供方的默认模型
    pub llm_model_name: Option<String>,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    // --- 批处理配置 ---
    /// 每批处理的行数
    pub batch_size: usize,
    /// 同一批内两次请求之间的间隔（毫秒）
    pub delay_between_requests_ms: u64,
    /// 两批之间的间隔（毫秒）
    pub delay_between_batches_ms: u64,
    /// 最多处理的 CSV 行数
    pub max_rows: usize,
    /// 输入 CSV 文件
    pub csv_file: String,
    /// 输出结果文件
    pub output_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_provider: LlmProvider::Gemini,
            llm_api_key: None,
            llm_api_base_url: None,
            llm_model_name: None,
            llm_temperature: 0.1,
            llm_max_tokens: 4000,
            batch_size: 10,
            delay_between_requests_ms: 500,
            delay_between_batches_ms: 2000,
            max_rows: 1000,
            csv_file: "dummy-data.csv".to_string(),
            output_file: "suggestions-results.json".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 读取 TOML 文件（如果提供）并叠加环境变量
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// 只使用默认值 + 环境变量
    pub fn from_env() -> AppResult<Self> {
        Self::load(None)
    }

    /// 从 TOML 文件加载，缺失字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let display = path.display().to_string();
        if !path.exists() {
            return Err(FileError::NotFound { path: display }.into());
        }
        let content = std::fs::read_to_string(path).map_err(|source| FileError::ReadFailed {
            path: display.clone(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| FileError::TomlParseFailed {
            path: display,
            source,
        })?;
        Ok(config)
    }

    /// 用 `lookup` 提供的变量覆盖当前配置
    ///
    /// 取值为空字符串的变量视为未设置。
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        // 先确定提供方，再按提供方读取 API Key
        if let Some(provider) = get("LLM_PROVIDER") {
            self.llm_provider = provider.parse()?;
        }
        if let Some(key) = self
            .llm_provider
            .api_key_vars()
            .iter()
            .find_map(|name| get(*name))
        {
            self.llm_api_key = Some(key);
        }
        if let Some(base) = get("LLM_API_BASE_URL") {
            self.llm_api_base_url = Some(base);
        }
        if let Some(model) = get("LLM_MODEL_NAME") {
            self.llm_model_name = Some(model);
        }
        if let Some(v) = get("LLM_TEMPERATURE") {
            self.llm_temperature = parse_var("LLM_TEMPERATURE", &v, "f32")?;
        }
        if let Some(v) = get("LLM_MAX_TOKENS") {
            self.llm_max_tokens = parse_var("LLM_MAX_TOKENS", &v, "u32")?;
        }
        if let Some(v) = get("BATCH_SIZE") {
            self.batch_size = parse_var("BATCH_SIZE", &v, "usize")?;
        }
        if let Some(v) = get("DELAY_BETWEEN_REQUESTS_MS") {
            self.delay_between_requests_ms = parse_var("DELAY_BETWEEN_REQUESTS_MS", &v, "u64")?;
        }
        if let Some(v) = get("DELAY_BETWEEN_BATCHES_MS") {
            self.delay_between_batches_ms = parse_var("DELAY_BETWEEN_BATCHES_MS", &v, "u64")?;
        }
        if let Some(v) = get("MAX_ROWS") {
            self.max_rows = parse_var("MAX_ROWS", &v, "usize")?;
        }
        if let Some(v) = get("CSV_FILE") {
            self.csv_file = v;
        }
        if let Some(v) = get("OUTPUT_FILE") {
            self.output_file = v;
        }
        if let Some(v) = get("VERBOSE_LOGGING") {
            self.verbose_logging = parse_var("VERBOSE_LOGGING", &v, "bool")?;
        }
        Ok(())
    }

    /// 实际使用的 API 地址
    pub fn api_base_url(&self) -> String {
        self.llm_api_base_url
            .clone()
            .unwrap_or_else(|| self.llm_provider.default_api_base().to_string())
    }

    /// 实际使用的模型
    pub fn model_name(&self) -> &str {
        self.llm_model_name
            .as_deref()
            .unwrap_or_else(|| self.llm_provider.default_model())
    }

    /// 取出 API Key，未配置时返回配置错误
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        match self.llm_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey {
                provider: self.llm_provider.to_string(),
                hint: self.llm_provider.api_key_hint(),
            }),
        }
    }

    pub fn delay_between_requests(&self) -> Duration {
        Duration::from_millis(self.delay_between_requests_ms)
    }

    pub fn delay_between_batches(&self) -> Duration {
        Duration::from_millis(self.delay_between_batches_ms)
    }
}

fn parse_var<T: FromStr>(
    var_name: &str,
    value: &str,
    expected_type: &'static str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type,
        })
}
