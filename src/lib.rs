//! # Wolt Instinct
//!
//! 根据用户当前情境，调用 LLM 生成一张外卖建议卡片
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 只负责和 LLM 服务通信
//! - `LlmClient` - 结构化生成 / 纯文本生成两种能力
//! - `GeminiClient` - Gemini generateContent 接口
//! - `OpenAiClient` - OpenAI 兼容的 chat completions 接口
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 只处理一组参数
//! - `context_vector` - 参数 → 情境向量文本
//! - `prompt` / `schema` - 提示词与 JSON Schema
//! - `json_extract` - 从纯文本响应中取出 JSON
//! - `SuggestionService` - 结构化生成 + 兜底解析
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 分批、限速、收集结果
//! - `orchestrator/report` - 汇总结果并写入 JSON 文件
//!
//! ### 其他
//! - `models/` - 请求参数、建议卡片、CSV 加载
//! - `config` - 默认值 → TOML → 环境变量
//! - `error` - 错误类型
//! - `utils/logging` - 日志初始化与输出
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use clients::{client_from_config, LlmClient};
pub use config::{Config, LlmProvider};
pub use error::{AppError, AppResult};
pub use models::{RecommendationParams, Suggestion};
pub use orchestrator::{BatchEvent, BatchOptions, BatchProcessor, RunReport};
pub use services::{build_context_vector, SuggestionService};
