//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量建议处理器
//! - 把参数列表分批，批内顺序请求、固定间隔
//! - 每条输入对应一条结果，保留原始索引
//! - 通过 channel 发送进度事件
//!
//! ### `report` - 结果文件
//! - 合并 CSV 无效行与批处理结果
//! - 输出汇总统计和逐行结果
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<RecommendationParams>)
//!     ↓
//! services::SuggestionService (处理单组参数)
//!     ↓
//! clients (Gemini / OpenAI 兼容服务)
//! ```

pub mod batch_processor;
pub mod report;

pub use batch_processor::{BatchEvent, BatchItemResult, BatchOptions, BatchProcessor};
pub use report::{RowResult, RunReport, RunSummary};
