//! 日志工具模块
//!
//! 初始化 tracing，并提供批处理各阶段的日志输出

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::orchestrator::BatchEvent;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则默认 `info`，`verbose` 时为 `debug`。
/// 重复调用不会报错。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(model: &str, batch_size: usize) {
    info!("{}", "═".repeat(60));
    info!("🍽️ Wolt Instinct 批量建议生成 (模型: {}, 每批 {} 条)", model, batch_size);
    info!("{}", "═".repeat(60));
}

/// 记录 CSV 加载信息
pub fn log_rows_loaded(total: usize, valid: usize, invalid: usize, skipped: usize) {
    info!("✓ CSV 中找到 {} 行", total + skipped);
    if skipped > 0 {
        warn!("⚠️ {} 行列数不匹配，已跳过", skipped);
    }
    info!("📋 有效 {} 行，无效 {} 行\n", valid, invalid);
}

/// 记录批次开始信息
///
/// `first` / `last` 是本批第一条和最后一条的序号（从 1 开始）。
pub fn log_batch_start(batch: usize, batches: usize, first: usize, last: usize, rows: usize) {
    info!("{}", "═".repeat(60));
    info!("🚚 批次 {}/{} · 第 {}..={} 条（共 {} 条）", batch, batches, first, last, rows);
    info!("{}", "═".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(batch: usize, batches: usize, succeeded: usize, attempted: usize) {
    let mark = if succeeded == attempted { "✅" } else { "⚠️" };
    info!(
        "{} 批次 {}/{} 结束: {}/{} 张卡片生成成功",
        mark, batch, batches, succeeded, attempted
    );
    info!("{}", "─".repeat(60));
}

/// 输出进度事件（由 main 中消费 channel 的任务调用）
///
/// 批处理器本身不输出单条结果，全部由这里负责。
pub fn log_event(event: &BatchEvent) {
    match event {
        BatchEvent::ItemSucceeded {
            index,
            user_id,
            title,
            item_count,
        } => {
            info!("[{}] ✅ {}: {} ({} items)", index + 1, user_id, title, item_count);
        }
        BatchEvent::ItemFailed {
            index,
            user_id,
            error,
        } => {
            error!("[{}] ❌ {}: {}", index + 1, user_id, error);
        }
        BatchEvent::BatchCompleted {
            batch_number,
            total_batches,
            successful,
            failed,
        } => log_batch_complete(*batch_number, *total_batches, *successful, successful + failed),
    }
}

/// 打印最终统计信息
pub fn print_final_stats(
    successful: usize,
    failed: usize,
    processed: usize,
    success_rate: f64,
    output_path: &str,
) {
    info!("{}", "═".repeat(60));
    info!(
        "🏁 运行结束 @ {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("   卡片: {} 成功 / {} 失败 / {} 行", successful, failed, processed);
    info!("   成功率: {:.1}%", success_rate);
    info!("   结果文件: {}", output_path);
    info!("{}", "═".repeat(60));
}

/// 日志里只显示前 `limit` 个字符
pub fn truncate_text(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("建议卡片生成", 2), "建议...");
    }

    #[test]
    fn test_log_event_handles_every_event() {
        init(false);
        log_event(&BatchEvent::ItemSucceeded {
            index: 0,
            user_id: "u1".to_string(),
            title: "Lunch".to_string(),
            item_count: 3,
        });
        log_event(&BatchEvent::ItemFailed {
            index: 1,
            user_id: "u2".to_string(),
            error: "boom".to_string(),
        });
        log_event(&BatchEvent::BatchCompleted {
            batch_number: 1,
            total_batches: 1,
            successful: 1,
            failed: 1,
        });
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
