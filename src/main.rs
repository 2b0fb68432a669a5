use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::info;

use wolt_instinct::models::{csv_excerpt, load_params_csv};
use wolt_instinct::utils::logging;
use wolt_instinct::{
    BatchOptions, BatchProcessor, Config, RecommendationParams, RunReport, SuggestionService,
};

#[derive(Parser, Debug)]
#[command(
    name = "wolt-instinct",
    version,
    about = "Generate Wolt Instinct suggestion cards with an LLM"
)]
struct Cli {
    /// TOML 配置文件（可选，环境变量会覆盖其中的值）
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 输出 debug 日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 批量处理 CSV 中的参数并写出结果文件
    Batch {
        /// 输入 CSV 文件
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,

        /// 输出 JSON 文件
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// 最多处理的行数
        #[arg(long)]
        max_rows: Option<usize>,

        /// 每批条数
        #[arg(long)]
        batch_size: Option<usize>,

        /// 把 CSV 前 N 行作为参考数据放进提示词，0 表示不放
        #[arg(long, default_value_t = 0)]
        reference_lines: usize,
    },

    /// 为单组参数（JSON 文件）生成建议并打印
    Suggest {
        /// 参数 JSON 文件，字段为 camelCase
        #[arg(value_name = "PARAMS_JSON")]
        params: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref()).context("加载配置失败")?;
    if cli.verbose {
        config.verbose_logging = true;
    }

    // 初始化日志
    logging::init(config.verbose_logging);

    match cli.command {
        Command::Batch {
            csv,
            output,
            max_rows,
            batch_size,
            reference_lines,
        } => {
            if let Some(csv) = csv {
                config.csv_file = csv.display().to_string();
            }
            if let Some(output) = output {
                config.output_file = output.display().to_string();
            }
            if let Some(max_rows) = max_rows {
                config.max_rows = max_rows;
            }
            if let Some(batch_size) = batch_size {
                config.batch_size = batch_size;
            }
            run_batch(&config, reference_lines).await
        }
        Command::Suggest { params } => run_suggest(&config, &params).await,
    }
}

async fn run_batch(config: &Config, reference_lines: usize) -> Result<()> {
    // 没有 API Key 时不读 CSV
    config.require_api_key()?;

    logging::log_startup(config.model_name(), config.batch_size);

    let csv_path = Path::new(&config.csv_file);
    info!("📂 读取 CSV: {}", csv_path.display());
    let load = load_params_csv(csv_path, config.max_rows)?;

    let (row_indices, params): (Vec<usize>, Vec<RecommendationParams>) =
        load.valid().map(|(idx, p)| (idx, p.clone())).unzip();
    let invalid_rows: Vec<(usize, String)> = load
        .invalid()
        .map(|(idx, e)| (idx, e.to_string()))
        .collect();
    logging::log_rows_loaded(load.rows.len(), params.len(), invalid_rows.len(), load.skipped);

    let mut service = SuggestionService::from_config(config)?;
    if reference_lines > 0 {
        // 表头也算一行
        let excerpt = csv_excerpt(csv_path, reference_lines + 1)?;
        service = service.with_reference_data(excerpt);
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let progress = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            logging::log_event(&event);
        }
    });

    let processor = BatchProcessor::new(&service, BatchOptions::from(config));
    let results = processor.run(params, Some(&tx)).await;
    drop(tx);
    progress.await.context("进度任务异常退出")?;

    let report = RunReport::build(load.rows.len(), invalid_rows, &row_indices, results);
    report.write_to(Path::new(&config.output_file)).await?;

    logging::print_final_stats(
        report.summary.successful,
        report.summary.failed,
        report.summary.processed,
        report.success_rate(),
        &config.output_file,
    );

    Ok(())
}

async fn run_suggest(config: &Config, path: &Path) -> Result<()> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("读取参数文件失败: {}", path.display()))?;
    let params: RecommendationParams =
        serde_json::from_str(&content).context("参数文件不是合法的 JSON")?;

    let service = SuggestionService::from_config(config)?;
    info!("🤖 模型: {}", service.model_name());

    let suggestion = service.get_suggestion(&params).await?;
    println!("{}", serde_json::to_string_pretty(&suggestion)?);

    Ok(())
}
