//! # Obsidian Sensors CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 选项加载与校验
//! - 选项 schema 查询
//! - 记录写回 (可复现的选项包)
//! - 传输自检

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::debug;

use cli::{Cli, Commands};
use commands::{run_rewrite, run_roundtrip, run_schema, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: cli.metrics_port,
        default_log_level: cli.log_level().to_string(),
    })?;

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        "obsidian-sensors starting"
    );

    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args),
        Commands::Schema(args) => run_schema(args),
        Commands::Rewrite(args) => run_rewrite(args),
        Commands::Roundtrip(args) => run_roundtrip(args).await,
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    Ok(result?)
}
