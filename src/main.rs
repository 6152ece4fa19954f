mod catalog;
mod cli;
mod config;
mod error;
mod executor;
mod flows;
mod package_manager;
mod reconciler;
mod report;
mod resolver;
mod selector;
mod tui;

use anyhow::Result;
use catalog::Catalog;
use clap::Parser;
use cli::{normalize_legacy_args, Cli, Commands};
use config::Config;
use crossterm::style::Stylize;
use package_manager::{PackageManager, ShellRunner};
use report::{ReportSaver, RunReport};
use std::process::ExitCode;
use tui::TerminalSelector;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_legacy_args(std::env::args().collect()));

    // 默认只输出 warn；-v 打开 debug；RUST_LOG 优先
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", format!("错误: {e:#}").red());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = Config::load_or_default()?;
    // --data-dir > COJUS_DATA_DIR > 配置文件
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    log::debug!("数据目录 {}", config.data_dir.display());

    match cli.command {
        Commands::Sync => {
            let summary = catalog::sync::sync(&config).await?;
            println!(
                "{}",
                format!(
                    "同步完成: {} 个文档，{} 个版本文件 → {}",
                    summary.entries,
                    summary.version_files,
                    config.data_dir.display()
                )
                .green()
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::List => {
            let catalog = load_catalog(&config)?;
            for line in flows::list_lines(&catalog) {
                println!("{line}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Install { specs, pick, strict } => {
            let catalog = load_catalog(&config)?;
            let mut selector = TerminalSelector::new();
            let report = flows::install(&catalog, &ShellRunner, &mut selector, &specs, pick).await?;
            Ok(conclude(&config, &report, strict))
        }
        Commands::Search { query, strict } => {
            let catalog = load_catalog(&config)?;
            let mut selector = TerminalSelector::new();
            let report = flows::search(&catalog, &ShellRunner, &mut selector, query).await?;
            Ok(conclude(&config, &report, strict))
        }
        Commands::Uninstall { strict } => {
            let catalog = load_catalog(&config)?;
            let pm = PackageManager::detect(&config.package_manager).unwrap_or_else(|e| {
                // 仍然尝试查询，失败时由查询给出具体原因
                log::warn!("{e}");
                PackageManager::new(config.package_manager.as_str())
            });
            let mut selector = TerminalSelector::new();
            let report = flows::uninstall(&catalog, &pm, &ShellRunner, &mut selector).await?;
            Ok(conclude(&config, &report, strict))
        }
    }
}

fn load_catalog(config: &Config) -> Result<Catalog> {
    let catalog = Catalog::load(&config.catalog_path(), &config.versions_dir())?;
    log::debug!("已加载 {} 个文档", catalog.entries().len());
    Ok(catalog)
}

/// 保存报告并给出退出码
fn conclude(config: &Config, report: &RunReport, strict: bool) -> ExitCode {
    if config.save_reports && !report.items.is_empty() {
        match ReportSaver::new(config.report_dir.clone()).save(report) {
            Ok(path) => log::info!("报告已保存到 {}", path.display()),
            Err(e) => log::error!("保存报告失败: {e:#}"),
        }
    }

    ExitCode::from(report.exit_code(strict))
}
