//! 各子命令的流程：逐项执行，单项错误记入报告后继续，致命错误向上返回

use crate::catalog::{Catalog, ResolvedCommand};
use crate::cli::InstallSpec;
use crate::error::CojusError;
use crate::executor::Executor;
use crate::package_manager::{CommandRunner, Outcome, PackageManager};
use crate::reconciler::{find_installed, uninstall_targets, UninstallChoice};
use crate::report::{ItemStatus, RunReport};
use crate::resolver::Resolver;
use crate::selector::{Selection, Selector};
use anyhow::Result;
use crossterm::style::Stylize;

/// 按编号批量安装
pub async fn install<R, S>(
    catalog: &Catalog,
    runner: &R,
    selector: &mut S,
    specs: &[InstallSpec],
    pick: bool,
) -> Result<RunReport>
where
    R: CommandRunner + ?Sized,
    S: Selector + ?Sized,
{
    let resolver = Resolver::new(catalog);
    let executor = Executor::new(runner);
    let mut report = RunReport::new("install");

    for spec in specs {
        let resolution = if pick {
            resolver.resolve_interactive(spec.id, spec.version.as_deref(), selector)
        } else {
            resolver
                .resolve(spec.id, spec.version.as_deref())
                .map_err(anyhow::Error::from)
        };
        install_resolved(&executor, &mut report, spec.id, resolution).await?;
    }

    finish(&report);
    Ok(report)
}

/// 搜索后多选安装。没有查询词时先交互输入，取消即结束。
pub async fn search<R, S>(
    catalog: &Catalog,
    runner: &R,
    selector: &mut S,
    query: Option<String>,
) -> Result<RunReport>
where
    R: CommandRunner + ?Sized,
    S: Selector + ?Sized,
{
    let mut report = RunReport::new("search");

    let query = match query {
        Some(query) => query,
        None => match selector.prompt_text("搜索标题或文档编号")? {
            Selection::Picked(query) => query,
            Selection::Cancelled => {
                println!("{}", "已取消".yellow());
                return Ok(report);
            }
        },
    };

    let matches = catalog.search(&query);
    if matches.is_empty() {
        println!("{}", format!("没有与 \"{query}\" 匹配的文档").yellow());
        return Ok(report);
    }

    let labels: Vec<String> = matches
        .iter()
        .map(|entry| format!("[{}] {}", entry.id, entry.title))
        .collect();
    let ids: Vec<u32> = match selector.choose_many("选择要安装的文档", &labels)? {
        Selection::Picked(indices) => indices
            .into_iter()
            .filter_map(|idx| matches.get(idx).map(|entry| entry.id))
            .collect(),
        Selection::Cancelled => {
            println!("{}", "已取消".yellow());
            return Ok(report);
        }
    };

    let resolver = Resolver::new(catalog);
    let executor = Executor::new(runner);
    for id in ids {
        let resolution = resolver.resolve_interactive(id, None, selector);
        install_resolved(&executor, &mut report, id, resolution).await?;
    }

    finish(&report);
    Ok(report)
}

/// 对账已安装包，多选后逐个卸载
pub async fn uninstall<R, S>(
    catalog: &Catalog,
    pm: &PackageManager,
    runner: &R,
    selector: &mut S,
) -> Result<RunReport>
where
    R: CommandRunner + ?Sized,
    S: Selector + ?Sized,
{
    let mut report = RunReport::new("uninstall");

    let candidates = find_installed(catalog, pm, runner).await?;
    if candidates.is_empty() {
        println!("{}", "没有找到可卸载的已安装包".yellow());
        return Ok(report);
    }

    let mut options = vec![format!(
        "全部 ({} 个包)",
        uninstall_targets(&candidates, &UninstallChoice::All).len()
    )];
    options.extend(candidates.iter().map(|c| c.label()));

    let choice = match selector.choose_many("选择要卸载的条目", &options)? {
        Selection::Picked(indices) => to_uninstall_choice(&indices),
        Selection::Cancelled => {
            println!("{}", "已取消".yellow());
            return Ok(report);
        }
    };

    let executor = Executor::new(runner);
    for name in uninstall_targets(&candidates, &choice) {
        let command = pm.uninstall_command(&name);
        println!("{}", format!("→ 卸载 {name}: {command}").cyan());
        let outcome = executor.run_command(&command).await;
        let status = print_outcome(&name, &command, outcome);
        report.record(name, Some(command), status);
    }

    finish(&report);
    Ok(report)
}

/// `list` 子命令的输出行
pub fn list_lines(catalog: &Catalog) -> Vec<String> {
    catalog
        .entries()
        .iter()
        .map(|entry| {
            let versions = catalog.versions(entry.id);
            let suffix = if versions.is_empty() {
                String::new()
            } else {
                format!("  [{} 个版本]", versions.len())
            };
            format!("{:>5}  {}{}\n       {}", entry.id, entry.title, suffix, entry.command)
        })
        .collect()
}

/// 选项 0 是 "全部"，其余下标对应候选
fn to_uninstall_choice(indices: &[usize]) -> UninstallChoice {
    if indices.contains(&0) {
        UninstallChoice::All
    } else {
        UninstallChoice::Entries(indices.iter().map(|idx| idx - 1).collect())
    }
}

async fn install_resolved<R>(
    executor: &Executor<'_, R>,
    report: &mut RunReport,
    id: u32,
    resolution: Result<ResolvedCommand>,
) -> Result<()>
where
    R: CommandRunner + ?Sized,
{
    let resolved = match resolution {
        Ok(resolved) => resolved,
        Err(e) => {
            let status = ItemStatus::from_error(&e).ok_or(e)?;
            match &status {
                ItemStatus::Cancelled => println!("{}", format!("ID {id}: 已取消").yellow()),
                _ => eprintln!("{}", format!("错误: {}", status_message(&status)).red()),
            }
            report.record(format!("ID {id}"), None, status);
            return Ok(());
        }
    };

    println!(
        "{}",
        format!("→ [{}] 执行命令: {}", resolved.label, resolved.shell_command).cyan()
    );
    let outcome = executor.run(&resolved).await;
    let status = print_outcome(&resolved.label, &resolved.shell_command, outcome);
    report.record(resolved.label, Some(resolved.shell_command), status);
    Ok(())
}

fn print_outcome(label: &str, command: &str, outcome: Outcome) -> ItemStatus {
    if let Some(output) = outcome.output() {
        if !output.stdout.trim().is_empty() {
            println!("{}", format!("[{label}] STDOUT:\n{}", output.stdout).green());
        }
        if !output.stderr.trim().is_empty() {
            eprintln!("{}", format!("[{label}] STDERR:\n{}", output.stderr).yellow());
        }
    }
    match outcome {
        Outcome::Success(_) => ItemStatus::Succeeded,
        Outcome::Failed { detail, .. } => {
            let err = CojusError::ExecutionFailed {
                command: command.to_string(),
                detail: detail.clone(),
            };
            eprintln!("{}", format!("[{label}] {err}，继续下一项").red());
            ItemStatus::Failed(detail)
        }
    }
}

fn status_message(status: &ItemStatus) -> &str {
    match status {
        ItemStatus::NotFound(message) | ItemStatus::Failed(message) => message.as_str(),
        ItemStatus::Succeeded => "OK",
        ItemStatus::Cancelled => "已取消",
    }
}

fn finish(report: &RunReport) {
    if report.items.is_empty() {
        return;
    }
    println!("\n{}", format!("全部完成: {}", report.summary_line()).magenta());
}
