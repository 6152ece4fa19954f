//! 包管理器模块：对 npm / pnpm / yarn 的封装

pub mod parser;
pub mod runner;
pub mod types;

pub use runner::{CommandRunner, ShellRunner};
pub use types::{CommandOutput, Outcome};

use crate::error::CojusError;
use anyhow::{anyhow, Result};
use parser::parse_installed_packages;
use std::collections::BTreeSet;
use std::process::Command;

#[derive(Debug, Clone)]
pub struct PackageManager {
    pub command: String,
}

impl PackageManager {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// 确认配置的包管理器在 PATH 中
    pub fn detect(command: &str) -> Result<Self> {
        if Command::new("which")
            .arg(command)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok(Self::new(command));
        }
        Err(anyhow!("未找到包管理器 {}", command))
    }

    /// 列出顶层已安装包的命令
    pub fn list_installed_command(&self) -> String {
        format!("{} ls --depth=0 --json", self.command)
    }

    /// 卸载单个包的命令
    pub fn uninstall_command(&self, package: &str) -> String {
        format!("{} uninstall {}", self.command, package)
    }

    /// 查询当前已安装的顶层包名。每次调用都重新查询，不缓存。
    pub async fn installed_packages<R>(&self, runner: &R) -> Result<BTreeSet<String>, CojusError>
    where
        R: CommandRunner + ?Sized,
    {
        let command = self.list_installed_command();
        let output = runner
            .run(&command)
            .await
            .map_err(|e| CojusError::EnvironmentQueryFailed(format!("{command}: {e}")))?;

        match parse_installed_packages(&output.stdout) {
            Ok(names) => {
                if !output.success {
                    // npm 在有 extraneous / missing peer 时也会非零退出，但 JSON 仍然可用
                    log::warn!("{} 退出码非零，仍使用其输出: {}", command, output.failure_detail());
                }
                log::debug!("已安装 {} 个顶层包", names.len());
                Ok(names)
            }
            Err(e) => Err(CojusError::EnvironmentQueryFailed(format!(
                "{command}: {}",
                if output.success {
                    e.to_string()
                } else {
                    output.failure_detail()
                }
            ))),
        }
    }
}
