//! 安装执行器：运行解析好的命令，任何失败都转换为 `Outcome::Failed`

use crate::catalog::ResolvedCommand;
use crate::package_manager::parser::clean_terminal_output;
use crate::package_manager::{CommandOutput, CommandRunner, Outcome};

pub struct Executor<'a, R: ?Sized> {
    runner: &'a R,
}

impl<'a, R> Executor<'a, R>
where
    R: CommandRunner + ?Sized,
{
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }

    pub async fn run(&self, resolved: &ResolvedCommand) -> Outcome {
        self.run_command(&resolved.shell_command).await
    }

    /// 执行一次，不重试
    pub async fn run_command(&self, command: &str) -> Outcome {
        match self.runner.run(command).await {
            Ok(output) => {
                let output = CommandOutput {
                    stdout: clean_terminal_output(&output.stdout),
                    stderr: clean_terminal_output(&output.stderr),
                    ..output
                };
                if output.success {
                    Outcome::Success(output)
                } else {
                    log::warn!("`{}` 失败: {}", command, output.failure_detail());
                    Outcome::Failed {
                        detail: output.failure_detail(),
                        output: Some(output),
                    }
                }
            }
            Err(e) => {
                log::error!("`{}` 无法启动: {:#}", command, e);
                Outcome::Failed {
                    detail: format!("{e:#}"),
                    output: None,
                }
            }
        }
    }
}
