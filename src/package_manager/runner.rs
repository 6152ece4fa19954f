//! 子进程执行
//!
//! 每次调用运行一条 shell 命令直到结束，分别捕获 stdout / stderr。
//! 非零退出不算错误，由调用方根据 `CommandOutput::success` 判断；
//! 只有进程无法启动时才返回 `Err`。

use super::types::CommandOutput;
use anyhow::Result;

#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, command: &str) -> Result<CommandOutput>;
}

/// 通过 `sh -c` 执行命令
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<CommandOutput> {
        let command = command.to_string();
        log::debug!("执行: {}", command);
        let output = tokio::task::spawn_blocking(move || {
            shell_expression(&command)
                .stdout_capture()
                .stderr_capture()
                .unchecked()
                .run()
        })
        .await??;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

fn shell_expression(command: &str) -> duct::Expression {
    let expr = duct::cmd("sh", ["-c", command]);

    #[cfg(target_os = "linux")]
    let expr = expr.before_spawn(|cmd| {
        use std::os::unix::process::CommandExt;
        unsafe {
            cmd.pre_exec(|| {
                // cojus 被终止时一并结束子进程，避免安装在后台继续
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }
        Ok(())
    });

    expr
}
