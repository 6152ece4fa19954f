//! PackageManager 相关数据类型定义

/// 命令输出结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// 失败时给用户看的简要原因
    pub fn failure_detail(&self) -> String {
        let code = match self.code {
            Some(code) => format!("退出码 {code}"),
            None => "被信号终止".to_string(),
        };
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            code
        } else {
            let last = stderr.lines().last().unwrap_or(stderr);
            format!("{code}: {last}")
        }
    }
}

/// 单次执行的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(CommandOutput),
    Failed {
        detail: String,
        output: Option<CommandOutput>,
    },
}

impl Outcome {
    pub fn output(&self) -> Option<&CommandOutput> {
        match self {
            Outcome::Success(output) => Some(output),
            Outcome::Failed { output, .. } => output.as_ref(),
        }
    }
}
