//! 错误分类

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CojusError {
    /// 数据文件不存在
    #[error("找不到数据文件 {}，请先运行 `cojus sync`", path.display())]
    DataUnavailable { path: PathBuf },

    /// 数据文件内容不是预期的 JSON 数组
    #[error("数据文件 {} 解析失败: {reason}", path.display())]
    DataCorrupt { path: PathBuf, reason: String },

    /// ID 或版本标签不存在
    #[error("{}", describe_not_found(*id, version.as_deref()))]
    NotFound { id: u32, version: Option<String> },

    /// 无法获取已安装包列表
    #[error("无法获取已安装包列表: {0}")]
    EnvironmentQueryFailed(String),

    /// 子进程启动失败或非零退出
    #[error("命令执行失败 `{command}`: {detail}")]
    ExecutionFailed { command: String, detail: String },

    /// 用户取消了交互选择
    #[error("操作已取消")]
    SelectionCancelled,
}

impl CojusError {
    /// 致命错误会中止整个调用；其余错误只影响当前条目
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CojusError::DataUnavailable { .. }
                | CojusError::DataCorrupt { .. }
                | CojusError::EnvironmentQueryFailed(_)
        )
    }
}

fn describe_not_found(id: u32, version: Option<&str>) -> String {
    match version {
        Some(tag) => format!("ID {id} 没有版本 {tag}"),
        None => format!("ID {id} 没有对应的安装命令"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_load_and_environment_errors_are_fatal() {
        assert!(CojusError::DataUnavailable { path: "x".into() }.is_fatal());
        assert!(CojusError::DataCorrupt {
            path: "x".into(),
            reason: "bad".into()
        }
        .is_fatal());
        assert!(CojusError::EnvironmentQueryFailed("npm".into()).is_fatal());

        assert!(!CojusError::NotFound { id: 1, version: None }.is_fatal());
        assert!(!CojusError::SelectionCancelled.is_fatal());
        assert!(!CojusError::ExecutionFailed {
            command: "npm i".into(),
            detail: "exit 1".into()
        }
        .is_fatal());
    }

    #[test]
    fn not_found_message_names_missing_version() {
        let err = CojusError::NotFound {
            id: 7,
            version: Some("2.0.0".into()),
        };
        assert_eq!(err.to_string(), "ID 7 没有版本 2.0.0");

        let err = CojusError::NotFound { id: 999, version: None };
        assert!(err.to_string().contains("999"));
    }
}
