use crate::error::CojusError;
use anyhow::Result;
use chrono::Local;
use std::fs;
use std::path::PathBuf;

/// 单个条目的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemStatus {
    Succeeded,
    Failed(String),
    NotFound(String),
    Cancelled,
}

impl ItemStatus {
    /// 把单个条目的非致命错误归类；致命错误返回 None，由调用方继续向上传播
    pub fn from_error(err: &anyhow::Error) -> Option<Self> {
        match err.downcast_ref::<CojusError>() {
            Some(CojusError::NotFound { .. }) => Some(Self::NotFound(err.to_string())),
            Some(CojusError::SelectionCancelled) => Some(Self::Cancelled),
            Some(CojusError::ExecutionFailed { detail, .. }) => Some(Self::Failed(detail.clone())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ItemReport {
    pub label: String,
    pub command: Option<String>,
    pub status: ItemStatus,
}

/// 一次批量安装 / 卸载的汇总
#[derive(Debug, Clone)]
pub struct RunReport {
    pub operation: String,
    pub items: Vec<ItemReport>,
}

impl RunReport {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            items: Vec::new(),
        }
    }

    pub fn record(&mut self, label: impl Into<String>, command: Option<String>, status: ItemStatus) {
        self.items.push(ItemReport {
            label: label.into(),
            command,
            status,
        });
    }

    pub fn count(&self, pred: impl Fn(&ItemStatus) -> bool) -> usize {
        self.items.iter().filter(|item| pred(&item.status)).count()
    }

    /// 存在失败或未找到的条目（取消不算）
    pub fn has_problems(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item.status, ItemStatus::Failed(_) | ItemStatus::NotFound(_)))
    }

    /// 进程退出码：默认总是 0；strict 时有失败或未找到则为 1，单纯取消不算
    pub fn exit_code(&self, strict: bool) -> u8 {
        u8::from(strict && self.has_problems())
    }

    pub fn summary_line(&self) -> String {
        format!(
            "成功 {} / 失败 {} / 未找到 {} / 取消 {}",
            self.count(|s| matches!(s, ItemStatus::Succeeded)),
            self.count(|s| matches!(s, ItemStatus::Failed(_))),
            self.count(|s| matches!(s, ItemStatus::NotFound(_))),
            self.count(|s| matches!(s, ItemStatus::Cancelled)),
        )
    }

    /// 纯文本日志内容
    pub fn render(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            let status = match &item.status {
                ItemStatus::Succeeded => "OK".to_string(),
                ItemStatus::Failed(detail) => format!("失败: {detail}"),
                ItemStatus::NotFound(message) => format!("未找到: {message}"),
                ItemStatus::Cancelled => "已取消".to_string(),
            };
            out.push_str(&format!("* {}: {}\n", item.label, status));
            if let Some(command) = &item.command {
                out.push_str(&format!("    $ {command}\n"));
            }
        }
        out.push('\n');
        out.push_str(&self.summary_line());
        out.push('\n');
        out
    }
}

pub struct ReportSaver {
    base_dir: PathBuf,
}

impl ReportSaver {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn save(&self, report: &RunReport) -> Result<PathBuf> {
        let now = Local::now();

        // 目录结构: YYYY/MM/DD/
        let dir = self
            .base_dir
            .join(now.format("%Y").to_string())
            .join(now.format("%m").to_string())
            .join(now.format("%d").to_string());
        fs::create_dir_all(&dir)?;

        // 文件名: HH-MM-SS-<operation>.log
        let filename = format!("{}-{}.log", now.format("%H-%M-%S"), report.operation);
        let filepath = dir.join(filename);

        let mut full_content = format!(
            "cojus {} 报告\n生成时间: {}\n\n",
            report.operation,
            now.format("%Y-%m-%d %H:%M:%S")
        );
        full_content.push_str(&report.render());

        fs::write(&filepath, full_content)?;

        Ok(filepath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::tests::test_dir;

    fn sample() -> RunReport {
        let mut report = RunReport::new("install");
        report.record("ID 5 Chart", Some("npm install chart.js".into()), ItemStatus::Succeeded);
        report.record("ID 999", None, ItemStatus::NotFound("ID 999 没有对应的安装命令".into()));
        report.record("ID 6 Map", None, ItemStatus::Cancelled);
        report
    }

    #[test]
    fn summary_counts_each_status() {
        assert_eq!(sample().summary_line(), "成功 1 / 失败 0 / 未找到 1 / 取消 1");
    }

    #[test]
    fn cancellation_alone_is_not_a_problem() {
        let mut report = RunReport::new("search");
        report.record("ID 6", None, ItemStatus::Cancelled);
        assert!(!report.has_problems());
        assert!(sample().has_problems());
    }

    #[test]
    fn exit_code_is_nonzero_only_for_strict_runs_with_problems() {
        assert_eq!(sample().exit_code(false), 0);
        assert_eq!(sample().exit_code(true), 1);

        let mut cancelled = RunReport::new("search");
        cancelled.record("ID 6", None, ItemStatus::Cancelled);
        assert_eq!(cancelled.exit_code(true), 0);

        assert_eq!(RunReport::new("install").exit_code(true), 0);

        let mut failed = RunReport::new("uninstall");
        failed.record("leaflet", Some("npm uninstall leaflet".into()), ItemStatus::Failed("exit 1".into()));
        assert_eq!(failed.exit_code(false), 0);
        assert_eq!(failed.exit_code(true), 1);
    }

    #[test]
    fn per_item_errors_are_classified_and_fatal_ones_are_not() {
        let not_found = anyhow::Error::new(CojusError::NotFound {
            id: 9,
            version: None,
        });
        assert!(matches!(
            ItemStatus::from_error(&not_found),
            Some(ItemStatus::NotFound(_))
        ));
        assert_eq!(
            ItemStatus::from_error(&anyhow::Error::new(CojusError::SelectionCancelled)),
            Some(ItemStatus::Cancelled)
        );

        let fatal = anyhow::Error::new(CojusError::EnvironmentQueryFailed("npm".into()));
        assert_eq!(ItemStatus::from_error(&fatal), None);
        assert_eq!(ItemStatus::from_error(&anyhow::anyhow!("io")), None);
    }

    #[test]
    fn saver_writes_dated_log() {
        let dir = test_dir("report");
        let path = ReportSaver::new(dir.clone())
            .save(&sample())
            .expect("must save report");

        assert!(path.starts_with(&dir));
        assert!(path.to_string_lossy().ends_with("-install.log"));
        let content = fs::read_to_string(&path).expect("must read report");
        assert!(content.starts_with("cojus install 报告"));
        assert!(content.contains("$ npm install chart.js"));

        let _ = fs::remove_dir_all(&dir);
    }
}
