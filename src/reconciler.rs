//! 已安装包对账：把当前安装的包反查回目录条目，得到可卸载候选

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::CojusError;
use crate::package_manager::parser::extract_package_names;
use crate::package_manager::{CommandRunner, PackageManager};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallCandidate {
    pub entry: CatalogEntry,
    /// 从条目命令推导出的全部包名（不只是已安装的那部分）
    pub package_names: Vec<String>,
}

impl UninstallCandidate {
    pub fn label(&self) -> String {
        format!(
            "[{}] {} ({})",
            self.entry.id,
            self.entry.title,
            self.package_names.join(", ")
        )
    }
}

/// 用户在卸载列表中的选择
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallChoice {
    All,
    Entries(Vec<usize>),
}

/// 查询已安装包并与目录求交集。查询失败对卸载流程是致命的。
pub async fn find_installed<R>(
    catalog: &Catalog,
    pm: &PackageManager,
    runner: &R,
) -> Result<Vec<UninstallCandidate>, CojusError>
where
    R: CommandRunner + ?Sized,
{
    let installed = pm.installed_packages(runner).await?;
    Ok(match_candidates(catalog.entries(), &installed))
}

/// 保留至少有一个包名已安装的条目，顺序同目录
pub fn match_candidates(
    entries: &[CatalogEntry],
    installed: &BTreeSet<String>,
) -> Vec<UninstallCandidate> {
    entries
        .iter()
        .filter_map(|entry| {
            let package_names = extract_package_names(&entry.command);
            if package_names.iter().any(|name| installed.contains(name)) {
                Some(UninstallCandidate {
                    entry: entry.clone(),
                    package_names,
                })
            } else {
                None
            }
        })
        .collect()
}

/// 把选择展开成去重后的包名列表（保持首次出现顺序）
pub fn uninstall_targets(candidates: &[UninstallCandidate], choice: &UninstallChoice) -> Vec<String> {
    let picked: Vec<&UninstallCandidate> = match choice {
        UninstallChoice::All => candidates.iter().collect(),
        UninstallChoice::Entries(indices) => indices
            .iter()
            .filter_map(|&idx| candidates.get(idx))
            .collect(),
    };

    let mut seen = BTreeSet::new();
    picked
        .into_iter()
        .flat_map(|candidate| candidate.package_names.iter())
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}
