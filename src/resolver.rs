//! 文档编号 + 可选版本标签 → 实际执行的命令

use crate::catalog::{Catalog, CatalogEntry, ResolvedCommand, VersionVariant};
use crate::error::CojusError;
use crate::selector::{Selection, Selector};

pub struct Resolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// 非交互解析：显式标签必须精确匹配；否则取默认版本，没有默认时取第一项
    pub fn resolve(&self, id: u32, version: Option<&str>) -> Result<ResolvedCommand, CojusError> {
        let entry = self.entry(id)?;
        let variants = self.catalog.versions(id);

        if variants.is_empty() {
            // 没有版本数据时不能满足显式版本要求
            if let Some(tag) = version {
                return Err(CojusError::NotFound {
                    id,
                    version: Some(tag.to_string()),
                });
            }
            return Ok(ResolvedCommand {
                source_id: id,
                label: entry_label(entry),
                shell_command: entry.command.clone(),
            });
        }

        let variant = match version {
            Some(tag) => variants
                .iter()
                .find(|v| v.version_tag == tag)
                .ok_or_else(|| CojusError::NotFound {
                    id,
                    version: Some(tag.to_string()),
                })?,
            None => default_variant(id, variants),
        };
        Ok(variant_command(entry, variant))
    }

    /// 交互解析：多于一个版本且未指定标签时让用户选择。取消只影响当前 ID。
    pub fn resolve_interactive<S>(
        &self,
        id: u32,
        version: Option<&str>,
        selector: &mut S,
    ) -> anyhow::Result<ResolvedCommand>
    where
        S: Selector + ?Sized,
    {
        let entry = self.entry(id)?;
        let variants = self.catalog.versions(id);
        if version.is_some() || variants.len() <= 1 {
            return Ok(self.resolve(id, version)?);
        }

        let labels: Vec<String> = variants
            .iter()
            .map(|v| {
                if v.is_default {
                    format!("{} (默认)", v.version_tag)
                } else {
                    v.version_tag.clone()
                }
            })
            .collect();
        let title = format!("[ID {}] {}: 选择版本", id, entry.title);

        match selector.choose_one(&title, &labels)? {
            Selection::Picked(idx) => {
                let variant = variants.get(idx).ok_or(CojusError::NotFound {
                    id,
                    version: None,
                })?;
                Ok(variant_command(entry, variant))
            }
            Selection::Cancelled => Err(CojusError::SelectionCancelled.into()),
        }
    }

    fn entry(&self, id: u32) -> Result<&'a CatalogEntry, CojusError> {
        self.catalog
            .get(id)
            .ok_or(CojusError::NotFound { id, version: None })
    }
}

fn default_variant(id: u32, variants: &[VersionVariant]) -> &VersionVariant {
    if let Some(found) = variants.iter().find(|v| v.is_default) {
        return found;
    }
    log::debug!(
        "ID {} 没有标记默认版本，使用列表第一项 {}",
        id,
        variants[0].version_tag
    );
    &variants[0]
}

fn entry_label(entry: &CatalogEntry) -> String {
    if entry.title.is_empty() {
        format!("ID {}", entry.id)
    } else {
        format!("ID {} {}", entry.id, entry.title)
    }
}

fn variant_command(entry: &CatalogEntry, variant: &VersionVariant) -> ResolvedCommand {
    ResolvedCommand {
        source_id: entry.id,
        label: format!("{} @{}", entry_label(entry), variant.version_tag),
        shell_command: variant.command.clone(),
    }
}
