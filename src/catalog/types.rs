//! 目录数据类型定义

use serde::{Deserialize, Serialize};

/// 文档条目：文档编号 → 安装命令
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(rename = "npm_command", alias = "command")]
    pub command: String,
}

/// 某个文档的一个版本变体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionVariant {
    pub version_tag: String,
    #[serde(rename = "npm_command", alias = "command")]
    pub command: String,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_default: bool,
}

/// 解析后的待执行命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub source_id: u32,
    pub label: String,
    pub shell_command: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
