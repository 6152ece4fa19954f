//! 从 Supabase (PostgREST) 拉取目录和版本数据，写入本地 JSON

use super::types::{CatalogEntry, VersionVariant};
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct VersionRow {
    post_id: u32,
    version_tag: String,
    npm_command: String,
    #[serde(default)]
    is_default: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub entries: usize,
    pub version_files: usize,
}

pub struct SyncClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SyncClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        match (&config.supabase_url, &config.supabase_anon_key) {
            (Some(url), Some(key)) if !url.trim().is_empty() && !key.trim().is_empty() => {
                Ok(Self {
                    client: Client::new(),
                    base_url: url.trim_end_matches('/').to_string(),
                    anon_key: key.clone(),
                })
            }
            _ => Err(anyhow!(
                "需要设置 supabase_url 和 supabase_anon_key（配置文件或 SUPABASE_URL / SUPABASE_ANON_KEY 环境变量）"
            )),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, table: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .query(query)
            .send()
            .await
            .with_context(|| format!("请求 {table} 失败"))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Supabase 请求 {} 失败 (状态码 {}): {}",
                table,
                status,
                error_text
            ));
        }

        Ok(response.json().await?)
    }

    pub async fn fetch_entries(&self) -> Result<Vec<CatalogEntry>> {
        self.fetch(
            "api_posts",
            &[
                ("select", "id,npm_command,title"),
                ("or", "(type.eq.API,type.eq.Quick Start)"),
                ("npm_command", "not.is.null"),
            ],
        )
        .await
    }

    async fn fetch_version_rows(&self) -> Result<Vec<VersionRow>> {
        self.fetch(
            "api_post_versions",
            &[
                ("select", "post_id,version_tag,npm_command,is_default"),
                ("order", "post_id.asc,version_tag.desc"),
            ],
        )
        .await
    }
}

/// 拉取远程数据并覆盖本地文件
pub async fn sync(config: &Config) -> Result<SyncSummary> {
    let client = SyncClient::from_config(config)?;

    let entries = client.fetch_entries().await?;
    log::info!("api_posts: {} 条", entries.len());
    let rows = client.fetch_version_rows().await?;
    log::info!("api_post_versions: {} 条", rows.len());

    write_snapshot(&config.data_dir, &entries, group_versions(rows))
}

/// 按 post_id 分组，保持服务端给出的顺序
fn group_versions(rows: Vec<VersionRow>) -> BTreeMap<u32, Vec<VersionVariant>> {
    let mut grouped: BTreeMap<u32, Vec<VersionVariant>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.post_id).or_default().push(VersionVariant {
            version_tag: row.version_tag,
            command: row.npm_command,
            is_default: row.is_default.unwrap_or(false),
        });
    }
    grouped
}

fn write_snapshot(
    data_dir: &Path,
    entries: &[CatalogEntry],
    versions: BTreeMap<u32, Vec<VersionVariant>>,
) -> Result<SyncSummary> {
    let versions_dir = data_dir.join(crate::config::VERSIONS_DIR);
    fs::create_dir_all(&versions_dir)
        .with_context(|| format!("创建目录 {} 失败", versions_dir.display()))?;

    let catalog_path = data_dir.join(crate::config::CATALOG_FILE);
    fs::write(&catalog_path, serde_json::to_string_pretty(entries)?)
        .with_context(|| format!("写入 {} 失败", catalog_path.display()))?;

    for (post_id, list) in &versions {
        let path = versions_dir.join(format!("{post_id}.json"));
        fs::write(&path, serde_json::to_string_pretty(list)?)
            .with_context(|| format!("写入 {} 失败", path.display()))?;
        log::debug!("已生成 {}", path.display());
    }

    Ok(SyncSummary {
        entries: entries.len(),
        version_files: versions.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::tests::{entry, test_dir};
    use crate::catalog::Catalog;

    fn row(post_id: u32, tag: &str, is_default: Option<bool>) -> VersionRow {
        VersionRow {
            post_id,
            version_tag: tag.to_string(),
            npm_command: format!("npm install pkg{post_id}@{tag}"),
            is_default,
        }
    }

    #[test]
    fn missing_credentials_are_reported() {
        let config = Config {
            supabase_url: Some("https://x.supabase.co".into()),
            supabase_anon_key: None,
            ..Config::default()
        };
        let err = SyncClient::from_config(&config)
            .err()
            .expect("missing key must fail");
        assert!(err.to_string().contains("supabase_anon_key"));
    }

    #[test]
    fn grouping_keeps_server_order_within_post() {
        let grouped = group_versions(vec![
            row(2, "2.0.0", Some(true)),
            row(2, "1.5.0", None),
            row(1, "0.9.0", Some(false)),
        ]);

        assert_eq!(grouped.len(), 2);
        let tags: Vec<&str> = grouped[&2].iter().map(|v| v.version_tag.as_str()).collect();
        assert_eq!(tags, vec!["2.0.0", "1.5.0"]);
        assert!(grouped[&2][0].is_default);
        assert!(!grouped[&2][1].is_default);
    }

    #[test]
    fn written_snapshot_loads_back_as_catalog() {
        let dir = test_dir("sync");
        let entries = vec![entry(1, "One", "npm install one"), entry(2, "Two", "npm install two")];
        let grouped = group_versions(vec![row(2, "2.0.0", Some(true)), row(2, "1.0.0", None)]);

        let summary = write_snapshot(&dir, &entries, grouped).expect("must write snapshot");
        assert_eq!(
            summary,
            SyncSummary {
                entries: 2,
                version_files: 1
            }
        );

        let raw = fs::read_to_string(dir.join("api_posts.json")).expect("must read catalog");
        assert!(raw.contains("\"npm_command\": \"npm install one\""));

        let catalog = Catalog::load(&dir.join("api_posts.json"), &dir.join("versions"))
            .expect("snapshot must load");
        assert_eq!(catalog.versions(2).len(), 2);
        assert_eq!(catalog.get(1).map(|e| e.command.as_str()), Some("npm install one"));

        let _ = fs::remove_dir_all(&dir);
    }
}
