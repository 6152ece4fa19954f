//! 从本地 JSON 文件加载目录和版本列表

use super::types::{CatalogEntry, VersionVariant};
use crate::error::CojusError;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// 只读目录：进程生命周期内加载一次
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_id: HashMap<u32, usize>,
    versions: HashMap<u32, Vec<VersionVariant>>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>, versions: HashMap<u32, Vec<VersionVariant>>) -> Self {
        let mut by_id = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            if by_id.insert(entry.id, idx).is_some() {
                log::warn!("目录中 ID {} 重复，使用最后一条", entry.id);
            }
        }
        Self {
            entries,
            by_id,
            versions,
        }
    }

    /// 加载目录文件和版本目录。目录文件缺失或损坏都会中止调用。
    pub fn load(catalog_path: &Path, versions_dir: &Path) -> Result<Self, CojusError> {
        let entries = load_entries(catalog_path)?;
        let versions = load_versions(versions_dir)?;
        log::debug!(
            "已加载 {} 条目录, {} 个版本文件",
            entries.len(),
            versions.len()
        );
        Ok(Self::new(entries, versions))
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, id: u32) -> Option<&CatalogEntry> {
        self.by_id.get(&id).map(|&idx| &self.entries[idx])
    }

    /// 没有版本数据的 ID 返回空切片
    pub fn versions(&self, id: u32) -> &[VersionVariant] {
        self.versions.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 标题或编号包含关键字（不区分大小写），空关键字匹配全部
    pub fn search(&self, query: &str) -> Vec<&CatalogEntry> {
        let needle = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                needle.is_empty()
                    || entry.title.to_lowercase().contains(&needle)
                    || entry.id.to_string().contains(&needle)
            })
            .collect()
    }
}

pub fn load_entries(path: &Path) -> Result<Vec<CatalogEntry>, CojusError> {
    read_json_array(path)
}

/// 版本目录不存在不算错误
pub fn load_versions(dir: &Path) -> Result<HashMap<u32, Vec<VersionVariant>>, CojusError> {
    let mut versions = HashMap::new();
    let read_dir = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(versions),
        Err(e) => {
            return Err(CojusError::DataCorrupt {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    for item in read_dir {
        let item = item.map_err(|e| CojusError::DataCorrupt {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        let path = item.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(id) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<u32>().ok())
        else {
            log::warn!("跳过无法识别的版本文件 {}", path.display());
            continue;
        };
        let list: Vec<VersionVariant> = read_json_array(&path)?;
        versions.insert(id, list);
    }
    Ok(versions)
}

fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CojusError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(CojusError::DataUnavailable {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(CojusError::DataCorrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };
    serde_json::from_str(&raw).map_err(|e| CojusError::DataCorrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    pub(crate) fn test_dir(label: &str) -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "cojus-{label}-{}-{n}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("must create test dir");
        dir
    }

    pub(crate) fn entry(id: u32, title: &str, command: &str) -> CatalogEntry {
        CatalogEntry {
            id,
            title: title.to_string(),
            command: command.to_string(),
        }
    }

    pub(crate) fn variant(tag: &str, command: &str, is_default: bool) -> VersionVariant {
        VersionVariant {
            version_tag: tag.to_string(),
            command: command.to_string(),
            is_default,
        }
    }

    #[test]
    fn load_reads_entries_and_per_id_versions() {
        let dir = test_dir("load");
        fs::write(
            dir.join("api_posts.json"),
            r#"[
  {"id": 5, "title": "Chart API", "npm_command": "npm install chart.js"},
  {"id": 6, "title": "Map API", "npm_command": "npm install leaflet"}
]"#,
        )
        .expect("must write catalog");
        fs::create_dir_all(dir.join("versions")).expect("must create versions dir");
        fs::write(
            dir.join("versions/5.json"),
            r#"[
  {"version_tag": "4.0.0", "npm_command": "npm install chart.js@4.0.0", "is_default": true},
  {"version_tag": "3.9.1", "npm_command": "npm install chart.js@3.9.1", "is_default": false}
]"#,
        )
        .expect("must write versions");
        fs::write(dir.join("versions/readme.json"), "[]").expect("must write stray file");

        let catalog =
            Catalog::load(&dir.join("api_posts.json"), &dir.join("versions")).expect("must load");

        assert_eq!(catalog.entries().len(), 2);
        assert_eq!(catalog.get(6).map(|e| e.title.as_str()), Some("Map API"));
        assert_eq!(catalog.versions(5).len(), 2);
        assert_eq!(catalog.versions(5)[0].version_tag, "4.0.0");
        assert!(catalog.versions(6).is_empty());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_catalog_is_data_unavailable() {
        let dir = test_dir("missing");
        let err = Catalog::load(&dir.join("api_posts.json"), &dir.join("versions"))
            .expect_err("missing file must fail");
        assert!(matches!(err, CojusError::DataUnavailable { .. }));
        assert!(err.is_fatal());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn non_array_catalog_is_data_corrupt() {
        let dir = test_dir("corrupt");
        fs::write(dir.join("api_posts.json"), r#"{"id": 1}"#).expect("must write");
        let err = Catalog::load(&dir.join("api_posts.json"), &dir.join("versions"))
            .expect_err("object root must fail");
        assert!(matches!(err, CojusError::DataCorrupt { .. }));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_version_file_is_data_corrupt() {
        let dir = test_dir("bad-versions");
        fs::create_dir_all(dir.join("versions")).expect("must create dir");
        fs::write(dir.join("versions/3.json"), "not json").expect("must write");
        let err = load_versions(&dir.join("versions")).expect_err("must fail");
        assert!(matches!(err, CojusError::DataCorrupt { .. }));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn search_matches_title_and_id_case_insensitively() {
        let catalog = Catalog::new(
            vec![
                entry(101, "Kakao Map SDK", "npm install kakao-map"),
                entry(202, "Payment Widget", "npm install pay"),
                entry(310, "map utils", "npm install map-utils"),
            ],
            HashMap::new(),
        );

        let ids: Vec<u32> = catalog.search("MAP").iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![101, 310]);

        let ids: Vec<u32> = catalog.search("20").iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![202]);

        assert_eq!(catalog.search("  ").len(), 3);
    }
}
