use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 目录文件名
pub const CATALOG_FILE: &str = "api_posts.json";
/// 版本目录名
pub const VERSIONS_DIR: &str = "versions";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub package_manager: String,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub report_dir: PathBuf,
    pub save_reports: bool,
}

impl Default for Config {
    fn default() -> Self {
        let home = PathBuf::from(home_dir());
        Self {
            data_dir: home.join(".cojus/data"),
            package_manager: "npm".to_string(),
            supabase_url: None,
            supabase_anon_key: None,
            report_dir: home.join(".cojus/reports"),
            save_reports: false,
        }
    }
}

impl Config {
    pub fn load_or_default() -> Result<Self> {
        let config_path = PathBuf::from(home_dir()).join(".config/cojus/config.toml");

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        log::debug!("已加载配置 {}", path.display());
        Ok(config)
    }

    /// 环境变量补充：凭据以配置文件优先，数据目录以环境变量优先
    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.supabase_url.is_none() {
            self.supabase_url = lookup("SUPABASE_URL");
        }
        if self.supabase_anon_key.is_none() {
            self.supabase_anon_key = lookup("SUPABASE_ANON_KEY");
        }
        if let Some(dir) = lookup("COJUS_DATA_DIR").filter(|d| !d.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(CATALOG_FILE)
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.data_dir.join(VERSIONS_DIR)
    }
}

fn home_dir() -> String {
    std::env::var("HOME").unwrap_or_else(|_| ".".to_string())
}
