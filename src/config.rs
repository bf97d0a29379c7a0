use crate::error::{CatalogError, Result};
use astro_catalog_common::{ResourceKind, DEFAULT_PER_PAGE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const BASE_URL_ENV: &str = "ASTRO_API_URL";
pub const TOKEN_ENV: &str = "ASTRO_API_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout_seconds: u64,
    pub per_page: usize,
    /// 一覧取得エンドポイントの上書き（リソース名 → パス候補）
    pub endpoints: BTreeMap<String, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_token: None,
            timeout_seconds: 10,
            per_page: DEFAULT_PER_PAGE,
            endpoints: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み（存在しなければ既定値）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| CatalogError::Config(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CatalogError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("astro-catalog").join("config.json"))
    }

    /// 接続先URL（環境変数を優先）
    pub fn base_url(&self) -> String {
        let raw = match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => self.base_url.clone(),
        };
        raw.trim().trim_end_matches('/').to_string()
    }

    /// 認証トークン（環境変数を優先）
    pub fn api_token(&self) -> Option<String> {
        match std::env::var(TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Some(token),
            _ => self.api_token.clone().filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds.max(1))
    }

    /// 一覧エンドポイントの上書きがあれば返す
    pub fn endpoint_override(&self, kind: ResourceKind) -> Option<&[String]> {
        self.endpoints
            .get(kind.as_str())
            .map(Vec::as_slice)
            .filter(|paths| !paths.is_empty())
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        let trimmed = url.trim();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(CatalogError::Config(format!(
                "URLは http:// または https:// で始めてください: {}",
                url
            )));
        }
        self.base_url = trimmed.trim_end_matches('/').to_string();
        Ok(())
    }

    pub fn set_api_token(&mut self, token: String) {
        self.api_token = Some(token).filter(|t| !t.trim().is_empty());
    }
}

/// 環境変数を書き換えるテストの直列化
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_env_overrides_file_values() {
        let _env = env_lock();
        let mut config = Config::default();
        config.set_base_url("https://shop.example.in".into()).unwrap();
        config.set_api_token("from-file".into());

        std::env::set_var(BASE_URL_ENV, " https://staging.example.in/ ");
        std::env::set_var(TOKEN_ENV, "from-env");
        let base_url = config.base_url();
        let token = config.api_token();
        std::env::remove_var(BASE_URL_ENV);
        std::env::remove_var(TOKEN_ENV);

        assert_eq!(base_url, "https://staging.example.in");
        assert_eq!(token.as_deref(), Some("from-env"));

        assert_eq!(config.base_url(), "https://shop.example.in");
        assert_eq!(config.api_token().as_deref(), Some("from-file"));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let _env = env_lock();
        let config = Config::default();

        std::env::set_var(BASE_URL_ENV, "   ");
        std::env::set_var(TOKEN_ENV, "");
        let base_url = config.base_url();
        let token = config.api_token();
        std::env::remove_var(BASE_URL_ENV);
        std::env::remove_var(TOKEN_ENV);

        assert_eq!(base_url, DEFAULT_BASE_URL);
        assert_eq!(token, None);
    }

    #[test]
    fn test_timeout_has_floor() {
        let config = Config {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert_eq!(config.timeout(), std::time::Duration::from_secs(1));
        assert_eq!(Config::default().timeout(), std::time::Duration::from_secs(10));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timeout_seconds, 10);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"base_url": "https://api.example.in", "endpoints": {"puja": ["/api/puja/public"]}}"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.base_url, "https://api.example.in");
        assert_eq!(config.per_page, DEFAULT_PER_PAGE);
        assert_eq!(
            config.endpoint_override(ResourceKind::Puja),
            Some(&["/api/puja/public".to_string()][..])
        );
        assert_eq!(config.endpoint_override(ResourceKind::Blog), None);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.set_base_url("https://shop.example.in/".into()).unwrap();
        config.set_api_token("secret".into());
        config.save_to(&path).expect("保存失敗");

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.base_url, "https://shop.example.in");
        assert_eq!(loaded.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        assert!(config.set_base_url("localhost:5000".into()).is_err());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_broken_file_is_config_error() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ broken").unwrap();
        assert!(matches!(Config::load_from(&path), Err(CatalogError::Config(_))));
    }
}
