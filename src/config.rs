use crate::error::{InspectError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const API_URL_ENV: &str = "FOD_INSPECT_API_URL";
pub const SESSION_ENV: &str = "FOD_INSPECT_SESSION";

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_SESSION: &str = "default";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub timeout_seconds: u64,
    pub session: Option<String>,
    pub design_specs: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            timeout_seconds: 120,
            session: None,
            design_specs: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| InspectError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("fod-inspect").join("config.json"))
    }

    /// 検出サービスのURL（環境変数を優先）
    pub fn api_url(&self) -> String {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => self.api_url.clone(),
        }
    }

    /// セッション名（引数 > 環境変数 > 設定ファイル > "default"）
    pub fn session_name(&self, cli_session: Option<&str>) -> String {
        if let Some(name) = cli_session.filter(|s| !s.trim().is_empty()) {
            return name.to_string();
        }
        if let Ok(name) = std::env::var(SESSION_ENV) {
            if !name.trim().is_empty() {
                return name;
            }
        }
        self.session
            .clone()
            .unwrap_or_else(|| DEFAULT_SESSION.to_string())
    }

    pub fn set_api_url(&mut self, url: String) -> Result<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(InspectError::Config(format!("URLが不正です: {}", url)));
        }
        self.api_url = url;
        self.save()
    }
}
