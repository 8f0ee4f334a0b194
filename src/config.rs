use crate::error::{Result, SignVerifyError};
use serde::{Deserialize, Serialize};
use sign_verify_common::{LanguageCatalog, ScriptLanguage};
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/predict";
pub const ENDPOINT_ENV: &str = "SIGN_VERIFY_ENDPOINT";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 予測サービスのエンドポイント
    pub endpoint: String,
    /// リクエストのタイムアウト（未設定ならトランスポート任せ）
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    /// 選択可能なスクリプト言語
    #[serde(default = "default_languages")]
    pub languages: Vec<ScriptLanguage>,
}

fn default_languages() -> Vec<ScriptLanguage> {
    LanguageCatalog::default().iter().cloned().collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout_seconds: None,
            languages: default_languages(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
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
            .ok_or_else(|| SignVerifyError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("sign-verify").join("config.json"))
    }

    /// 実際に使うエンドポイント
    ///
    /// 優先順位: 引数 > 環境変数 > 設定ファイル
    pub fn resolve_endpoint(&self, cli_override: Option<&str>) -> String {
        if let Some(endpoint) = cli_override {
            return endpoint.to_string();
        }
        match std::env::var(ENDPOINT_ENV) {
            Ok(endpoint) if !endpoint.trim().is_empty() => endpoint,
            _ => self.endpoint.clone(),
        }
    }

    pub fn set_endpoint(&mut self, endpoint: String) -> Result<()> {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(SignVerifyError::Config(format!(
                "エンドポイントは http(s):// で始まる必要があります: {}",
                endpoint
            )));
        }
        self.endpoint = endpoint;
        self.save()
    }

    pub fn catalog(&self) -> Result<LanguageCatalog> {
        Ok(LanguageCatalog::new(self.languages.clone())?)
    }
}
