//! 署名の書記体系（スクリプト言語）定義
//!
//! 言語リストは起動時に一度だけ読み込む静的設定として扱い、
//! 構築時に注入する（テストで差し替え可能）。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// スクリプト言語
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLanguage {
    /// サービスに送る識別子（例: "hindi"）
    pub value: String,
    /// 表示名（例: "Hindi"）
    pub label: String,
    /// ネイティブ表記（例: "हिन्दी"）
    pub script: String,
}

impl ScriptLanguage {
    pub fn new(value: &str, label: &str, script: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            script: script.to_string(),
        }
    }
}

/// 選択可能な言語の一覧
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCatalog {
    languages: Vec<ScriptLanguage>,
}

impl LanguageCatalog {
    /// 言語リストからカタログを構築
    ///
    /// 空リストと識別子の重複はエラー
    pub fn new(languages: Vec<ScriptLanguage>) -> Result<Self> {
        if languages.is_empty() {
            return Err(Error::Config("language list is empty".into()));
        }
        for (i, lang) in languages.iter().enumerate() {
            if languages[..i].iter().any(|l| l.value == lang.value) {
                return Err(Error::Config(format!("duplicate language: {}", lang.value)));
            }
        }
        Ok(Self { languages })
    }

    /// 識別子で検索
    pub fn find(&self, value: &str) -> Option<&ScriptLanguage> {
        self.languages.iter().find(|l| l.value == value)
    }

    /// 識別子で検索（見つからなければエラー）
    pub fn resolve(&self, value: &str) -> Result<&ScriptLanguage> {
        self.find(value)
            .ok_or_else(|| Error::UnknownLanguage(value.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScriptLanguage> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

impl Default for LanguageCatalog {
    fn default() -> Self {
        Self {
            languages: vec![
                ScriptLanguage::new("hindi", "Hindi", "हिन्दी"),
                ScriptLanguage::new("bengali", "Bengali", "বাংলা"),
            ],
        }
    }
}
