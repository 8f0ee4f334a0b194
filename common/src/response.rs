//! 予測サービスのレスポンス正規化
//!
//! 成功: `{ "prediction": "Genuine" | "Forged", "confidence": 0..100 }`
//! 失敗: `{ "error": "..." }`（任意）。無ければ "Server error: <status>"

use serde::{Deserialize, Serialize};
use std::fmt;

/// 判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Genuine,
    Forged,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Genuine => "Genuine",
            Verdict::Forged => "Forged",
        }
    }

    /// サービスのラベル文字列から変換（前後空白・大小文字は無視）
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("genuine") {
            Some(Verdict::Genuine)
        } else if label.eq_ignore_ascii_case("forged") {
            Some(Verdict::Forged)
        } else {
            None
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 正規化済みの判定結果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VerificationResult {
    label: Verdict,
    confidence: f64,
}

impl VerificationResult {
    /// 信頼度は [0, 100] にクランプ（NaNは0）
    pub fn new(label: Verdict, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 100.0)
        };
        Self { label, confidence }
    }

    pub fn label(&self) -> Verdict {
        self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

/// 失敗の分類（表示は共通）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ErrorKind {
    /// 通信自体が完了しなかった
    Transport,
    /// 非2xxステータス、またはサービスが明示的に返したエラー
    Service { status: u16 },
    /// 2xxだが本文が読めない・項目不足
    MalformedResponse,
}

/// 検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationError {
    #[serde(flatten)]
    pub kind: ErrorKind,
    pub message: String,
}

impl VerificationError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Service { status },
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::MalformedResponse,
            message: message.into(),
        }
    }
}

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for VerificationError {}

/// 1リクエストの結果
pub type Outcome = std::result::Result<VerificationResult, VerificationError>;

#[derive(Deserialize)]
struct PredictionBody {
    prediction: String,
    confidence: f64,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// 本文から空でない `error` 文字列を取り出す
fn extract_error_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.error? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

/// HTTPステータスと本文から結果を正規化
///
/// # Arguments
/// * `status` - HTTPステータスコード
/// * `body` - レスポンス本文（JSONを想定）
pub fn normalize_response(status: u16, body: &[u8]) -> Outcome {
    if !(200..300).contains(&status) {
        let message = extract_error_message(body)
            .unwrap_or_else(|| format!("Server error: {}", status));
        return Err(VerificationError::service(status, message));
    }

    match serde_json::from_slice::<PredictionBody>(body) {
        Ok(parsed) => {
            let label = Verdict::parse(&parsed.prediction).ok_or_else(|| {
                VerificationError::malformed(format!(
                    "Unexpected prediction label: {}",
                    parsed.prediction
                ))
            })?;
            Ok(VerificationResult::new(label, parsed.confidence))
        }
        Err(e) => {
            // 未対応言語などは200でも {"error": ...} のみが返る
            if let Some(message) = extract_error_message(body) {
                return Err(VerificationError::service(status, message));
            }
            Err(VerificationError::malformed(format!("Malformed response: {}", e)))
        }
    }
}
