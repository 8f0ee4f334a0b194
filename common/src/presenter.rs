//! 結果表示用の導出（副作用なし）

use crate::language::ScriptLanguage;
use crate::response::Verdict;
use crate::workflow::WorkflowState;
use serde::Serialize;

/// バッジの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Error,
    Genuine,
    Forged,
}

impl BadgeVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeVariant::Error => "error",
            BadgeVariant::Genuine => "genuine",
            BadgeVariant::Forged => "forged",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            BadgeVariant::Error => "⚠",
            BadgeVariant::Genuine => "✔",
            BadgeVariant::Forged => "✘",
        }
    }

    /// フッターのチップ表示
    pub fn chip_text(&self) -> &'static str {
        match self {
            BadgeVariant::Error => "Error",
            BadgeVariant::Genuine => "Authentic",
            BadgeVariant::Forged => "Suspicious",
        }
    }
}

/// 信頼度の目安（プログレスバーの目盛り 25/50/75 に対応）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 75.0 {
            ConfidenceBand::VeryHigh
        } else if confidence >= 50.0 {
            ConfidenceBand::High
        } else if confidence >= 25.0 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceBand::Low => "Low",
            ConfidenceBand::Medium => "Medium",
            ConfidenceBand::High => "High",
            ConfidenceBand::VeryHigh => "Very High",
        }
    }

    pub const ALL: [ConfidenceBand; 4] = [
        ConfidenceBand::Low,
        ConfidenceBand::Medium,
        ConfidenceBand::High,
        ConfidenceBand::VeryHigh,
    ];
}

/// 結果カードの表示内容
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    pub is_error: bool,
    pub is_genuine: bool,
    pub badge: BadgeVariant,
    pub verdict_text: String,
    /// 例: "Hindi Script · AI Analysis"
    pub caption: Option<String>,
    /// 失敗時のみ
    pub error_message: Option<String>,
    pub confidence: f64,
    pub band: ConfidenceBand,
}

impl Presentation {
    pub fn icon(&self) -> &'static str {
        self.badge.icon()
    }

    pub fn chip_text(&self) -> &'static str {
        self.badge.chip_text()
    }

    /// 例: "92.4%"
    pub fn confidence_text(&self) -> String {
        format!("{:.1}%", self.confidence)
    }

    /// 大きく表示するスコア（整数）
    pub fn score_text(&self) -> String {
        format!("{:.0}", self.confidence)
    }
}

/// 状態から表示内容を導出（結果が無ければ `None`）
pub fn present(state: &WorkflowState, language: Option<&ScriptLanguage>) -> Option<Presentation> {
    let caption = language.map(|l| format!("{} Script · AI Analysis", l.label));

    match state {
        WorkflowState::Completed { result, .. } => {
            let is_genuine = result.label() == Verdict::Genuine;
            let badge = if is_genuine {
                BadgeVariant::Genuine
            } else {
                BadgeVariant::Forged
            };
            Some(Presentation {
                is_error: false,
                is_genuine,
                badge,
                verdict_text: format!("{} Signature", result.label()),
                caption,
                error_message: None,
                confidence: result.confidence(),
                band: ConfidenceBand::from_confidence(result.confidence()),
            })
        }
        WorkflowState::Failed { error, .. } => Some(Presentation {
            is_error: true,
            is_genuine: false,
            badge: BadgeVariant::Error,
            verdict_text: "Analysis Failed".to_string(),
            caption,
            error_message: Some(error.message.clone()),
            confidence: 0.0,
            band: ConfidenceBand::Low,
        }),
        WorkflowState::Idle | WorkflowState::Ready | WorkflowState::Verifying(_) => None,
    }
}
