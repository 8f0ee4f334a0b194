//! 検証ワークフロー（状態機械）
//!
//! ```text
//! Idle ──accept──▶ Ready ──begin_submit──▶ Verifying ──complete──▶ Completed / Failed
//!   ▲                ▲                                                  │
//!   └────clear───────┴──────────────accept (新しいファイル)─────────────┘
//! ```
//!
//! 同時に送信中のリクエストは1件のみ（`can_submit` で制御、キューなし）。
//! 各リクエストは発行時のファイルIDでタグ付けし、
//! 現在の状態と一致しない完了通知は破棄する。

use crate::acquisition::{
    CandidateFile, DropEvent, DropOutcome, FileAcquisition, FileId, IntakeToken, PreviewImage,
    PreviewJob, SelectedFile,
};
use crate::error::Result;
use crate::language::{LanguageCatalog, ScriptLanguage};
use crate::response::{Outcome, VerificationError, VerificationResult};
use std::fmt;

/// リクエストID（発行ごとに一意）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request#{}", self.0)
    }
}

/// 送信中リクエストの識別タグ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    pub request: RequestId,
    pub file: FileId,
}

/// 送信時点のファイルと言語の組
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    ticket: RequestTicket,
    file: SelectedFile,
    language: ScriptLanguage,
}

impl VerificationRequest {
    pub fn ticket(&self) -> RequestTicket {
        self.ticket
    }

    pub fn file(&self) -> &SelectedFile {
        &self.file
    }

    pub fn language(&self) -> &ScriptLanguage {
        &self.language
    }
}

/// ワークフロー状態
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    /// ファイル未選択
    Idle,
    /// ファイルあり、結果なし、送信中でない
    Ready,
    /// 送信中
    Verifying(RequestTicket),
    /// 成功
    Completed {
        request: RequestId,
        result: VerificationResult,
    },
    /// 失敗
    Failed {
        request: RequestId,
        error: VerificationError,
    },
}

impl WorkflowState {
    pub fn is_verifying(&self) -> bool {
        matches!(self, WorkflowState::Verifying(_))
    }

    pub fn result(&self) -> Option<&VerificationResult> {
        match self {
            WorkflowState::Completed { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&VerificationError> {
        match self {
            WorkflowState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// 成功結果の識別キーと信頼度（アニメーション用）
    pub fn result_key(&self) -> Option<(RequestId, f64)> {
        match self {
            WorkflowState::Completed { request, result } => Some((*request, result.confidence())),
            _ => None,
        }
    }
}

/// 完了通知の適用結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// 別ファイル・別リクエストに置き換わっていたため破棄
    Stale,
}

/// 検証ワークフロー
#[derive(Debug, Clone)]
pub struct Workflow {
    catalog: LanguageCatalog,
    acquisition: FileAcquisition,
    language: Option<ScriptLanguage>,
    state: WorkflowState,
    next_request: u64,
}

impl Workflow {
    pub fn new(catalog: LanguageCatalog) -> Self {
        Self {
            catalog,
            acquisition: FileAcquisition::new(),
            language: None,
            state: WorkflowState::Idle,
            next_request: 0,
        }
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn acquisition(&self) -> &FileAcquisition {
        &self.acquisition
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.acquisition.selected()
    }

    pub fn preview(&self) -> Option<&PreviewImage> {
        self.acquisition.preview()
    }

    pub fn language(&self) -> Option<&ScriptLanguage> {
        self.language.as_ref()
    }

    /// 候補ファイルを受理し、以前の結果を破棄する
    pub fn accept_candidate(&mut self, candidate: Option<CandidateFile>) -> Option<PreviewJob> {
        let job = self.acquisition.accept_candidate(candidate)?;
        self.reset_for_new_file();
        Some(job)
    }

    /// ドロップを処理（画像以外は状態を変えずに拒否）
    pub fn accept_drop(&mut self, event: &mut DropEvent) -> DropOutcome {
        let outcome = self.acquisition.accept_drop(event);
        if matches!(outcome, DropOutcome::Accepted(_)) {
            self.reset_for_new_file();
        }
        outcome
    }

    /// 内容の読み込みを伴う取り込みを開始（完了まで送信不可）
    pub fn begin_intake(&mut self) -> IntakeToken {
        self.acquisition.begin_intake()
    }

    /// 読み込みが終わった選択ファイルを受理（追い越されていれば破棄）
    pub fn complete_choice(
        &mut self,
        token: IntakeToken,
        candidate: CandidateFile,
    ) -> Option<PreviewJob> {
        let job = self.acquisition.complete_choice(token, candidate)?;
        self.reset_for_new_file();
        Some(job)
    }

    /// 読み込みが終わったドロップを処理（追い越されていれば破棄）
    pub fn complete_drop(&mut self, token: IntakeToken, event: &mut DropEvent) -> Option<DropOutcome> {
        let outcome = self.acquisition.complete_drop(token, event)?;
        if matches!(outcome, DropOutcome::Accepted(_)) {
            self.reset_for_new_file();
        }
        Some(outcome)
    }

    pub fn abandon_intake(&mut self, token: IntakeToken) -> bool {
        self.acquisition.abandon_intake(token)
    }

    pub fn apply_preview(&mut self, file_id: FileId, preview: PreviewImage) -> bool {
        self.acquisition.apply_preview(file_id, preview)
    }

    /// ファイル・プレビュー・結果をすべて破棄
    pub fn clear(&mut self) {
        self.acquisition.clear();
        if let WorkflowState::Verifying(ticket) = &self.state {
            log::debug!("cleared while {} in flight; its result will be discarded", ticket.request);
        }
        self.state = WorkflowState::Idle;
    }

    pub fn drag_enter(&mut self) {
        self.acquisition.drag_enter();
    }

    pub fn drag_leave(&mut self) {
        self.acquisition.drag_leave();
    }

    /// 言語を選択（カタログにない識別子はエラー）
    pub fn select_language(&mut self, value: &str) -> Result<()> {
        let language = self.catalog.resolve(value)?.clone();
        self.language = Some(language);
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        self.acquisition.selected().is_some()
            && !self.acquisition.is_intake_pending()
            && self.language.is_some()
            && !self.state.is_verifying()
    }

    /// 送信を開始
    ///
    /// `can_submit()` が偽なら何もせず `None`。呼び出し側はトリガーを
    /// 無効化しておくこと。
    pub fn begin_submit(&mut self) -> Option<VerificationRequest> {
        if !self.can_submit() {
            return None;
        }
        let file = self.acquisition.selected()?.clone();
        let language = self.language.clone()?;

        self.next_request += 1;
        let ticket = RequestTicket {
            request: RequestId(self.next_request),
            file: file.id(),
        };
        log::info!(
            "{} started: {} as {} ({})",
            ticket.request,
            file.name(),
            language.value,
            file.size_label()
        );
        self.state = WorkflowState::Verifying(ticket);

        Some(VerificationRequest {
            ticket,
            file,
            language,
        })
    }

    /// 送信結果を適用
    ///
    /// 現在の状態が同じチケットで送信中の場合のみ反映する。
    pub fn complete(&mut self, ticket: RequestTicket, outcome: Outcome) -> Completion {
        match &self.state {
            WorkflowState::Verifying(current) if *current == ticket => {}
            _ => {
                log::debug!("discarded stale outcome of {} for {}", ticket.request, ticket.file);
                return Completion::Stale;
            }
        }

        self.state = match outcome {
            Ok(result) => {
                log::info!(
                    "{} completed: {} ({:.1}%)",
                    ticket.request,
                    result.label(),
                    result.confidence()
                );
                WorkflowState::Completed {
                    request: ticket.request,
                    result,
                }
            }
            Err(error) => {
                log::warn!("{} failed: {}", ticket.request, error.message);
                WorkflowState::Failed {
                    request: ticket.request,
                    error,
                }
            }
        };
        Completion::Applied
    }

    fn reset_for_new_file(&mut self) {
        if let WorkflowState::Verifying(ticket) = &self.state {
            log::debug!("file replaced while {} in flight", ticket.request);
        }
        self.state = WorkflowState::Ready;
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new(LanguageCatalog::default())
    }
}
