//! 検証セッション
//!
//! 共通ワークフローにクライアントとアニメーション状態を結び付ける。
//! すべての状態変更は同じスレッド（current-thread ランタイム）上で行い、
//! プレビュー導出だけを blocking プールに逃がす。

use crate::client::PredictionClient;
use crate::error::Result;
use sign_verify_common::{
    present, CandidateFile, Completion, ConfidenceAnimator, DropEvent, DropOutcome,
    LanguageCatalog, Presentation, PreviewJob, RevealTicket, Workflow, WorkflowState,
};

pub struct Session<C> {
    workflow: Workflow,
    client: C,
    animator: ConfidenceAnimator,
    pending_reveal: Option<RevealTicket>,
}

impl<C: PredictionClient> Session<C> {
    pub fn new(client: C, catalog: LanguageCatalog) -> Self {
        Self {
            workflow: Workflow::new(catalog),
            client,
            animator: ConfidenceAnimator::new(),
            pending_reveal: None,
        }
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn state(&self) -> &WorkflowState {
        self.workflow.state()
    }

    pub fn animator(&self) -> &ConfidenceAnimator {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut ConfidenceAnimator {
        &mut self.animator
    }

    /// 直近の状態変化で予約された表示更新を取り出す
    pub fn take_reveal(&mut self) -> Option<RevealTicket> {
        self.pending_reveal.take()
    }

    pub fn presentation(&self) -> Option<Presentation> {
        present(self.workflow.state(), self.workflow.language())
    }

    pub fn can_submit(&self) -> bool {
        self.workflow.can_submit()
    }

    /// 明示的に選択されたファイルを受理（種類は問わない）
    pub async fn choose_file(&mut self, candidate: Option<CandidateFile>) -> bool {
        let Some(job) = self.workflow.accept_candidate(candidate) else {
            return false;
        };
        self.sync_animator();
        self.derive_preview(job).await;
        true
    }

    /// ドロップされたファイルを受理（画像のみ）
    pub async fn drop_files(&mut self, mut event: DropEvent) -> DropOutcome {
        let outcome = self.workflow.accept_drop(&mut event);
        if let DropOutcome::Accepted(job) = &outcome {
            self.sync_animator();
            self.derive_preview(job.clone()).await;
        }
        outcome
    }

    pub fn select_language(&mut self, value: &str) -> Result<()> {
        self.workflow.select_language(value)?;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.workflow.clear();
        self.sync_animator();
    }

    /// 検証を実行
    ///
    /// `can_submit()` が偽なら何もせず false を返す。
    pub async fn submit(&mut self) -> bool {
        let Some(request) = self.workflow.begin_submit() else {
            log::debug!("submit refused: not ready or already verifying");
            return false;
        };
        self.sync_animator();

        let outcome = self.client.predict(&request).await;
        if self.workflow.complete(request.ticket(), outcome) == Completion::Stale {
            return false;
        }
        self.sync_animator();
        true
    }

    /// 破棄時の後始末（保留中の表示更新を取り消す）
    pub fn teardown(&mut self) {
        self.pending_reveal = None;
        self.animator.cancel();
    }

    async fn derive_preview(&mut self, job: PreviewJob) {
        match tokio::task::spawn_blocking(move || job.run()).await {
            Ok((file_id, preview)) => {
                self.workflow.apply_preview(file_id, preview);
            }
            Err(e) => log::warn!("preview derivation failed: {}", e),
        }
    }

    fn sync_animator(&mut self) {
        let key = self.workflow.state().result_key();
        if let Some(ticket) = self.animator.observe(key) {
            self.pending_reveal = Some(ticket);
        } else if key.is_none() {
            self.pending_reveal = None;
        }
    }
}
