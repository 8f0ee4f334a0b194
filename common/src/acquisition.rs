//! ファイル取り込み（選択・ドラッグ&ドロップ・プレビュー生成）
//!
//! - 明示的な選択: 無条件で新しい選択ファイルになる
//! - ドロップ: 先頭ファイルのMIMEタイプが `image/` で始まる場合のみ受理
//! - プレビュー: Data URL を非同期に導出し、古いファイル宛ての結果は破棄
//! - 内容の読み込みが非同期なホスト（ブラウザ）では、操作の発生時に
//!   `begin_intake` で通し番号を取り、後続の操作に追い越された読み込みは破棄

use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt;
use std::sync::Arc;

/// 選択ファイルの世代ID（受理ごとに一意）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(u64);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

/// 読み込み中の取り込み（操作の発生順に採番）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntakeToken(u64);

impl fmt::Display for IntakeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "intake#{}", self.0)
    }
}

/// 未検証の候補ファイル（選択ダイアログまたはドロップ由来）
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    /// 申告されたMIMEタイプ
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        is_image_mime(&self.mime_type)
    }
}

/// MIMEタイプが画像かどうか
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// 受理済みの選択ファイル
///
/// バイナリは共有・読み取り専用。送信側には参照のみ渡す。
#[derive(Debug, Clone)]
pub struct SelectedFile {
    id: FileId,
    name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl SelectedFile {
    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// 表示用サイズ（例: "12.3 KB"）
    pub fn size_label(&self) -> String {
        format!("{:.1} KB", self.size() as f64 / 1024.0)
    }
}

/// プレビュー用のData URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    data_url: String,
}

impl PreviewImage {
    /// 選択ファイルからData URLを導出
    pub fn derive(file: &SelectedFile) -> Self {
        let mime = if file.mime_type.is_empty() {
            "application/octet-stream"
        } else {
            file.mime_type.as_str()
        };
        Self {
            data_url: format!("data:{};base64,{}", mime, STANDARD.encode(file.bytes())),
        }
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}

/// 保留中のプレビュー導出
///
/// 実行はホスト側（spawn_blocking / spawn_local）に任せる。
#[derive(Debug, Clone)]
pub struct PreviewJob {
    file: SelectedFile,
}

impl PreviewJob {
    pub fn file_id(&self) -> FileId {
        self.file.id
    }

    pub fn run(self) -> (FileId, PreviewImage) {
        let preview = PreviewImage::derive(&self.file);
        (self.file.id, preview)
    }
}

/// ドロップイベント
#[derive(Debug, Clone, Default)]
pub struct DropEvent {
    files: Vec<CandidateFile>,
    default_prevented: bool,
}

impl DropEvent {
    pub fn new(files: Vec<CandidateFile>) -> Self {
        Self {
            files,
            default_prevented: false,
        }
    }

    pub fn single(file: CandidateFile) -> Self {
        Self::new(vec![file])
    }

    /// プラットフォーム既定の動作（ファイルを開く等）を抑止
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn files(&self) -> &[CandidateFile] {
        &self.files
    }

    fn take_first(&mut self) -> Option<CandidateFile> {
        if self.files.is_empty() {
            None
        } else {
            Some(self.files.remove(0))
        }
    }
}

/// 画像以外がドロップされた
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedFileType {
    pub name: String,
    pub mime_type: String,
}

impl fmt::Display for UnsupportedFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mime = if self.mime_type.is_empty() { "unknown type" } else { &self.mime_type };
        write!(f, "{} is not an image ({})", self.name, mime)
    }
}

/// ドロップ処理の結果
#[derive(Debug, Clone)]
pub enum DropOutcome {
    /// 受理（プレビュー導出ジョブ付き）
    Accepted(PreviewJob),
    /// 画像以外のため無視（状態は変更なし）
    Rejected(UnsupportedFileType),
    /// ファイルなし
    Empty,
}

/// ファイル取り込み状態
#[derive(Debug, Clone, Default)]
pub struct FileAcquisition {
    selected: Option<SelectedFile>,
    preview: Option<PreviewImage>,
    drag_active: bool,
    next_id: u64,
    next_intake: u64,
    pending_intake: Option<IntakeToken>,
}

impl FileAcquisition {
    pub fn new() -> Self {
        Self::default()
    }

    /// 候補ファイルを無条件に受理
    ///
    /// `None` の場合は何もしない。以前のプレビューは即座に破棄される。
    pub fn accept_candidate(&mut self, candidate: Option<CandidateFile>) -> Option<PreviewJob> {
        let candidate = candidate?;
        self.next_id += 1;
        let file = SelectedFile {
            id: FileId(self.next_id),
            name: candidate.name,
            mime_type: candidate.mime_type,
            bytes: Arc::from(candidate.bytes),
        };
        log::debug!("accepted {} ({}, {} bytes)", file.id, file.name, file.size());
        self.selected = Some(file.clone());
        self.preview = None;
        self.pending_intake = None;
        Some(PreviewJob { file })
    }

    /// ドロップされたファイルを受理
    pub fn accept_drop(&mut self, event: &mut DropEvent) -> DropOutcome {
        event.prevent_default();
        self.drag_active = false;

        let Some(first) = event.take_first() else {
            return DropOutcome::Empty;
        };

        if !first.is_image() {
            log::debug!("ignored non-image drop: {} ({})", first.name, first.mime_type);
            return DropOutcome::Rejected(UnsupportedFileType {
                name: first.name,
                mime_type: first.mime_type,
            });
        }

        match self.accept_candidate(Some(first)) {
            Some(job) => DropOutcome::Accepted(job),
            None => DropOutcome::Empty,
        }
    }

    /// 内容の読み込みを伴う取り込みを開始
    ///
    /// それ以前に開始した読み込みはこの時点で古くなる。
    pub fn begin_intake(&mut self) -> IntakeToken {
        self.next_intake += 1;
        let token = IntakeToken(self.next_intake);
        self.pending_intake = Some(token);
        token
    }

    pub fn is_intake_pending(&self) -> bool {
        self.pending_intake.is_some()
    }

    /// 読み込みが終わった選択ファイルを受理
    ///
    /// 後続の操作に追い越されていれば `None`（状態は変更なし）。
    pub fn complete_choice(
        &mut self,
        token: IntakeToken,
        candidate: CandidateFile,
    ) -> Option<PreviewJob> {
        if !self.finish_intake(token) {
            return None;
        }
        self.accept_candidate(Some(candidate))
    }

    /// 読み込みが終わったドロップを処理
    ///
    /// 後続の操作に追い越されていれば `None`（状態は変更なし）。
    pub fn complete_drop(&mut self, token: IntakeToken, event: &mut DropEvent) -> Option<DropOutcome> {
        if !self.finish_intake(token) {
            return None;
        }
        Some(self.accept_drop(event))
    }

    /// 読み込みに失敗した取り込みを取り下げる（選択ファイルはそのまま）
    pub fn abandon_intake(&mut self, token: IntakeToken) -> bool {
        self.finish_intake(token)
    }

    fn finish_intake(&mut self, token: IntakeToken) -> bool {
        if self.pending_intake == Some(token) {
            self.pending_intake = None;
            true
        } else {
            log::debug!("discarded superseded {}", token);
            false
        }
    }

    /// 導出済みプレビューを適用（古いファイル宛てなら破棄）
    pub fn apply_preview(&mut self, file_id: FileId, preview: PreviewImage) -> bool {
        match &self.selected {
            Some(file) if file.id == file_id => {
                self.preview = Some(preview);
                true
            }
            _ => {
                log::debug!("discarded stale preview for {}", file_id);
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.preview = None;
        self.pending_intake = None;
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewImage> {
        self.preview.as_ref()
    }

    pub fn drag_enter(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> CandidateFile {
        CandidateFile::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    #[test]
    fn test_accept_none_is_noop() {
        let mut acq = FileAcquisition::new();
        assert!(acq.accept_candidate(None).is_none());
        assert!(acq.selected().is_none());
    }

    #[test]
    fn test_accept_candidate_assigns_new_ids() {
        let mut acq = FileAcquisition::new();
        let first = acq.accept_candidate(Some(png("a.png"))).unwrap().file_id();
        let second = acq.accept_candidate(Some(png("b.png"))).unwrap().file_id();
        assert_ne!(first, second);
        assert_eq!(acq.selected().unwrap().name(), "b.png");
    }

    #[test]
    fn test_explicit_choice_does_not_check_type() {
        let mut acq = FileAcquisition::new();
        let text = CandidateFile::new("notes.txt", "text/plain", b"hi".to_vec());
        assert!(acq.accept_candidate(Some(text)).is_some());
        assert_eq!(acq.selected().unwrap().mime_type(), "text/plain");
    }

    #[test]
    fn test_preview_data_url() {
        let mut acq = FileAcquisition::new();
        let job = acq
            .accept_candidate(Some(CandidateFile::new("s.png", "image/png", b"abc".to_vec())))
            .unwrap();
        let (id, preview) = job.run();
        assert!(acq.apply_preview(id, preview));
        assert_eq!(acq.preview().unwrap().data_url(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_stale_preview_discarded() {
        let mut acq = FileAcquisition::new();
        let old_job = acq.accept_candidate(Some(png("old.png"))).unwrap();
        let new_job = acq.accept_candidate(Some(png("new.png"))).unwrap();

        let (old_id, old_preview) = old_job.run();
        assert!(!acq.apply_preview(old_id, old_preview));
        assert!(acq.preview().is_none());

        let (new_id, new_preview) = new_job.run();
        assert!(acq.apply_preview(new_id, new_preview));
        assert!(acq.preview().is_some());
    }

    #[test]
    fn test_drop_non_image_leaves_state_unchanged() {
        let mut acq = FileAcquisition::new();
        let job = acq.accept_candidate(Some(png("keep.png"))).unwrap();
        let (id, preview) = job.run();
        acq.apply_preview(id, preview.clone());

        let mut event = DropEvent::single(CandidateFile::new("doc.pdf", "application/pdf", vec![1]));
        let outcome = acq.accept_drop(&mut event);

        assert!(matches!(outcome, DropOutcome::Rejected(ref r) if r.name == "doc.pdf"));
        assert!(event.default_prevented());
        assert_eq!(acq.selected().unwrap().id(), id);
        assert_eq!(acq.preview(), Some(&preview));
    }

    #[test]
    fn test_drop_takes_first_file_only() {
        let mut acq = FileAcquisition::new();
        let mut event = DropEvent::new(vec![png("first.png"), png("second.png")]);
        let outcome = acq.accept_drop(&mut event);
        assert!(matches!(outcome, DropOutcome::Accepted(_)));
        assert_eq!(acq.selected().unwrap().name(), "first.png");
    }

    #[test]
    fn test_drop_first_non_image_rejects_even_if_later_image() {
        let mut acq = FileAcquisition::new();
        let mut event = DropEvent::new(vec![
            CandidateFile::new("a.txt", "text/plain", vec![]),
            png("b.png"),
        ]);
        assert!(matches!(acq.accept_drop(&mut event), DropOutcome::Rejected(_)));
        assert!(acq.selected().is_none());
    }

    #[test]
    fn test_empty_drop_prevents_default() {
        let mut acq = FileAcquisition::new();
        let mut event = DropEvent::default();
        assert!(matches!(acq.accept_drop(&mut event), DropOutcome::Empty));
        assert!(event.default_prevented());
    }

    #[test]
    fn test_drag_state() {
        let mut acq = FileAcquisition::new();
        acq.drag_enter();
        assert!(acq.is_drag_active());
        acq.drag_leave();
        assert!(!acq.is_drag_active());

        acq.drag_enter();
        acq.accept_drop(&mut DropEvent::default());
        assert!(!acq.is_drag_active());
    }

    #[test]
    fn test_clear() {
        let mut acq = FileAcquisition::new();
        let (id, preview) = acq.accept_candidate(Some(png("a.png"))).unwrap().run();
        acq.apply_preview(id, preview);
        acq.clear();
        assert!(acq.selected().is_none());
        assert!(acq.preview().is_none());
    }

    #[test]
    fn test_size_label() {
        let mut acq = FileAcquisition::new();
        acq.accept_candidate(Some(CandidateFile::new("a.png", "image/png", vec![0; 2048])));
        let file = acq.selected().unwrap();
        assert_eq!(file.size(), 2048);
        assert_eq!(file.size_label(), "2.0 KB");
    }

    #[test]
    fn test_later_intake_wins_over_slower_read() {
        let mut acq = FileAcquisition::new();
        let large = acq.begin_intake();
        let small = acq.begin_intake();

        // 後から始めた小さいファイルの読み込みが先に終わる
        assert!(acq.complete_choice(small, png("small.png")).is_some());
        assert!(acq.complete_choice(large, png("large.png")).is_none());
        assert_eq!(acq.selected().unwrap().name(), "small.png");
        assert!(!acq.is_intake_pending());
    }

    #[test]
    fn test_superseded_drop_is_discarded() {
        let mut acq = FileAcquisition::new();
        let first = acq.begin_intake();
        let second = acq.begin_intake();

        let mut late = DropEvent::single(png("first.png"));
        assert!(acq.complete_drop(first, &mut late).is_none());
        assert!(acq.selected().is_none());
        assert!(acq.is_intake_pending());

        let mut event = DropEvent::single(png("second.png"));
        let outcome = acq.complete_drop(second, &mut event);
        assert!(matches!(outcome, Some(DropOutcome::Accepted(_))));
        assert_eq!(acq.selected().unwrap().name(), "second.png");
    }

    #[test]
    fn test_abandoned_intake_keeps_current_file() {
        let mut acq = FileAcquisition::new();
        let (id, _) = acq.accept_candidate(Some(png("keep.png"))).unwrap().run();

        let token = acq.begin_intake();
        assert!(acq.is_intake_pending());
        assert!(acq.abandon_intake(token));
        assert!(!acq.is_intake_pending());
        assert_eq!(acq.selected().unwrap().id(), id);
    }

    #[test]
    fn test_direct_choice_and_clear_supersede_pending_read() {
        let mut acq = FileAcquisition::new();
        let token = acq.begin_intake();
        acq.accept_candidate(Some(png("direct.png")));
        assert!(acq.complete_choice(token, png("late.png")).is_none());
        assert_eq!(acq.selected().unwrap().name(), "direct.png");

        let token = acq.begin_intake();
        acq.clear();
        assert!(acq.complete_choice(token, png("late.png")).is_none());
        assert!(acq.selected().is_none());
    }

    #[test]
    fn test_unsupported_display() {
        let r = UnsupportedFileType { name: "x.bin".into(), mime_type: String::new() };
        assert_eq!(r.to_string(), "x.bin is not an image (unknown type)");
    }
}
