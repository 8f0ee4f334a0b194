//! SignVerify Common Library
//!
//! CLIとWeb(WASM)で共有される署名検証ワークフロー:
//! ファイル取り込み、検証状態機械、レスポンス正規化、結果表示、信頼度アニメーション

pub mod acquisition;
pub mod animator;
pub mod error;
pub mod language;
pub mod presenter;
pub mod response;
pub mod workflow;

pub use acquisition::{
    is_image_mime, CandidateFile, DropEvent, DropOutcome, FileAcquisition, FileId, IntakeToken,
    PreviewImage, PreviewJob, SelectedFile, UnsupportedFileType,
};
pub use animator::{ConfidenceAnimator, RevealPhase, RevealTicket, REVEAL_DELAY, REVEAL_DURATION};
pub use error::{Error, Result};
pub use language::{LanguageCatalog, ScriptLanguage};
pub use presenter::{present, BadgeVariant, ConfidenceBand, Presentation};
pub use response::{
    normalize_response, ErrorKind, Outcome, Verdict, VerificationError, VerificationResult,
};
pub use workflow::{
    Completion, RequestId, RequestTicket, VerificationRequest, Workflow, WorkflowState,
};
