//! セッションテスト
//!
//! 偽クライアントでワークフロー・アニメーションの連携を検証

mod common;

use common::{closed_endpoint, spawn_stub};
use sign_verify::client::{HttpPredictionClient, PredictionClient};
use sign_verify::reveal;
use sign_verify::session::Session;
use sign_verify_common::{
    CandidateFile, DropEvent, DropOutcome, LanguageCatalog, Outcome, RevealPhase, Verdict,
    VerificationError, VerificationRequest, VerificationResult, WorkflowState,
};
use std::cell::RefCell;
use std::collections::VecDeque;

/// 事前に用意した結果を順に返すクライアント
#[derive(Default)]
struct FakeClient {
    outcomes: RefCell<VecDeque<Outcome>>,
    calls: RefCell<Vec<(String, String)>>,
}

impl FakeClient {
    fn with(outcomes: Vec<Outcome>) -> Self {
        Self {
            outcomes: RefCell::new(outcomes.into()),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl PredictionClient for &FakeClient {
    async fn predict(&self, request: &VerificationRequest) -> Outcome {
        self.calls.borrow_mut().push((
            request.file().name().to_string(),
            request.language().value.clone(),
        ));
        self.outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(VerificationError::transport("no more outcomes")))
    }
}

fn png(name: &str) -> CandidateFile {
    CandidateFile::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}

fn genuine(confidence: f64) -> Outcome {
    Ok(VerificationResult::new(Verdict::Genuine, confidence))
}

/// シナリオA: ファイル・言語なしでは送信不可
#[tokio::test]
async fn test_cannot_submit_without_file_and_language() {
    let client = FakeClient::default();
    let mut session = Session::new(&client, LanguageCatalog::default());

    assert!(!session.can_submit());
    assert!(!session.submit().await);
    assert!(client.calls.borrow().is_empty());
    assert_eq!(session.state(), &WorkflowState::Idle);
}

/// シナリオB: 成功し、信頼度の表示予約が作られる
#[tokio::test]
async fn test_successful_verification() {
    let client = FakeClient::with(vec![genuine(92.4)]);
    let mut session = Session::new(&client, LanguageCatalog::default());

    assert!(session.choose_file(Some(png("sig.png"))).await);
    session.select_language("hindi").unwrap();
    assert!(session.workflow().preview().is_some());

    assert!(session.submit().await);
    let result = session.state().result().unwrap();
    assert_eq!(result.label(), Verdict::Genuine);
    assert_eq!(result.confidence(), 92.4);
    assert_eq!(
        client.calls.borrow().as_slice(),
        &[("sig.png".to_string(), "hindi".to_string())]
    );

    let ticket = session.take_reveal().expect("reveal should be scheduled");
    assert_eq!(ticket.target(), 92.4);
    assert_eq!(session.animator().phase(), RevealPhase::Scheduled);
    assert!(session.can_submit());
}

/// 信頼度バーは最終的に結果の値で止まる
#[tokio::test]
async fn test_reveal_settles_on_confidence() {
    let client = FakeClient::with(vec![genuine(92.4)]);
    let mut session = Session::new(&client, LanguageCatalog::default());
    session.choose_file(Some(png("sig.png"))).await;
    session.select_language("hindi").unwrap();
    session.submit().await;

    let presentation = session.presentation().unwrap();
    let ticket = session.take_reveal().unwrap();
    assert!(reveal::play(session.animator_mut(), ticket, &presentation).await);

    assert_eq!(session.animator().phase(), RevealPhase::Settled);
    assert_eq!(session.animator().displayed(), 92.4);
}

/// シナリオE: 新しいファイルで結果と表示値がリセットされる
#[tokio::test]
async fn test_new_file_resets_result_and_confidence() {
    let client = FakeClient::with(vec![genuine(92.4)]);
    let mut session = Session::new(&client, LanguageCatalog::default());
    session.choose_file(Some(png("first.png"))).await;
    session.select_language("hindi").unwrap();
    session.submit().await;

    let ticket = session.take_reveal().unwrap();
    session.animator_mut().fire(ticket);
    assert_eq!(session.animator().displayed(), 92.4);

    session.choose_file(Some(png("second.png"))).await;
    assert_eq!(session.state(), &WorkflowState::Ready);
    assert!(session.presentation().is_none());
    assert_eq!(session.animator().displayed(), 0.0);
    assert!(session.take_reveal().is_none());
    assert!(session.can_submit());
}

/// シナリオF: 通信失敗後も再送信できる
#[tokio::test]
async fn test_transport_failure_then_retry() {
    let client = FakeClient::with(vec![
        Err(VerificationError::transport("connection refused")),
        genuine(77.0),
    ]);
    let mut session = Session::new(&client, LanguageCatalog::default());
    session.choose_file(Some(png("sig.png"))).await;
    session.select_language("bengali").unwrap();

    session.submit().await;
    assert_eq!(session.state().error().unwrap().message, "connection refused");
    let presentation = session.presentation().unwrap();
    assert_eq!(presentation.verdict_text, "Analysis Failed");
    assert!(session.take_reveal().is_none());
    assert!(session.can_submit());

    session.submit().await;
    assert_eq!(session.state().result().unwrap().confidence(), 77.0);
    assert_eq!(client.calls.borrow().len(), 2);
}

/// 画像以外のドロップは状態を変えない
#[tokio::test]
async fn test_non_image_drop_is_ignored() {
    let client = FakeClient::default();
    let mut session = Session::new(&client, LanguageCatalog::default());
    session.choose_file(Some(png("keep.png"))).await;
    let preview_before = session.workflow().preview().cloned();

    let outcome = session
        .drop_files(DropEvent::single(CandidateFile::new(
            "notes.txt",
            "text/plain",
            b"hello".to_vec(),
        )))
        .await;

    assert!(matches!(outcome, DropOutcome::Rejected(_)));
    assert_eq!(session.workflow().selected_file().unwrap().name(), "keep.png");
    assert_eq!(session.workflow().preview().cloned(), preview_before);
    assert_eq!(session.state(), &WorkflowState::Ready);
}

/// 画像のドロップは受理され、プレビューが作られる
#[tokio::test]
async fn test_image_drop_is_accepted() {
    let client = FakeClient::default();
    let mut session = Session::new(&client, LanguageCatalog::default());

    let outcome = session.drop_files(DropEvent::single(png("dropped.png"))).await;
    assert!(matches!(outcome, DropOutcome::Accepted(_)));
    assert!(session
        .workflow()
        .preview()
        .unwrap()
        .data_url()
        .starts_with("data:image/png;base64,"));
}

/// 削除で結果とファイルが消える
#[tokio::test]
async fn test_clear_removes_everything() {
    let client = FakeClient::with(vec![genuine(50.0)]);
    let mut session = Session::new(&client, LanguageCatalog::default());
    session.choose_file(Some(png("sig.png"))).await;
    session.select_language("hindi").unwrap();
    session.submit().await;

    session.clear();
    assert_eq!(session.state(), &WorkflowState::Idle);
    assert!(session.workflow().selected_file().is_none());
    assert!(session.workflow().preview().is_none());
    assert!(!session.can_submit());
    assert!(session.take_reveal().is_none());
}

/// 破棄時に保留中の表示更新は適用されない
#[tokio::test]
async fn test_teardown_cancels_pending_reveal() {
    let client = FakeClient::with(vec![genuine(60.0)]);
    let mut session = Session::new(&client, LanguageCatalog::default());
    session.choose_file(Some(png("sig.png"))).await;
    session.select_language("hindi").unwrap();
    session.submit().await;

    let ticket = session.take_reveal().unwrap();
    session.teardown();
    assert!(!session.animator_mut().fire(ticket));
    assert_eq!(session.animator().displayed(), 0.0);
}

/// HTTPクライアントと組み合わせた一連の流れ
#[tokio::test]
async fn test_session_with_http_client() {
    let server = spawn_stub(400, r#"{"error":"unsupported image format"}"#).await;
    let client = HttpPredictionClient::new(server.url.clone(), None).unwrap();
    let mut session = Session::new(client, LanguageCatalog::default());
    session.choose_file(Some(png("sig.png"))).await;
    session.select_language("hindi").unwrap();

    assert!(session.submit().await);
    assert_eq!(session.state().error().unwrap().message, "unsupported image format");
}

/// 接続不可のエンドポイントでも失敗状態になるだけで再送可能
#[tokio::test]
async fn test_session_with_unreachable_endpoint() {
    let client = HttpPredictionClient::new(closed_endpoint().await, None).unwrap();
    let mut session = Session::new(client, LanguageCatalog::default());
    session.choose_file(Some(png("sig.png"))).await;
    session.select_language("bengali").unwrap();

    session.submit().await;
    assert!(session.state().error().is_some());
    assert!(session.can_submit());
}
