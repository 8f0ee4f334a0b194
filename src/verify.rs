//! 検証の実行と結果表示

use crate::client::PredictionClient;
use crate::error::{Result, SignVerifyError};
use crate::{render, reveal};
use crate::session::Session;
use indicatif::{ProgressBar, ProgressStyle};
use sign_verify_common::WorkflowState;
use std::time::Duration;

/// 送信 → 結果表示 → 信頼度アニメーション
///
/// # Returns
/// * `Ok(true)` - 判定結果を取得
/// * `Ok(false)` - 失敗（"Analysis Failed" を表示済み）
/// * `Err(NotReady)` - ファイルまたは言語が未選択
pub async fn submit_and_report<C: PredictionClient>(
    session: &mut Session<C>,
    json: bool,
) -> Result<bool> {
    if !session.can_submit() {
        return Err(SignVerifyError::NotReady);
    }

    let spinner = if json {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("Analyzing signature…");
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    };

    session.submit().await;
    spinner.finish_and_clear();

    if json {
        let value = match session.state() {
            WorkflowState::Completed { result, .. } => serde_json::to_value(result)?,
            WorkflowState::Failed { error, .. } => serde_json::json!({ "error": error }),
            _ => serde_json::Value::Null,
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(session.state().result().is_some());
    }

    let Some(presentation) = session.presentation() else {
        return Ok(false);
    };
    render::print_presentation(&presentation);

    if let Some(ticket) = session.take_reveal() {
        reveal::play(session.animator_mut(), ticket, &presentation).await;
        render::print_band_scale();
    }

    Ok(!presentation.is_error)
}
