//! 対話モード
//!
//! ファイル（ターミナルへのドラッグ&ドロップまたはパス入力）と言語を選び、
//! 検証・再検証・ファイル差し替えを繰り返す。

use crate::client::PredictionClient;
use crate::error::Result;
use crate::session::Session;
use crate::{intake, render, verify};
use dialoguer::{Input, Select};
use sign_verify_common::{DropOutcome, Workflow};

/// 対話アクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// ファイルをドロップ（パス入力）
    DropFile,
    /// 言語を選択
    ChooseLanguage,
    /// 検証
    Verify,
    /// 同じファイル・言語で再検証
    Retry,
    /// ファイルを削除
    Remove,
    /// 終了
    Quit,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::DropFile => "署名画像をドロップ / パスを入力",
            Action::ChooseLanguage => "スクリプト言語を選択",
            Action::Verify => "Verify Signature →",
            Action::Retry => "もう一度検証",
            Action::Remove => "✕ Remove",
            Action::Quit => "終了",
        }
    }
}

/// 現在の状態で選べるアクション
///
/// 検証は `can_submit()` が真のときだけ提示する。
pub fn available_actions(workflow: &Workflow) -> Vec<Action> {
    let mut actions = vec![Action::DropFile, Action::ChooseLanguage];
    if workflow.can_submit() {
        let has_outcome = workflow.state().result().is_some() || workflow.state().error().is_some();
        actions.push(if has_outcome { Action::Retry } else { Action::Verify });
    }
    if workflow.selected_file().is_some() {
        actions.push(Action::Remove);
    }
    actions.push(Action::Quit);
    actions
}

pub async fn run_interactive<C: PredictionClient>(session: &mut Session<C>) -> Result<()> {
    println!("✦ SignVerify - 対話モード\n");

    loop {
        println!();
        render::print_status(session.workflow());

        let actions = available_actions(session.workflow());
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        let choice = Select::new()
            .with_prompt("操作を選択")
            .items(&labels)
            .default(0)
            .interact()?;

        match actions[choice] {
            Action::DropFile => drop_file(session).await?,
            Action::ChooseLanguage => choose_language(session)?,
            Action::Verify | Action::Retry => {
                verify::submit_and_report(session, false).await?;
            }
            Action::Remove => {
                session.clear();
                println!("✔ ファイルを削除しました");
            }
            Action::Quit => break,
        }
    }

    session.teardown();
    Ok(())
}

async fn drop_file<C: PredictionClient>(session: &mut Session<C>) -> Result<()> {
    let input = Input::<String>::new()
        .with_prompt("署名画像をここにドロップ（またはパスを入力）")
        .allow_empty(true)
        .interact_text()?;

    let event = match intake::drop_event_from_input(&input).await {
        Ok(event) => event,
        Err(e) => {
            println!("⚠ {}", e);
            return Ok(());
        }
    };

    match session.drop_files(event).await {
        DropOutcome::Accepted(_) => {
            if let Some(file) = session.workflow().selected_file() {
                render::print_file(file, session.workflow().preview().is_some());
            }
        }
        DropOutcome::Rejected(rejected) => {
            println!("⚠ {} - PNG · JPG · JPEG などの画像を指定してください", rejected);
        }
        DropOutcome::Empty => {}
    }
    Ok(())
}

fn choose_language<C: PredictionClient>(session: &mut Session<C>) -> Result<()> {
    let catalog = session.workflow().catalog().clone();
    let items: Vec<String> = catalog
        .iter()
        .map(|l| format!("{}  {}", l.label, l.script))
        .collect();
    let current = session
        .workflow()
        .language()
        .and_then(|selected| catalog.iter().position(|l| l.value == selected.value))
        .unwrap_or(0);

    let choice = Select::new()
        .with_prompt("Script Language")
        .items(&items)
        .default(current)
        .interact()?;

    if let Some(language) = catalog.iter().nth(choice) {
        session.select_language(&language.value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sign_verify_common::{CandidateFile, VerificationError};

    #[test]
    fn test_actions_without_file() {
        let wf = Workflow::default();
        assert_eq!(
            available_actions(&wf),
            vec![Action::DropFile, Action::ChooseLanguage, Action::Quit]
        );
    }

    #[test]
    fn test_actions_ready() {
        let mut wf = Workflow::default();
        wf.accept_candidate(Some(CandidateFile::new("a.png", "image/png", vec![1])));
        wf.select_language("hindi").unwrap();
        let actions = available_actions(&wf);
        assert!(actions.contains(&Action::Verify));
        assert!(actions.contains(&Action::Remove));
    }

    #[test]
    fn test_actions_file_without_language() {
        let mut wf = Workflow::default();
        wf.accept_candidate(Some(CandidateFile::new("a.png", "image/png", vec![1])));
        let actions = available_actions(&wf);
        assert!(!actions.contains(&Action::Verify));
        assert!(actions.contains(&Action::Remove));
    }

    #[test]
    fn test_actions_after_failure_offer_retry() {
        let mut wf = Workflow::default();
        wf.accept_candidate(Some(CandidateFile::new("a.png", "image/png", vec![1])));
        wf.select_language("bengali").unwrap();
        let request = wf.begin_submit().unwrap();
        assert!(!available_actions(&wf).contains(&Action::Verify));

        wf.complete(request.ticket(), Err(VerificationError::transport("refused")));
        let actions = available_actions(&wf);
        assert!(actions.contains(&Action::Retry));
        assert!(!actions.contains(&Action::Verify));
    }
}
