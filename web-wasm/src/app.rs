//! メインアプリケーションコンポーネント
//!
//! 状態は共通の `Workflow` が持ち、コンポーネントはそこから導出した値を表示する。
//! 信頼度の表示更新は `ConfidenceAnimator` の予約をタイマーで発火させる。

use crate::api::predict::predict;
use crate::components::{
    header::Header, language_picker::LanguagePicker, result_card::ResultCard,
    upload_area::UploadArea,
};
use leptos::prelude::*;
use sign_verify_common::{
    present, ConfidenceAnimator, LanguageCatalog, PreviewJob, RevealTicket, Workflow, REVEAL_DELAY,
    REVEAL_DURATION,
};
use wasm_bindgen_futures::spawn_local;

/// 予約中のタイマー（遅延発火・補間完了）
#[derive(Clone, Copy, Default)]
struct RevealTimers {
    fire: Option<TimeoutHandle>,
    settle: Option<TimeoutHandle>,
}

impl RevealTimers {
    fn clear(&mut self) {
        if let Some(handle) = self.fire.take() {
            handle.clear();
        }
        if let Some(handle) = self.settle.take() {
            handle.clear();
        }
    }
}

/// # Props
/// * `endpoint` - 予測サービスのURL
/// * `catalog` - 選択可能なスクリプト言語
#[component]
pub fn App(endpoint: String, catalog: LanguageCatalog) -> impl IntoView {
    let workflow = RwSignal::new(Workflow::new(catalog.clone()));
    let animator = RwSignal::new(ConfidenceAnimator::new());
    let timers = StoredValue::new(RevealTimers::default());

    let language = Signal::derive(move || workflow.with(|wf| wf.language().map(|l| l.value.clone())));
    let is_loading = Memo::new(move |_| workflow.with(|wf| wf.state().is_verifying()));
    let can_submit = Memo::new(move |_| workflow.with(Workflow::can_submit));
    let presentation = Memo::new(move |_| workflow.with(|wf| present(wf.state(), wf.language())));
    let result_key = Memo::new(move |_| workflow.with(|wf| wf.state().result_key()));
    let displayed = Signal::derive(move || animator.with(ConfidenceAnimator::displayed));

    // 結果が変わったら表示値を0に戻し、遅延後に目標値を適用する
    Effect::new(move |_| {
        let key = result_key.get();
        timers.update_value(RevealTimers::clear);
        if let Some(ticket) = animator.try_update(|a| a.observe(key)).flatten() {
            schedule_reveal(animator, timers, ticket);
        }
    });

    on_cleanup(move || {
        timers.try_update_value(RevealTimers::clear);
        animator.try_update(ConfidenceAnimator::cancel);
    });

    // 選択されたファイルのプレビューを非同期に導出
    let on_accepted = move |job: PreviewJob| {
        spawn_local(async move {
            let (file_id, preview) = job.run();
            workflow.try_update(|wf| {
                wf.apply_preview(file_id, preview);
            });
        });
    };

    let on_select_language = move |value: String| {
        workflow.update(|wf| {
            if let Err(e) = wf.select_language(&value) {
                gloo::console::error!(e.to_string());
            }
        });
    };

    let on_verify = move |_| {
        let mut request = None;
        workflow.update(|wf| request = wf.begin_submit());
        let Some(request) = request else {
            return;
        };
        let endpoint = endpoint.clone();
        spawn_local(async move {
            let outcome = predict(&endpoint, &request).await;
            workflow.try_update(|wf| {
                wf.complete(request.ticket(), outcome);
            });
        });
    };

    view! {
        <div class="page">
            <Header />
            <main class="main">
                <div class="card">
                    <UploadArea workflow=workflow on_accepted=on_accepted />

                    <LanguagePicker
                        catalog=catalog
                        selected=language
                        on_select=on_select_language
                    />

                    <button
                        class="verify-btn"
                        disabled=move || !can_submit.get()
                        on:click=on_verify
                    >
                        <Show when=move || is_loading.get() fallback=|| "Verify Signature →">
                            <span class="spin-row">
                                <span class="spinner" />
                                "Analyzing signature…"
                            </span>
                        </Show>
                    </button>

                    {move || {
                        presentation
                            .get()
                            .map(|presentation| view! { <ResultCard presentation=presentation displayed=displayed /> })
                    }}
                </div>
            </main>
        </div>
    }
}

/// 遅延後に目標値を適用し、補間時間の経過後に完了とする
fn schedule_reveal(
    animator: RwSignal<ConfidenceAnimator>,
    timers: StoredValue<RevealTimers>,
    ticket: RevealTicket,
) {
    let fire = set_timeout_with_handle(
        move || {
            let fired = animator.try_update(|a| a.fire(ticket)).unwrap_or(false);
            if !fired {
                return;
            }
            let settle = set_timeout_with_handle(
                move || {
                    animator.try_update(|a| a.settle(ticket));
                },
                REVEAL_DURATION,
            );
            match settle {
                Ok(handle) => timers.update_value(|t| t.settle = Some(handle)),
                Err(err) => web_sys::console::error_2(&"Timer error:".into(), &err),
            }
        },
        REVEAL_DELAY,
    );
    match fire {
        Ok(handle) => timers.update_value(|t| t.fire = Some(handle)),
        Err(err) => web_sys::console::error_2(&"Timer error:".into(), &err),
    }
}
