//! アップロードエリアコンポーネント
//!
//! ドロップは先頭の1ファイルだけを扱い、画像以外は中身を読まずに拒否する。
//! ファイル選択ダイアログからの選択は種類を問わない。
//! 内容の読み込みは操作の時点で `begin_intake` により採番し、
//! 後から始まった操作に追い越された読み込みは共通ワークフロー側で破棄される。

use leptos::prelude::*;
use sign_verify_common::{
    is_image_mime, CandidateFile, DropEvent, DropOutcome, PreviewJob, SelectedFile, Workflow,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{DragEvent, File, HtmlInputElement};

#[component]
pub fn UploadArea<F>(workflow: RwSignal<Workflow>, on_accepted: F) -> impl IntoView
where
    F: Fn(PreviewJob) + Send + Sync + 'static + Clone,
{
    let input_ref = NodeRef::<leptos::html::Input>::new();

    let drag_active = Signal::derive(move || workflow.with(|wf| wf.acquisition().is_drag_active()));
    let file = Signal::derive(move || workflow.with(|wf| wf.selected_file().cloned()));
    let preview = Signal::derive(move || {
        workflow.with(|wf| wf.preview().map(|p| p.data_url().to_string()))
    });

    let handle_drop = {
        let on_accepted = on_accepted.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            workflow.update(Workflow::drag_leave);

            let first = ev
                .data_transfer()
                .and_then(|dt| dt.files())
                .and_then(|files| files.get(0));
            let dropped = match first {
                Some(f) if is_image_mime(&f.type_()) => f,
                // 空・画像以外は読み込み不要なのでその場で処理
                other => {
                    let mut event = match other {
                        Some(f) => {
                            DropEvent::single(CandidateFile::new(f.name(), f.type_(), Vec::new()))
                        }
                        None => DropEvent::default(),
                    };
                    let mut outcome = DropOutcome::Empty;
                    workflow.update(|wf| outcome = wf.accept_drop(&mut event));
                    if let DropOutcome::Rejected(rejected) = outcome {
                        gloo::console::warn!(format!("Ignored drop: {}", rejected));
                    }
                    return;
                }
            };

            let Some(token) = workflow.try_update(Workflow::begin_intake) else {
                return;
            };
            let on_accepted = on_accepted.clone();
            spawn_local(async move {
                match read_candidate(&dropped).await {
                    Ok(candidate) => {
                        let mut event = DropEvent::single(candidate);
                        let outcome = workflow
                            .try_update(|wf| wf.complete_drop(token, &mut event))
                            .flatten();
                        if let Some(DropOutcome::Accepted(job)) = outcome {
                            on_accepted(job);
                        }
                    }
                    Err(err) => {
                        gloo::console::error!("File read error:", err);
                        workflow.try_update(|wf| wf.abandon_intake(token));
                    }
                }
            });
        }
    };

    let handle_change = move |ev: web_sys::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let chosen = input.files().and_then(|files| files.get(0));
        // 同じファイルを選び直しても change が発火するように
        input.set_value("");

        let Some(chosen) = chosen else {
            workflow.update(|wf| {
                wf.accept_candidate(None);
            });
            return;
        };

        let Some(token) = workflow.try_update(Workflow::begin_intake) else {
            return;
        };
        let on_accepted = on_accepted.clone();
        spawn_local(async move {
            match read_candidate(&chosen).await {
                Ok(candidate) => {
                    let job = workflow
                        .try_update(|wf| wf.complete_choice(token, candidate))
                        .flatten();
                    if let Some(job) = job {
                        on_accepted(job);
                    }
                }
                Err(err) => {
                    gloo::console::error!("File read error:", err);
                    workflow.try_update(|wf| wf.abandon_intake(token));
                }
            }
        });
    };

    let open_dialog = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let drop_zone = move || {
        view! {
            <div
                class=move || if drag_active.get() { "upload-zone active" } else { "upload-zone" }
                on:click=open_dialog
                on:dragenter=move |_: DragEvent| workflow.update(Workflow::drag_enter)
                on:dragleave=move |_: DragEvent| workflow.update(Workflow::drag_leave)
                on:dragover=move |ev: DragEvent| ev.prevent_default()
                on:drop=handle_drop.clone()
            >
                <div class="upload-icon-circle">"⬆"</div>
                <p class="upload-title">"Drop your signature here"</p>
                <p class="upload-sub">"or " <span class="upload-link">"browse files"</span></p>
                <p class="upload-hint">"PNG · JPG · JPEG"</p>
            </div>
        }
    };

    view! {
        <div class="section">
            <label class="section-label">
                <span class="label-dot" />
                "Upload Signature"
            </label>
            <input
                node_ref=input_ref
                type="file"
                accept="image/*"
                style="display: none"
                on:change=handle_change
            />
            <Show when=move || file.with(Option::is_some) fallback=drop_zone>
                <div class="preview-card">
                    {move || match preview.get() {
                        Some(url) => view! { <img src=url alt="Signature preview" class="preview-img" /> }.into_any(),
                        None => view! { <div class="preview-img placeholder" /> }.into_any(),
                    }}
                    <div class="preview-meta">
                        <div class="preview-file-name">
                            {move || file.with(|f| f.as_ref().map(|f| f.name().to_string()))}
                        </div>
                        <div class="preview-size">
                            {move || file.with(|f| f.as_ref().map(SelectedFile::size_label))}
                        </div>
                    </div>
                    <button class="remove-btn" on:click=move |_| workflow.update(Workflow::clear)>
                        "✕ Remove"
                    </button>
                </div>
            </Show>
        </div>
    }
}

/// ブラウザの File からバイト列を読み出す
async fn read_candidate(file: &File) -> Result<CandidateFile, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(CandidateFile::new(file.name(), file.type_(), bytes))
}
