//! 信頼度バーコンポーネント
//!
//! 幅の補間は CSS transition（1s ease-out）に任せる。

use leptos::prelude::*;
use sign_verify_common::ConfidenceBand;

const TICKS: [u8; 3] = [25, 50, 75];

#[component]
pub fn ConfidenceBar(
    /// 表示中の値（0〜100）
    displayed: Signal<f64>,
    /// 結果の信頼度（ラベル表示用）
    confidence: f64,
    genuine: bool,
) -> impl IntoView {
    let fill_class = if genuine {
        "progress-fill genuine"
    } else {
        "progress-fill forged"
    };

    view! {
        <div class="progress-section">
            <div class="progress-label">
                <span class="progress-label-text">"Confidence Score"</span>
                <span class="progress-label-value">{format!("{:.1}%", confidence)}</span>
            </div>
            <div class="progress-track">
                <div
                    class=fill_class
                    style=move || format!("width: {}%; transition: width 1s ease-out", displayed.get())
                />
                {TICKS
                    .iter()
                    .map(|t| view! { <div class="tick" style=format!("left: {}%", t) /> })
                    .collect_view()}
            </div>
            <div class="progress-scale">
                {ConfidenceBand::ALL
                    .iter()
                    .map(|band| view! { <span>{band.label()}</span> })
                    .collect_view()}
            </div>
        </div>
    }
}
