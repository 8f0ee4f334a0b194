//! 結果カードコンポーネント

use crate::components::progress_bar::ConfidenceBar;
use leptos::prelude::*;
use sign_verify_common::Presentation;

#[component]
pub fn ResultCard(presentation: Presentation, displayed: Signal<f64>) -> impl IntoView {
    let card_class = format!("result-card result-anim {}", presentation.badge.as_str());
    let badge_class = format!("verdict-badge {}", presentation.badge.as_str());
    let chip_dot = if presentation.is_genuine && !presentation.is_error {
        "chip-dot on"
    } else {
        "chip-dot"
    };

    let score = (!presentation.is_error).then(|| {
        view! {
            <div class="score-circle">
                <span class="score-value">{presentation.score_text()}</span>
                <span class="score-unit">"%"</span>
            </div>
        }
    });

    let error_message = presentation
        .error_message
        .clone()
        .map(|message| view! { <div class="error-message">"⚠ " {message}</div> });

    let bar = (!presentation.is_error).then(|| {
        view! {
            <ConfidenceBar
                displayed=displayed
                confidence=presentation.confidence
                genuine=presentation.is_genuine
            />
        }
    });

    view! {
        <div class=card_class>
            <div class="result-top">
                <div>
                    <div class="result-meta">{presentation.caption.clone().unwrap_or_default()}</div>
                    <div class=badge_class>
                        <span>{presentation.icon()}</span>
                        <span>{presentation.verdict_text.clone()}</span>
                    </div>
                </div>
                {score}
            </div>
            {error_message}
            {bar}
            <div class="result-chips">
                <span class="chip">
                    <span class=chip_dot />
                    {presentation.chip_text()}
                </span>
                <span class="chip">"🕐 Just now"</span>
            </div>
        </div>
    }
}
