//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <div class="logo">
                <span class="logo-icon">"✦"</span>
                <span class="logo-text">"SignVerify"</span>
            </div>
            <div class="pill">"AI-Powered · v2.0"</div>
        </header>
        <div class="hero">
            <div class="icon-ring"><span class="hero-icon">"🖊"</span></div>
            <h1>"Signature Verification"</h1>
            <p class="subtitle">
                "Upload a handwritten signature and our AI will analyze its authenticity in seconds."
            </p>
        </div>
    }
}
