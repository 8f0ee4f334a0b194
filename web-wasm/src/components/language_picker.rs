//! 言語選択コンポーネント

use leptos::prelude::*;
use sign_verify_common::{LanguageCatalog, ScriptLanguage};

#[component]
pub fn LanguagePicker<F>(
    catalog: LanguageCatalog,
    selected: Signal<Option<String>>,
    on_select: F,
) -> impl IntoView
where
    F: Fn(String) + 'static + Clone,
{
    let options: Vec<ScriptLanguage> = catalog.iter().cloned().collect();

    view! {
        <div class="section">
            <label class="section-label">
                <span class="label-dot" />
                "Script Language"
            </label>
            <div class="lang-grid">
                {options
                    .into_iter()
                    .map(|language| {
                        let on_select = on_select.clone();
                        let value = language.value.clone();
                        let is_selected = {
                            let value = value.clone();
                            move || selected.get().as_deref() == Some(value.as_str())
                        };
                        let class = {
                            let is_selected = is_selected.clone();
                            move || {
                                if is_selected() { "lang-option selected" } else { "lang-option" }
                            }
                        };
                        view! {
                            <div class=class on:click=move |_| on_select(value.clone())>
                                <span class="lang-script">{language.script.clone()}</span>
                                <span>{language.label.clone()}</span>
                                <Show when=is_selected.clone()>
                                    <span class="lang-check">"✓"</span>
                                </Show>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
