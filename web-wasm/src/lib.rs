//! SignVerify Web App (Leptos + WASM)

mod api;
mod app;
mod components;

use api::predict::API_URL;
use app::App;
use leptos::prelude::*;
use sign_verify_common::LanguageCatalog;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(|| {
        view! { <App endpoint=API_URL.to_string() catalog=LanguageCatalog::default() /> }
    });
}
