//! 予測サービス呼び出し（fetch + FormData）

use sign_verify_common::{normalize_response, Outcome, VerificationError, VerificationRequest};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Request, RequestInit, RequestMode, Response};

/// 既定のエンドポイント
pub const API_URL: &str = "http://localhost:8000/predict";

/// multipart で送信し、結果を正規化して返す
///
/// 到達不能・CORS拒否などはトランスポート失敗として扱う。
pub async fn predict(endpoint: &str, request: &VerificationRequest) -> Outcome {
    match send(endpoint, request).await {
        Ok((status, body)) => normalize_response(status, body.as_bytes()),
        Err(err) => {
            let message = js_error_message(&err);
            web_sys::console::error_1(&format!("API error: {}", message).into());
            Err(VerificationError::transport(message))
        }
    }
}

async fn send(endpoint: &str, request: &VerificationRequest) -> Result<(u16, String), JsValue> {
    let form = build_form(request)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&form);

    let req = Request::new_with_str_and_init(endpoint, &opts)?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&req)).await?;
    let resp: Response = resp_value.dyn_into()?;

    let status = resp.status();
    let text = JsFuture::from(resp.text()?).await?;
    Ok((status, text.as_string().unwrap_or_default()))
}

fn build_form(request: &VerificationRequest) -> Result<FormData, JsValue> {
    let file = request.file();

    let bytes = js_sys::Uint8Array::from(file.bytes());
    let parts = js_sys::Array::of1(&bytes);
    let props = BlobPropertyBag::new();
    props.set_type(file.mime_type());
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &props)?;

    let form = FormData::new()?;
    form.append_with_blob_and_filename("file", &blob, file.name())?;
    form.append_with_str("language", &request.language().value)?;
    Ok(form)
}

fn js_error_message(err: &JsValue) -> String {
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    err.as_string().unwrap_or_else(|| "Failed to fetch".to_string())
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use sign_verify_common::{CandidateFile, Workflow};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn request() -> VerificationRequest {
        let mut wf = Workflow::default();
        wf.accept_candidate(Some(CandidateFile::new("sig.png", "image/png", vec![1, 2, 3])));
        wf.select_language("bengali").expect("known language");
        wf.begin_submit().expect("ready to submit")
    }

    #[wasm_bindgen_test]
    fn wasm_form_has_file_and_language() {
        let form = build_form(&request()).expect("form");
        assert_eq!(form.get("language").as_string().as_deref(), Some("bengali"));

        let file: web_sys::File = form.get("file").dyn_into().expect("file part");
        assert_eq!(file.name(), "sig.png");
        assert_eq!(file.type_(), "image/png");
        assert_eq!(file.size(), 3.0);
    }

    #[wasm_bindgen_test]
    async fn wasm_unreachable_endpoint_is_transport_failure() {
        let outcome = predict("http://127.0.0.1:1/predict", &request()).await;
        let err = outcome.expect_err("should fail");
        assert_eq!(err.kind, sign_verify_common::ErrorKind::Transport);
    }
}
