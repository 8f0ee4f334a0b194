//! 予測サービス連携
//!
//! POST <endpoint> に multipart (`file`, `language`) を送信し、
//! レスポンスを共通の正規化処理に通す。

use crate::error::Result;
use reqwest::multipart::{Form, Part};
use sign_verify_common::{normalize_response, Outcome, VerificationError, VerificationRequest};
use std::time::Duration;

/// 予測サービスのクライアント
///
/// 失敗はすべて `VerificationError` に畳み込む（パニック・伝播しない）。
#[allow(async_fn_in_trait)]
pub trait PredictionClient {
    async fn predict(&self, request: &VerificationRequest) -> Outcome;
}

/// reqwest による HTTP 実装
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpPredictionClient {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_form(request: &VerificationRequest) -> Form {
        let file = request.file();
        let part = Part::bytes(file.bytes().to_vec()).file_name(file.name().to_string());
        // 不正なMIME文字列なら型指定なしで送る
        let part = match part.mime_str(file.mime_type()) {
            Ok(part) => part,
            Err(e) => {
                log::debug!("ignored invalid mime type {:?}: {}", file.mime_type(), e);
                Part::bytes(file.bytes().to_vec()).file_name(file.name().to_string())
            }
        };

        Form::new()
            .part("file", part)
            .text("language", request.language().value.clone())
    }
}

impl PredictionClient for HttpPredictionClient {
    async fn predict(&self, request: &VerificationRequest) -> Outcome {
        let form = Self::build_form(request);

        let response = match self.http.post(&self.endpoint).multipart(form).send().await {
            Ok(response) => response,
            Err(e) => {
                log::error!("API error: {}", e);
                return Err(VerificationError::transport(e.to_string()));
            }
        };

        let status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                log::error!("API error while reading body: {}", e);
                return Err(VerificationError::transport(e.to_string()));
            }
        };
        log::debug!("{} responded {} ({} bytes)", self.endpoint, status, body.len());

        normalize_response(status, &body)
    }
}
