use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignVerifyError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("未対応の言語です: {0}（`sign-verify languages` で一覧を確認してください）")]
    UnknownLanguage(String),

    #[error("HTTPクライアントエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Analysis Failed: {0}")]
    Verification(String),

    #[error("送信できません: ファイルと言語を選択してください")]
    NotReady,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl From<sign_verify_common::Error> for SignVerifyError {
    fn from(err: sign_verify_common::Error) -> Self {
        match err {
            sign_verify_common::Error::UnknownLanguage(value) => SignVerifyError::UnknownLanguage(value),
            sign_verify_common::Error::Config(msg) => SignVerifyError::Config(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, SignVerifyError>;
