//! ファイル読み込み（CLI用）
//!
//! ターミナルにファイルをドラッグ&ドロップするとパス文字列が貼り付けられる。
//! 端末によって引用符付き・バックスラッシュエスケープ付きになるので正規化する。

use crate::error::{Result, SignVerifyError};
use image::ImageFormat;
use sign_verify_common::{CandidateFile, DropEvent};
use std::path::{Path, PathBuf};

const FALLBACK_MIME: &str = "application/octet-stream";

/// 貼り付けられたパス文字列を正規化
pub fn parse_dropped_path(input: &str) -> Option<PathBuf> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    // 'path' / "path"
    for quote in ['\'', '"'] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            let inner = &trimmed[1..trimmed.len() - 1];
            return (!inner.is_empty()).then(|| PathBuf::from(strip_file_scheme(inner)));
        }
    }

    // path\ with\ spaces
    let mut unescaped = String::with_capacity(trimmed.len());
    let mut chars = trimmed.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) if !next.is_alphanumeric() => unescaped.push(next),
                // Windows のパス区切りはそのまま
                Some(next) => {
                    unescaped.push('\\');
                    unescaped.push(next);
                }
                None => unescaped.push('\\'),
            }
        } else {
            unescaped.push(c);
        }
    }
    Some(PathBuf::from(strip_file_scheme(&unescaped)))
}

fn strip_file_scheme(s: &str) -> &str {
    s.strip_prefix("file://").unwrap_or(s)
}

/// MIMEタイプを推定（拡張子 → 内容 → 不明）
pub fn detect_mime(path: &Path, bytes: &[u8]) -> String {
    ImageFormat::from_path(path)
        .ok()
        .or_else(|| image::guess_format(bytes).ok())
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|| FALLBACK_MIME.to_string())
}

/// パスから候補ファイルを読み込む
pub async fn read_candidate(path: &Path) -> Result<CandidateFile> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(SignVerifyError::FileNotFound(path.display().to_string()));
    }

    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = detect_mime(path, &bytes);

    Ok(CandidateFile::new(name, mime_type, bytes))
}

/// 貼り付け入力からドロップイベントを組み立てる
pub async fn drop_event_from_input(input: &str) -> Result<DropEvent> {
    match parse_dropped_path(input) {
        Some(path) => Ok(DropEvent::single(read_candidate(&path).await?)),
        None => Ok(DropEvent::default()),
    }
}
