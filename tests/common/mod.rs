//! テスト用の予測サービススタブ
//!
//! 1接続ごとにリクエスト全体を読み取り、固定のステータスと本文を返す。

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub struct StubServer {
    pub url: String,
    requests: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl StubServer {
    /// 受信したリクエスト（ヘッダ+本文）
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| String::from_utf8_lossy(r).to_string())
            .collect()
    }
}

/// スタブサーバーを起動
pub async fn spawn_stub(status: u16, body: &'static str) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));

    let captured = requests.clone();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let captured = captured.clone();
            tokio::spawn(async move {
                handle(stream, status, body, captured).await;
            });
        }
    });

    StubServer {
        url: format!("http://{}/predict", addr),
        requests,
    }
}

/// 接続を受け付けないアドレス（一度bindして即解放）
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/predict", addr)
}

async fn handle(
    mut stream: TcpStream,
    status: u16,
    body: &str,
    captured: Arc<Mutex<Vec<Vec<u8>>>>,
) -> Option<()> {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];

    // ヘッダ終端まで
    let header_end = loop {
        let n = stream.read(&mut buf).await.ok()?;
        if n == 0 {
            return None;
        }
        raw.extend_from_slice(&buf[..n]);
        if let Some(pos) = find(&raw, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&raw[..header_end]).to_ascii_lowercase();
    let content_length = headers
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok());
    let chunked = headers.contains("transfer-encoding: chunked");

    // 本文
    loop {
        let done = match content_length {
            Some(len) => raw.len() >= header_end + len,
            None if chunked => find(&raw[header_end..], b"0\r\n\r\n").is_some(),
            None => true,
        };
        if done {
            break;
        }
        let n = stream.read(&mut buf).await.ok()?;
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
    }

    captured.lock().unwrap().push(raw);

    let response = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await.ok()?;
    stream.shutdown().await.ok();
    Some(())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
