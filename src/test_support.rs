//! Local HTTP responder for fetcher and pipeline tests.

use reqwest::Client;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const TWO_ITEM_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>World News</title>
    <link>https://news.example.com/</link>
    <description>Top stories</description>
    <item>
      <title>Storm makes landfall</title>
      <link>https://news.example.com/storm</link>
      <description><![CDATA[<p>The storm reached the coast <b>overnight</b>.</p>]]></description>
      <pubDate>Mon, 06 May 2025 08:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Markets close higher</title>
      <link>https://news.example.com/markets</link>
      <description>Stocks rallied &amp; bonds slipped.</description>
      <pubDate>Mon, 06 May 2025 21:15:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;

pub const EMPTY_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Quiet Feed</title>
  </channel>
</rss>"#;

/// Serves canned `(status, body)` responses keyed by request path until dropped.
pub struct StubServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(routes: &[(&str, u16, &str)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: Arc<HashMap<String, (u16, String)>> = Arc::new(
            routes
                .iter()
                .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
                .collect(),
        );

        let handle = tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut chunk = [0u8; 1024];
                    loop {
                        let n = socket.read(&mut chunk).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        request.extend_from_slice(&chunk[..n]);
                        if request.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }

                    let request = String::from_utf8_lossy(&request);
                    let path = request.split_whitespace().nth(1).unwrap_or("/");
                    let (status, body) = routes
                        .get(path)
                        .cloned()
                        .unwrap_or((404, String::new()));
                    let reason = if status == 200 { "OK" } else { "Stub" };
                    let response = format!(
                        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/rss+xml; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self { addr, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A URL on a port nothing listens on.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/feed")
}

/// Client that ignores proxy environment variables.
pub fn local_client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}
