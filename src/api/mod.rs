//! REST clients for Flavortown and Hackatime.
//!
//! Both clients share the same transport conventions: bearer auth, a
//! per-request timeout, and status codes mapped to `ClientError`.

pub mod flavortown;
pub mod hackatime;

pub use flavortown::FlavortownClient;
pub use hackatime::HackatimeClient;

use crate::error::ClientError;
use crate::models::{ResourceKind, ResourcePage};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// A remote listing that can be read one page at a time.
#[async_trait]
pub trait ResourceListing: Send + Sync {
    /// Fetch page `page` (1-based) of `kind`, narrowed server-side by `query`.
    async fn list_resources(
        &self,
        kind: ResourceKind,
        page: u32,
        query: &str,
    ) -> Result<ResourcePage, ClientError>;
}

/// Build a reqwest client with the given timeout.
fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("flavor/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ClientError::Transport(e.to_string()))
}

/// Map a reqwest send error to a client error.
fn map_send_error(error: reqwest::Error, base_url: &str, timeout: Duration) -> ClientError {
    if error.is_timeout() {
        ClientError::Timeout(timeout.as_secs())
    } else if error.is_connect() {
        ClientError::Connect(base_url.to_string())
    } else {
        ClientError::Transport(error.to_string())
    }
}

/// Check the status and decode a JSON body.
///
/// `what` names the requested resource for not-found messages.
async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!("HTTP {} for {}: {}", status, what, body_preview(&body));
        return Err(ClientError::from_status(status.as_u16(), what));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

fn body_preview(body: &str) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
        format!("{}...", preview)
    } else {
        compact
    }
}

/// One-shot HTTP server for exercising the clients against canned responses.
#[cfg(test)]
pub(crate) mod test_server {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve a single response. Returns the base URL and a handle yielding
    /// the raw request (head and body) that was received.
    pub(crate) async fn serve_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;

            let response = format!(
                "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (base_url, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_preview_compacts_and_truncates() {
        assert_eq!(body_preview("  {\n  \"error\":  \"x\" }\n"), "{ \"error\": \"x\" }");

        let long = "a".repeat(200);
        let preview = body_preview(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(Duration::from_secs(5)).is_ok());
    }
}
