//! Single-file retrieval through the contents endpoint.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use tracing::debug;

use crate::github::GitHubClient;

/// Per-request bounds for a file fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub max_size_bytes: usize,
}

#[derive(Debug, Deserialize)]
struct ContentPayload {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

impl GitHubClient {
    /// Options using the configured file timeout and size ceiling.
    pub fn default_fetch_options(&self) -> FetchOptions {
        let settings = self.settings();
        FetchOptions {
            timeout: settings.file_timeout,
            max_size_bytes: settings.max_file_bytes,
        }
    }

    /// Fetches one file's decoded UTF-8 text.
    ///
    /// Never fails: a non-2xx response, a timeout, a directory listing, a
    /// decode error or a file above `max_size_bytes` all yield `None`.
    /// Oversized files are dropped, not truncated.
    pub async fn fetch_file_content(
        &self,
        credential: &str,
        owner: &str,
        repo: &str,
        path: &str,
        options: FetchOptions,
    ) -> Option<String> {
        let api_path = format!("/repos/{owner}/{repo}/contents/{path}");
        let payload: ContentPayload = self
            .get_json(credential, &api_path, &[], options.timeout)
            .await
            .ok()?;

        let text = decode_content(&payload, options.max_size_bytes);
        if text.is_none() {
            debug!("Skipping {owner}/{repo}:{path} (oversized or undecodable)");
        }
        text
    }
}

fn decode_content(payload: &ContentPayload, max_size_bytes: usize) -> Option<String> {
    if payload.kind.as_deref().is_some_and(|k| k != "file") {
        return None;
    }
    if payload.size > max_size_bytes as u64 {
        return None;
    }
    if payload.encoding.as_deref().is_some_and(|e| e != "base64") {
        return None;
    }

    let encoded: String = payload
        .content
        .as_deref()?
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD.decode(encoded).ok()?;
    if bytes.len() > max_size_bytes {
        return None;
    }
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::mock::{content_body, MockGitHub};
    use crate::github::FetchSettings;
    use serde_json::json;

    fn options(max_size_bytes: usize) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(2),
            max_size_bytes,
        }
    }

    #[tokio::test]
    async fn test_fetches_and_decodes_file() {
        let text = "# Title\n\nSome readme text that spans more than sixty characters of base64.\n";
        let (client, _mock) = MockGitHub::new()
            .file("alice", "x", "README.md", text)
            .serve()
            .await;
        let fetched = client
            .fetch_file_content("token", "alice", "x", "README.md", options(1024))
            .await;
        assert_eq!(fetched.as_deref(), Some(text));
    }

    #[tokio::test]
    async fn test_missing_file_is_absent() {
        let (client, _mock) = MockGitHub::new().serve().await;
        let fetched = client
            .fetch_file_content("token", "alice", "x", "go.mod", options(1024))
            .await;
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_declared_size_over_limit_is_absent() {
        let (client, _mock) = MockGitHub::new()
            .file("alice", "x", "big.txt", &"a".repeat(2048))
            .serve()
            .await;
        let fetched = client
            .fetch_file_content("token", "alice", "x", "big.txt", options(1024))
            .await;
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_configured_ceiling_bounds_default_fetches() {
        let settings = FetchSettings {
            max_file_bytes: 512,
            ..FetchSettings::default()
        };
        let (client, _mock) = MockGitHub::new()
            .settings(settings)
            .file("alice", "x", "small.txt", "tiny")
            .file("alice", "x", "large.txt", &"c".repeat(600))
            .serve()
            .await;
        let defaults = client.default_fetch_options();
        assert_eq!(defaults.max_size_bytes, 512);

        let small = client
            .fetch_file_content("token", "alice", "x", "small.txt", defaults)
            .await;
        let large = client
            .fetch_file_content("token", "alice", "x", "large.txt", defaults)
            .await;
        assert_eq!(small.as_deref(), Some("tiny"));
        assert!(large.is_none());
    }

    #[tokio::test]
    async fn test_slow_file_is_absent() {
        let (client, _mock) = MockGitHub::new()
            .delayed(
                "/repos/alice/x/contents/slow.txt",
                Duration::from_millis(400),
                content_body("late"),
            )
            .serve()
            .await;
        let fetched = client
            .fetch_file_content(
                "token",
                "alice",
                "x",
                "slow.txt",
                FetchOptions {
                    timeout: Duration::from_millis(50),
                    max_size_bytes: 1024,
                },
            )
            .await;
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_directory_listing_is_absent() {
        let (client, _mock) = MockGitHub::new()
            .json(
                "/repos/alice/x/contents/src",
                json!([{"type": "file", "name": "main.rs"}]),
            )
            .serve()
            .await;
        let fetched = client
            .fetch_file_content("token", "alice", "x", "src", options(1024))
            .await;
        assert!(fetched.is_none());
    }

    #[test]
    fn test_decoded_size_is_checked_even_when_declared_size_lies() {
        let mut body = content_body(&"b".repeat(600));
        body["size"] = json!(10);
        let payload: ContentPayload = serde_json::from_value(body).unwrap();
        assert!(decode_content(&payload, 500).is_none());
        assert_eq!(decode_content(&payload, 1000).map(|t| t.len()), Some(600));
    }

    #[test]
    fn test_invalid_base64_and_utf8_are_absent() {
        let payload = ContentPayload {
            kind: Some("file".to_string()),
            size: 4,
            encoding: Some("base64".to_string()),
            content: Some("!!!not base64!!!".to_string()),
        };
        assert!(decode_content(&payload, 1024).is_none());

        let payload = ContentPayload {
            kind: Some("file".to_string()),
            size: 2,
            encoding: Some("base64".to_string()),
            content: Some(STANDARD.encode([0xff, 0xfe])),
        };
        assert!(decode_content(&payload, 1024).is_none());
    }

    #[test]
    fn test_non_file_payload_is_absent() {
        let payload = ContentPayload {
            kind: Some("symlink".to_string()),
            size: 1,
            encoding: Some("base64".to_string()),
            content: Some(STANDARD.encode("x")),
        };
        assert!(decode_content(&payload, 1024).is_none());
    }
}
