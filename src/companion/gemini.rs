//! Gemini `generateContent` REST client.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TextGenerator;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL without trailing slash, e.g. "https://generativelanguage.googleapis.com"
    pub base_url: String,
    pub model: String,
    /// A missing key only fails when a request is made, so the rest of the application stays usable.
    pub api_key: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow!("No API key configured for Gemini"))?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let url = self.endpoint();
        debug!("Sending generateContent request to {url}");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("Gemini API error {status}: {text}");
        }

        let response: GenerateContentResponse = response.json().await?;
        extract_text(response)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Joins text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Response contained no candidates"))?;
    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        bail!("Response contained no text");
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    /// Serves exactly one HTTP response and returns the raw request it received.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> Result<(String, tokio::task::JoinHandle<Result<String>>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = format!("http://{}", listener.local_addr()?);
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await?;
            let mut request = Vec::new();
            let mut buffer = [0u8; 4096];
            loop {
                let read = socket.read(&mut buffer).await?;
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buffer[..read]);
                let text = String::from_utf8_lossy(&request);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await?;
            socket.shutdown().await?;
            Ok::<_, anyhow::Error>(String::from_utf8_lossy(&request).to_string())
        });
        Ok((address, handle))
    }

    fn client_for(base_url: String, api_key: Option<&str>) -> Result<GeminiClient> {
        GeminiClient::new(GeminiConfig {
            base_url,
            model: DEFAULT_MODEL.into(),
            api_key: api_key.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn test_generate_success() -> Result<()> {
        let (address, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"You are "},{"text":"doing well."}],"role":"model"}}]}"#,
        )
        .await?;

        let text = client_for(address, Some("secret"))?
            .generate("Say something kind")
            .await?;

        assert_eq!(text, "You are doing well.");
        let request = server.await??;
        assert!(request.starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent"));
        assert!(request.to_ascii_lowercase().contains("x-goog-api-key: secret"));
        assert!(request.contains(r#"{"contents":[{"parts":[{"text":"Say something kind"}]}]}"#));
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_error_status() -> Result<()> {
        let (address, server) =
            serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await?;

        let result = client_for(address, Some("secret"))?.generate("hello").await;

        assert!(result.is_err());
        server.await??;
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_without_key() -> Result<()> {
        let client = client_for("http://127.0.0.1:9".into(), None)?;
        assert!(client.generate("hello").await.is_err());
        let client = client_for("http://127.0.0.1:9".into(), Some(""))?;
        assert!(client.generate("hello").await.is_err());
        Ok(())
    }

    #[test]
    fn test_extract_text_rejects_empty() {
        let empty: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(extract_text(empty).is_err());
        let no_content: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(extract_text(no_content).is_err());
        let missing: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(extract_text(missing).is_err());
    }
}
