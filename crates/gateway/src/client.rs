//! REST client for the AI gateway HTTP endpoints.
//!
//! Wraps the gateway's chat-completions and image-generations endpoints
//! using [`reqwest`]. All calls are single-shot: retry policy belongs to
//! the pipeline, not this layer.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

/// Gateway connection settings, injected at process start.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL, e.g. `https://gateway.example.com`.
    pub base_url: String,
    /// Bearer key sent on every request.
    pub api_key: String,
}

impl GatewayConfig {
    /// Load from `AI_GATEWAY_URL` / `AI_GATEWAY_KEY`.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("AI_GATEWAY_URL")
                .unwrap_or_else(|_| "https://ai-gateway.internal".into()),
            api_key: std::env::var("AI_GATEWAY_KEY").unwrap_or_default(),
        }
    }
}

/// One generated image: raw bytes plus the metadata the gateway reports.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub seed: Option<i64>,
}

/// Errors from the gateway layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("AI gateway error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response whose body did not match the expected shape.
    #[error("Unexpected gateway response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Upstream HTTP status, when the gateway answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is an upstream 429.
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }
}

/// The calls the pipeline makes against the gateway.
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// One text-model call; returns the raw reply text.
    async fn generate_text(&self, model: &str, prompt: &str) -> Result<String, GatewayError>;

    /// One image-model call.
    async fn generate_image(
        &self,
        model: &str,
        prompt: &str,
        negative_prompt: Option<&str>,
    ) -> Result<GeneratedImage, GatewayError>;

    /// Fetch previously stored image bytes by URL (download assembly).
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, GatewayError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// Production [`AiGateway`] over HTTP.
pub struct HttpAiGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    b64_json: String,
    #[serde(default)]
    width: Option<i32>,
    #[serde(default)]
    height: Option<i32>,
    #[serde(default)]
    seed: Option<i64>,
}

impl HttpAiGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or [`GatewayError::Api`] with the status and
    /// body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl AiGateway for HttpAiGateway {
    async fn generate_text(&self, model: &str, prompt: &str) -> Result<String, GatewayError> {
        let body = serde_json::json!({
            "model": model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| GatewayError::Decode("chat response had no choices".into()))
    }

    async fn generate_image(
        &self,
        model: &str,
        prompt: &str,
        negative_prompt: Option<&str>,
    ) -> Result<GeneratedImage, GatewayError> {
        let mut body = serde_json::json!({
            "model": model,
            "prompt": prompt,
            "n": 1,
        });
        if let Some(negative) = negative_prompt {
            body["negative_prompt"] = serde_json::Value::String(negative.to_string());
        }

        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let parsed: ImageResponse = response.json().await?;
        let datum = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Decode("image response had no data".into()))?;

        let bytes = BASE64
            .decode(datum.b64_json.as_bytes())
            .map_err(|e| GatewayError::Decode(format!("invalid base64 image payload: {e}")))?;

        Ok(GeneratedImage {
            bytes,
            width: datum.width,
            height: datum.height,
            seed: datum.seed,
        })
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, GatewayError> {
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
