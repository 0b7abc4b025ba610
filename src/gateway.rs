//! Gateway for the Gemini `generateContent` endpoint.

use crate::error::{ForgeError, Result};
use crate::request::GenerateContentRequest;
use crate::response::GenerateContentResponse;
use async_trait::async_trait;
use std::time::Duration;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Environment variable holding the API credential.
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";

/// Fixed delay applied before each dispatch, a mitigation for upstream
/// rate limiting.
const PRE_DISPATCH_DELAY: Duration = Duration::from_secs(1);

/// Deadline for the whole network round-trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const MAX_ERROR_BODY_CHARS: usize = 300;

/// Gemini image model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageModel {
    /// Gemini 2.5 Flash Image preview.
    #[default]
    FlashImagePreview,
    /// Gemini 2.5 Flash Image (stable).
    FlashImage,
}

impl ImageModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlashImagePreview => "gemini-2.5-flash-image-preview",
            Self::FlashImage => "gemini-2.5-flash-image",
        }
    }
}

/// Seam between operations and the upstream API, so operations can be
/// driven by a test double.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Dispatches one payload and returns the raw response.
    async fn dispatch(&self, payload: &GenerateContentRequest) -> Result<GenerateContentResponse>;
}

/// Builder for [`ApiGateway`].
#[derive(Debug, Clone, Default)]
pub struct ApiGatewayBuilder {
    api_key: Option<String>,
    model: ImageModel,
}

impl ApiGatewayBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to the `GEMINI_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the model variant.
    pub fn model(mut self, model: ImageModel) -> Self {
        self.model = model;
        self
    }

    /// Builds the gateway.
    ///
    /// A missing credential is not an error here; it surfaces as
    /// [`ForgeError::Config`] on the first dispatch, before any network
    /// attempt.
    pub fn build(self) -> Result<ApiGateway> {
        let api_key = self.api_key.or_else(|| std::env::var(ENV_API_KEY).ok());

        Ok(ApiGateway {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()?,
            api_key,
            model: self.model,
        })
    }
}

/// Owns the HTTP client handle and dispatches one request per call.
///
/// Exactly one attempt per call; retries, if desired, are the caller's
/// responsibility.
pub struct ApiGateway {
    client: reqwest::Client,
    api_key: Option<String>,
    model: ImageModel,
}

impl ApiGateway {
    /// Creates a new `ApiGatewayBuilder`.
    pub fn builder() -> ApiGatewayBuilder {
        ApiGatewayBuilder::new()
    }

    async fn dispatch_impl(
        &self,
        payload: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ForgeError::Config(format!("{ENV_API_KEY} is not set and no API key was provided"))
        })?;

        tokio::time::sleep(PRE_DISPATCH_DELAY).await;

        let url = format!("{API_BASE}/{}:generateContent", self.model.as_str());
        tracing::debug!(model = self.model.as_str(), "dispatching generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            let err = classify_failure(status.as_u16(), &text, &headers);
            if let ForgeError::RateLimited { retry_after } = &err {
                tracing::warn!(?retry_after, "upstream rate limit");
            }
            return Err(err);
        }

        let parsed: GenerateContentResponse = response.json().await?;
        tracing::debug!("generateContent response received");
        Ok(parsed)
    }
}

#[async_trait]
impl Backend for ApiGateway {
    async fn dispatch(&self, payload: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        self.dispatch_impl(payload).await
    }
}

fn classify_failure(status: u16, body: &str, headers: &reqwest::header::HeaderMap) -> ForgeError {
    // Quota errors sometimes arrive with a non-429 status but carry the
    // RESOURCE_EXHAUSTED marker in the body.
    if status == 429 || body.contains("RESOURCE_EXHAUSTED") {
        return ForgeError::RateLimited {
            retry_after: parse_retry_after(headers),
        };
    }

    ForgeError::Upstream {
        status,
        message: sanitize_error_message(body),
    }
}

fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Reduces an upstream error body to a short human-readable message.
fn sanitize_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.pointer("/error/message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no error detail".to_string();
    }
    if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
        let truncated: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
        return format!("{truncated}...");
    }
    trimmed.to_string()
}
