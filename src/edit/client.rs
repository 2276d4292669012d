//! Gemini image editing client.

use crate::edit::editor::ImageEditor;
use crate::edit::response::ModelResponse;
use crate::edit::types::{EditRequest, EncodedImage};
use crate::error::{parse_retry_after, sanitize_error_message, AccessorizeError, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;
use std::time::Instant;

/// Model every edit is sent to.
pub const MODEL_ID: &str = "gemini-2.5-flash-image";

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// MIME type assumed when the response omits one.
const DEFAULT_RESPONSE_MIME_TYPE: &str = "image/png";

/// Builder for [`EditClient`].
#[derive(Debug, Clone, Default)]
pub struct EditClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    http: Option<reqwest::Client>,
}

impl EditClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GOOGLE_API_KEY`, then `GEMINI_API_KEY`.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the API root (proxies, test servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Uses a preconfigured HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Builds the client, resolving the API key.
    ///
    /// Fails with [`AccessorizeError::Config`] when no key is available.
    pub fn build(self) -> Result<EditClient> {
        let api_key = resolve_api_key(self.api_key, |var| std::env::var(var).ok())
            .ok_or_else(|| {
                AccessorizeError::Config(format!(
                    "{} not set and no API key provided",
                    API_KEY_ENV_VARS.join(" / ")
                ))
            })?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(EditClient {
            http: self.http.unwrap_or_default(),
            api_key,
            base_url,
        })
    }
}

/// Picks the explicit key, else the first non-blank variable in
/// [`API_KEY_ENV_VARS`]. A blank explicit key does not fall back.
fn resolve_api_key(
    explicit: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    let non_blank = |key: &String| !key.trim().is_empty();
    match explicit {
        Some(key) => Some(key).filter(non_blank),
        None => API_KEY_ENV_VARS
            .iter()
            .find_map(|&var| lookup(var).filter(non_blank)),
    }
}

/// Sends edit requests to Gemini.
///
/// Cheap to clone; clones share one connection pool. Concurrent calls are
/// independent of each other.
#[derive(Clone)]
pub struct EditClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for EditClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl EditClient {
    /// Creates a new `EditClientBuilder`.
    pub fn builder() -> EditClientBuilder {
        EditClientBuilder::new()
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url, MODEL_ID)
    }

    async fn edit_impl(&self, request: &EditRequest) -> Result<EncodedImage> {
        let start = Instant::now();
        let url = format!("{}:generateContent", self.model_url());
        let body = GeminiRequest::from_edit_request(request);

        tracing::debug!(
            model = MODEL_ID,
            mime_type = request.image().mime_type(),
            "sending image edit request"
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "image edit request rejected");
            return Err(parse_error(status.as_u16(), &text, &headers));
        }

        // Parsed separately so a bad body is a Json error, not a transport one.
        let text = response.text().await?;
        let model_response: ModelResponse = serde_json::from_str(&text)?;
        let image = extract_image(&model_response)?;

        tracing::debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            mime_type = image.mime_type(),
            "image edit complete"
        );
        Ok(image)
    }
}

#[async_trait]
impl ImageEditor for EditClient {
    async fn edit(&self, request: &EditRequest) -> Result<EncodedImage> {
        self.edit_impl(request).await
    }

    async fn health_check(&self) -> Result<()> {
        let response = self
            .http
            .get(self.model_url())
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        match response.status().as_u16() {
            401 | 403 => Err(AccessorizeError::Auth("Invalid API key".into())),
            404 => Err(AccessorizeError::InvalidRequest(
                "Model not found. Verify the model name is correct.".into(),
            )),
            s if !(200..300).contains(&s) => Err(AccessorizeError::Api {
                status: s,
                message: "Health check failed".into(),
            }),
            _ => Ok(()),
        }
    }
}

/// Pulls the first image part out of a successful response.
fn extract_image(response: &ModelResponse) -> Result<EncodedImage> {
    let Some(inline) = response.first_image() else {
        if let Some(message) = response.block_message() {
            return Err(AccessorizeError::ContentBlocked(message));
        }
        let text = response.text().unwrap_or_default();
        tracing::debug!(
            finish_reason = response.finish_reason().unwrap_or("none"),
            text = %text,
            "response carried no image part"
        );
        return Err(AccessorizeError::NoImageData);
    };

    if inline.data.is_empty() {
        return Err(AccessorizeError::Decode("image part has empty data".into()));
    }
    base64::engine::general_purpose::STANDARD
        .decode(&inline.data)
        .map_err(|e| AccessorizeError::Decode(e.to_string()))?;

    let mime_type = inline
        .mime_type
        .as_deref()
        .unwrap_or(DEFAULT_RESPONSE_MIME_TYPE);
    Ok(EncodedImage::from_base64(inline.data.clone(), mime_type))
}

fn parse_error(status: u16, text: &str, headers: &reqwest::header::HeaderMap) -> AccessorizeError {
    let text = sanitize_error_message(text);
    if status == 404 {
        return AccessorizeError::InvalidRequest(
            "Model not found. Verify the model name is correct.".into(),
        );
    }
    if status == 429 {
        let retry_after = parse_retry_after(headers).map(std::time::Duration::from_secs);
        return AccessorizeError::RateLimited { retry_after };
    }
    if status == 401 || status == 403 {
        return AccessorizeError::Auth(text);
    }
    let lower = text.to_lowercase();
    if lower.contains("safety")
        || lower.contains("blocked")
        || lower.contains("prohibited")
    {
        return AccessorizeError::ContentBlocked(text);
    }
    AccessorizeError::Api {
        status,
        message: text,
    }
}

// Request types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiRequestPart<'a>>,
}

/// A part in a Gemini request - inline image data or text.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart<'a> {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<&'static str>,
}

impl<'a> GeminiRequest<'a> {
    /// Image first, then the instruction.
    fn from_edit_request(req: &'a EditRequest) -> Self {
        let parts = vec![
            GeminiRequestPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: req.image().mime_type(),
                    data: req.image().data(),
                },
            },
            GeminiRequestPart::Text {
                text: req.instruction(),
            },
        ];

        Self {
            contents: vec![GeminiContent { parts }],
            generation_config: GeminiConfig {
                response_modalities: vec!["IMAGE"],
            },
        }
    }
}
