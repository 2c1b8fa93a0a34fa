//! Google Gemini REST client (`generateContent`).

use crate::error::{ErrorKind, Result};
use crate::{GenerationRequest, Generator};
use async_trait::async_trait;
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Public Generative Language API, version `v1beta`.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API client.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use verbum_genai::GeminiClient;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GeminiClient::new("api-key", None, Duration::from_secs(60))?;
/// # Ok(())
/// # }
/// ```
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a client for `endpoint` (defaults to [`DEFAULT_ENDPOINT`]).
    ///
    /// `timeout` bounds each request as a whole, connection included.
    pub fn new(api_key: impl Into<String>, endpoint: Option<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            exn::bail!(ErrorKind::Configuration("API key is empty".to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .or_raise(|| ErrorKind::Configuration("HTTP client".to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            api_key,
        })
    }

    fn url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl Generator for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    #[tracing::instrument(skip_all, fields(model = %request.model, json = request.expects_json()))]
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let response = self
            .http
            .post(self.url(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&WireRequest::from(request))
            .send()
            .await
            .map_err(|e| ErrorKind::Transport(e.to_string()))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| ErrorKind::Transport(e.to_string()))?;
        if !status.is_success() {
            exn::bail!(rejection(status.as_u16(), &body));
        }
        let parsed: WireResponse = serde_json::from_str(&body).or_raise(|| ErrorKind::MalformedResponse)?;
        let text = parsed.text();
        if text.trim().is_empty() {
            exn::bail!(ErrorKind::EmptyResponse(request.model.clone()));
        }
        tracing::debug!(bytes = text.len(), "Model answered");
        Ok(text)
    }
}

/// Turn a non-success HTTP answer into [`ErrorKind::Rejected`], keeping the
/// status code and the service's status name in the message so it can be
/// classified.
fn rejection(status: u16, body: &str) -> ErrorKind {
    match serde_json::from_str::<WireErrorBody>(body) {
        Ok(WireErrorBody { error }) => ErrorKind::Rejected(format!("{status} {}: {}", error.status, error.message)),
        Err(_) => ErrorKind::Rejected(format!("{status}: {}", body.trim())),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    contents: [WireContent<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig<'a>>,
}

#[derive(Serialize)]
struct WireContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: [WirePart<'a>; 1],
}

#[derive(Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

impl<'a> From<&'a GenerationRequest> for WireRequest<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        Self {
            contents: [WireContent {
                role: Some("user"),
                parts: [WirePart { text: &request.contents }],
            }],
            system_instruction: request.system_instruction.as_deref().map(|text| WireContent {
                role: None,
                parts: [WirePart { text }],
            }),
            generation_config: request.response_schema.as_ref().map(|schema| WireGenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            }),
        }
    }
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Deserialize)]
struct WireCandidate {
    content: Option<WireCandidateContent>,
}

#[derive(Deserialize)]
struct WireCandidateContent {
    #[serde(default)]
    parts: Vec<WireCandidatePart>,
}

#[derive(Deserialize)]
struct WireCandidatePart {
    text: Option<String>,
}

impl WireResponse {
    /// Text of the first candidate, all parts concatenated.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct WireErrorBody {
    error: WireError,
}

#[derive(Deserialize)]
struct WireError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}
