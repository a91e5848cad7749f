//! Gemini `generateContent` client.

use async_trait::async_trait;
use consumershield_core::AttachmentPart;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::provider::{GenerateRequest, GenerativeProvider, Part, ProviderError, SafetySetting};
use crate::{AnalysisConfig, ApiKey};

/// HTTP client for the Gemini generative-language API.
#[derive(Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl GeminiProvider {
    /// Create a provider for `config.endpoint`, applying `config.timeout` if set.
    pub fn new(config: &AnalysisConfig) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, model)
    }
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    async fn generate(
        &self,
        key: &ApiKey,
        request: &GenerateRequest,
    ) -> Result<String, ProviderError> {
        let url = self.url_for(&request.model);
        let body = WireRequest::from(request);

        info!(
            url = %url,
            model = %request.model,
            attachments = request.attachment_count(),
            "sending generateContent request"
        );
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", key.expose())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(classify_error(status.as_u16(), &text));
        }

        let parsed: WireResponse = serde_json::from_str(&text)?;
        if let Some(reason) = parsed.block_reason() {
            warn!(reason = %reason, "prompt blocked by provider");
        }
        let out = parsed.text().ok_or(ProviderError::EmptyResponse)?;
        info!(bytes = out.len(), "response received");
        Ok(out)
    }
}

/// Map a non-success response to a [`ProviderError`].
///
/// HTTP 401, or an error body whose `status` is `UNAUTHENTICATED`, means the
/// key was rejected.
fn classify_error(status: u16, body: &str) -> ProviderError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = envelope
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());
    let unauthenticated = status == 401
        || envelope
            .as_ref()
            .and_then(|e| e.error.status.as_deref())
            .is_some_and(|s| s == "UNAUTHENTICATED");

    if unauthenticated {
        ProviderError::Unauthenticated(message)
    } else {
        ProviderError::Status { status, message }
    }
}

// ── Wire format ──

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    contents: Vec<WireContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent<'a>>,
    generation_config: WireGenerationConfig<'a>,
    #[serde(skip_serializing_if = "no_settings")]
    safety_settings: &'a [SafetySetting],
}

fn no_settings(settings: &&[SafetySetting]) -> bool {
    settings.is_empty()
}

#[derive(Serialize)]
struct WireContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<WirePart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum WirePart<'a> {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: &'a AttachmentPart,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig<'a> {
    response_mime_type: &'a str,
}

impl<'a> From<&'a GenerateRequest> for WireRequest<'a> {
    fn from(request: &'a GenerateRequest) -> Self {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                Part::Inline(attachment) => WirePart::Inline {
                    inline_data: attachment,
                },
                Part::Text(text) => WirePart::Text { text },
            })
            .collect();

        Self {
            contents: vec![WireContent {
                role: Some("user"),
                parts,
            }],
            system_instruction: request.system_instruction.as_deref().map(|text| WireContent {
                role: None,
                parts: vec![WirePart::Text { text }],
            }),
            generation_config: WireGenerationConfig {
                response_mime_type: &request.response_mime_type,
            },
            safety_settings: &request.safety_settings,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
    prompt_feedback: Option<WirePromptFeedback>,
}

#[derive(Deserialize)]
struct WireCandidate {
    content: Option<WireCandidateContent>,
}

#[derive(Deserialize)]
struct WireCandidateContent {
    #[serde(default)]
    parts: Vec<WireResponsePart>,
}

#[derive(Deserialize)]
struct WireResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePromptFeedback {
    block_reason: Option<String>,
}

impl WireResponse {
    /// Concatenated text of the first candidate, or `None` if there is none.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }

    fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref()?.block_reason.as_deref()
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    status: Option<String>,
}
