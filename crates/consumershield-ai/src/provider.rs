//! The seam between the pipeline and a generative-model service.

use async_trait::async_trait;
use consumershield_core::AttachmentPart;
use serde::Serialize;
use thiserror::Error;

use crate::ApiKey;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider rejected credentials: {0}")]
    Unauthenticated(String),
    #[error("provider returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("provider returned an empty response")]
    EmptyResponse,
}

/// One element of a multi-part request, in the order the model should read it.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Inline(AttachmentPart),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

impl SafetySetting {
    /// Content filtering off for every category.
    ///
    /// Grievances routinely describe harassment and threats; default filters
    /// refuse them.
    pub fn relaxed() -> Vec<Self> {
        [
            HarmCategory::HateSpeech,
            HarmCategory::SexuallyExplicit,
            HarmCategory::Harassment,
            HarmCategory::DangerousContent,
        ]
        .into_iter()
        .map(|category| Self {
            category,
            threshold: HarmBlockThreshold::BlockNone,
        })
        .collect()
    }
}

/// A single generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub system_instruction: Option<String>,
    pub parts: Vec<Part>,
    /// `application/json` for structured output, `text/plain` otherwise.
    pub response_mime_type: String,
    pub safety_settings: Vec<SafetySetting>,
}

impl GenerateRequest {
    pub fn attachment_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, Part::Inline(_)))
            .count()
    }
}

/// A generative-model backend. Returns the model's raw response text.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    async fn generate(
        &self,
        key: &ApiKey,
        request: &GenerateRequest,
    ) -> Result<String, ProviderError>;
}

#[async_trait]
impl<P: GenerativeProvider + ?Sized> GenerativeProvider for std::sync::Arc<P> {
    async fn generate(
        &self,
        key: &ApiKey,
        request: &GenerateRequest,
    ) -> Result<String, ProviderError> {
        (**self).generate(key, request).await
    }
}
