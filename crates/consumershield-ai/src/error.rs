use std::path::PathBuf;

use consumershield_core::NormalizeError;
use thiserror::Error;

use crate::ProviderError;

/// Every way an analysis request can fail. None of these are retried.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("API key not found or invalid")]
    MissingCredentials,

    #[error("provider rejected credentials: {0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Provider(String),

    #[error("provider returned an empty response")]
    EmptyResponse,

    #[error("failed to read file {}: {source}", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON response from provider: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("provider response invalid: missing '{0}'")]
    SchemaViolation(&'static str),

    #[error("an analysis is already in progress")]
    Busy,
}

impl AnalysisError {
    /// Whether the caller should prompt the user to re-authenticate.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated(_))
    }

    /// One-line message suitable for showing to the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredentials => format!(
                "API key not found or invalid. Set {} or {}.",
                crate::KEY_VARS[0],
                crate::KEY_VARS[1]
            ),
            Self::Unauthenticated(_) => "Session expired. Please re-select your API key.".into(),
            Self::Provider(message) if message.is_empty() => {
                "An unexpected error occurred during analysis.".into()
            }
            other => other.to_string(),
        }
    }
}

impl From<NormalizeError> for AnalysisError {
    fn from(e: NormalizeError) -> Self {
        match e {
            NormalizeError::Malformed(source) => Self::MalformedResponse(source),
            NormalizeError::SchemaViolation(field) => Self::SchemaViolation(field),
        }
    }
}

impl From<ProviderError> for AnalysisError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Unauthenticated(message) => Self::Unauthenticated(message),
            ProviderError::EmptyResponse => Self::EmptyResponse,
            ProviderError::Http(ref http) if http.status().is_some_and(|s| s.as_u16() == 401) => {
                Self::Unauthenticated(e.to_string())
            }
            other => Self::Provider(other.to_string()),
        }
    }
}
