//! Notice translation.
//!
//! Translation never fails outward: any problem yields one of the fixed
//! fallback strings so a notice can always be displayed.

use consumershield_core::SupportedLanguage;
use tracing::{debug, warn};

use crate::provider::{GenerateRequest, GenerativeProvider, Part};
use crate::{AnalysisConfig, CredentialSource, compose_translation_prompt};

/// Returned when the provider answers with no text.
pub const TRANSLATION_FAILED: &str = "Translation failed.";
/// Returned when the provider cannot be reached or credentials are missing.
pub const TRANSLATION_UNAVAILABLE: &str = "Translation unavailable at this time.";

pub struct Translator<P> {
    provider: P,
    credentials: CredentialSource,
    model: String,
}

impl<P: GenerativeProvider> Translator<P> {
    pub fn new(provider: P, credentials: CredentialSource, config: &AnalysisConfig) -> Self {
        Self {
            provider,
            credentials,
            model: config.translation_model.clone(),
        }
    }

    /// Render `text` in `language`. The base language is returned unchanged
    /// without contacting the provider.
    pub async fn translate(&self, text: &str, language: SupportedLanguage) -> String {
        if language.is_base() {
            return text.to_string();
        }

        let key = match self.credentials.resolve() {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, language = %language, "translation skipped");
                return TRANSLATION_UNAVAILABLE.to_string();
            }
        };

        let request = GenerateRequest {
            model: self.model.clone(),
            system_instruction: None,
            parts: vec![Part::Text(compose_translation_prompt(text, language))],
            response_mime_type: "text/plain".into(),
            safety_settings: Vec::new(),
        };

        match self.provider.generate(&key, &request).await {
            Ok(out) if out.trim().is_empty() => TRANSLATION_FAILED.to_string(),
            Ok(out) => {
                debug!(language = %language, chars = out.chars().count(), "translated notice");
                out
            }
            Err(crate::ProviderError::EmptyResponse) => TRANSLATION_FAILED.to_string(),
            Err(e) => {
                warn!(error = %e, language = %language, "translation failed");
                TRANSLATION_UNAVAILABLE.to_string()
            }
        }
    }
}
