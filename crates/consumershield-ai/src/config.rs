use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_TRANSLATION_MODEL: &str = "gemini-2.5-flash";

/// Provider endpoint and model selection.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Base URL of the generative-language API, without trailing slash.
    pub endpoint: String,
    pub analysis_model: String,
    pub translation_model: String,
    /// Whole-request timeout. `None` waits for the provider indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            analysis_model: DEFAULT_ANALYSIS_MODEL.into(),
            translation_model: DEFAULT_TRANSLATION_MODEL.into(),
            timeout: None,
        }
    }
}
