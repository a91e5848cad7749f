//! Generative-model layer: builds multi-part analysis requests, calls the
//! provider, and validates what comes back.

mod analyzer;
mod attachment;
mod config;
mod credentials;
mod error;
mod gemini;
mod prompt;
mod provider;
mod single_flight;
mod translator;

pub use analyzer::Analyzer;
pub use attachment::{encode_all, encode_bytes, encode_file};
pub use config::{
    AnalysisConfig, DEFAULT_ANALYSIS_MODEL, DEFAULT_ENDPOINT, DEFAULT_TRANSLATION_MODEL,
};
pub use credentials::{ApiKey, CredentialSource, KEY_VARS};
pub use error::AnalysisError;
pub use gemini::GeminiProvider;
pub use prompt::{SYSTEM_INSTRUCTION, compose_analysis_prompt, compose_translation_prompt};
pub use provider::{
    GenerateRequest, GenerativeProvider, HarmBlockThreshold, HarmCategory, Part, ProviderError,
    SafetySetting,
};
pub use single_flight::{FlightGuard, SingleFlight};
pub use translator::{TRANSLATION_FAILED, TRANSLATION_UNAVAILABLE, Translator};
