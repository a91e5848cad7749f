//! Provider credential resolution.
//!
//! The key is looked up afresh for every request so a rotated key takes effect
//! without a restart. Resolution is purely local and happens before any I/O.

use std::fmt;

use crate::AnalysisError;

/// Environment variables consulted for the provider key, in priority order.
pub const KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Placeholder some build tools substitute for an unset variable.
const PLACEHOLDER: &str = "undefined";

/// A provider API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Accept `raw` as a key unless it is blank or the placeholder.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim();
        if key.is_empty() || key == PLACEHOLDER {
            None
        } else {
            Some(Self(key.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Where credentials come from.
#[derive(Debug, Clone, Default)]
pub enum CredentialSource {
    /// Process environment, see [`KEY_VARS`].
    #[default]
    Environment,
    /// A fixed value, e.g. from a config file or a test.
    Fixed(Option<String>),
}

impl CredentialSource {
    pub fn resolve(&self) -> Result<ApiKey, AnalysisError> {
        let key = match self {
            Self::Environment => resolve_with(|name| std::env::var(name).ok()),
            Self::Fixed(value) => value.as_deref().and_then(ApiKey::parse),
        };
        key.ok_or(AnalysisError::MissingCredentials)
    }
}

/// First usable key among [`KEY_VARS`] according to `lookup`.
pub fn resolve_with(lookup: impl Fn(&str) -> Option<String>) -> Option<ApiKey> {
    KEY_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find_map(|value| ApiKey::parse(&value))
}
