//! Languages the draft notice can be rendered in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SupportedLanguage {
    #[default]
    English,
    Hindi,
    Marathi,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Bengali,
    Gujarati,
    Punjabi,
    Odia,
    Urdu,
    Assamese,
    Maithili,
}

#[derive(Debug, Error)]
#[error("unsupported language: {0}")]
pub struct UnknownLanguage(pub String);

impl SupportedLanguage {
    /// The language the provider writes the notice in.
    pub const BASE: Self = Self::English;

    pub const ALL: [Self; 14] = [
        Self::English,
        Self::Hindi,
        Self::Marathi,
        Self::Tamil,
        Self::Telugu,
        Self::Kannada,
        Self::Malayalam,
        Self::Bengali,
        Self::Gujarati,
        Self::Punjabi,
        Self::Odia,
        Self::Urdu,
        Self::Assamese,
        Self::Maithili,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
            Self::Marathi => "Marathi",
            Self::Tamil => "Tamil",
            Self::Telugu => "Telugu",
            Self::Kannada => "Kannada",
            Self::Malayalam => "Malayalam",
            Self::Bengali => "Bengali",
            Self::Gujarati => "Gujarati",
            Self::Punjabi => "Punjabi",
            Self::Odia => "Odia",
            Self::Urdu => "Urdu",
            Self::Assamese => "Assamese",
            Self::Maithili => "Maithili",
        }
    }

    pub fn is_base(&self) -> bool {
        *self == Self::BASE
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupportedLanguage {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}
