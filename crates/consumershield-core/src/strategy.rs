//! Strategy types shared between the analysis pipeline, the archive, and the CLI.
//!
//! Field names follow the provider's snake_case JSON so a record can be
//! persisted exactly as it was decoded.

use serde::{Deserialize, Serialize};

/// Shown in place of the counter-argument list when the provider returned none.
pub const FALLBACK_COUNTER_ARGUMENT: &str = "Standard defense anticipated based on contract terms.";

/// The normalised output of one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRecord {
    pub legal_ground: LegalGround,
    pub precedent: Precedent,
    pub risk_analysis: RiskAnalysis,
    pub compensation: Compensation,
    pub draft_notice_text: String,
}

/// The statutory provision the complaint rests on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalGround {
    pub section: String,
    pub quote: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
}

impl LegalGround {
    /// Section number without its heading, e.g. `"2(11)"` from `"2(11): Deficiency"`.
    pub fn short_section(&self) -> &str {
        self.section.split(':').next().unwrap_or_default().trim()
    }
}

/// The supporting case law drawn from the supplied documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Precedent {
    pub case_name: String,
    pub summary: String,
    /// Always within 0..=100 after normalisation.
    pub strength_score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Case-insensitive parse of the provider's label.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "moderate" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Opposing-counsel simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    /// May be empty after normalisation; use
    /// [`counter_arguments_for_display`](Self::counter_arguments_for_display) when rendering.
    pub counter_arguments: Vec<String>,
    pub risk_level: RiskLevel,
    pub mitigation_strategy: String,
}

impl RiskAnalysis {
    /// Counter-arguments to render. Never empty.
    pub fn counter_arguments_for_display(&self) -> Vec<&str> {
        let args: Vec<&str> = self
            .counter_arguments
            .iter()
            .map(|s| s.as_str())
            .filter(|s| !s.trim().is_empty())
            .collect();
        if args.is_empty() {
            vec![FALLBACK_COUNTER_ARGUMENT]
        } else {
            args
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compensation {
    pub breakdown: String,
    /// Display-formatted currency, e.g. `"₹4,50,000"`.
    pub total: String,
    /// Never empty after normalisation.
    pub calculation: Vec<CalculationItem>,
}

/// One line of the itemised compensation claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationItem {
    pub label: String,
    pub amount: String,
    pub note: String,
}

impl CalculationItem {
    /// The single line substituted when the provider omitted the itemisation.
    pub fn estimated_total(total: &str) -> Self {
        Self {
            label: "Estimated Total".into(),
            amount: total.to_string(),
            note: "Breakdown unavailable".into(),
        }
    }
}

/// A persisted strategy plus the complaint that produced it.
///
/// Immutable once created; identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCase {
    pub id: String,
    /// Creation instant in milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub complaint: String,
    pub result: StrategyRecord,
}

/// One uploaded document, ready for inclusion in a provider request.
///
/// `data` is the bare base64 payload: no `data:` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentPart {
    pub mime_type: String,
    pub data: String,
}
