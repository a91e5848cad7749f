//! Response validation and normalisation.
//!
//! The provider is only *asked* to follow the schema embedded in the prompt, so
//! everything it returns passes through [`normalize`] before reaching the rest
//! of the system. Only two conditions are fatal: text that is not JSON, and a
//! record without `legal_ground`. Every other field is defaulted in place.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::strategy::{
    CalculationItem, Compensation, LegalGround, Precedent, RiskAnalysis, RiskLevel,
    StrategyRecord,
};

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("failed to parse JSON response from provider: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("provider response invalid: missing '{0}'")]
    SchemaViolation(&'static str),
}

/// Remove markdown code-fence markers the model may wrap its payload in.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Decode provider text into a [`StrategyRecord`] satisfying all record invariants.
pub fn normalize(raw: &str) -> Result<StrategyRecord, NormalizeError> {
    let value: Value = serde_json::from_str(raw)?;

    let value = match value {
        Value::Array(items) => {
            debug!(len = items.len(), "response wrapped in array, taking first element");
            items.into_iter().next().unwrap_or(Value::Null)
        }
        other => other,
    };

    let Value::Object(root) = value else {
        return Err(NormalizeError::SchemaViolation("legal_ground"));
    };

    let legal_ground = match root.get("legal_ground") {
        Some(Value::Object(obj)) => legal_ground_from(obj),
        Some(Value::String(section)) if !section.trim().is_empty() => LegalGround {
            section: section.clone(),
            quote: "No quote available".into(),
            term: None,
        },
        _ => return Err(NormalizeError::SchemaViolation("legal_ground")),
    };

    Ok(StrategyRecord {
        legal_ground,
        precedent: precedent_from(object(&root, "precedent")),
        risk_analysis: risk_analysis_from(object(&root, "risk_analysis")),
        compensation: compensation_from(object(&root, "compensation")),
        draft_notice_text: string_or(&root, "draft_notice_text", ""),
    })
}

// ── Field builders ──

fn legal_ground_from(obj: &Map<String, Value>) -> LegalGround {
    LegalGround {
        section: string_or(obj, "section", NOT_AVAILABLE),
        quote: string_or(obj, "quote", "No quote available"),
        term: text(obj.get("term")).filter(|t| !t.trim().is_empty()),
    }
}

fn precedent_from(obj: Option<&Map<String, Value>>) -> Precedent {
    let Some(obj) = obj else {
        return Precedent {
            case_name: NOT_AVAILABLE.into(),
            summary: "No summary available".into(),
            strength_score: 0,
        };
    };
    Precedent {
        case_name: string_or(obj, "case_name", NOT_AVAILABLE),
        summary: string_or(obj, "summary", "No summary available"),
        strength_score: score(obj.get("strength_score")),
    }
}

fn risk_analysis_from(obj: Option<&Map<String, Value>>) -> RiskAnalysis {
    let Some(obj) = obj else {
        return RiskAnalysis {
            counter_arguments: Vec::new(),
            risk_level: RiskLevel::default(),
            mitigation_strategy: NOT_AVAILABLE.into(),
        };
    };

    let counter_arguments = match obj.get("counter_arguments") {
        Some(Value::Array(items)) => items.iter().filter_map(|v| text(Some(v))).collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    };

    let risk_level = match obj.get("risk_level") {
        Some(Value::String(s)) => RiskLevel::parse(s).unwrap_or_else(|| {
            warn!(risk_level = %s, "unrecognised risk level, defaulting to Medium");
            RiskLevel::default()
        }),
        _ => RiskLevel::default(),
    };

    RiskAnalysis {
        counter_arguments,
        risk_level,
        mitigation_strategy: string_or(obj, "mitigation_strategy", NOT_AVAILABLE),
    }
}

fn compensation_from(obj: Option<&Map<String, Value>>) -> Compensation {
    let empty = Map::new();
    let obj = obj.unwrap_or(&empty);

    let total = string_or(obj, "total", NOT_AVAILABLE);
    let mut calculation: Vec<CalculationItem> = match obj.get("calculation") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .map(|item| CalculationItem {
                label: string_or(item, "label", ""),
                amount: string_or(item, "amount", ""),
                note: string_or(item, "note", ""),
            })
            .collect(),
        _ => Vec::new(),
    };

    if calculation.is_empty() {
        warn!(total = %total, "compensation breakdown missing, substituting estimated total");
        calculation.push(CalculationItem::estimated_total(&total));
    }

    Compensation {
        breakdown: string_or(obj, "breakdown", NOT_AVAILABLE),
        total,
        calculation,
    }
}

// ── Value helpers ──

fn object<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    obj.get(key).and_then(Value::as_object)
}

/// Strings pass through; numbers and booleans are rendered; everything else is absent.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_or(obj: &Map<String, Value>, key: &str, default: &str) -> String {
    text(obj.get(key)).unwrap_or_else(|| default.to_string())
}

/// Accepts `85`, `85.4`, `"85"` or `"85%"`; clamps into 0..=100.
fn score(value: Option<&Value>) -> u8 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(v) if v.is_finite() => v.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "legal_ground": {"section": "2(11)", "quote": "deficiency means any fault...", "term": "Deficiency in service"},
        "precedent": {"case_name": "Wg. Cdr. Arifur Rahman Khan v. DLF Southern Homes", "summary": "Delay in possession compensable.", "strength_score": 85},
        "risk_analysis": {
            "counter_arguments": ["Force majeure under clause 14", "Buyer defaulted on instalment 6"],
            "risk_level": "Medium",
            "mitigation_strategy": "Produce payment receipts."
        },
        "compensation": {
            "breakdown": "Refund with interest and damages.",
            "total": "₹52,40,000",
            "calculation": [
                {"label": "Principal Refund", "amount": "₹40,00,000", "note": "Full booking amount paid"},
                {"label": "Interest", "amount": "₹10,40,000", "note": "9% p.a. for 3 years"},
                {"label": "Mental Harassment", "amount": "₹2,00,000", "note": "Standard compensation"}
            ]
        },
        "draft_notice_text": "To, The Managing Director..."
    }"#;

    #[test]
    fn full_record_preserved() {
        let record = normalize(FULL).unwrap();
        assert_eq!(record.legal_ground.section, "2(11)");
        assert_eq!(record.legal_ground.term.as_deref(), Some("Deficiency in service"));
        assert_eq!(record.precedent.strength_score, 85);
        assert_eq!(record.risk_analysis.counter_arguments.len(), 2);
        assert_eq!(record.risk_analysis.risk_level, RiskLevel::Medium);
        assert_eq!(record.compensation.calculation.len(), 3);
        assert_eq!(record.compensation.calculation[1].note, "9% p.a. for 3 years");
        assert!(record.draft_notice_text.starts_with("To, The Managing Director"));
    }

    #[test]
    fn not_json_is_malformed() {
        let err = normalize("Here is your strategy: the builder is liable.").unwrap_err();
        assert!(matches!(err, NormalizeError::Malformed(_)));
    }

    #[test]
    fn missing_legal_ground_is_schema_violation() {
        let err = normalize(r#"{"precedent": {"case_name": "X"}}"#).unwrap_err();
        assert!(matches!(err, NormalizeError::SchemaViolation("legal_ground")));
    }

    #[test]
    fn null_legal_ground_is_schema_violation() {
        let err = normalize(r#"{"legal_ground": null}"#).unwrap_err();
        assert!(matches!(err, NormalizeError::SchemaViolation(_)));
    }

    #[test]
    fn scalar_top_level_is_schema_violation() {
        assert!(matches!(
            normalize("42").unwrap_err(),
            NormalizeError::SchemaViolation(_)
        ));
        assert!(matches!(
            normalize("[]").unwrap_err(),
            NormalizeError::SchemaViolation(_)
        ));
    }

    #[test]
    fn array_wrapper_takes_first_element() {
        let raw = r#"[
            {"legal_ground": {"section": "35", "quote": "first"}},
            {"legal_ground": {"section": "99", "quote": "second"}}
        ]"#;
        let record = normalize(raw).unwrap();
        assert_eq!(record.legal_ground.section, "35");
        assert_eq!(record.legal_ground.quote, "first");
    }

    #[test]
    fn array_wrapper_validates_only_first_element() {
        let raw = r#"[{"precedent": {}}, {"legal_ground": {"section": "35", "quote": "q"}}]"#;
        assert!(matches!(
            normalize(raw).unwrap_err(),
            NormalizeError::SchemaViolation(_)
        ));
    }

    #[test]
    fn missing_calculation_synthesised_from_total() {
        let raw = r#"{
            "legal_ground": {"section": "2(47)", "quote": "unfair trade practice"},
            "compensation": {"breakdown": "Refund", "total": "₹1,20,000"}
        }"#;
        let record = normalize(raw).unwrap();
        assert_eq!(record.compensation.calculation.len(), 1);
        let line = &record.compensation.calculation[0];
        assert_eq!(line.label, "Estimated Total");
        assert_eq!(line.amount, "₹1,20,000");
        assert_eq!(line.note, "Breakdown unavailable");
    }

    #[test]
    fn empty_calculation_synthesised_from_total() {
        let raw = r#"{
            "legal_ground": {"section": "2(47)", "quote": "q"},
            "compensation": {"total": "₹5,000", "calculation": []}
        }"#;
        let record = normalize(raw).unwrap();
        assert_eq!(record.compensation.calculation.len(), 1);
        assert_eq!(record.compensation.calculation[0].amount, "₹5,000");
    }

    #[test]
    fn missing_compensation_still_yields_calculation() {
        let raw = r#"{"legal_ground": {"section": "2(9)", "quote": "consumer rights"}}"#;
        let record = normalize(raw).unwrap();
        assert_eq!(record.compensation.total, "N/A");
        assert_eq!(record.compensation.calculation.len(), 1);
        assert_eq!(record.compensation.calculation[0].amount, "N/A");
    }

    #[test]
    fn missing_substructures_defaulted() {
        let raw = r#"{"legal_ground": {"section": "2(9)", "quote": "q"}}"#;
        let record = normalize(raw).unwrap();
        assert_eq!(record.precedent.case_name, "N/A");
        assert_eq!(record.precedent.strength_score, 0);
        assert!(record.risk_analysis.counter_arguments.is_empty());
        assert_eq!(record.risk_analysis.risk_level, RiskLevel::Medium);
        assert_eq!(record.draft_notice_text, "");
    }

    #[test]
    fn missing_counter_arguments_leave_empty_list() {
        let raw = r#"{
            "legal_ground": {"section": "2(9)", "quote": "q"},
            "risk_analysis": {"risk_level": "High", "mitigation_strategy": "m"}
        }"#;
        let record = normalize(raw).unwrap();
        assert!(record.risk_analysis.counter_arguments.is_empty());
        assert_eq!(record.risk_analysis.risk_level, RiskLevel::High);
        assert_eq!(record.risk_analysis.counter_arguments_for_display().len(), 1);
    }

    #[test]
    fn strength_score_clamped_and_coerced() {
        let with_score = |s: &str| {
            let raw = format!(
                r#"{{"legal_ground": {{"section": "1", "quote": "q"}}, "precedent": {{"case_name": "c", "summary": "s", "strength_score": {s}}}}}"#
            );
            normalize(&raw).unwrap().precedent.strength_score
        };
        assert_eq!(with_score("140"), 100);
        assert_eq!(with_score("-5"), 0);
        assert_eq!(with_score("72.6"), 73);
        assert_eq!(with_score(r#""64%""#), 64);
        assert_eq!(with_score(r#""strong""#), 0);
    }

    #[test]
    fn legal_ground_as_string_accepted() {
        let record = normalize(r#"{"legal_ground": "Section 2(11)"}"#).unwrap();
        assert_eq!(record.legal_ground.section, "Section 2(11)");
    }

    #[test]
    fn code_fences_stripped() {
        let raw = "```json\n{\"legal_ground\": {\"section\": \"2(11)\", \"quote\": \"q\"}}\n```";
        let cleaned = strip_code_fences(raw);
        assert!(cleaned.starts_with('{'));
        assert!(cleaned.ends_with('}'));
        assert!(normalize(&cleaned).is_ok());
    }

    #[test]
    fn bare_fences_stripped() {
        assert_eq!(strip_code_fences("```\n[1]\n```  "), "[1]");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }
}
