//! Prompt templates.
//!
//! The response schema below is written by hand, not derived from
//! `StrategyRecord`. Keep it in step with `consumershield_core::normalize`,
//! which tolerates drift but cannot recover a missing `legal_ground`.

use consumershield_core::SupportedLanguage;

pub const SYSTEM_INSTRUCTION: &str = "You are a top-tier legal strategist. Your goal is to build \
a winning consumer case while anticipating defense strategies.";

const RESPONSE_SCHEMA: &str = r#"{
  "legal_ground": {"section": "...", "quote": "...", "term": "..."},
  "precedent": {"case_name": "...", "summary": "...", "strength_score": 85},
  "risk_analysis": {
    "counter_arguments": ["Specific Argument 1", "Specific Argument 2"],
    "risk_level": "Low" | "Medium" | "High",
    "mitigation_strategy": "..."
  },
  "compensation": {
    "breakdown": "Narrative explanation of the compensation...",
    "total": "₹XX,XX,XXX",
    "calculation": [
      {"label": "Principal Refund", "amount": "₹XX,XXX", "note": "Full booking amount paid"},
      {"label": "Interest", "amount": "₹XX,XXX", "note": "12% p.a. as per SC guidelines"},
      {"label": "Mental Harassment", "amount": "₹XX,XXX", "note": "Standard compensation for deficiency"}
    ]
  },
  "draft_notice_text": "Full legal notice text..."
}"#;

/// Instruction text sent after the attachments in an analysis request.
pub fn compose_analysis_prompt(complaint: &str) -> String {
    format!(
        "User Complaint: \"{complaint}\"\n\
         \n\
         Instructions:\n\
         1. Analyze the attached legal knowledge base documents.\n\
         2. Identify the specific sections of the law violated based on the user's complaint.\n\
         3. Find the most relevant precedent/case law from the documents that supports the user's position.\n\
         4. Opposing Counsel Simulation: identify 2-3 specific, factual counter-arguments the other \
         party will likely use (e.g. specific clauses, limitation periods, force majeure). \
         Be specific, not generic.\n\
         5. Compensation Calculation: create a structured financial breakdown.\n\
         \x20  - Itemize the Principal Amount, Interest (at a reasonable legal rate if applicable), \
         Damages/Harassment, and Legal Costs.\n\
         \x20  - For each item, provide a short \"note\" explaining the basis (e.g. \"18% p.a. for 2 years delay\").\n\
         6. Respond ONLY with raw JSON, no markdown fences, with the following structure:\n\
         {schema}\n\
         \n\
         Do not cite cases not present in the provided documents.",
        schema = RESPONSE_SCHEMA,
    )
}

/// Instruction text for rendering a notice in `language`.
pub fn compose_translation_prompt(text: &str, language: SupportedLanguage) -> String {
    format!(
        "Task: Translate the following legal notice into professional {language}.\n\
         Requirements:\n\
         1. Use formal legal terminology appropriate for {language}.\n\
         2. Maintain the exact formatting (paragraphs, line breaks, sender/receiver details).\n\
         3. Do not add any explanatory notes or preambles. Just the translated text.\n\
         \n\
         Text to Translate:\n\
         {text}"
    )
}
