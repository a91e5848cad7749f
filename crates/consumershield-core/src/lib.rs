pub mod intake;
pub mod language;
pub mod normalize;
pub mod strategy;

pub use intake::{IntakeError, MIN_COMPLAINT_CHARS, validate_intake};
pub use language::{SupportedLanguage, UnknownLanguage};
pub use normalize::{NormalizeError, normalize, strip_code_fences};
pub use strategy::{
    AttachmentPart, CalculationItem, Compensation, FALLBACK_COUNTER_ARGUMENT, LegalGround,
    Precedent, RiskAnalysis, RiskLevel, SavedCase, StrategyRecord,
};
