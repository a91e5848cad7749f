//! Pre-flight checks on a user's intake before any analysis is attempted.

use thiserror::Error;

/// Shortest complaint, in characters, worth sending for analysis.
pub const MIN_COMPLAINT_CHARS: usize = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("please upload at least one document (Act, Judgment, or Evidence)")]
    NoDocuments,
    #[error(
        "please provide a detailed description of your grievance (at least {min} characters, got {actual})"
    )]
    ComplaintTooShort { min: usize, actual: usize },
}

/// Check that an intake has documents and a substantive complaint.
pub fn validate_intake(complaint: &str, document_count: usize) -> Result<(), IntakeError> {
    if document_count == 0 {
        return Err(IntakeError::NoDocuments);
    }
    let actual = complaint.trim().chars().count();
    if actual < MIN_COMPLAINT_CHARS {
        return Err(IntakeError::ComplaintTooShort {
            min: MIN_COMPLAINT_CHARS,
            actual,
        });
    }
    Ok(())
}
