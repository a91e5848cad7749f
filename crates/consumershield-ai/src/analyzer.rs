//! Case analysis: complaint plus reference documents in, validated strategy out.

use std::path::PathBuf;

use consumershield_core::{AttachmentPart, StrategyRecord, normalize, strip_code_fences};
use tracing::{info, warn};

use crate::provider::{GenerateRequest, GenerativeProvider, Part, SafetySetting};
use crate::{
    AnalysisConfig, AnalysisError, ApiKey, CredentialSource, SYSTEM_INSTRUCTION, SingleFlight,
    compose_analysis_prompt, encode_all,
};

/// Issues analysis requests against a [`GenerativeProvider`].
///
/// Only one analysis runs at a time per `Analyzer`; a concurrent call fails
/// with [`AnalysisError::Busy`] rather than queueing.
pub struct Analyzer<P> {
    provider: P,
    credentials: CredentialSource,
    model: String,
    in_flight: SingleFlight,
}

impl<P: GenerativeProvider> Analyzer<P> {
    pub fn new(provider: P, credentials: CredentialSource, config: &AnalysisConfig) -> Self {
        Self {
            provider,
            credentials,
            model: config.analysis_model.clone(),
            in_flight: SingleFlight::new(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// Analyse `complaint` against the documents at `documents`.
    ///
    /// Documents are read concurrently but attached in the order given.
    pub async fn analyze(
        &self,
        complaint: &str,
        documents: &[PathBuf],
    ) -> Result<StrategyRecord, AnalysisError> {
        let key = self.credentials.resolve()?;
        let _flight = self.in_flight.try_begin().ok_or(AnalysisError::Busy)?;

        info!(documents = documents.len(), "encoding attachments");
        let parts = encode_all(documents).await?;
        self.run(&key, complaint, parts).await
    }

    /// Analyse `complaint` with attachments that are already encoded.
    pub async fn analyze_parts(
        &self,
        complaint: &str,
        attachments: Vec<AttachmentPart>,
    ) -> Result<StrategyRecord, AnalysisError> {
        let key = self.credentials.resolve()?;
        let _flight = self.in_flight.try_begin().ok_or(AnalysisError::Busy)?;
        self.run(&key, complaint, attachments).await
    }

    async fn run(
        &self,
        key: &ApiKey,
        complaint: &str,
        attachments: Vec<AttachmentPart>,
    ) -> Result<StrategyRecord, AnalysisError> {
        let mut parts: Vec<Part> = attachments.into_iter().map(Part::Inline).collect();
        parts.push(Part::Text(compose_analysis_prompt(complaint)));

        let request = GenerateRequest {
            model: self.model.clone(),
            system_instruction: Some(SYSTEM_INSTRUCTION.to_string()),
            parts,
            response_mime_type: "application/json".into(),
            safety_settings: SafetySetting::relaxed(),
        };

        let raw = self.provider.generate(key, &request).await.map_err(|e| {
            let err = AnalysisError::from(e);
            warn!(
                error = %err,
                unauthenticated = err.is_unauthenticated(),
                "analysis request failed"
            );
            err
        })?;

        let record = normalize(&strip_code_fences(&raw)).inspect_err(|e| {
            warn!(error = %e, "provider response rejected");
        })?;
        info!(
            section = %record.legal_ground.section,
            strength = record.precedent.strength_score,
            calculation_lines = record.compensation.calculation.len(),
            "analysis complete"
        );
        Ok(record)
    }
}
