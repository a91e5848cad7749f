//! Attachment encoding: uploaded documents to inline, base64 request parts.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use consumershield_core::AttachmentPart;
use futures::future::try_join_all;
use tracing::debug;

use crate::AnalysisError;

/// Encode raw bytes as an attachment of the given content type.
pub fn encode_bytes(mime_type: &str, bytes: &[u8]) -> AttachmentPart {
    AttachmentPart {
        mime_type: mime_type.to_string(),
        data: STANDARD.encode(bytes),
    }
}

/// Read `path` once and encode it, guessing the content type from its extension.
pub async fn encode_file(path: &Path) -> Result<AttachmentPart, AnalysisError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| AnalysisError::Encoding {
            path: path.to_path_buf(),
            source,
        })?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    debug!(path = %path.display(), mime = %mime, bytes = bytes.len(), "encoded attachment");
    Ok(encode_bytes(mime.essence_str(), &bytes))
}

/// Encode every document concurrently. The result keeps the order of `paths`.
pub async fn encode_all(paths: &[PathBuf]) -> Result<Vec<AttachmentPart>, AnalysisError> {
    try_join_all(paths.iter().map(|p| encode_file(p))).await
}
