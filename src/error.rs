//! Error types for the publish-proof CI step.
//!
//! This module defines semantic error variants for every failure class the
//! pipeline can hit: configuration, transport, remote rejection, contract
//! violation, filesystem, and rendering. Every error is unrecoverable
//! locally; the binary maps the first one encountered to a non-zero exit.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::proof::ProofError;

/// Errors that can occur while producing a publish receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The mandatory API key was absent or blank.
    #[error("api key is required; set INTEGRITY_API_KEY (or the INPUT_API_KEY action binding)")]
    MissingApiKey,

    /// No workspace variable was set and the current directory could not be
    /// used in its place.
    #[error("workspace could not be resolved: {reason}")]
    WorkspaceUnresolved {
        /// Description of why resolution failed.
        reason: String,
    },

    /// The resolved workspace directory does not exist.
    #[error("workspace directory {path} does not exist")]
    WorkspaceMissing {
        /// The directory that was expected to receive the artifacts.
        path: Utf8PathBuf,
    },

    /// The proof request failed before a receipt could be assembled.
    #[error(transparent)]
    Proof(#[from] ProofError),

    /// The receipt could not be serialised.
    #[error("failed to serialise receipt: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing a receipt artifact failed, leaving the artifact set
    /// incomplete.
    #[error("failed to write {path}: {source}")]
    ArtifactWrite {
        /// Path of the artifact that could not be written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// PDF rendering failed.
    #[error("failed to render receipt PDF: {reason}")]
    Render {
        /// Description of the rendering failure.
        reason: String,
    },

    /// Appending to the CI output file failed.
    #[error("failed to write CI outputs to {path}: {source}")]
    OutputWrite {
        /// The CI output file that could not be appended to.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`ReceiptError`].
pub type Result<T> = std::result::Result<T, ReceiptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_names_both_variables() {
        let msg = ReceiptError::MissingApiKey.to_string();
        assert!(msg.contains("INTEGRITY_API_KEY"));
        assert!(msg.contains("INPUT_API_KEY"));
    }

    #[test]
    fn workspace_missing_includes_path() {
        let err = ReceiptError::WorkspaceMissing {
            path: Utf8PathBuf::from("/tmp/missing"),
        };
        assert!(err.to_string().contains("/tmp/missing"));
    }

    #[test]
    fn proof_error_passes_through_transparently() {
        let err = ReceiptError::from(ProofError::InvalidResponse {
            reason: "missing proof_id".to_owned(),
        });
        assert!(err.to_string().contains("invalid response from proof endpoint"));
    }

    #[test]
    fn artifact_write_includes_path_and_source() {
        let err = ReceiptError::ArtifactWrite {
            path: Utf8PathBuf::from("/ws/receipt.sha256"),
            source: std::io::Error::other("disk full"),
        };
        let msg = err.to_string();
        assert!(msg.contains("receipt.sha256"));
        assert!(msg.contains("disk full"));
    }
}
