//! Receipt persistence.
//!
//! Writes the receipt artifacts into the workspace: `receipt.json` holds the
//! envelope, `receipt.sha256` its digest. The receipt is serialised exactly
//! once and the digest is computed over that same buffer, so the digest file
//! always corresponds to the exact bytes on disk. Re-serialising between
//! hashing and writing would break the offline-verification guarantee and
//! must not be introduced here.

use camino::{Utf8Path, Utf8PathBuf};
use sha2::{Digest, Sha256};

use crate::error::{ReceiptError, Result};
use crate::receipt::Receipt;

/// Filename of the JSON receipt.
pub const RECEIPT_JSON_FILE: &str = "receipt.json";

/// Filename of the digest artifact.
pub const RECEIPT_DIGEST_FILE: &str = "receipt.sha256";

/// Lowercase hex SHA-256 digest of the serialised receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptDigest(String);

impl ReceiptDigest {
    /// Digest `bytes` into 64 lowercase hex characters.
    #[must_use]
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(format!("{:x}", hasher.finalize()))
    }

    /// The digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReceiptDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Paths and digest of the persisted artifact set.
#[derive(Debug)]
pub struct PersistedReceipt {
    /// Path of the written `receipt.json`.
    pub json_path: Utf8PathBuf,
    /// Path of the written `receipt.sha256`.
    pub digest_path: Utf8PathBuf,
    /// Digest of the JSON file's exact bytes.
    pub digest: ReceiptDigest,
}

/// Serialise the receipt and write the JSON and digest artifacts.
///
/// # Errors
///
/// Returns [`ReceiptError::WorkspaceMissing`] when the workspace directory
/// does not exist (checked before any write), or
/// [`ReceiptError::ArtifactWrite`] when either artifact cannot be written; a
/// failed digest write after a successful JSON write is surfaced, never
/// ignored.
pub fn persist_receipt(receipt: &Receipt, workspace: &Utf8Path) -> Result<PersistedReceipt> {
    if !workspace.is_dir() {
        return Err(ReceiptError::WorkspaceMissing {
            path: workspace.to_owned(),
        });
    }

    let bytes = serde_json::to_vec_pretty(receipt)?;
    let json_path = workspace.join(RECEIPT_JSON_FILE);
    write_artifact(&json_path, &bytes)?;

    let digest = ReceiptDigest::of_bytes(&bytes);
    let digest_path = workspace.join(RECEIPT_DIGEST_FILE);
    write_artifact(&digest_path, format!("{digest}\n").as_bytes())?;

    Ok(PersistedReceipt {
        json_path,
        digest_path,
        digest,
    })
}

fn write_artifact(path: &Utf8Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path.as_std_path(), bytes).map_err(|source| ReceiptError::ArtifactWrite {
        path: path.to_owned(),
        source,
    })
}
