//! Pipeline orchestration for one invocation.
//!
//! The flow is strictly linear: request a proof, assemble the receipt,
//! persist the artifacts, render the summary, publish the outputs. Any
//! failure aborts the remaining stages; artifacts already written stay in
//! place and a re-run of the job overwrites them.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{SecondsFormat, Utc};

use crate::config::Config;
use crate::error::Result;
use crate::output::{publish_outputs, write_stderr_line};
use crate::persist::{PersistedReceipt, ReceiptDigest, persist_receipt};
use crate::proof::{ProofClient, ProofRequest};
use crate::receipt::{Receipt, build_receipt};
use crate::render::{RECEIPT_PDF_FILE, render_pdf};

/// Invocation switches that do not come from the environment.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Suppress progress output (errors still shown).
    pub quiet: bool,
    /// Render the PDF summary alongside the JSON artifacts.
    pub render_pdf: bool,
}

/// What a successful invocation produced.
#[derive(Debug)]
pub struct PublishOutcome {
    /// The proof identifier issued by the service.
    pub proof_id: String,
    /// The derived verification URL.
    pub receipt_url: String,
    /// Digest of the written `receipt.json`.
    pub digest: ReceiptDigest,
    /// Path of the written JSON receipt.
    pub json_path: Utf8PathBuf,
    /// Path of the written digest file.
    pub digest_path: Utf8PathBuf,
    /// Path of the rendered PDF, when rendering was enabled.
    pub pdf_path: Option<Utf8PathBuf>,
}

/// Run the full request/persist/publish pipeline.
///
/// # Errors
///
/// Propagates the first failure from any stage; see
/// [`crate::error::ReceiptError`] for the taxonomy.
pub fn run_publish(
    config: &Config,
    client: &dyn ProofClient,
    options: &RunOptions,
    stderr: &mut dyn Write,
) -> Result<PublishOutcome> {
    let issued_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let request = ProofRequest::new(config.ci.clone(), issued_at.clone());

    if !options.quiet {
        write_stderr_line(stderr, "Requesting proof of publish...");
    }
    let response = client.request_proof(&request)?;

    let receipt = build_receipt(response, config.ci.clone(), issued_at);
    let persisted = persist_receipt(&receipt, &config.workspace)?;

    let pdf_path = if options.render_pdf {
        let path = config.workspace.join(RECEIPT_PDF_FILE);
        render_pdf(&receipt, &persisted.digest, &path)?;
        Some(path)
    } else {
        None
    };

    if !options.quiet {
        write_stderr_line(stderr, format!("Proof ID: {}", receipt.proof_id));
        write_stderr_line(stderr, format!("Receipt URL: {}", receipt.receipt_url));
        write_stderr_line(
            stderr,
            format!("Receipt written to {}", persisted.json_path),
        );
    }

    publish_ci_outputs(config, &receipt, &persisted, pdf_path.as_deref())?;

    Ok(PublishOutcome {
        proof_id: receipt.proof_id,
        receipt_url: receipt.receipt_url,
        digest: persisted.digest,
        json_path: persisted.json_path,
        digest_path: persisted.digest_path,
        pdf_path,
    })
}

/// Publish the computed identifiers for downstream steps.
///
/// A missing output file configuration is not an error; the runner simply
/// did not ask for outputs.
fn publish_ci_outputs(
    config: &Config,
    receipt: &Receipt,
    persisted: &PersistedReceipt,
    pdf_path: Option<&Utf8Path>,
) -> Result<()> {
    let Some(output_path) = &config.output_path else {
        log::debug!("no CI output file configured; skipping output publication");
        return Ok(());
    };

    let mut entries: Vec<(&str, &str)> = vec![
        ("proof_id", receipt.proof_id.as_str()),
        ("receipt_url", receipt.receipt_url.as_str()),
        ("receipt_digest", persisted.digest.as_str()),
        ("receipt_json_path", persisted.json_path.as_str()),
        ("receipt_sha256_path", persisted.digest_path.as_str()),
    ];
    if let Some(path) = pdf_path {
        entries.push(("receipt_pdf_path", path.as_str()));
    }

    publish_outputs(output_path, &entries)
}

#[cfg(test)]
#[path = "flow_tests.rs"]
mod tests;
