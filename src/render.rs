//! PDF rendering of the receipt.
//!
//! Produces a one-page A4 summary of an already-assembled receipt: status,
//! identifiers, CI context, capsule metadata, and offline verification
//! instructions. Rendering is cosmetic; `receipt.json` remains the artifact
//! of record and the PDF re-states data the pipeline already holds.

use std::fs::File;
use std::io::BufWriter;

use camino::Utf8Path;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use serde_json::Value;

use crate::error::{ReceiptError, Result};
use crate::persist::ReceiptDigest;
use crate::receipt::Receipt;

/// Filename of the rendered summary.
pub const RECEIPT_PDF_FILE: &str = "receipt.pdf";

/// One labelled line of the summary block.
#[derive(Debug, PartialEq, Eq)]
struct SummaryField {
    label: &'static str,
    value: String,
}

/// Render the receipt summary to `path`.
///
/// # Errors
///
/// Returns [`ReceiptError::ArtifactWrite`] when the target file cannot be
/// created, or [`ReceiptError::Render`] when PDF assembly fails.
pub fn render_pdf(receipt: &Receipt, digest: &ReceiptDigest, path: &Utf8Path) -> Result<()> {
    let (doc, page_index, layer_index) =
        PdfDocument::new("Proof of publish receipt", Mm(210.0), Mm(297.0), "receipt");
    let layer = doc.get_page(page_index).get_layer(layer_index);

    let bold = builtin_font(&doc, BuiltinFont::HelveticaBold)?;
    let regular = builtin_font(&doc, BuiltinFont::Helvetica)?;
    let mono = builtin_font(&doc, BuiltinFont::Courier)?;

    let left = 20.0;
    layer.use_text("Proof of publish receipt", 16.0, Mm(left), Mm(272.0), &bold);
    layer.use_text(status_line(receipt), 11.0, Mm(left), Mm(263.0), &regular);

    let mut y = 250.0;
    for field in summary_fields(receipt, digest) {
        layer.use_text(field.label, 10.0, Mm(left), Mm(y), &bold);
        layer.use_text(field.value, 10.0, Mm(left + 42.0), Mm(y), &mono);
        y -= 7.0;
    }

    y -= 8.0;
    layer.use_text("Verification", 12.0, Mm(left), Mm(y), &bold);
    y -= 8.0;
    for line in verification_lines(receipt) {
        layer.use_text(line, 10.0, Mm(left), Mm(y), &regular);
        y -= 6.0;
    }

    let file = File::create(path.as_std_path()).map_err(|source| ReceiptError::ArtifactWrite {
        path: path.to_owned(),
        source,
    })?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| ReceiptError::Render {
            reason: e.to_string(),
        })?;
    Ok(())
}

fn builtin_font(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef> {
    doc.add_builtin_font(font).map_err(|e| ReceiptError::Render {
        reason: e.to_string(),
    })
}

/// The one-line status derived from the passthrough `verified` flag.
fn status_line(receipt: &Receipt) -> String {
    let body = response_value(receipt);
    let verified = body
        .as_ref()
        .and_then(|value| value.get("verified"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let validator = body
        .as_ref()
        .and_then(|value| value.get("validator"))
        .and_then(Value::as_str)
        .map(str::to_owned);

    match (verified, validator) {
        (true, Some(validator)) => format!("Status: verified by {validator}"),
        (true, None) => "Status: verified".to_owned(),
        (false, _) => "Status: recorded (verification pending)".to_owned(),
    }
}

/// The labelled summary lines, in display order.
fn summary_fields(receipt: &Receipt, digest: &ReceiptDigest) -> Vec<SummaryField> {
    let mut fields = vec![
        field("Proof ID", receipt.proof_id.clone()),
        field("Receipt URL", receipt.receipt_url.clone()),
        field("SHA-256", digest.as_str().to_owned()),
        field("Issued at", receipt.issued_at.clone()),
        field("Repository", receipt.ci.repository.clone()),
        field("Commit", receipt.ci.commit.clone()),
        field("Actor", receipt.ci.actor.clone()),
        field("Workflow", receipt.ci.workflow.clone()),
        field("Run", run_description(receipt)),
        field("Ref", receipt.ci.git_ref.clone()),
    ];

    if let Some(capsule) = capsule_description(receipt) {
        fields.push(field("Capsule", capsule));
    }

    fields
}

fn field(label: &'static str, value: String) -> SummaryField {
    let value = if value.is_empty() {
        "-".to_owned()
    } else {
        value
    };
    SummaryField { label, value }
}

fn run_description(receipt: &Receipt) -> String {
    match (
        receipt.ci.run_id.as_str(),
        receipt.ci.run_number.as_str(),
    ) {
        ("", _) => String::new(),
        (run_id, "") => run_id.to_owned(),
        (run_id, run_number) => format!("{run_id} (#{run_number})"),
    }
}

/// `alg`/`kid`/`hp_version` from the capsule block, when the service sent
/// one; absent fields are simply skipped.
fn capsule_description(receipt: &Receipt) -> Option<String> {
    let body = response_value(receipt)?;
    let capsule = body.get("capsule")?.as_object()?;

    let parts: Vec<String> = ["alg", "kid", "hp_version"]
        .iter()
        .filter_map(|key| {
            capsule
                .get(*key)
                .and_then(Value::as_str)
                .map(|value| format!("{key}={value}"))
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("  "))
    }
}

fn verification_lines(receipt: &Receipt) -> Vec<String> {
    vec![
        "1. Recompute the digest of receipt.json with sha256sum and compare it".to_owned(),
        "   with the hex value stored in receipt.sha256.".to_owned(),
        format!("2. Open {} to check", receipt.receipt_url),
        "   the proof against the attestation service.".to_owned(),
    ]
}

fn response_value(receipt: &Receipt) -> Option<Value> {
    serde_json::from_str(receipt.response.get()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CiContext;
    use crate::proof::parse_proof_body;
    use crate::receipt::build_receipt;
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    fn sample_receipt(body: &str) -> Receipt {
        build_receipt(
            parse_proof_body(body.to_owned()).expect("stub body must parse"),
            CiContext {
                repository: "acme/widgets".to_owned(),
                commit: "deadbeef".to_owned(),
                run_id: "12345".to_owned(),
                run_number: "7".to_owned(),
                ..CiContext::default()
            },
            "2026-08-05T12:00:00Z".to_owned(),
        )
    }

    #[test]
    fn render_writes_a_pdf_file() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let path = Utf8PathBuf::try_from(temp.path().join(RECEIPT_PDF_FILE))
            .expect("non-UTF8 temp path");
        let receipt = sample_receipt(r#"{"proof_id":"abc123","verified":true}"#);
        let digest = ReceiptDigest::of_bytes(b"receipt");

        render_pdf(&receipt, &digest, &path).expect("rendering must succeed");

        let bytes = std::fs::read(path.as_std_path()).expect("pdf must be readable");
        assert!(bytes.starts_with(b"%PDF"), "file must carry the PDF magic");
    }

    #[rstest]
    #[case::verified_with_validator(
        r#"{"proof_id":"p","verified":true,"validator":"integrity-v1"}"#,
        "Status: verified by integrity-v1"
    )]
    #[case::verified_without_validator(r#"{"proof_id":"p","verified":true}"#, "Status: verified")]
    #[case::pending(r#"{"proof_id":"p"}"#, "Status: recorded (verification pending)")]
    fn status_line_reflects_the_verified_flag(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(status_line(&sample_receipt(body)), expected);
    }

    #[test]
    fn summary_includes_capsule_metadata_when_present() {
        let receipt = sample_receipt(
            r#"{"proof_id":"p","capsule":{"alg":"ES256","kid":"k1","hp_version":"2"}}"#,
        );
        let fields = summary_fields(&receipt, &ReceiptDigest::of_bytes(b"x"));
        let capsule = fields
            .iter()
            .find(|f| f.label == "Capsule")
            .expect("capsule line expected");
        assert_eq!(capsule.value, "alg=ES256  kid=k1  hp_version=2");
    }

    #[test]
    fn summary_skips_capsule_when_absent() {
        let receipt = sample_receipt(r#"{"proof_id":"p"}"#);
        let fields = summary_fields(&receipt, &ReceiptDigest::of_bytes(b"x"));
        assert!(fields.iter().all(|f| f.label != "Capsule"));
    }

    #[test]
    fn empty_context_fields_render_as_dashes() {
        let receipt = build_receipt(
            parse_proof_body(r#"{"proof_id":"p"}"#.to_owned()).expect("stub body must parse"),
            CiContext::default(),
            "2026-08-05T12:00:00Z".to_owned(),
        );
        let fields = summary_fields(&receipt, &ReceiptDigest::of_bytes(b"x"));
        let actor = fields
            .iter()
            .find(|f| f.label == "Actor")
            .expect("actor line expected");
        assert_eq!(actor.value, "-");
    }

    #[test]
    fn run_description_combines_id_and_number() {
        let receipt = sample_receipt(r#"{"proof_id":"p"}"#);
        assert_eq!(run_description(&receipt), "12345 (#7)");
    }
}
