//! Receipt assembly.
//!
//! The receipt is the durable artifact of an invocation: a fixed-version
//! envelope combining the proof identifier, a derived verification URL, the
//! issuance timestamp, the CI context, and the verbatim response body.
//! Assembly is pure composition; no network or disk access happens here.

use serde::Serialize;
use serde_json::value::RawValue;

use crate::context::CiContext;
use crate::proof::{PROOF_ENDPOINT_BASE, ProofResponse};

/// Schema version tag written into every receipt.
pub const RECEIPT_VERSION: &str = "1.0";

/// The offline-inspectable envelope persisted as `receipt.json`.
#[derive(Debug, Serialize)]
pub struct Receipt {
    /// Receipt schema version.
    pub receipt_version: &'static str,
    /// The proof identifier issued by the attestation service.
    pub proof_id: String,
    /// Where the proof can be checked against the service.
    pub receipt_url: String,
    /// Issuance timestamp, RFC 3339 UTC.
    pub issued_at: String,
    /// The CI context the proof was requested for.
    pub ci: CiContext,
    /// The service's response body, byte-identical to what was returned.
    pub response: Box<RawValue>,
}

/// The verification URL for a proof identifier.
///
/// This is a convention derived locally, not data returned by the service;
/// the URL is constructed but never called by this tool.
///
/// # Examples
///
/// ```
/// use publish_proof::receipt::receipt_url;
///
/// assert_eq!(
///     receipt_url("abc123"),
///     "https://api.getintegrityapi.com/verify/abc123",
/// );
/// ```
#[must_use]
pub fn receipt_url(proof_id: &str) -> String {
    format!("{PROOF_ENDPOINT_BASE}/verify/{proof_id}")
}

/// Assemble the receipt for a proof response.
#[must_use]
pub fn build_receipt(response: ProofResponse, ci: CiContext, issued_at: String) -> Receipt {
    let receipt_url = receipt_url(&response.proof_id);
    Receipt {
        receipt_version: RECEIPT_VERSION,
        proof_id: response.proof_id,
        receipt_url,
        issued_at,
        ci,
        response: response.raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::parse_proof_body;

    fn stub_response(body: &str) -> ProofResponse {
        parse_proof_body(body.to_owned()).expect("stub body must parse")
    }

    #[test]
    fn build_receipt_derives_url_from_proof_id() {
        let receipt = build_receipt(
            stub_response(r#"{"proof_id":"abc123"}"#),
            CiContext::default(),
            "2026-08-05T12:00:00Z".to_owned(),
        );
        assert_eq!(receipt.proof_id, "abc123");
        assert_eq!(
            receipt.receipt_url,
            "https://api.getintegrityapi.com/verify/abc123"
        );
        assert_eq!(receipt.receipt_version, RECEIPT_VERSION);
        assert_eq!(receipt.issued_at, "2026-08-05T12:00:00Z");
    }

    #[test]
    fn receipt_embeds_the_response_verbatim() {
        let body = r#"{"proof_id":"abc123","capsule":{"alg":"ES256","kid":"k1","hp_version":"2"}}"#;
        let receipt = build_receipt(
            stub_response(body),
            CiContext::default(),
            "2026-08-05T12:00:00Z".to_owned(),
        );

        let serialised = serde_json::to_string(&receipt).expect("receipt must serialise");
        assert!(
            serialised.contains(body),
            "embedded response must be byte-identical to the service body"
        );
    }

    #[test]
    fn receipt_serialises_ci_under_its_own_key() {
        let ci = CiContext {
            repository: "acme/widgets".to_owned(),
            ..CiContext::default()
        };
        let receipt = build_receipt(
            stub_response(r#"{"proof_id":"abc123"}"#),
            ci,
            "2026-08-05T12:00:00Z".to_owned(),
        );
        let value = serde_json::to_value(&receipt).expect("receipt must serialise");
        assert_eq!(value["ci"]["repository"], "acme/widgets");
        assert_eq!(value["response"]["proof_id"], "abc123");
    }
}
