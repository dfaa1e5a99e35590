//! Proof requests against the remote attestation endpoint.
//!
//! Provides a trait-based abstraction over the single HTTP POST this tool
//! performs, enabling dependency injection for testing. The production
//! implementation uses a shared `ureq` agent with a bounded timeout and
//! performs no retries: re-running the CI job is the retry mechanism.

use std::sync::OnceLock;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use serde_json::value::RawValue;

use crate::context::CiContext;

/// Base URL of the attestation service.
pub const PROOF_ENDPOINT_BASE: &str = "https://api.getintegrityapi.com";

/// Event tag sent with every proof request.
pub const PUBLISH_EVENT: &str = "github_publish";

/// Network timeout for the proof request.
const PROOF_TIMEOUT: Duration = Duration::from_secs(10);

/// The payload POSTed to the attestation endpoint.
///
/// Constructed once per invocation and never persisted directly; the CI
/// context fields flatten into the top level of the JSON body.
#[derive(Debug, Clone, Serialize)]
pub struct ProofRequest {
    /// Fixed event tag identifying the publish flow.
    pub event: &'static str,
    /// Run metadata from the CI environment.
    #[serde(flatten)]
    pub ci: CiContext,
    /// Generation timestamp, RFC 3339 UTC.
    pub timestamp: String,
}

impl ProofRequest {
    /// Build the payload for the given context and timestamp.
    #[must_use]
    pub fn new(ci: CiContext, timestamp: String) -> Self {
        Self {
            event: PUBLISH_EVENT,
            ci,
            timestamp,
        }
    }
}

/// The attestation service's answer to a proof request.
///
/// `proof_id` is the only field this tool interprets; the full body is
/// retained verbatim so the receipt embeds an untouched transcript of the
/// transaction.
#[derive(Debug)]
pub struct ProofResponse {
    /// The non-empty proof identifier extracted from the body.
    pub proof_id: String,
    /// The response body exactly as the service returned it.
    pub raw: Box<RawValue>,
}

/// Errors arising from the proof request.
#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    /// The request never produced a response (network, DNS, timeout).
    #[error("proof request failed: {reason}")]
    Transport {
        /// Description of the transport failure.
        reason: String,
    },

    /// The service responded with an error status.
    #[error("proof endpoint returned HTTP {status}: {message}")]
    Remote {
        /// The HTTP status code.
        status: u16,
        /// Message extracted from the error body, or a generic description.
        message: String,
    },

    /// The service reported success but the body breaks the contract.
    #[error("invalid response from proof endpoint: {reason}")]
    InvalidResponse {
        /// Description of the contract violation.
        reason: String,
    },
}

/// Trait for requesting a proof of publish.
///
/// Abstraction allows tests to stub the attestation service without network
/// access.
#[cfg_attr(test, mockall::automock)]
pub trait ProofClient {
    /// Perform exactly one proof request for `request`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, an error response, or a
    /// success response lacking a usable `proof_id`.
    fn request_proof(&self, request: &ProofRequest) -> Result<ProofResponse, ProofError>;
}

/// HTTP-based client using `ureq`.
pub struct HttpProofClient {
    api_key: String,
}

impl HttpProofClient {
    /// Create a client authenticating with `api_key`.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }

    /// The proof endpoint URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use publish_proof::proof::HttpProofClient;
    ///
    /// assert!(HttpProofClient::proof_url().ends_with("/proof"));
    /// ```
    #[must_use]
    pub fn proof_url() -> String {
        format!("{PROOF_ENDPOINT_BASE}/proof")
    }
}

impl ProofClient for HttpProofClient {
    fn request_proof(&self, request: &ProofRequest) -> Result<ProofResponse, ProofError> {
        let url = Self::proof_url();
        let payload = serde_json::to_string(request).map_err(|e| ProofError::Transport {
            reason: format!("failed to encode payload: {e}"),
        })?;
        log::trace!("posting proof request to {url}");

        let response = http_agent()
            .post(&url)
            .header("authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .send(payload.as_bytes())
            .map_err(|e| ProofError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| ProofError::Transport {
                reason: e.to_string(),
            })?;

        if !status.is_success() {
            return Err(ProofError::Remote {
                status: status.as_u16(),
                message: extract_remote_message(&body, status.as_u16()),
            });
        }

        parse_proof_body(body)
    }
}

/// Parse a success body, extracting the proof identifier and retaining the
/// verbatim text.
///
/// # Errors
///
/// Returns [`ProofError::InvalidResponse`] when the body is not JSON or its
/// `proof_id` field is absent, not a string, or blank.
pub fn parse_proof_body(body: String) -> Result<ProofResponse, ProofError> {
    let value: Value = serde_json::from_str(&body).map_err(|e| ProofError::InvalidResponse {
        reason: format!("body is not JSON: {e}"),
    })?;

    let proof_id = value
        .get("proof_id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ProofError::InvalidResponse {
            reason: "missing proof_id".to_owned(),
        })?
        .to_owned();

    // Validated as JSON above; from_string re-checks but cannot fail here.
    let raw = RawValue::from_string(body).map_err(|e| ProofError::InvalidResponse {
        reason: format!("body is not JSON: {e}"),
    })?;

    Ok(ProofResponse { proof_id, raw })
}

/// Extract a human-readable message from an error body.
///
/// Rules are tried in order, stopping at the first non-empty result: the
/// body's `error` field, its `message` field, then a generic description of
/// the HTTP status.
fn extract_remote_message(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for field in ["error", "message"] {
            if let Some(text) = value.get(field).and_then(Value::as_str) {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    return trimmed.to_owned();
                }
            }
        }
    }
    format!("request rejected with status {status}")
}

/// Shared `ureq` agent with the request timeout applied.
///
/// HTTP error statuses are surfaced as responses rather than transport
/// errors so their bodies stay readable for message extraction.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(PROOF_TIMEOUT))
            .http_status_as_error(false)
            .build();
        ureq::Agent::new_with_config(config)
    })
}
