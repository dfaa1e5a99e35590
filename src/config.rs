//! Configuration resolution for one invocation.
//!
//! All configuration is resolved into a single immutable [`Config`] before
//! any network or filesystem work happens, so later stages depend only on
//! this struct and never on ambient environment lookups. The lookup itself
//! is injected, which keeps resolution testable without mutating the
//! process environment.

use camino::Utf8PathBuf;

use crate::context::CiContext;
use crate::error::{ReceiptError, Result};

/// Variables consulted for the attestation API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["INTEGRITY_API_KEY", "INPUT_API_KEY"];

/// Variables consulted for the workspace directory, in order. When none is
/// set the process current directory is used.
pub const WORKSPACE_VARS: [&str; 2] = ["GITHUB_WORKSPACE", "RUNNER_WORKSPACE"];

/// Variable naming the CI output file for downstream steps.
pub const OUTPUT_FILE_VAR: &str = "GITHUB_OUTPUT";

/// Resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for the attestation endpoint.
    pub api_key: String,
    /// Directory receiving the receipt artifacts.
    pub workspace: Utf8PathBuf,
    /// CI context embedded in the payload and the receipt.
    pub ci: CiContext,
    /// CI output file, when the runner provides one.
    pub output_path: Option<Utf8PathBuf>,
}

impl Config {
    /// Resolve configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::MissingApiKey`] when no API key variable
    /// carries a non-blank value, or [`ReceiptError::WorkspaceUnresolved`]
    /// when no workspace variable is set and the current directory cannot
    /// stand in for it.
    pub fn from_env() -> Result<Self> {
        Self::resolve(|name| std::env::var(name).ok())
    }

    /// Resolve configuration through an injected variable lookup.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Config::from_env`].
    pub fn resolve<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = first_present(&lookup, &API_KEY_VARS).ok_or(ReceiptError::MissingApiKey)?;

        let workspace = match first_present(&lookup, &WORKSPACE_VARS) {
            Some(dir) => Utf8PathBuf::from(dir),
            None => current_dir_utf8()?,
        };

        let ci = CiContext::resolve(&lookup);
        let output_path = first_present(&lookup, &[OUTPUT_FILE_VAR]).map(Utf8PathBuf::from);

        Ok(Self {
            api_key,
            workspace,
            ci,
            output_path,
        })
    }
}

/// First variable in `names` with a non-blank value, whitespace-trimmed.
fn first_present<F>(lookup: &F, names: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_owned())
        .find(|value| !value.is_empty())
}

/// The current directory as a UTF-8 path.
fn current_dir_utf8() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::try_from(cwd).map_err(|e| ReceiptError::WorkspaceUnresolved {
        reason: format!("current directory is not valid UTF-8: {e}"),
    })
}
