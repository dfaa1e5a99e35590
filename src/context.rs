//! CI context captured from the runner environment.
//!
//! The context is a flat record of strings describing the run that triggered
//! this invocation. It is read once, before any other work, and is immutable
//! afterwards. Absent variables resolve to empty strings; the context alone
//! never fails resolution.

use serde::Serialize;

/// The run metadata embedded in the proof request and the receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CiContext {
    /// Owner/name of the repository being published.
    pub repository: String,
    /// Commit SHA the workflow ran against.
    pub commit: String,
    /// Login of the user or app that triggered the run.
    pub actor: String,
    /// Unique identifier of the workflow run.
    pub run_id: String,
    /// Monotonic run number within the workflow.
    pub run_number: String,
    /// Name of the workflow.
    pub workflow: String,
    /// Fully-formed git ref the run targeted.
    #[serde(rename = "ref")]
    pub git_ref: String,
}

impl CiContext {
    /// Resolve the context through an injected variable lookup.
    pub fn resolve<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            repository: env_string(&lookup, "GITHUB_REPOSITORY"),
            commit: env_string(&lookup, "GITHUB_SHA"),
            actor: env_string(&lookup, "GITHUB_ACTOR"),
            run_id: env_string(&lookup, "GITHUB_RUN_ID"),
            run_number: env_string(&lookup, "GITHUB_RUN_NUMBER"),
            workflow: env_string(&lookup, "GITHUB_WORKFLOW"),
            git_ref: env_string(&lookup, "GITHUB_REF"),
        }
    }
}

/// The variable's value, whitespace-trimmed, or an empty string when unset.
fn env_string<F>(lookup: &F, name: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_owned())
        .unwrap_or_default()
}
