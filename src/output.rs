//! Output publication and user-facing progress text.
//!
//! The CI platform owns the contract for how published key/value pairs are
//! later referenced; this module only appends them to the designated output
//! file. Progress text goes to an injected writer so the binary stays
//! testable without capturing real stderr.

use std::fs::OpenOptions;
use std::io::Write;

use camino::Utf8Path;

use crate::context::CiContext;
use crate::error::{ReceiptError, Result};

/// Write one line of progress output, swallowing write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort progress; ignore write failures.
    }
}

/// Collapse newlines in an output value to spaces.
///
/// The output channel is line-oriented (`key=value` per line), so values
/// must not span lines.
///
/// # Examples
///
/// ```
/// use publish_proof::output::sanitize_output_value;
///
/// assert_eq!(sanitize_output_value("a\r\nb\nc"), "a b c");
/// ```
#[must_use]
pub fn sanitize_output_value(value: &str) -> String {
    value.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Append `key=value` lines to the CI output file.
///
/// # Errors
///
/// Returns [`ReceiptError::OutputWrite`] when the file cannot be opened or
/// appended to.
pub fn publish_outputs(path: &Utf8Path, entries: &[(&str, &str)]) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path.as_std_path())
        .map_err(|source| ReceiptError::OutputWrite {
            path: path.to_owned(),
            source,
        })?;

    for (key, value) in entries {
        writeln!(file, "{key}={}", sanitize_output_value(value)).map_err(|source| {
            ReceiptError::OutputWrite {
                path: path.to_owned(),
                source,
            }
        })?;
    }

    Ok(())
}

/// Configuration information for dry-run output.
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// Directory that would receive the artifacts.
    pub workspace: &'a Utf8Path,
    /// CI context that would be embedded in the payload.
    pub ci: &'a CiContext,
    /// CI output file, when the runner provides one.
    pub output_path: Option<&'a Utf8Path>,
    /// Whether the PDF summary would be rendered.
    pub render_pdf: bool,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let mut lines = vec![
            "Dry run - no proof will be requested".to_owned(),
            String::new(),
            format!("Workspace: {}", self.workspace),
            match self.output_path {
                Some(path) => format!("Output file: {path}"),
                None => "Output file: (unset; output publication skipped)".to_owned(),
            },
            format!(
                "PDF rendering: {}",
                if self.render_pdf { "enabled" } else { "disabled" }
            ),
            String::new(),
            "CI context:".to_owned(),
        ];

        for (name, value) in [
            ("repository", &self.ci.repository),
            ("commit", &self.ci.commit),
            ("actor", &self.ci.actor),
            ("run_id", &self.ci.run_id),
            ("run_number", &self.ci.run_number),
            ("workflow", &self.ci.workflow),
            ("ref", &self.ci.git_ref),
        ] {
            if value.is_empty() {
                lines.push(format!("  {name}: (empty)"));
            } else {
                lines.push(format!("  {name}: {value}"));
            }
        }

        lines.join("\n")
    }
}
