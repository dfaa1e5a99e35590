//! CLI argument definitions.
//!
//! This module defines the command-line interface using clap. The
//! environment remains the primary configuration source (the tool is meant
//! to run as a CI step); the flags here cover local overrides and
//! diagnostics.

use camino::Utf8PathBuf;
use clap::Parser;

/// Request a proof of publish and persist a verifiable receipt.
#[derive(Parser, Debug)]
#[command(name = "publish-proof")]
#[command(version, about)]
#[command(long_about = concat!(
    "Request a proof of publish and persist a verifiable receipt.\n\n",
    "This tool runs as a CI step: it reads the run context from the ",
    "environment, requests an attestation from the integrity service, and ",
    "writes receipt.json, receipt.sha256, and receipt.pdf into the build ",
    "workspace. The digest file always matches the exact bytes of the JSON ",
    "receipt, so downstream consumers can verify the artifact offline.\n\n",
    "Configuration comes from the environment: INTEGRITY_API_KEY (or the ",
    "INPUT_API_KEY action binding) must be set; GITHUB_WORKSPACE or ",
    "RUNNER_WORKSPACE selects the artifact directory, falling back to the ",
    "current directory; GITHUB_OUTPUT, when present, receives key=value ",
    "outputs for downstream steps.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Run as a CI step with the environment already populated:\n",
    "    $ publish-proof\n\n",
    "  Write the artifacts somewhere other than the checkout:\n",
    "    $ publish-proof --workspace /tmp/receipts\n\n",
    "  Skip the PDF summary:\n",
    "    $ publish-proof --no-pdf\n\n",
    "  Show the resolved configuration without contacting the service:\n",
    "    $ publish-proof --dry-run\n",
))]
pub struct Cli {
    /// Artifact directory override [default: $GITHUB_WORKSPACE].
    #[arg(short, long, value_name = "DIR")]
    pub workspace: Option<Utf8PathBuf>,

    /// Skip rendering the PDF summary.
    #[arg(long)]
    pub no_pdf: bool,

    /// Show the resolved configuration and exit without side effects.
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

impl Default for Cli {
    /// Creates a `Cli` instance with all flags disabled.
    ///
    /// Useful for testing and programmatic construction.
    fn default() -> Self {
        Self {
            workspace: None,
            no_pdf: false,
            dry_run: false,
            quiet: false,
        }
    }
}
