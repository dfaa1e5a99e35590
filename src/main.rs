//! Publish-proof CI step entrypoint.
//!
//! Resolves configuration from the environment, requests a proof of publish
//! from the attestation service, and persists the receipt artifacts into
//! the build workspace. Any failure exits non-zero with a diagnostic on
//! stderr.

use std::io::Write;

use clap::Parser;
use publish_proof::cli::Cli;
use publish_proof::config::Config;
use publish_proof::error::Result;
use publish_proof::flow::{RunOptions, run_publish};
use publish_proof::output::{DryRunInfo, write_stderr_line};
use publish_proof::proof::HttpProofClient;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(dir) = &cli.workspace {
        config.workspace = dir.clone();
    }

    if cli.dry_run {
        return run_dry(&config, cli, stderr);
    }

    let client = HttpProofClient::new(config.api_key.clone());
    let options = RunOptions {
        quiet: cli.quiet,
        render_pdf: !cli.no_pdf,
    };
    run_publish(&config, &client, &options, stderr)?;
    Ok(())
}

/// Shows the resolved configuration without contacting the service or
/// touching the workspace.
fn run_dry(config: &Config, cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let info = DryRunInfo {
        workspace: &config.workspace,
        ci: &config.ci,
        output_path: config.output_path.as_deref(),
        render_pdf: !cli.no_pdf,
    };
    write_stderr_line(stderr, info.display_text());
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use publish_proof::error::ReceiptError;

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(ReceiptError::MissingApiKey), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.contains("api key is required"));
    }

    #[test]
    fn missing_api_key_fails_before_any_side_effect() {
        temp_env::with_vars(
            [
                ("INTEGRITY_API_KEY", None::<&str>),
                ("INPUT_API_KEY", None),
                ("GITHUB_WORKSPACE", Some("/tmp")),
            ],
            || {
                let cli = Cli::default();
                let mut stderr = Vec::new();
                let err = run(&cli, &mut stderr).expect_err("expected run to fail");
                assert!(matches!(err, ReceiptError::MissingApiKey));
            },
        );
    }

    #[test]
    fn dry_run_prints_configuration_without_side_effects() {
        temp_env::with_vars(
            [
                ("INTEGRITY_API_KEY", Some("sk-test")),
                ("GITHUB_WORKSPACE", Some("/tmp")),
                ("GITHUB_REPOSITORY", Some("acme/widgets")),
            ],
            || {
                let cli = Cli {
                    dry_run: true,
                    ..Cli::default()
                };
                let mut stderr = Vec::new();
                run(&cli, &mut stderr).expect("dry run must succeed");

                let text = String::from_utf8(stderr).expect("stderr was not UTF-8");
                assert!(text.contains("Dry run"));
                assert!(text.contains("acme/widgets"));
                assert!(!text.contains("sk-test"), "the api key must never be printed");
            },
        );
    }
}
