//! Publish-proof library.
//!
//! This crate implements a CI step that requests a proof-of-publish
//! attestation from a remote integrity service and persists a locally
//! verifiable receipt into the build workspace. It is used by the
//! `publish-proof` binary and can be consumed programmatically for testing
//! or custom publication workflows.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Environment configuration resolution
//! - [`context`] - CI run context record
//! - [`error`] - Semantic error types
//! - [`flow`] - Pipeline orchestration
//! - [`output`] - CI output publication and progress text
//! - [`persist`] - Receipt and digest persistence
//! - [`proof`] - Proof requests against the attestation endpoint
//! - [`receipt`] - Receipt assembly
//! - [`render`] - PDF rendering of the receipt

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod flow;
pub mod output;
pub mod persist;
pub mod proof;
pub mod receipt;
pub mod render;
