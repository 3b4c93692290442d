//! CLI module for the takedown engine
//!
//! Provides the command-line interface with:
//!
//! - Human and JSON output formats
//! - Configuration file support with environment overrides
//!
//! ## Usage
//!
//! ```bash
//! # File a notice
//! takedown submit --content-ref video-991 --artist-id artist-17 \
//!     --claimant-name "Acme Rights" --jurisdiction US \
//!     --good-faith --accurate --perjury --signature "/s/ J. Counsel"
//!
//! # Check its standing
//! takedown status TDN-2024-ABC123
//!
//! # Operator escalation queue
//! takedown overdue --json | jq '.[0].ticket_id'
//!
//! # Evidentiary trail
//! takedown audit TDN-2024-ABC123
//! ```
//!
//! ## Module Structure
//!
//! - `commands`: CLI command definitions using clap
//! - `config`: Configuration file handling
//! - `output`: Output formatters

pub mod commands;
pub mod config;
pub mod output;

// Re-exports for convenience
pub use commands::{
    Cli, CliContentAction, CliOutcome, CliPriority, CliTrustLevel, Commands,
};
pub use config::{ConfigError, OutputConfig, PolicyConfig, TakedownConfig};
pub use output::OutputFormat;
