//! CLI command definitions for the takedown engine
//!
//! Defines all CLI commands and arguments using clap derive macros.
//!
//! ## Commands
//!
//! - `submit` - File a takedown notice
//! - `status` - Show a notice's standing
//! - `triage` / `action` - Advance a notice through its lifecycle
//! - `counter-notice` - File a reinstatement appeal
//! - `resolve` / `withdraw` / `escalate` - Administrative operations
//! - `overdue` - List notices past their SLA deadline
//! - `audit` - Print a notice's evidentiary trail
//! - `strikes` - Repeat-infringer standing
//! - `note` - Attach an operator note

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::compliance::{ContentAction, Priority, ResolutionOutcome, TrustLevel};

// =============================================================================
// Main CLI
// =============================================================================

/// Takedown - notice-and-action compliance engine
#[derive(Parser, Debug)]
#[command(name = "takedown")]
#[command(about = "Global IP takedown and notice-and-action compliance", long_about = None)]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,
}

// =============================================================================
// Value enums
// =============================================================================

/// Trusted-flagger tier (CLI compatible)
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliTrustLevel {
    Premium,
    Elevated,
    Standard,
}

impl From<CliTrustLevel> for TrustLevel {
    fn from(level: CliTrustLevel) -> Self {
        match level {
            CliTrustLevel::Premium => TrustLevel::Premium,
            CliTrustLevel::Elevated => TrustLevel::Elevated,
            CliTrustLevel::Standard => TrustLevel::Standard,
        }
    }
}

/// Resolution outcome (CLI compatible)
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliOutcome {
    Upheld,
    Reversed,
}

impl From<CliOutcome> for ResolutionOutcome {
    fn from(outcome: CliOutcome) -> Self {
        match outcome {
            CliOutcome::Upheld => ResolutionOutcome::Upheld,
            CliOutcome::Reversed => ResolutionOutcome::Reversed,
        }
    }
}

/// Handling priority (CLI compatible)
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliPriority {
    Urgent,
    High,
    Normal,
    Low,
}

impl From<CliPriority> for Priority {
    fn from(priority: CliPriority) -> Self {
        match priority {
            CliPriority::Urgent => Priority::Urgent,
            CliPriority::High => Priority::High,
            CliPriority::Normal => Priority::Normal,
            CliPriority::Low => Priority::Low,
        }
    }
}

/// Content-level action (CLI compatible)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliContentAction {
    /// Disable access, keep the object
    #[default]
    Disable,
    /// Permanent removal
    Remove,
    /// Block access from the regions passed via --region
    GeoBlock,
}

impl CliContentAction {
    pub fn into_action(self, regions: Vec<String>) -> ContentAction {
        match self {
            CliContentAction::Disable => ContentAction::Disable,
            CliContentAction::Remove => ContentAction::Remove,
            CliContentAction::GeoBlock => ContentAction::GeoBlock(regions),
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// File a takedown notice; always issues a ticket
    Submit {
        /// Identifier of the allegedly infringing content
        #[arg(long)]
        content_ref: String,

        /// Kind of content (video, audio, image, text)
        #[arg(long, default_value = "other")]
        content_type: String,

        /// Owner of the targeted content
        #[arg(long)]
        artist_id: String,

        /// Claimant's legal name
        #[arg(long, default_value = "")]
        claimant_name: String,

        /// Claimant's postal address
        #[arg(long, default_value = "")]
        claimant_address: String,

        /// Claimant's email
        #[arg(long, default_value = "")]
        claimant_email: String,

        /// Title of the copyrighted work
        #[arg(long, default_value = "")]
        work: String,

        /// Description of the allegedly infringing use
        #[arg(long, default_value = "")]
        description: String,

        /// Claimant attests to a good-faith belief of infringement
        #[arg(long)]
        good_faith: bool,

        /// Claimant attests the notice is accurate
        #[arg(long)]
        accurate: bool,

        /// Claimant attests under penalty of perjury
        #[arg(long)]
        perjury: bool,

        /// Electronic signature
        #[arg(long, default_value = "")]
        signature: String,

        /// Jurisdiction code (US, EU, UK, CA, AU; anything else is worldwide)
        #[arg(long, default_value = "WW")]
        jurisdiction: String,

        /// Trusted-flagger tier of the claimant
        #[arg(long)]
        trust_level: Option<CliTrustLevel>,
    },

    /// Show a notice's status, deadline, and overdue standing
    Status {
        /// Ticket id (TDN-YYYY-XXXXXX)
        ticket: String,
    },

    /// Move a submitted notice into triage
    Triage {
        ticket: String,

        /// Operator id performing the triage
        #[arg(long)]
        operator: Option<String>,
    },

    /// Act on the content of a notice under triage
    Action {
        ticket: String,

        /// What to do with the content
        #[arg(long, value_enum, default_value_t = CliContentAction::Disable)]
        action: CliContentAction,

        /// Regions for geo-blocking (repeatable)
        #[arg(long = "region")]
        regions: Vec<String>,

        /// Operator id performing the action
        #[arg(long)]
        operator: Option<String>,
    },

    /// File a counter-notice against a notice
    CounterNotice {
        ticket: String,

        #[arg(long, default_value = "")]
        respondent_name: String,

        #[arg(long, default_value = "")]
        respondent_address: String,

        #[arg(long, default_value = "")]
        respondent_email: String,

        /// Respondent attests to mistake or misidentification
        #[arg(long)]
        good_faith: bool,

        /// Respondent consents to the jurisdiction of the relevant court
        #[arg(long)]
        consent_jurisdiction: bool,

        #[arg(long, default_value = "")]
        signature: String,
    },

    /// Resolve a notice (admin only)
    Resolve {
        ticket: String,

        #[arg(long, value_enum)]
        outcome: CliOutcome,

        /// Admin operator id
        #[arg(long)]
        operator: String,
    },

    /// Withdraw a notice at the claimant's request
    Withdraw {
        ticket: String,

        #[arg(long)]
        operator: Option<String>,
    },

    /// Escalate a notice's priority, recomputing its deadline (admin only)
    Escalate {
        ticket: String,

        #[arg(long, value_enum)]
        priority: CliPriority,

        /// Admin operator id
        #[arg(long)]
        operator: String,
    },

    /// List notices currently past their SLA deadline
    Overdue,

    /// Print a notice's full audit trail
    Audit {
        ticket: String,
    },

    /// Show repeat-infringer standing
    Strikes {
        /// Limit to one content owner; omit to list termination-eligible accounts
        #[arg(long)]
        artist: Option<String>,
    },

    /// Attach a manual operator note to a notice
    Note {
        ticket: String,

        /// Operator id
        #[arg(long)]
        operator: String,

        /// Note text
        note: String,
    },
}
