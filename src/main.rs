//! Takedown CLI - notice-and-action compliance engine
//!
//! A command-line interface for the takedown compliance engine:
//! - Notice intake with statutory validation and SLA assignment
//! - Lifecycle operations (triage, action, counter-notice, resolution)
//! - Overdue escalation queue and evidentiary audit trails

use std::io::stdout;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use takedown_protocol::cli::{output, Cli, Commands, OutputFormat, TakedownConfig};
use takedown_protocol::compliance::{
    Clock, ComplianceEngine, CounterNoticeSubmission, NoticeSubmission, Operator, SystemClock,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    // Default to quiet (error-only) unless --verbose is specified
    let filter = if cli.verbose { "debug" } else { "error" };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    // Load configuration
    let config = match &cli.config {
        Some(path) => TakedownConfig::load_from(path.clone()),
        None => TakedownConfig::load(),
    };

    let format = OutputFormat::from_flag(cli.json || config.output.json);
    let engine = ComplianceEngine::new(config.policy.engine_policy())?;
    let mut out = stdout();

    match cli.command {
        Commands::Submit {
            content_ref,
            content_type,
            artist_id,
            claimant_name,
            claimant_address,
            claimant_email,
            work,
            description,
            good_faith,
            accurate,
            perjury,
            signature,
            jurisdiction,
            trust_level,
        } => {
            let receipt = engine
                .submit_notice(NoticeSubmission {
                    content_ref,
                    content_type,
                    artist_id,
                    claimant_name,
                    claimant_address,
                    claimant_email,
                    claimant_organization: None,
                    copyrighted_work: work,
                    infringement_description: description,
                    good_faith_attestation: good_faith,
                    accuracy_attestation: accurate,
                    perjury_attestation: perjury,
                    signature,
                    jurisdiction,
                    trust_level: trust_level.map(Into::into),
                })
                .await?;
            output::print_receipt(&mut out, format, &receipt)?;
        }

        Commands::Status { ticket } => {
            let view = engine.notice_status(&ticket)?;
            output::print_status(&mut out, format, &view)?;
        }

        Commands::Triage { ticket, operator } => {
            let operator = operator.map(|id| Operator::agent(&id));
            engine.begin_triage(&ticket, operator.as_ref())?;
            let view = engine.notice_status(&ticket)?;
            output::print_status(&mut out, format, &view)?;
        }

        Commands::Action { ticket, action, regions, operator } => {
            let operator = operator.map(|id| Operator::agent(&id));
            engine.take_action(&ticket, action.into_action(regions), operator.as_ref())?;
            let view = engine.notice_status(&ticket)?;
            output::print_status(&mut out, format, &view)?;
        }

        Commands::CounterNotice {
            ticket,
            respondent_name,
            respondent_address,
            respondent_email,
            good_faith,
            consent_jurisdiction,
            signature,
        } => {
            let counter = engine.submit_counter_notice(
                &ticket,
                CounterNoticeSubmission {
                    respondent_name,
                    respondent_address,
                    respondent_email,
                    good_faith_statement: good_faith,
                    consent_to_jurisdiction: consent_jurisdiction,
                    signature,
                },
            )?;
            output::print_counter_notice(&mut out, format, &counter)?;
        }

        Commands::Resolve { ticket, outcome, operator } => {
            let operator = Operator::admin(&operator);
            engine.admin_resolve(&ticket, outcome.into(), &operator)?;
            let view = engine.notice_status(&ticket)?;
            output::print_status(&mut out, format, &view)?;
        }

        Commands::Withdraw { ticket, operator } => {
            let operator = operator.map(|id| Operator::agent(&id));
            engine.withdraw_notice(&ticket, operator.as_ref())?;
            let view = engine.notice_status(&ticket)?;
            output::print_status(&mut out, format, &view)?;
        }

        Commands::Escalate { ticket, priority, operator } => {
            let operator = Operator::admin(&operator);
            engine.escalate_priority(&ticket, priority.into(), &operator)?;
            let view = engine.notice_status(&ticket)?;
            output::print_status(&mut out, format, &view)?;
        }

        Commands::Overdue => {
            let overdue = engine.list_overdue()?;
            output::print_overdue(&mut out, format, &overdue)?;
        }

        Commands::Audit { ticket } => {
            let events = engine.audit_trail(&ticket)?;
            output::print_audit_trail(&mut out, format, &events)?;
        }

        Commands::Strikes { artist } => {
            let records = match artist {
                Some(artist_id) => {
                    vec![engine.strikes().strike_status(&artist_id, SystemClock.now())?]
                }
                None => engine.strikes().termination_eligible()?,
            };
            output::print_strikes(&mut out, format, &records)?;
        }

        Commands::Note { ticket, operator, note } => {
            let operator = Operator::agent(&operator);
            engine.record_manual_note(&ticket, &operator, &note)?;
            let events = engine.audit_trail(&ticket)?;
            output::print_audit_trail(&mut out, format, &events)?;
        }
    }

    Ok(())
}
