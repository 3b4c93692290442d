//! Output formatters for the takedown CLI
//!
//! Provides two output formats:
//!
//! - **Human**: readable output for terminal use
//! - **JSON**: structured output for scripting and jq

use std::io::{self, Write};

use serde::Serialize;

use crate::compliance::{
    AuditEvent, CounterNotice, NoticeStatusView, OverdueNotice, RepeatInfringerRecord,
    SubmissionReceipt,
};

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

fn write_json<T: Serialize>(w: &mut impl Write, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{}", json)
}

/// Print an intake receipt
pub fn print_receipt(
    w: &mut impl Write,
    format: OutputFormat,
    receipt: &SubmissionReceipt,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(w, receipt),
        OutputFormat::Human => {
            writeln!(w, "Ticket issued: {}", receipt.ticket_id)?;
            writeln!(w, "  framework: {}", receipt.legal_framework)?;
            writeln!(w, "  priority:  {}", receipt.priority)?;
            writeln!(w, "  status:    {}", receipt.status)?;
            writeln!(w, "  deadline:  {}", receipt.sla_deadline.to_rfc3339())?;
            if receipt.validation.valid {
                writeln!(w, "  validation: complete")?;
            } else {
                writeln!(w, "  validation: incomplete, remediation required")?;
                for element in &receipt.validation.missing {
                    writeln!(w, "    missing: {}", element)?;
                }
            }
            Ok(())
        }
    }
}

/// Print a notice status view
pub fn print_status(
    w: &mut impl Write,
    format: OutputFormat,
    view: &NoticeStatusView,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(w, view),
        OutputFormat::Human => {
            writeln!(w, "{}", view.ticket_id)?;
            writeln!(w, "  status:   {}", view.status)?;
            writeln!(w, "  priority: {}", view.priority)?;
            writeln!(w, "  deadline: {}", view.sla_deadline.to_rfc3339())?;
            if let Some(counter_deadline) = view.counter_notice_deadline {
                writeln!(
                    w,
                    "  counter-notice deadline: {}",
                    counter_deadline.to_rfc3339()
                )?;
            }
            writeln!(w, "  overdue:  {}", if view.overdue { "YES" } else { "no" })
        }
    }
}

/// Print an accepted counter-notice
pub fn print_counter_notice(
    w: &mut impl Write,
    format: OutputFormat,
    counter: &CounterNotice,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(w, counter),
        OutputFormat::Human => {
            writeln!(w, "Counter-notice accepted for {}", counter.notice_id)?;
            writeln!(w, "  objection deadline: {}", counter.deadline.to_rfc3339())?;
            if !counter.validation.valid {
                writeln!(w, "  validation: incomplete, remediation required")?;
                for element in &counter.validation.missing {
                    writeln!(w, "    missing: {}", element)?;
                }
            }
            Ok(())
        }
    }
}

/// Print the overdue listing, most overdue first
pub fn print_overdue(
    w: &mut impl Write,
    format: OutputFormat,
    overdue: &[OverdueNotice],
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(w, &overdue),
        OutputFormat::Human => {
            if overdue.is_empty() {
                return writeln!(w, "No overdue notices");
            }
            writeln!(w, "{} overdue notice(s):", overdue.len())?;
            for notice in overdue {
                writeln!(
                    w,
                    "  {}  {:>4}h late  {} {} {}",
                    notice.ticket_id,
                    notice.hours_overdue,
                    notice.jurisdiction,
                    notice.priority,
                    notice.status
                )?;
            }
            Ok(())
        }
    }
}

/// Print an audit trail
pub fn print_audit_trail(
    w: &mut impl Write,
    format: OutputFormat,
    events: &[AuditEvent],
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(w, &events),
        OutputFormat::Human => {
            for event in events {
                let actor = event
                    .performed_by
                    .as_deref()
                    .unwrap_or("automated");
                write!(
                    w,
                    "{}  {:<24} {}",
                    event.timestamp.to_rfc3339(),
                    event.action.name(),
                    actor
                )?;
                if let Some(details) = &event.details {
                    write!(w, "  {}", details)?;
                }
                writeln!(w)?;
            }
            Ok(())
        }
    }
}

/// Print repeat-infringer standing
pub fn print_strikes(
    w: &mut impl Write,
    format: OutputFormat,
    records: &[RepeatInfringerRecord],
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(w, &records),
        OutputFormat::Human => {
            if records.is_empty() {
                return writeln!(w, "No strike records");
            }
            for record in records {
                writeln!(
                    w,
                    "{}: {} strike(s){}",
                    record.artist_id,
                    record.strike_count,
                    if record.termination_eligible {
                        "  TERMINATION-ELIGIBLE"
                    } else {
                        ""
                    }
                )?;
                for strike in &record.strikes {
                    writeln!(
                        w,
                        "  {}  {}",
                        strike.recorded_at.to_rfc3339(),
                        strike.ticket_id
                    )?;
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::{
        LegalFramework, NoticeStatus, Priority, StatutoryElement, ValidationOutcome,
    };
    use chrono::{TimeZone, Utc};

    fn receipt() -> SubmissionReceipt {
        SubmissionReceipt {
            ticket_id: "TDN-2024-ABC123".into(),
            status: NoticeStatus::Submitted,
            priority: Priority::Normal,
            legal_framework: LegalFramework::Dmca512,
            sla_deadline: Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap(),
            validation: ValidationOutcome {
                valid: false,
                missing: vec![StatutoryElement::ElectronicSignature],
            },
        }
    }

    #[test]
    fn test_human_receipt_mentions_missing_elements() {
        let mut out = Vec::new();
        print_receipt(&mut out, OutputFormat::Human, &receipt()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("TDN-2024-ABC123"));
        assert!(text.contains("remediation required"));
        assert!(text.contains("electronic signature"));
    }

    #[test]
    fn test_json_receipt_is_parseable() {
        let mut out = Vec::new();
        print_receipt(&mut out, OutputFormat::Json, &receipt()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["ticket_id"], "TDN-2024-ABC123");
        assert_eq!(value["status"], "submitted");
    }

    #[test]
    fn test_empty_overdue_listing() {
        let mut out = Vec::new();
        print_overdue(&mut out, OutputFormat::Human, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No overdue notices\n");
    }
}
