//! Append-only audit trail for the takedown engine.
//!
//! Every lifecycle transition, scan, notification, and manual note produces
//! exactly one event, stored as JSONL files organized by date. Events are
//! immutable post-insert: no update or delete operation exists anywhere in
//! this module, preserving evidentiary integrity.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::storage::{RecordStore, SUBDIR_AUDIT};
use super::types::ComplianceError;

/// Taxonomy of auditable actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Notice received and ticket issued
    Receipt,
    /// Statutory validation performed
    Validation,
    /// Fingerprint scan attempted
    FingerprintScan,
    /// Notice entered triage
    Triage,
    /// Content removed
    ContentRemoved,
    /// Content disabled (takedown without deletion)
    ContentDisabled,
    /// Content geo-blocked in specific regions
    GeoBlocked,
    /// Notice forwarded to the alleged infringer (CA notice-and-notice)
    NoticeForwarded,
    /// Claimant notified of an action or outcome
    ClaimantNotified,
    /// Counter-notice received
    CounterNoticeReceived,
    /// Content reinstated after reversal
    ContentReinstated,
    /// Notice resolved
    Resolution,
    /// Appeal filed against a resolution
    AppealFiled,
    /// Appeal resolved
    AppealResolved,
    /// Manual operator note
    ManualNote,
    /// Reviewed with no action required
    NoActionRequired,
}

impl AuditAction {
    /// Stable name used in summaries and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            AuditAction::Receipt => "receipt",
            AuditAction::Validation => "validation",
            AuditAction::FingerprintScan => "fingerprint_scan",
            AuditAction::Triage => "triage",
            AuditAction::ContentRemoved => "content_removed",
            AuditAction::ContentDisabled => "content_disabled",
            AuditAction::GeoBlocked => "geo_blocked",
            AuditAction::NoticeForwarded => "notice_forwarded",
            AuditAction::ClaimantNotified => "claimant_notified",
            AuditAction::CounterNoticeReceived => "counter_notice_received",
            AuditAction::ContentReinstated => "content_reinstated",
            AuditAction::Resolution => "resolution",
            AuditAction::AppealFiled => "appeal_filed",
            AuditAction::AppealResolved => "appeal_resolved",
            AuditAction::ManualNote => "manual_note",
            AuditAction::NoActionRequired => "no_action_required",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An audit log entry
///
/// `performed_by = None` marks an automated action; a populated operator id
/// marks a human-performed one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event ID
    pub id: String,
    /// Ticket id of the notice this event belongs to
    pub notice_id: String,
    /// What happened
    pub action: AuditAction,
    /// Whether the action was taken without a human in the loop
    pub automated: bool,
    /// Operator id for human-performed actions
    pub performed_by: Option<String>,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// Free-form detail (validation flags, scan scores, resolution outcome)
    pub details: Option<String>,
}

/// Append-only recorder for audit events
pub struct AuditTrail {
    store: Arc<RecordStore>,
    clock: Arc<dyn Clock>,
}

impl AuditTrail {
    pub fn new(store: Arc<RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Record an automated action
    pub fn record(
        &self,
        notice_id: &str,
        action: AuditAction,
        details: Option<&str>,
    ) -> Result<AuditEvent, ComplianceError> {
        self.append(notice_id, action, None, details)
    }

    /// Record a human-performed action
    pub fn record_by(
        &self,
        notice_id: &str,
        action: AuditAction,
        operator_id: &str,
        details: Option<&str>,
    ) -> Result<AuditEvent, ComplianceError> {
        self.append(notice_id, action, Some(operator_id.to_string()), details)
    }

    fn append(
        &self,
        notice_id: &str,
        action: AuditAction,
        performed_by: Option<String>,
        details: Option<&str>,
    ) -> Result<AuditEvent, ComplianceError> {
        let event = AuditEvent {
            id: uuid::Uuid::new_v4().to_string(),
            notice_id: notice_id.to_string(),
            action,
            automated: performed_by.is_none(),
            performed_by,
            timestamp: self.clock.now(),
            details: details.map(|d| d.to_string()),
        };

        // Also emit via tracing for real-time visibility
        tracing::info!(
            target: "takedown::compliance::audit",
            id = %event.id,
            notice = %event.notice_id,
            action = %event.action,
            automated = event.automated,
            "Audit event"
        );

        let filename = format!("audit_{}.jsonl", event.timestamp.format("%Y-%m-%d"));
        self.store.append_jsonl(SUBDIR_AUDIT, &filename, &event)?;

        Ok(event)
    }

    /// Read audit events for a specific date
    pub fn read_date(&self, date: NaiveDate) -> Result<Vec<AuditEvent>, ComplianceError> {
        let filename = format!("audit_{}.jsonl", date.format("%Y-%m-%d"));
        self.store.read_jsonl(SUBDIR_AUDIT, &filename)
    }

    /// Read audit events for a date range (inclusive), ordered by timestamp
    pub fn read_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AuditEvent>, ComplianceError> {
        let mut events = Vec::new();
        let mut current = start;

        while current <= end {
            events.extend(self.read_date(current)?);
            current = current
                .succ_opt()
                .ok_or(ComplianceError::InvalidFormat)?;
        }

        events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(events)
    }

    /// Full trail for one notice, ordered by timestamp
    ///
    /// Scans every daily file; the trail is the evidentiary record, so
    /// completeness wins over speed here.
    pub fn for_notice(&self, notice_id: &str) -> Result<Vec<AuditEvent>, ComplianceError> {
        let files = self.store.list_files(SUBDIR_AUDIT, "jsonl")?;
        let mut events: Vec<AuditEvent> = Vec::new();

        for path in files {
            let day: Vec<AuditEvent> = {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default()
                    .to_string();
                self.store.read_jsonl(SUBDIR_AUDIT, &name)?
            };
            events.extend(day.into_iter().filter(|e| e.notice_id == notice_id));
        }

        events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::clock::FixedClock;
    use chrono::TimeZone;

    fn trail() -> (tempfile::TempDir, AuditTrail, Arc<FixedClock>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(RecordStore::with_base_dir(dir.path(), &[1u8; 32]).unwrap());
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        ));
        let trail = AuditTrail::new(store, clock.clone());
        (dir, trail, clock)
    }

    #[test]
    fn test_automated_event_has_no_operator() {
        let (_dir, trail, _clock) = trail();

        let event = trail
            .record("TDN-2024-AAAAAA", AuditAction::Receipt, Some("intake"))
            .unwrap();

        assert!(event.automated);
        assert!(event.performed_by.is_none());
        assert_eq!(event.action, AuditAction::Receipt);
    }

    #[test]
    fn test_operator_event_is_not_automated() {
        let (_dir, trail, _clock) = trail();

        let event = trail
            .record_by("TDN-2024-AAAAAA", AuditAction::ManualNote, "op-7", None)
            .unwrap();

        assert!(!event.automated);
        assert_eq!(event.performed_by.as_deref(), Some("op-7"));
    }

    #[test]
    fn test_trail_for_notice_filters_and_orders() {
        let (_dir, trail, clock) = trail();

        trail.record("TDN-2024-AAAAAA", AuditAction::Receipt, None).unwrap();
        trail.record("TDN-2024-BBBBBB", AuditAction::Receipt, None).unwrap();
        clock.advance(chrono::Duration::hours(1));
        trail.record("TDN-2024-AAAAAA", AuditAction::Triage, None).unwrap();

        let events = trail.for_notice("TDN-2024-AAAAAA").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, AuditAction::Receipt);
        assert_eq!(events[1].action, AuditAction::Triage);
    }

    #[test]
    fn test_trail_spans_dates() {
        let (_dir, trail, clock) = trail();

        trail.record("TDN-2024-CCCCCC", AuditAction::Receipt, None).unwrap();
        clock.advance(chrono::Duration::days(2));
        trail.record("TDN-2024-CCCCCC", AuditAction::Resolution, None).unwrap();

        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let ranged = trail.read_range(start, end).unwrap();
        assert_eq!(ranged.len(), 2);

        let full = trail.for_notice("TDN-2024-CCCCCC").unwrap();
        assert_eq!(full.len(), 2);
        assert_eq!(full[1].action, AuditAction::Resolution);
    }

    #[test]
    fn test_taxonomy_has_sixteen_actions() {
        let actions = [
            AuditAction::Receipt,
            AuditAction::Validation,
            AuditAction::FingerprintScan,
            AuditAction::Triage,
            AuditAction::ContentRemoved,
            AuditAction::ContentDisabled,
            AuditAction::GeoBlocked,
            AuditAction::NoticeForwarded,
            AuditAction::ClaimantNotified,
            AuditAction::CounterNoticeReceived,
            AuditAction::ContentReinstated,
            AuditAction::Resolution,
            AuditAction::AppealFiled,
            AuditAction::AppealResolved,
            AuditAction::ManualNote,
            AuditAction::NoActionRequired,
        ];
        let names: std::collections::HashSet<_> = actions.iter().map(|a| a.name()).collect();
        assert_eq!(names.len(), 16);
    }
}
