//! Notice-and-action compliance engine.
//!
//! This module owns the full takedown lifecycle:
//!
//! - **Intake**: statutory validation, risk assessment, SLA assignment
//! - **Lifecycle**: guarded state transitions over a closed status graph
//! - **Counter-notices**: reinstatement appeals with business-day deadlines
//! - **Audit**: append-only evidentiary trail for every action
//! - **Enforcement**: repeat-infringer strike accounting
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use takedown_protocol::compliance::{ComplianceEngine, EnginePolicy, NoticeSubmission};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = ComplianceEngine::new(EnginePolicy::default())?;
//!
//! let receipt = engine
//!     .submit_notice(NoticeSubmission {
//!         content_ref: "video-991".into(),
//!         jurisdiction: "US".into(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let view = engine.notice_status(&receipt.ticket_id)?;
//! println!("{} is {}", view.ticket_id, view.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    ComplianceEngine                      │
//! │        (facade for intake and lifecycle operations)      │
//! ├──────────────────────────────────────────────────────────┤
//! │  statutory   sla      lifecycle     counter_notice       │
//! │  (validate)  (math)   (transition   (deadlines,          │
//! │                        table)        eligibility)        │
//! │                                                          │
//! │  risk (fail-open)   fingerprint (scan + auto-action)     │
//! │  repeat_infringer (strikes)   audit (append-only)        │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │     RecordStore (HMAC-signed persistence)      │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod audit;
pub mod clock;
pub mod content_store;
pub mod counter_notice;
pub mod fingerprint;
pub mod lifecycle;
pub mod notify;
pub mod repeat_infringer;
pub mod risk;
pub mod sla;
pub mod statutory;
pub mod storage;
pub mod types;

// Re-exports for convenience
pub use audit::{AuditAction, AuditEvent, AuditTrail};
pub use clock::{Clock, FixedClock, SystemClock};
pub use content_store::{ContentStore, ContentStoreError, LoggingContentStore};
pub use counter_notice::DEFAULT_BUSINESS_DAYS;
pub use fingerprint::{
    FingerprintScanner, ScanError, ScanOutcome, ScanService, StubScanner,
    DEFAULT_AUTO_ACTION_THRESHOLD,
};
pub use notify::{LoggingNotifier, NotificationChannel, NotificationRecipient};
pub use repeat_infringer::{RepeatInfringerTracker, DEFAULT_STRIKE_THRESHOLD};
pub use risk::{
    AssessmentError, RiskAssessment, RiskAssessmentAdapter, RiskAssessor, RiskLevel,
    UnavailableAssessor,
};
pub use storage::{records_dir, RecordSigner, RecordStore};
pub use types::{
    ComplianceError, ContentType, CounterNotice, CounterNoticeSubmission, FingerprintScanRecord,
    Jurisdiction, LegalFramework, NoticeStatus, NoticeStatusView, NoticeSubmission, Operator,
    OperatorRole, Priority, RepeatInfringerRecord, ResolutionOutcome, ScanStatus,
    StatutoryElement, SubmissionReceipt, TakedownNotice, TrustLevel, ValidationOutcome,
};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;

use storage::{SUBDIR_COUNTER_NOTICES, SUBDIR_NOTICES};

/// Policy knobs for the engine, normally sourced from the config file
#[derive(Debug, Clone)]
pub struct EnginePolicy {
    /// Strikes at which an account becomes termination-eligible
    pub strike_threshold: u32,
    /// Fingerprint confidence at or above which action is automatic
    pub auto_action_threshold: f64,
    /// Bound on the external risk-assessment call
    pub assessment_timeout: Duration,
    /// Counter-notice objection window, in business days
    pub counter_notice_business_days: u32,
    /// Attempts to allocate a unique ticket id before giving up
    pub ticket_id_max_attempts: u32,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            strike_threshold: repeat_infringer::DEFAULT_STRIKE_THRESHOLD,
            auto_action_threshold: fingerprint::DEFAULT_AUTO_ACTION_THRESHOLD,
            assessment_timeout: Duration::from_secs(5),
            counter_notice_business_days: counter_notice::DEFAULT_BUSINESS_DAYS,
            ticket_id_max_attempts: 16,
        }
    }
}

/// Content-level action an operator (or the auto-block path) takes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentAction {
    /// Permanent removal
    Remove,
    /// Disable access, keep the object
    Disable,
    /// Block access from the named regions
    GeoBlock(Vec<String>),
}

impl ContentAction {
    fn audit_action(&self) -> AuditAction {
        match self {
            ContentAction::Remove => AuditAction::ContentRemoved,
            ContentAction::Disable => AuditAction::ContentDisabled,
            ContentAction::GeoBlock(_) => AuditAction::GeoBlocked,
        }
    }
}

/// A notice currently past its SLA deadline
#[derive(Debug, Clone, serde::Serialize)]
pub struct OverdueNotice {
    pub ticket_id: String,
    pub status: NoticeStatus,
    pub priority: Priority,
    pub jurisdiction: Jurisdiction,
    pub sla_deadline: chrono::DateTime<chrono::Utc>,
    pub hours_overdue: i64,
}

/// Whether a jurisdiction uses notice-and-notice forwarding
///
/// Canada's regime obliges the platform to forward the notice to the alleged
/// infringer rather than unilaterally remove content; everywhere else takes
/// direct action.
pub fn requires_canadian_forwarding(jurisdiction: Jurisdiction) -> bool {
    jurisdiction == Jurisdiction::Ca
}

/// Facade for all compliance operations
///
/// Operations on distinct notices proceed fully in parallel; within one
/// notice, transitions are serialized through a per-ticket lock plus a
/// revision check at store time. All durable state lives in the record
/// store, so engines on separate workers share nothing but the filesystem.
pub struct ComplianceEngine {
    store: Arc<RecordStore>,
    clock: Arc<dyn Clock>,
    audit: AuditTrail,
    risk: RiskAssessmentAdapter,
    scans: Option<ScanService>,
    strikes: RepeatInfringerTracker,
    content: Arc<dyn ContentStore>,
    notifier: Arc<dyn NotificationChannel>,
    policy: EnginePolicy,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ComplianceEngine {
    /// Engine rooted at the default records directory with the persistent key
    pub fn new(policy: EnginePolicy) -> Result<Self, ComplianceError> {
        let store = Arc::new(RecordStore::new_with_default_key()?);
        Ok(Self::with_parts(store, Arc::new(SystemClock), policy))
    }

    /// Engine over explicit storage and clock (tests, embedded use)
    pub fn with_parts(
        store: Arc<RecordStore>,
        clock: Arc<dyn Clock>,
        policy: EnginePolicy,
    ) -> Self {
        let audit = AuditTrail::new(store.clone(), clock.clone());
        let strikes = RepeatInfringerTracker::new(store.clone(), policy.strike_threshold);
        let risk = RiskAssessmentAdapter::new(
            Arc::new(UnavailableAssessor),
            policy.assessment_timeout,
        );

        Self {
            store,
            clock,
            audit,
            risk,
            scans: None,
            strikes,
            content: Arc::new(LoggingContentStore),
            notifier: Arc::new(LoggingNotifier),
            policy,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Wire a live risk-assessment capability
    pub fn with_assessor(mut self, assessor: Arc<dyn RiskAssessor>) -> Self {
        self.risk = RiskAssessmentAdapter::new(assessor, self.policy.assessment_timeout);
        self
    }

    /// Wire a fingerprint-scanning capability; intake then scans every notice
    pub fn with_scanner(mut self, scanner: Arc<dyn FingerprintScanner>) -> Self {
        self.scans = Some(ScanService::new(
            scanner,
            self.store.clone(),
            self.clock.clone(),
            self.policy.auto_action_threshold,
        ));
        self
    }

    /// Wire a content store
    pub fn with_content_store(mut self, content: Arc<dyn ContentStore>) -> Self {
        self.content = content;
        self
    }

    /// Wire a notification channel
    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationChannel>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Read access to the audit trail
    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    /// Read access to the strike ledger
    pub fn strikes(&self) -> &RepeatInfringerTracker {
        &self.strikes
    }

    // =========================================================================
    // Intake
    // =========================================================================

    /// Accept a takedown notice and issue a ticket
    ///
    /// Always succeeds in issuing a ticket: statutory incompleteness becomes
    /// remediation flags, and a risk-assessment outage falls back to the
    /// fail-open default. The SLA deadline is fixed here, once, from
    /// jurisdiction and final priority.
    pub async fn submit_notice(
        &self,
        submission: NoticeSubmission,
    ) -> Result<SubmissionReceipt, ComplianceError> {
        let jurisdiction = Jurisdiction::from_code(&submission.jurisdiction);
        let framework = statutory::default_framework(jurisdiction);
        let validation = statutory::validate(&submission, framework);

        let assessment = self
            .risk
            .assess_or_default(&submission.infringement_description)
            .await;
        let priority = sla::effective_priority(assessment.suggested_priority, submission.trust_level);

        let now = self.clock.now();
        let sla_deadline = sla::sla_deadline(jurisdiction, priority, now);

        let notice = self.persist_new_notice(
            &submission,
            jurisdiction,
            framework,
            priority,
            sla_deadline,
            validation.clone(),
            now,
        )?;
        let ticket_id = notice.ticket_id.clone();

        self.audit.record(
            &ticket_id,
            AuditAction::Receipt,
            Some(&format!(
                "jurisdiction={} framework={} priority={} risk={}",
                jurisdiction, framework, priority, assessment.risk_level
            )),
        )?;

        let validation_details = if validation.valid {
            "all statutory elements present".to_string()
        } else {
            let missing: Vec<String> =
                validation.missing.iter().map(|m| m.to_string()).collect();
            format!("missing: {}", missing.join(", "))
        };
        self.audit
            .record(&ticket_id, AuditAction::Validation, Some(&validation_details))?;

        if self.scans.is_some() {
            self.scan_and_maybe_auto_action(&notice)?;
        }

        self.notifier.notify(
            NotificationRecipient::Claimant,
            &ticket_id,
            &format!("Notice received; deadline {}", sla_deadline.to_rfc3339()),
        );

        // Re-read: the auto-action path may have advanced the status.
        let notice = self.load_notice(&ticket_id)?;
        Ok(SubmissionReceipt {
            ticket_id,
            status: notice.status,
            priority: notice.priority,
            legal_framework: notice.legal_framework,
            sla_deadline: notice.sla_deadline,
            validation,
        })
    }

    /// Allocate a unique ticket id and write the initial record
    ///
    /// The store's exclusive-create is the authoritative uniqueness check;
    /// a collision regenerates the id, bounded by policy.
    fn persist_new_notice(
        &self,
        submission: &NoticeSubmission,
        jurisdiction: Jurisdiction,
        framework: LegalFramework,
        priority: Priority,
        sla_deadline: chrono::DateTime<chrono::Utc>,
        validation: ValidationOutcome,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<TakedownNotice, ComplianceError> {
        use chrono::Datelike;

        for _attempt in 0..self.policy.ticket_id_max_attempts {
            let ticket_id = generate_ticket_id(now.year());
            let notice = TakedownNotice {
                ticket_id: ticket_id.clone(),
                content_ref: submission.content_ref.clone(),
                content_type: ContentType::from_label(&submission.content_type),
                artist_id: submission.artist_id.clone(),
                claimant_name: submission.claimant_name.clone(),
                claimant_address: submission.claimant_address.clone(),
                claimant_email: submission.claimant_email.clone(),
                claimant_organization: submission.claimant_organization.clone(),
                copyrighted_work: submission.copyrighted_work.clone(),
                infringement_description: submission.infringement_description.clone(),
                good_faith_attestation: submission.good_faith_attestation,
                accuracy_attestation: submission.accuracy_attestation,
                perjury_attestation: submission.perjury_attestation,
                signature: submission.signature.clone(),
                jurisdiction,
                legal_framework: framework,
                priority,
                status: NoticeStatus::Submitted,
                sla_deadline,
                counter_notice_deadline: None,
                trust_level: submission.trust_level,
                validation: validation.clone(),
                revision: 0,
                created_at: now,
                resolved_at: None,
            };

            match self
                .store
                .store_new(SUBDIR_NOTICES, &notice_filename(&ticket_id), &notice)
            {
                Ok(_) => return Ok(notice),
                Err(ComplianceError::Storage(e))
                    if e.kind() == std::io::ErrorKind::AlreadyExists =>
                {
                    tracing::warn!("Ticket id collision on {}, regenerating", ticket_id);
                }
                Err(e) => return Err(e),
            }
        }

        Err(ComplianceError::TicketIdExhausted(
            self.policy.ticket_id_max_attempts,
        ))
    }

    /// Scan intake content; a confident match acts without human triage
    fn scan_and_maybe_auto_action(
        &self,
        notice: &TakedownNotice,
    ) -> Result<(), ComplianceError> {
        let Some(scans) = &self.scans else {
            return Ok(());
        };

        let record = scans.run_scan(&notice.content_ref, notice.content_type)?;
        self.audit.record(
            &notice.ticket_id,
            AuditAction::FingerprintScan,
            Some(&format!(
                "provider={} status={} match={} confidence={:.2}",
                record.scan_provider, record.scan_status, record.match_found,
                record.confidence_score
            )),
        )?;

        match record.scan_status {
            ScanStatus::Failed => {
                // Route to manual review; intake continues regardless.
                self.transition_with_audit(
                    &notice.ticket_id,
                    NoticeStatus::Triage,
                    AuditAction::Triage,
                    None,
                    Some("scan failed, queued for manual review"),
                )?;
            }
            ScanStatus::Completed | ScanStatus::Pending if record.auto_action_taken => {
                self.transition_with_audit(
                    &notice.ticket_id,
                    NoticeStatus::Triage,
                    AuditAction::Triage,
                    None,
                    Some("automatic triage on fingerprint match"),
                )?;

                if requires_canadian_forwarding(notice.jurisdiction) {
                    self.forward_notice_inner(&notice.ticket_id, None)?;
                } else {
                    match self.content.disable(&notice.content_ref, notice.content_type) {
                        Ok(()) => {
                            self.transition_with_audit(
                                &notice.ticket_id,
                                NoticeStatus::ActionTaken,
                                AuditAction::ContentDisabled,
                                None,
                                Some(&format!(
                                    "auto-blocked at confidence {:.2}",
                                    record.confidence_score
                                )),
                            )?;
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Auto-block of {} failed, leaving in triage: {}",
                                notice.content_ref,
                                e
                            );
                        }
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current standing of a notice; overdue is computed at read time
    pub fn notice_status(&self, ticket_id: &str) -> Result<NoticeStatusView, ComplianceError> {
        let notice = self.load_notice(ticket_id)?;
        let now = self.clock.now();

        Ok(NoticeStatusView {
            ticket_id: notice.ticket_id.clone(),
            status: notice.status,
            priority: notice.priority,
            sla_deadline: notice.sla_deadline,
            counter_notice_deadline: notice.counter_notice_deadline,
            overdue: sla::is_overdue(Some(notice.sla_deadline), notice.status, now),
        })
    }

    /// Full notice record
    pub fn notice(&self, ticket_id: &str) -> Result<TakedownNotice, ComplianceError> {
        self.load_notice(ticket_id)
    }

    /// Counter-notice filed against a notice, if any
    pub fn counter_notice(&self, ticket_id: &str) -> Result<Option<CounterNotice>, ComplianceError> {
        let filename = counter_filename(ticket_id);
        if self.store.exists(SUBDIR_COUNTER_NOTICES, &filename) {
            Ok(Some(self.store.load(SUBDIR_COUNTER_NOTICES, &filename)?))
        } else {
            Ok(None)
        }
    }

    /// Evidentiary trail for a notice
    pub fn audit_trail(&self, ticket_id: &str) -> Result<Vec<AuditEvent>, ComplianceError> {
        // Existence check first so an unknown ticket is an error, not an
        // empty trail.
        self.load_notice(ticket_id)?;
        self.audit.for_notice(ticket_id)
    }

    /// All notices currently past their SLA deadline, most overdue first
    pub fn list_overdue(&self) -> Result<Vec<OverdueNotice>, ComplianceError> {
        let now = self.clock.now();
        let notices: Vec<TakedownNotice> = self.store.load_all(SUBDIR_NOTICES, "notice")?;

        let mut overdue: Vec<OverdueNotice> = notices
            .into_iter()
            .filter(|n| sla::is_overdue(Some(n.sla_deadline), n.status, now))
            .map(|n| OverdueNotice {
                hours_overdue: (now - n.sla_deadline).num_hours(),
                ticket_id: n.ticket_id,
                status: n.status,
                priority: n.priority,
                jurisdiction: n.jurisdiction,
                sla_deadline: n.sla_deadline,
            })
            .collect();

        overdue.sort_by(|a, b| b.hours_overdue.cmp(&a.hours_overdue));
        Ok(overdue)
    }

    // =========================================================================
    // Lifecycle operations
    // =========================================================================

    /// Move a submitted notice into triage
    pub fn begin_triage(
        &self,
        ticket_id: &str,
        operator: Option<&Operator>,
    ) -> Result<(), ComplianceError> {
        self.transition_with_audit(
            ticket_id,
            NoticeStatus::Triage,
            AuditAction::Triage,
            operator.map(|o| o.id.as_str()),
            None,
        )
    }

    /// Act on the content of a notice under triage
    ///
    /// Canadian notices are forwarded instead (notice-and-notice): the
    /// content stays up and the notice moves to `notified`.
    pub fn take_action(
        &self,
        ticket_id: &str,
        action: ContentAction,
        operator: Option<&Operator>,
    ) -> Result<(), ComplianceError> {
        let notice = self.load_notice(ticket_id)?;

        if requires_canadian_forwarding(notice.jurisdiction) {
            return self.forward_notice_inner(ticket_id, operator.map(|o| o.id.as_str()));
        }

        // Check the transition up front so a rejected call never touches
        // the content store.
        lifecycle::guard_transition(notice.status, NoticeStatus::ActionTaken)?;

        match &action {
            ContentAction::Remove => self.content.remove(&notice.content_ref, notice.content_type),
            ContentAction::Disable => {
                self.content.disable(&notice.content_ref, notice.content_type)
            }
            ContentAction::GeoBlock(regions) => {
                self.content
                    .geo_block(&notice.content_ref, notice.content_type, regions)
            }
        }
        .map_err(|e| ComplianceError::ContentStore(e.to_string()))?;

        self.transition_with_audit(
            ticket_id,
            NoticeStatus::ActionTaken,
            action.audit_action(),
            operator.map(|o| o.id.as_str()),
            None,
        )?;

        self.notifier.notify(
            NotificationRecipient::ContentOwner,
            ticket_id,
            "Content actioned under a takedown notice; a counter-notice may be filed",
        );
        Ok(())
    }

    /// Forward a notice to the alleged infringer (notice-and-notice regime)
    fn forward_notice_inner(
        &self,
        ticket_id: &str,
        operator_id: Option<&str>,
    ) -> Result<(), ComplianceError> {
        self.transition_with_audit(
            ticket_id,
            NoticeStatus::Notified,
            AuditAction::NoticeForwarded,
            operator_id,
            Some("notice-and-notice forwarding, content not removed"),
        )?;

        self.notifier.notify(
            NotificationRecipient::ContentOwner,
            ticket_id,
            "A copyright notice naming your content has been forwarded to you",
        );
        Ok(())
    }

    /// File a counter-notice against a notice
    ///
    /// Accepted only while the notice sits in an eligible state; acceptance
    /// stamps the claimant's objection deadline and moves the notice to
    /// `counter_notice_received`.
    pub fn submit_counter_notice(
        &self,
        ticket_id: &str,
        submission: CounterNoticeSubmission,
    ) -> Result<CounterNotice, ComplianceError> {
        let lock = self.lock_for(ticket_id);
        let _guard = lock.lock();

        let mut notice = self.load_notice(ticket_id)?;
        if !counter_notice::can_submit(notice.status) {
            return Err(ComplianceError::CounterNoticeRejected { status: notice.status });
        }
        // Guard the transition before any write so rejection stays
        // side-effect free.
        lifecycle::guard_transition(notice.status, NoticeStatus::CounterNoticeReceived)?;

        let now = self.clock.now();
        let deadline =
            counter_notice::counter_notice_deadline(now, self.policy.counter_notice_business_days);
        let validation = counter_notice::validate(&submission);

        let counter = CounterNotice {
            notice_id: ticket_id.to_string(),
            submitted_at: now,
            deadline,
            respondent_name: submission.respondent_name,
            respondent_address: submission.respondent_address,
            respondent_email: submission.respondent_email,
            good_faith_statement: submission.good_faith_statement,
            consent_to_jurisdiction: submission.consent_to_jurisdiction,
            signature: submission.signature,
            validation,
        };
        self.store
            .store_new(SUBDIR_COUNTER_NOTICES, &counter_filename(ticket_id), &counter)?;

        let expected = notice.revision;
        notice.status = NoticeStatus::CounterNoticeReceived;
        notice.counter_notice_deadline = Some(deadline);
        notice.revision += 1;
        self.store_notice_guarded(&notice, expected)?;

        self.audit.record(
            ticket_id,
            AuditAction::CounterNoticeReceived,
            Some(&format!("objection deadline {}", deadline.to_rfc3339())),
        )?;

        self.notifier.notify(
            NotificationRecipient::Claimant,
            ticket_id,
            "A counter-notice has been filed against your takedown request",
        );
        Ok(counter)
    }

    /// Resolve a notice (admin only)
    ///
    /// Upheld resolutions feed the repeat-infringer ledger; reversed ones
    /// reinstate the content. The counter-notice window expiring on its own
    /// never resolves a notice: this explicit call is always required.
    pub fn admin_resolve(
        &self,
        ticket_id: &str,
        outcome: ResolutionOutcome,
        operator: &Operator,
    ) -> Result<TakedownNotice, ComplianceError> {
        if operator.role != OperatorRole::Admin {
            return Err(ComplianceError::AuthorizationDenied);
        }

        let lock = self.lock_for(ticket_id);
        let _guard = lock.lock();

        let mut notice = self.load_notice(ticket_id)?;
        if !counter_notice::can_resolve(notice.status) {
            return Err(ComplianceError::TransitionRejected {
                from: notice.status,
                to: outcome.status(),
            });
        }
        lifecycle::guard_transition(notice.status, outcome.status())?;

        let now = self.clock.now();
        let expected = notice.revision;
        notice.status = outcome.status();
        notice.resolved_at = Some(now);
        notice.revision += 1;
        self.store_notice_guarded(&notice, expected)?;

        let mut details = format!("outcome={}", match outcome {
            ResolutionOutcome::Upheld => "upheld",
            ResolutionOutcome::Reversed => "reversed",
        });

        if outcome == ResolutionOutcome::Upheld {
            let record = self
                .strikes
                .register_strike(&notice.artist_id, ticket_id, now)?;
            details.push_str(&format!(
                "; strike {} for {}{}",
                record.strike_count,
                notice.artist_id,
                if record.termination_eligible {
                    ", termination-eligible"
                } else {
                    ""
                }
            ));
        }

        self.audit
            .record_by(ticket_id, AuditAction::Resolution, &operator.id, Some(&details))?;

        if outcome == ResolutionOutcome::Reversed {
            match self.content.reinstate(&notice.content_ref, notice.content_type) {
                Ok(()) => {
                    self.audit.record(
                        ticket_id,
                        AuditAction::ContentReinstated,
                        Some("reinstated after reversal"),
                    )?;
                }
                Err(e) => {
                    tracing::warn!("Reinstatement of {} failed: {}", notice.content_ref, e);
                }
            }
        }

        self.notifier.notify(
            NotificationRecipient::Claimant,
            ticket_id,
            &format!("Notice resolved: {}", details),
        );
        Ok(notice)
    }

    /// Withdraw a notice at the claimant's request
    pub fn withdraw_notice(
        &self,
        ticket_id: &str,
        operator: Option<&Operator>,
    ) -> Result<(), ComplianceError> {
        self.transition_with_audit(
            ticket_id,
            NoticeStatus::Withdrawn,
            AuditAction::Resolution,
            operator.map(|o| o.id.as_str()),
            Some("withdrawn by claimant"),
        )
    }

    /// Escalate a notice's priority and recompute its SLA deadline
    ///
    /// The only path that may touch `sla_deadline` after intake; admin-only
    /// and always audited.
    pub fn escalate_priority(
        &self,
        ticket_id: &str,
        priority: Priority,
        operator: &Operator,
    ) -> Result<TakedownNotice, ComplianceError> {
        if operator.role != OperatorRole::Admin {
            return Err(ComplianceError::AuthorizationDenied);
        }

        let lock = self.lock_for(ticket_id);
        let _guard = lock.lock();

        let mut notice = self.load_notice(ticket_id)?;
        if notice.status.is_terminal() {
            return Err(ComplianceError::TransitionRejected {
                from: notice.status,
                to: notice.status,
            });
        }

        let now = self.clock.now();
        let expected = notice.revision;
        let old_deadline = notice.sla_deadline;
        notice.priority = priority;
        notice.sla_deadline = sla::sla_deadline(notice.jurisdiction, priority, now);
        notice.revision += 1;
        self.store_notice_guarded(&notice, expected)?;

        self.audit.record_by(
            ticket_id,
            AuditAction::Triage,
            &operator.id,
            Some(&format!(
                "escalated to {}; deadline {} -> {}",
                priority,
                old_deadline.to_rfc3339(),
                notice.sla_deadline.to_rfc3339()
            )),
        )?;
        Ok(notice)
    }

    /// Attach a manual operator note to a notice's trail
    pub fn record_manual_note(
        &self,
        ticket_id: &str,
        operator: &Operator,
        note: &str,
    ) -> Result<AuditEvent, ComplianceError> {
        self.load_notice(ticket_id)?;
        self.audit
            .record_by(ticket_id, AuditAction::ManualNote, &operator.id, Some(note))
    }

    /// Close a notice that needed no action
    pub fn dismiss_at_triage(
        &self,
        ticket_id: &str,
        operator: &Operator,
    ) -> Result<(), ComplianceError> {
        if operator.role != OperatorRole::Admin {
            return Err(ComplianceError::AuthorizationDenied);
        }
        self.transition_with_audit(
            ticket_id,
            NoticeStatus::ResolvedReversed,
            AuditAction::NoActionRequired,
            Some(&operator.id),
            Some("dismissed at triage"),
        )
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock_for(&self, ticket_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks
            .entry(ticket_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn load_notice(&self, ticket_id: &str) -> Result<TakedownNotice, ComplianceError> {
        let filename = notice_filename(ticket_id);
        if !self.store.exists(SUBDIR_NOTICES, &filename) {
            return Err(ComplianceError::NotFound(ticket_id.to_string()));
        }
        self.store.load(SUBDIR_NOTICES, &filename)
    }

    /// Store an updated notice after re-checking the on-disk revision
    fn store_notice_guarded(
        &self,
        notice: &TakedownNotice,
        expected_revision: u64,
    ) -> Result<(), ComplianceError> {
        let current: TakedownNotice = self
            .store
            .load(SUBDIR_NOTICES, &notice_filename(&notice.ticket_id))?;
        if current.revision != expected_revision {
            return Err(ComplianceError::RevisionConflict {
                expected: expected_revision,
                found: current.revision,
            });
        }
        self.store
            .store(SUBDIR_NOTICES, &notice_filename(&notice.ticket_id), notice)?;
        Ok(())
    }

    /// Guarded transition plus its audit event
    ///
    /// Guard failure rejects before any write, so the record and the trail
    /// never diverge.
    fn transition_with_audit(
        &self,
        ticket_id: &str,
        to: NoticeStatus,
        action: AuditAction,
        operator_id: Option<&str>,
        details: Option<&str>,
    ) -> Result<(), ComplianceError> {
        let lock = self.lock_for(ticket_id);
        let _guard = lock.lock();

        let mut notice = self.load_notice(ticket_id)?;
        lifecycle::guard_transition(notice.status, to)?;

        let expected = notice.revision;
        notice.status = to;
        if to.is_terminal() {
            notice.resolved_at = Some(self.clock.now());
        }
        notice.revision += 1;
        self.store_notice_guarded(&notice, expected)?;

        match operator_id {
            Some(id) => self.audit.record_by(ticket_id, action, id, details)?,
            None => self.audit.record(ticket_id, action, details)?,
        };
        Ok(())
    }
}

/// Generate a ticket id of the form `TDN-YYYY-XXXXXX`
///
/// Collisions are astronomically rare but possible; the store's uniqueness
/// constraint is authoritative and callers retry on conflict.
pub fn generate_ticket_id(year: i32) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();

    let suffix: String = (0..6)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("TDN-{}-{}", year, suffix)
}

fn notice_filename(ticket_id: &str) -> String {
    format!("{}.notice", ticket_id)
}

fn counter_filename(ticket_id: &str) -> String {
    format!("{}.counter", ticket_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};

    fn t0() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn engine() -> (tempfile::TempDir, ComplianceEngine, Arc<FixedClock>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(RecordStore::with_base_dir(dir.path(), &[9u8; 32]).unwrap());
        let clock = Arc::new(FixedClock::new(t0()));
        let engine = ComplianceEngine::with_parts(store, clock.clone(), EnginePolicy::default());
        (dir, engine, clock)
    }

    fn us_submission() -> NoticeSubmission {
        NoticeSubmission {
            content_ref: "video-991".into(),
            content_type: "video".into(),
            artist_id: "artist-17".into(),
            claimant_name: "Acme Rights Management".into(),
            claimant_address: "1 Infinite Loop, Cupertino CA".into(),
            claimant_email: "legal@acme.example".into(),
            claimant_organization: None,
            copyrighted_work: "Song of the Quarter".into(),
            infringement_description: "Full track uploaded without license".into(),
            good_faith_attestation: true,
            accuracy_attestation: true,
            perjury_attestation: true,
            signature: "/s/ Jane Counsel".into(),
            jurisdiction: "US".into(),
            trust_level: None,
        }
    }

    struct LowballAssessor;

    #[async_trait]
    impl RiskAssessor for LowballAssessor {
        async fn assess(&self, _text: &str) -> Result<RiskAssessment, AssessmentError> {
            Ok(RiskAssessment {
                is_valid: true,
                risk_level: RiskLevel::Low,
                suggested_priority: Priority::Low,
                notes: "weak match".into(),
            })
        }
    }

    #[tokio::test]
    async fn test_incomplete_submission_still_issues_ticket() {
        let (_dir, engine, _clock) = engine();

        let receipt = engine.submit_notice(NoticeSubmission::default()).await.unwrap();

        assert!(receipt.ticket_id.starts_with("TDN-2024-"));
        assert!(!receipt.validation.valid);
        // Default jurisdiction code is empty, so the catch-all framework
        // applies and only the core elements are flagged.
        assert_eq!(receipt.legal_framework, LegalFramework::WipoGlobal);
        assert_eq!(receipt.status, NoticeStatus::Submitted);
    }

    #[tokio::test]
    async fn test_empty_us_submission_flags_nine_elements() {
        let (_dir, engine, _clock) = engine();

        let submission = NoticeSubmission {
            jurisdiction: "US".into(),
            ..Default::default()
        };
        let receipt = engine.submit_notice(submission).await.unwrap();

        assert_eq!(receipt.legal_framework, LegalFramework::Dmca512);
        assert_eq!(receipt.validation.missing.len(), 9);
    }

    #[tokio::test]
    async fn test_ticket_ids_are_unique_and_well_formed() {
        let (_dir, engine, _clock) = engine();
        let pattern = regex::Regex::new(r"^TDN-\d{4}-[A-Z0-9]{6}$").unwrap();

        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            let receipt = engine.submit_notice(us_submission()).await.unwrap();
            assert!(pattern.is_match(&receipt.ticket_id), "{}", receipt.ticket_id);
            assert!(seen.insert(receipt.ticket_id));
        }
    }

    #[tokio::test]
    async fn test_fail_open_intake_assigns_normal_priority() {
        let (_dir, engine, _clock) = engine();

        // Default wiring has no reachable assessor.
        let receipt = engine.submit_notice(us_submission()).await.unwrap();
        assert_eq!(receipt.priority, Priority::Normal);
        assert_eq!(receipt.sla_deadline, t0() + Duration::hours(72));
    }

    #[tokio::test]
    async fn test_premium_trust_overrides_low_suggestion_to_us_24h() {
        let (_dir, engine, _clock) = engine();
        let engine = engine.with_assessor(Arc::new(LowballAssessor));

        let submission = NoticeSubmission {
            trust_level: Some(TrustLevel::Premium),
            ..us_submission()
        };
        let receipt = engine.submit_notice(submission).await.unwrap();

        assert_eq!(receipt.priority, Priority::Urgent);
        assert_eq!(receipt.sla_deadline, t0() + Duration::hours(24));
    }

    #[tokio::test]
    async fn test_eu_urgent_resolved_late_is_not_overdue() {
        let (_dir, engine, clock) = engine();

        let submission = NoticeSubmission {
            jurisdiction: "EU".into(),
            trust_level: Some(TrustLevel::Premium),
            ..us_submission()
        };
        let receipt = engine.submit_notice(submission).await.unwrap();
        assert_eq!(receipt.sla_deadline, t0() + Duration::hours(12));

        let ticket = &receipt.ticket_id;
        engine.begin_triage(ticket, None).unwrap();
        engine.take_action(ticket, ContentAction::Disable, None).unwrap();

        clock.advance(Duration::hours(13));
        assert!(engine.notice_status(ticket).unwrap().overdue);

        let admin = Operator::admin("op-1");
        engine.admin_resolve(ticket, ResolutionOutcome::Upheld, &admin).unwrap();
        assert!(!engine.notice_status(ticket).unwrap().overdue);
    }

    #[tokio::test]
    async fn test_counter_notice_accepted_from_notified() {
        let (_dir, engine, _clock) = engine();

        let receipt = engine.submit_notice(us_submission()).await.unwrap();
        let ticket = &receipt.ticket_id;
        engine.begin_triage(ticket, None).unwrap();
        engine.take_action(ticket, ContentAction::Disable, None).unwrap();
        engine
            .transition_with_audit(
                ticket,
                NoticeStatus::Notified,
                AuditAction::ClaimantNotified,
                None,
                None,
            )
            .unwrap();

        let counter = engine
            .submit_counter_notice(
                ticket,
                CounterNoticeSubmission {
                    respondent_name: "Sam Uploader".into(),
                    respondent_address: "12 High St".into(),
                    respondent_email: "sam@example.net".into(),
                    good_faith_statement: true,
                    consent_to_jurisdiction: true,
                    signature: "/s/ Sam".into(),
                },
            )
            .unwrap();

        assert_eq!(counter.notice_id, *ticket);
        let view = engine.notice_status(ticket).unwrap();
        assert_eq!(view.status, NoticeStatus::CounterNoticeReceived);
        assert_eq!(view.counter_notice_deadline, Some(counter.deadline));
        assert!(engine.counter_notice(ticket).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_counter_notice_rejected_before_action() {
        let (_dir, engine, _clock) = engine();

        let receipt = engine.submit_notice(us_submission()).await.unwrap();
        let err = engine
            .submit_counter_notice(&receipt.ticket_id, CounterNoticeSubmission::default())
            .unwrap_err();

        assert!(matches!(
            err,
            ComplianceError::CounterNoticeRejected { status: NoticeStatus::Submitted }
        ));
        // Rejection must leave no trace: no counter-notice record, no event.
        assert!(engine.counter_notice(&receipt.ticket_id).unwrap().is_none());
        let trail = engine.audit_trail(&receipt.ticket_id).unwrap();
        assert!(trail
            .iter()
            .all(|e| e.action != AuditAction::CounterNoticeReceived));
    }

    #[tokio::test]
    async fn test_admin_resolution_requires_admin_role() {
        let (_dir, engine, _clock) = engine();

        let receipt = engine.submit_notice(us_submission()).await.unwrap();
        let ticket = &receipt.ticket_id;
        engine.begin_triage(ticket, None).unwrap();
        engine.take_action(ticket, ContentAction::Disable, None).unwrap();

        let agent = Operator::agent("op-2");
        let err = engine
            .admin_resolve(ticket, ResolutionOutcome::Upheld, &agent)
            .unwrap_err();
        assert!(matches!(err, ComplianceError::AuthorizationDenied));
    }

    #[tokio::test]
    async fn test_double_resolution_is_rejected() {
        let (_dir, engine, _clock) = engine();

        let receipt = engine.submit_notice(us_submission()).await.unwrap();
        let ticket = &receipt.ticket_id;
        engine.begin_triage(ticket, None).unwrap();
        engine.take_action(ticket, ContentAction::Disable, None).unwrap();

        let admin = Operator::admin("op-1");
        engine.admin_resolve(ticket, ResolutionOutcome::Upheld, &admin).unwrap();
        let err = engine
            .admin_resolve(ticket, ResolutionOutcome::Reversed, &admin)
            .unwrap_err();
        assert!(matches!(err, ComplianceError::TransitionRejected { .. }));
    }

    #[tokio::test]
    async fn test_upheld_resolution_registers_strike() {
        let (_dir, engine, _clock) = engine();
        let admin = Operator::admin("op-1");

        // Two prior strikes for the same artist.
        for _ in 0..2 {
            let receipt = engine.submit_notice(us_submission()).await.unwrap();
            engine.begin_triage(&receipt.ticket_id, None).unwrap();
            engine
                .take_action(&receipt.ticket_id, ContentAction::Disable, None)
                .unwrap();
            engine
                .admin_resolve(&receipt.ticket_id, ResolutionOutcome::Upheld, &admin)
                .unwrap();
        }

        let status = engine.strikes().strike_status("artist-17", t0()).unwrap();
        assert_eq!(status.strike_count, 2);
        assert!(!status.termination_eligible);

        let receipt = engine.submit_notice(us_submission()).await.unwrap();
        engine.begin_triage(&receipt.ticket_id, None).unwrap();
        engine
            .take_action(&receipt.ticket_id, ContentAction::Disable, None)
            .unwrap();
        engine
            .admin_resolve(&receipt.ticket_id, ResolutionOutcome::Upheld, &admin)
            .unwrap();

        let status = engine.strikes().strike_status("artist-17", t0()).unwrap();
        assert_eq!(status.strike_count, 3);
        assert!(status.termination_eligible);
    }

    #[tokio::test]
    async fn test_reversal_reinstates_and_audits() {
        let (_dir, engine, _clock) = engine();
        let admin = Operator::admin("op-1");

        let receipt = engine.submit_notice(us_submission()).await.unwrap();
        let ticket = &receipt.ticket_id;
        engine.begin_triage(ticket, None).unwrap();
        engine.take_action(ticket, ContentAction::Disable, None).unwrap();
        engine
            .submit_counter_notice(
                ticket,
                CounterNoticeSubmission {
                    respondent_name: "Sam".into(),
                    good_faith_statement: true,
                    consent_to_jurisdiction: true,
                    signature: "/s/ Sam".into(),
                    ..Default::default()
                },
            )
            .unwrap();

        engine.admin_resolve(ticket, ResolutionOutcome::Reversed, &admin).unwrap();

        let trail = engine.audit_trail(ticket).unwrap();
        let actions: Vec<AuditAction> = trail.iter().map(|e| e.action).collect();
        assert!(actions.contains(&AuditAction::ContentReinstated));
        assert!(actions.contains(&AuditAction::Resolution));
        // No strike for a reversed claim.
        let status = engine.strikes().strike_status("artist-17", t0()).unwrap();
        assert_eq!(status.strike_count, 0);
    }

    #[tokio::test]
    async fn test_canadian_notice_is_forwarded_not_removed() {
        let (_dir, engine, _clock) = engine();

        assert!(requires_canadian_forwarding(Jurisdiction::Ca));
        assert!(!requires_canadian_forwarding(Jurisdiction::Us));

        let submission = NoticeSubmission {
            jurisdiction: "CA".into(),
            ..us_submission()
        };
        let receipt = engine.submit_notice(submission).await.unwrap();
        let ticket = &receipt.ticket_id;

        engine.begin_triage(ticket, None).unwrap();
        engine.take_action(ticket, ContentAction::Remove, None).unwrap();

        let view = engine.notice_status(ticket).unwrap();
        assert_eq!(view.status, NoticeStatus::Notified);

        let trail = engine.audit_trail(ticket).unwrap();
        let actions: Vec<AuditAction> = trail.iter().map(|e| e.action).collect();
        assert!(actions.contains(&AuditAction::NoticeForwarded));
        assert!(!actions.contains(&AuditAction::ContentRemoved));
    }

    #[tokio::test]
    async fn test_confident_fingerprint_match_auto_blocks() {
        let (_dir, engine, _clock) = engine();
        let engine = engine.with_scanner(Arc::new(StubScanner::matching(0.97)));

        let receipt = engine.submit_notice(us_submission()).await.unwrap();
        assert_eq!(receipt.status, NoticeStatus::ActionTaken);

        let trail = engine.audit_trail(&receipt.ticket_id).unwrap();
        let auto_block = trail
            .iter()
            .find(|e| e.action == AuditAction::ContentDisabled)
            .expect("auto-block event");
        assert!(auto_block.automated);
        assert!(trail.iter().any(|e| e.action == AuditAction::FingerprintScan));
    }

    #[tokio::test]
    async fn test_clean_scan_leaves_notice_submitted() {
        let (_dir, engine, _clock) = engine();
        let engine = engine.with_scanner(Arc::new(StubScanner::clean()));

        let receipt = engine.submit_notice(us_submission()).await.unwrap();
        assert_eq!(receipt.status, NoticeStatus::Submitted);
    }

    #[tokio::test]
    async fn test_overdue_listing_orders_by_lateness() {
        let (_dir, engine, clock) = engine();

        let urgent = NoticeSubmission {
            trust_level: Some(TrustLevel::Premium),
            ..us_submission()
        };
        let fast = engine.submit_notice(urgent).await.unwrap();

        clock.advance(Duration::hours(36));
        let slow = engine.submit_notice(us_submission()).await.unwrap();

        clock.advance(Duration::hours(120));
        let overdue = engine.list_overdue().unwrap();
        assert_eq!(overdue.len(), 2);
        assert_eq!(overdue[0].ticket_id, fast.ticket_id);
        assert_eq!(overdue[1].ticket_id, slow.ticket_id);
        assert!(overdue[0].hours_overdue > overdue[1].hours_overdue);
    }

    #[tokio::test]
    async fn test_escalation_recomputes_deadline_and_audits() {
        let (_dir, engine, clock) = engine();
        let admin = Operator::admin("op-1");

        let receipt = engine.submit_notice(us_submission()).await.unwrap();
        assert_eq!(receipt.sla_deadline, t0() + Duration::hours(72));

        clock.advance(Duration::hours(6));
        let updated = engine
            .escalate_priority(&receipt.ticket_id, Priority::Urgent, &admin)
            .unwrap();
        assert_eq!(updated.sla_deadline, t0() + Duration::hours(6 + 24));

        let trail = engine.audit_trail(&receipt.ticket_id).unwrap();
        let event = trail.last().unwrap();
        assert_eq!(event.performed_by.as_deref(), Some("op-1"));
        assert!(event.details.as_deref().unwrap().contains("escalated to urgent"));
    }

    #[tokio::test]
    async fn test_withdrawal_is_terminal() {
        let (_dir, engine, _clock) = engine();

        let receipt = engine.submit_notice(us_submission()).await.unwrap();
        engine.withdraw_notice(&receipt.ticket_id, None).unwrap();

        let view = engine.notice_status(&receipt.ticket_id).unwrap();
        assert_eq!(view.status, NoticeStatus::Withdrawn);

        let err = engine.begin_triage(&receipt.ticket_id, None).unwrap_err();
        assert!(matches!(err, ComplianceError::TransitionRejected { .. }));
    }

    #[tokio::test]
    async fn test_unknown_ticket_is_not_found() {
        let (_dir, engine, _clock) = engine();

        let err = engine.notice_status("TDN-2024-ZZZZZZ").unwrap_err();
        assert!(matches!(err, ComplianceError::NotFound(_)));

        let err = engine
            .record_manual_note("TDN-2024-ZZZZZZ", &Operator::agent("op-3"), "ping")
            .unwrap_err();
        assert!(matches!(err, ComplianceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_manual_note_carries_operator() {
        let (_dir, engine, _clock) = engine();

        let receipt = engine.submit_notice(us_submission()).await.unwrap();
        let event = engine
            .record_manual_note(&receipt.ticket_id, &Operator::agent("op-3"), "claimant called")
            .unwrap();

        assert_eq!(event.action, AuditAction::ManualNote);
        assert!(!event.automated);
        assert_eq!(event.performed_by.as_deref(), Some("op-3"));
    }

    #[tokio::test]
    async fn test_dismissal_at_triage() {
        let (_dir, engine, _clock) = engine();
        let admin = Operator::admin("op-1");

        let receipt = engine.submit_notice(us_submission()).await.unwrap();
        engine.begin_triage(&receipt.ticket_id, None).unwrap();
        engine.dismiss_at_triage(&receipt.ticket_id, &admin).unwrap();

        let view = engine.notice_status(&receipt.ticket_id).unwrap();
        assert_eq!(view.status, NoticeStatus::ResolvedReversed);
    }

    #[test]
    fn test_generated_ids_match_format() {
        let pattern = regex::Regex::new(r"^TDN-2024-[A-Z0-9]{6}$").unwrap();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            let id = generate_ticket_id(2024);
            assert!(pattern.is_match(&id), "{}", id);
            seen.insert(id);
        }
        // Collisions at this sample size would indicate a broken generator.
        assert!(seen.len() >= 99);
    }
}
