//! Takedown Protocol - notice-and-action compliance engine
//!
//! This library provides intake and statutory validation of copyright
//! complaints, jurisdiction-aware SLA deadlines, a guarded notice lifecycle,
//! counter-notice handling, an append-only audit trail, and repeat-infringer
//! enforcement.
//!
//! ## Features
//!
//! - **Receipt-first intake**: a ticket is always issued; incompleteness is
//!   flagged for remediation, never rejected
//! - **Jurisdiction-aware deadlines**: calendar-hour SLA matrix plus
//!   business-day counter-notice windows
//! - **Fail-open triage**: a risk-assessment outage can never block intake
//! - **HMAC-SHA256 signed records**: tamper-evident notices and audit trail
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use takedown_protocol::compliance::{ComplianceEngine, EnginePolicy, NoticeSubmission};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = ComplianceEngine::new(EnginePolicy::default())?;
//! let receipt = engine
//!     .submit_notice(NoticeSubmission {
//!         content_ref: "video-991".into(),
//!         jurisdiction: "US".into(),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("issued {}", receipt.ticket_id);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod compliance;
pub mod security;

// Re-exports for convenience
pub use compliance::{
    AuditAction, AuditEvent, AuditTrail, Clock, ComplianceEngine, ComplianceError, ContentAction,
    ContentStore, ContentType, CounterNotice, CounterNoticeSubmission, EnginePolicy, FixedClock,
    FingerprintScanRecord, FingerprintScanner, Jurisdiction, LegalFramework, NoticeStatus,
    NoticeStatusView, NoticeSubmission, Operator, OperatorRole, OverdueNotice, Priority,
    RecordStore, RepeatInfringerRecord, RepeatInfringerTracker, ResolutionOutcome, RiskAssessment,
    RiskAssessmentAdapter, RiskAssessor, RiskLevel, ScanStatus, StatutoryElement,
    SubmissionReceipt, SystemClock, TakedownNotice, TrustLevel, ValidationOutcome,
};
pub use security::crypto::load_or_create_key;
