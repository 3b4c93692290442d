//! Compliance module shared types, enums, and errors.
//!
//! This module provides the foundational types used across the takedown
//! engine: notices, counter-notices, scan records, strike records, and the
//! enums describing jurisdictions, legal frameworks, priorities, and the
//! notice lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Errors from compliance operations
#[derive(Debug, thiserror::Error)]
pub enum ComplianceError {
    #[error("Illegal transition from {from} to {to}")]
    TransitionRejected { from: NoticeStatus, to: NoticeStatus },

    #[error("Counter-notice not accepted while notice is {status}")]
    CounterNoticeRejected { status: NoticeStatus },

    #[error("Operation requires admin privileges")]
    AuthorizationDenied,

    #[error("Notice not found: {0}")]
    NotFound(String),

    #[error("Could not allocate a unique ticket id after {0} attempts")]
    TicketIdExhausted(u32),

    #[error("Notice record changed concurrently: expected revision {expected}, found {found}")]
    RevisionConflict { expected: u64, found: u64 },

    #[error("Content store error: {0}")]
    ContentStore(String),

    #[error("Invalid record signature - possible tampering")]
    InvalidSignature,

    #[error("Invalid record format")]
    InvalidFormat,

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Jurisdiction governing a notice
///
/// Unknown codes collapse to [`Jurisdiction::Worldwide`], the catch-all tier.
/// Parsing never fails: a notice must always be accepted, whatever the
/// claimant typed into the jurisdiction field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Jurisdiction {
    /// United States
    Us,
    /// European Union
    Eu,
    /// United Kingdom
    Uk,
    /// Canada
    Ca,
    /// Australia
    Au,
    /// Worldwide / unrecognized (catch-all)
    #[serde(rename = "WW")]
    Worldwide,
}

impl Jurisdiction {
    /// All jurisdictions, for invariant sweeps
    pub const ALL: [Jurisdiction; 6] = [
        Jurisdiction::Us,
        Jurisdiction::Eu,
        Jurisdiction::Uk,
        Jurisdiction::Ca,
        Jurisdiction::Au,
        Jurisdiction::Worldwide,
    ];

    /// Parse a claimant-supplied jurisdiction code
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "US" => Jurisdiction::Us,
            "EU" => Jurisdiction::Eu,
            "UK" | "GB" => Jurisdiction::Uk,
            "CA" => Jurisdiction::Ca,
            "AU" => Jurisdiction::Au,
            _ => Jurisdiction::Worldwide,
        }
    }

    /// Two-letter code used in records and CLI output
    pub fn code(&self) -> &'static str {
        match self {
            Jurisdiction::Us => "US",
            Jurisdiction::Eu => "EU",
            Jurisdiction::Uk => "UK",
            Jurisdiction::Ca => "CA",
            Jurisdiction::Au => "AU",
            Jurisdiction::Worldwide => "WW",
        }
    }
}

impl std::fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Statutory framework a notice is processed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegalFramework {
    /// US Digital Millennium Copyright Act, 17 U.S.C. §512(c)(3)
    Dmca512,
    /// EU Digital Services Act, Article 16
    DsaArt16,
    /// UK Copyright, Designs and Patents Act 1988
    Cdpa1988,
    /// Canadian notice-and-notice regime (Copyright Act ss. 41.25-41.26)
    CaNotice,
    /// Australian Copyright Act 1968, safe harbour scheme
    AuCopyright,
    /// WIPO-aligned baseline for all other jurisdictions
    WipoGlobal,
}

impl LegalFramework {
    /// Full statute name for audit output
    pub fn full_name(&self) -> &'static str {
        match self {
            LegalFramework::Dmca512 => "Digital Millennium Copyright Act §512",
            LegalFramework::DsaArt16 => "Digital Services Act Article 16",
            LegalFramework::Cdpa1988 => "Copyright, Designs and Patents Act 1988",
            LegalFramework::CaNotice => "Copyright Act (Canada) notice-and-notice",
            LegalFramework::AuCopyright => "Copyright Act 1968 (Australia)",
            LegalFramework::WipoGlobal => "WIPO Copyright Treaty baseline",
        }
    }
}

impl std::fmt::Display for LegalFramework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LegalFramework::Dmca512 => write!(f, "DMCA_512"),
            LegalFramework::DsaArt16 => write!(f, "DSA_ART16"),
            LegalFramework::Cdpa1988 => write!(f, "CDPA_1988"),
            LegalFramework::CaNotice => write!(f, "CA_NOTICE"),
            LegalFramework::AuCopyright => write!(f, "AU_COPYRIGHT"),
            LegalFramework::WipoGlobal => write!(f, "WIPO_GLOBAL"),
        }
    }
}

/// Handling priority for a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Normal,
    Low,
}

impl Priority {
    /// All priorities, for invariant sweeps
    pub const ALL: [Priority; 4] = [
        Priority::Urgent,
        Priority::High,
        Priority::Normal,
        Priority::Low,
    ];
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Urgent => write!(f, "urgent"),
            Priority::High => write!(f, "high"),
            Priority::Normal => write!(f, "normal"),
            Priority::Low => write!(f, "low"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "urgent" => Ok(Priority::Urgent),
            "high" => Ok(Priority::High),
            "normal" => Ok(Priority::Normal),
            "low" => Ok(Priority::Low),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// Trusted-flagger tier of the reporting entity
///
/// Models DSA Article 22 style trusted-flagger status. Premium and Elevated
/// tiers override the automated priority suggestion outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    /// Verified trusted flagger - notices are always urgent
    Premium,
    /// Established reporter with a track record - notices are always high
    Elevated,
    /// No expedited handling
    Standard,
}

impl std::fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrustLevel::Premium => write!(f, "premium"),
            TrustLevel::Elevated => write!(f, "elevated"),
            TrustLevel::Standard => write!(f, "standard"),
        }
    }
}

impl std::str::FromStr for TrustLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "premium" => Ok(TrustLevel::Premium),
            "elevated" => Ok(TrustLevel::Elevated),
            "standard" => Ok(TrustLevel::Standard),
            _ => Err(format!("Unknown trust level: {}", s)),
        }
    }
}

/// Kind of content a notice targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    Audio,
    Image,
    Text,
    Other,
}

impl ContentType {
    /// Parse a content-type label; unrecognized labels never fail intake
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "video" => ContentType::Video,
            "audio" | "track" => ContentType::Audio,
            "image" | "artwork" => ContentType::Image,
            "text" => ContentType::Text,
            _ => ContentType::Other,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Video => write!(f, "video"),
            ContentType::Audio => write!(f, "audio"),
            ContentType::Image => write!(f, "image"),
            ContentType::Text => write!(f, "text"),
            ContentType::Other => write!(f, "other"),
        }
    }
}

/// Lifecycle status of a takedown notice
///
/// The status graph is closed: every reachable value is listed here, and the
/// legal transitions live in a single table in the `lifecycle` module. The
/// three resolved/withdrawn states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeStatus {
    /// Received, awaiting triage
    Submitted,
    /// Under review (automated or human)
    Triage,
    /// Content has been removed, disabled, or geo-blocked
    ActionTaken,
    /// Alleged infringer has been notified (includes CA notice forwarding)
    Notified,
    /// Statutory window for the alleged infringer to respond is open
    CounterNoticeWindow,
    /// A counter-notice has been filed and is pending resolution
    CounterNoticeReceived,
    /// Final: claim upheld, takedown stands
    ResolvedUpheld,
    /// Final: claim reversed, content reinstated
    ResolvedReversed,
    /// Final: claimant withdrew the notice
    Withdrawn,
}

impl NoticeStatus {
    /// All statuses, for guard sweeps in tests
    pub const ALL: [NoticeStatus; 9] = [
        NoticeStatus::Submitted,
        NoticeStatus::Triage,
        NoticeStatus::ActionTaken,
        NoticeStatus::Notified,
        NoticeStatus::CounterNoticeWindow,
        NoticeStatus::CounterNoticeReceived,
        NoticeStatus::ResolvedUpheld,
        NoticeStatus::ResolvedReversed,
        NoticeStatus::Withdrawn,
    ];

    /// Whether this status permits no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            NoticeStatus::ResolvedUpheld | NoticeStatus::ResolvedReversed | NoticeStatus::Withdrawn
        )
    }
}

impl std::fmt::Display for NoticeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NoticeStatus::Submitted => "submitted",
            NoticeStatus::Triage => "triage",
            NoticeStatus::ActionTaken => "action_taken",
            NoticeStatus::Notified => "notified",
            NoticeStatus::CounterNoticeWindow => "counter_notice_window",
            NoticeStatus::CounterNoticeReceived => "counter_notice_received",
            NoticeStatus::ResolvedUpheld => "resolved_upheld",
            NoticeStatus::ResolvedReversed => "resolved_reversed",
            NoticeStatus::Withdrawn => "withdrawn",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of an admin resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionOutcome {
    /// Claim stands; takedown is permanent
    Upheld,
    /// Claim rejected; content is reinstated
    Reversed,
}

impl ResolutionOutcome {
    /// Terminal status this outcome maps to
    pub fn status(&self) -> NoticeStatus {
        match self {
            ResolutionOutcome::Upheld => NoticeStatus::ResolvedUpheld,
            ResolutionOutcome::Reversed => NoticeStatus::ResolvedReversed,
        }
    }
}

impl std::str::FromStr for ResolutionOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upheld" => Ok(ResolutionOutcome::Upheld),
            "reversed" => Ok(ResolutionOutcome::Reversed),
            _ => Err(format!("Unknown resolution outcome: {}", s)),
        }
    }
}

/// Role of an operator performing a manual action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorRole {
    /// Full access including resolution
    Admin,
    /// Triage and annotation only
    Agent,
}

/// A human operator acting on a notice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    pub id: String,
    pub role: OperatorRole,
}

impl Operator {
    pub fn admin(id: &str) -> Self {
        Self { id: id.to_string(), role: OperatorRole::Admin }
    }

    pub fn agent(id: &str) -> Self {
        Self { id: id.to_string(), role: OperatorRole::Agent }
    }
}

/// One of the statutory elements a valid DMCA §512(c)(3) notice must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatutoryElement {
    ClaimantName,
    ClaimantAddress,
    ClaimantEmail,
    CopyrightedWork,
    InfringementDescription,
    GoodFaithAttestation,
    AccuracyAttestation,
    PerjuryAttestation,
    ElectronicSignature,
    /// Counter-notice only: consent to the jurisdiction of the relevant court
    ConsentToJurisdiction,
}

impl std::fmt::Display for StatutoryElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StatutoryElement::ClaimantName => "claimant name",
            StatutoryElement::ClaimantAddress => "claimant address",
            StatutoryElement::ClaimantEmail => "claimant email",
            StatutoryElement::CopyrightedWork => "copyrighted work title",
            StatutoryElement::InfringementDescription => "infringement description",
            StatutoryElement::GoodFaithAttestation => "good-faith attestation",
            StatutoryElement::AccuracyAttestation => "accuracy attestation",
            StatutoryElement::PerjuryAttestation => "perjury attestation",
            StatutoryElement::ElectronicSignature => "electronic signature",
            StatutoryElement::ConsentToJurisdiction => "consent to jurisdiction",
        };
        write!(f, "{}", s)
    }
}

/// Result of statutory validation
///
/// Validation never blocks intake: an incomplete notice still receives a
/// ticket, with the missing elements recorded for remediation follow-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub missing: Vec<StatutoryElement>,
}

impl ValidationOutcome {
    pub fn complete() -> Self {
        Self { valid: true, missing: Vec::new() }
    }
}

/// Statutory fields supplied by a claimant at intake
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoticeSubmission {
    /// Identifier of the allegedly infringing content
    pub content_ref: String,
    /// Kind of content (free-form label, normalized at intake)
    pub content_type: String,
    /// Owner of the targeted content, for repeat-infringer accounting
    pub artist_id: String,
    pub claimant_name: String,
    pub claimant_address: String,
    pub claimant_email: String,
    pub claimant_organization: Option<String>,
    /// Title of the copyrighted work claimed to be infringed
    pub copyrighted_work: String,
    /// Description of the allegedly infringing use
    pub infringement_description: String,
    /// §512(c)(3)(A)(v) good-faith belief statement
    pub good_faith_attestation: bool,
    /// §512(c)(3)(A)(vi) accuracy statement
    pub accuracy_attestation: bool,
    /// §512(c)(3)(A)(vi) penalty-of-perjury statement
    pub perjury_attestation: bool,
    /// Physical or electronic signature
    pub signature: String,
    /// Claimant-supplied jurisdiction code (unknown codes fall back to WW)
    pub jurisdiction: String,
    /// Trusted-flagger tier, if the claimant holds one
    pub trust_level: Option<TrustLevel>,
}

/// A takedown notice owned by the compliance engine
///
/// Created at intake, mutated only through guarded state transitions, and
/// never physically deleted. `sla_deadline` is set once from jurisdiction and
/// final priority; only an explicit, audited escalation may change it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakedownNotice {
    /// Globally unique, immutable ticket id (`TDN-YYYY-XXXXXX`)
    pub ticket_id: String,
    pub content_ref: String,
    pub content_type: ContentType,
    pub artist_id: String,
    pub claimant_name: String,
    pub claimant_address: String,
    pub claimant_email: String,
    pub claimant_organization: Option<String>,
    pub copyrighted_work: String,
    pub infringement_description: String,
    pub good_faith_attestation: bool,
    pub accuracy_attestation: bool,
    pub perjury_attestation: bool,
    pub signature: String,
    pub jurisdiction: Jurisdiction,
    pub legal_framework: LegalFramework,
    pub priority: Priority,
    pub status: NoticeStatus,
    pub sla_deadline: DateTime<Utc>,
    pub counter_notice_deadline: Option<DateTime<Utc>>,
    pub trust_level: Option<TrustLevel>,
    /// Remediation flags from intake validation
    pub validation: ValidationOutcome,
    /// Optimistic concurrency check for the persistence layer
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Receipt returned to the claimant at intake
///
/// A ticket is always issued; incompleteness is surfaced here as follow-up
/// information, never as a submission failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub ticket_id: String,
    pub status: NoticeStatus,
    pub priority: Priority,
    pub legal_framework: LegalFramework,
    pub sla_deadline: DateTime<Utc>,
    pub validation: ValidationOutcome,
}

/// Read-time view of a notice's standing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeStatusView {
    pub ticket_id: String,
    pub status: NoticeStatus,
    pub priority: Priority,
    pub sla_deadline: DateTime<Utc>,
    pub counter_notice_deadline: Option<DateTime<Utc>>,
    /// Computed at read time, never cached
    pub overdue: bool,
}

/// Statutory elements of a counter-notice (DMCA §512(g)(3))
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CounterNoticeSubmission {
    pub respondent_name: String,
    pub respondent_address: String,
    pub respondent_email: String,
    /// Good-faith statement that the material was removed by mistake or
    /// misidentification, under penalty of perjury
    pub good_faith_statement: bool,
    /// Consent to the jurisdiction of the relevant court
    pub consent_to_jurisdiction: bool,
    pub signature: String,
}

/// A counter-notice filed against a takedown notice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterNotice {
    /// Ticket id of the parent notice
    pub notice_id: String,
    pub submitted_at: DateTime<Utc>,
    /// End of the claimant's objection window (business days)
    pub deadline: DateTime<Utc>,
    pub respondent_name: String,
    pub respondent_address: String,
    pub respondent_email: String,
    pub good_faith_statement: bool,
    pub consent_to_jurisdiction: bool,
    pub signature: String,
    /// Remediation flags; incomplete counter-notices are accepted and flagged
    pub validation: ValidationOutcome,
}

/// Status of a fingerprint scan attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Completed,
    Failed,
    Pending,
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanStatus::Completed => write!(f, "completed"),
            ScanStatus::Failed => write!(f, "failed"),
            ScanStatus::Pending => write!(f, "pending"),
        }
    }
}

/// Persistent record of one fingerprint scan attempt
///
/// One record is written per attempt, matched or not; failures route the
/// notice to manual review instead of blocking intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintScanRecord {
    pub content_id: String,
    pub content_type: ContentType,
    pub fingerprint_hash: Option<String>,
    pub scan_provider: String,
    pub match_found: bool,
    pub confidence_score: f64,
    pub auto_action_taken: bool,
    pub scan_status: ScanStatus,
    pub scanned_at: DateTime<Utc>,
}

/// One strike against a content owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrikeEntry {
    pub ticket_id: String,
    pub recorded_at: DateTime<Utc>,
}

/// Strike accounting for one content owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepeatInfringerRecord {
    pub artist_id: String,
    pub strike_count: u32,
    pub termination_eligible: bool,
    pub strikes: Vec<StrikeEntry>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_jurisdiction_falls_back_to_worldwide() {
        assert_eq!(Jurisdiction::from_code("US"), Jurisdiction::Us);
        assert_eq!(Jurisdiction::from_code("gb"), Jurisdiction::Uk);
        assert_eq!(Jurisdiction::from_code("ZZ"), Jurisdiction::Worldwide);
        assert_eq!(Jurisdiction::from_code(""), Jurisdiction::Worldwide);
    }

    #[test]
    fn test_terminal_statuses() {
        let terminal: Vec<_> = NoticeStatus::ALL
            .iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(
            terminal,
            vec![
                &NoticeStatus::ResolvedUpheld,
                &NoticeStatus::ResolvedReversed,
                &NoticeStatus::Withdrawn
            ]
        );
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&NoticeStatus::CounterNoticeWindow).unwrap();
        assert_eq!(json, "\"counter_notice_window\"");
    }

    #[test]
    fn test_resolution_outcome_maps_to_terminal_status() {
        assert_eq!(ResolutionOutcome::Upheld.status(), NoticeStatus::ResolvedUpheld);
        assert_eq!(ResolutionOutcome::Reversed.status(), NoticeStatus::ResolvedReversed);
        assert!(ResolutionOutcome::Upheld.status().is_terminal());
    }

    #[test]
    fn test_content_type_label_never_fails() {
        assert_eq!(ContentType::from_label("video"), ContentType::Video);
        assert_eq!(ContentType::from_label("TRACK"), ContentType::Audio);
        assert_eq!(ContentType::from_label("hologram"), ContentType::Other);
    }
}
