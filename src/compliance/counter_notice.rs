//! Counter-notice subsystem: reinstatement appeals.
//!
//! Deadline arithmetic counts business days (Mon-Fri) on UTC day boundaries,
//! sidestepping DST off-by-one errors. Eligibility guards consult the
//! lifecycle table's state set.

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

use super::lifecycle::COUNTER_NOTICE_ELIGIBLE;
use super::types::{CounterNoticeSubmission, NoticeStatus, StatutoryElement, ValidationOutcome};

/// Statutory objection window, in business days
pub const DEFAULT_BUSINESS_DAYS: u32 = 10;

/// Deadline `business_days` business days from `now`
///
/// Walks forward one calendar day at a time, counting only Mon-Fri. The
/// result never falls on a weekend and lies within
/// `[business_days, business_days + 6]` calendar days of `now`.
pub fn counter_notice_deadline(now: DateTime<Utc>, business_days: u32) -> DateTime<Utc> {
    let mut deadline = now;
    let mut counted = 0;

    while counted < business_days {
        deadline = deadline + Duration::days(1);
        match deadline.weekday() {
            Weekday::Sat | Weekday::Sun => {}
            _ => counted += 1,
        }
    }

    deadline
}

/// Whether a counter-notice may be filed while the notice is in `status`
pub fn can_submit(status: NoticeStatus) -> bool {
    COUNTER_NOTICE_ELIGIBLE.contains(&status)
}

/// Whether a notice may still be resolved
///
/// True for everything except the terminal states; prevents
/// double-resolution.
pub fn can_resolve(status: NoticeStatus) -> bool {
    !status.is_terminal()
}

/// Validate the §512(g)(3) elements of a counter-notice
///
/// Same receipt posture as intake: an incomplete counter-notice is accepted
/// and flagged, not bounced.
pub fn validate(submission: &CounterNoticeSubmission) -> ValidationOutcome {
    let mut missing = Vec::new();

    if submission.respondent_name.trim().is_empty() {
        missing.push(StatutoryElement::ClaimantName);
    }
    if submission.respondent_address.trim().is_empty() {
        missing.push(StatutoryElement::ClaimantAddress);
    }
    if submission.respondent_email.trim().is_empty() {
        missing.push(StatutoryElement::ClaimantEmail);
    }
    if !submission.good_faith_statement {
        missing.push(StatutoryElement::GoodFaithAttestation);
    }
    if !submission.consent_to_jurisdiction {
        missing.push(StatutoryElement::ConsentToJurisdiction);
    }
    if submission.signature.trim().is_empty() {
        missing.push(StatutoryElement::ElectronicSignature);
    }

    ValidationOutcome {
        valid: missing.is_empty(),
        missing,
    }
}
