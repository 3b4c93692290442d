//! SLA engine: jurisdiction-aware deadline and priority math.
//!
//! All functions here are pure and side-effect-free; "now" is always passed
//! in by the caller (ultimately from the injected [`Clock`]) so the math is
//! safe to call from any number of concurrent workers and deterministic
//! under test.
//!
//! [`Clock`]: super::clock::Clock

use chrono::{DateTime, Duration, Utc};

use super::types::{Jurisdiction, NoticeStatus, Priority, TrustLevel};

/// Fallback window applied when no matrix entry governs a pair
pub const DEFAULT_SLA_HOURS: i64 = 72;

/// Hours allowed to act on a notice, per jurisdiction and priority.
///
/// EU is the fastest tier at every priority (expedited regional law);
/// the worldwide catch-all is the slowest at every priority. Unknown
/// jurisdiction codes collapse to the catch-all before this lookup.
pub fn sla_hours(jurisdiction: Jurisdiction, priority: Priority) -> i64 {
    use Jurisdiction::*;
    use Priority::*;

    match (jurisdiction, priority) {
        (Us, Urgent) => 24,
        (Us, High) => 48,
        (Us, Normal) => 72,
        (Us, Low) => 168,

        (Eu, Urgent) => 12,
        (Eu, High) => 24,
        (Eu, Normal) => 48,
        (Eu, Low) => 96,

        (Uk, Urgent) => 24,
        (Uk, High) => 48,
        (Uk, Normal) => 72,
        (Uk, Low) => 168,

        (Ca, Urgent) => 48,
        (Ca, High) => 72,
        (Ca, Normal) => 96,
        (Ca, Low) => 168,

        (Au, Urgent) => 48,
        (Au, High) => 72,
        (Au, Normal) => 96,
        (Au, Low) => 168,

        (Worldwide, Urgent) => 72,
        (Worldwide, High) => 96,
        (Worldwide, Normal) => 120,
        (Worldwide, Low) => 240,
    }
}

/// Deadline by which the platform must act on a notice
///
/// Set exactly once at intake from jurisdiction and final priority; never
/// silently recomputed afterwards.
pub fn sla_deadline(
    jurisdiction: Jurisdiction,
    priority: Priority,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    now + Duration::hours(sla_hours(jurisdiction, priority))
}

/// Final handling priority after the trusted-flagger override
///
/// Premium forces urgent and Elevated forces high, unconditionally. This is
/// override logic, not blending: when one of those tiers is present, the
/// automated suggestion is discarded outright.
pub fn effective_priority(ai_suggested: Priority, trust_level: Option<TrustLevel>) -> Priority {
    match trust_level {
        Some(TrustLevel::Premium) => Priority::Urgent,
        Some(TrustLevel::Elevated) => Priority::High,
        _ => ai_suggested,
    }
}

/// Whether a notice is past its SLA deadline
///
/// Always false for a missing deadline and for any terminal status, however
/// far past the deadline resolution happened. Computed at read time, never
/// cached.
pub fn is_overdue(
    deadline: Option<DateTime<Utc>>,
    status: NoticeStatus,
    now: DateTime<Utc>,
) -> bool {
    let Some(deadline) = deadline else {
        return false;
    };
    if status.is_terminal() {
        return false;
    }
    deadline < now
}
