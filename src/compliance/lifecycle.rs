//! Notice lifecycle state machine.
//!
//! Status is a closed enum ([`NoticeStatus`]) and the legal transitions are
//! a single static table, so every guard in the engine consults one source
//! of truth. Finer-grained operational actions (disable, geo-block, forward)
//! are audit action types, not statuses.

use super::types::{ComplianceError, NoticeStatus};

use NoticeStatus::*;

/// Every legal (from, to) edge in the lifecycle graph.
///
/// Terminal states have no outgoing edges. Withdrawal is reachable from
/// every non-terminal state.
pub const TRANSITIONS: &[(NoticeStatus, NoticeStatus)] = &[
    (Submitted, Triage),
    (Triage, ActionTaken),
    (Triage, Notified),
    // Dismissal at triage: claim rejected before any action was taken.
    (Triage, ResolvedReversed),
    (ActionTaken, Notified),
    (ActionTaken, CounterNoticeWindow),
    (ActionTaken, CounterNoticeReceived),
    (ActionTaken, ResolvedUpheld),
    (ActionTaken, ResolvedReversed),
    (Notified, CounterNoticeWindow),
    (Notified, CounterNoticeReceived),
    (Notified, ResolvedUpheld),
    (Notified, ResolvedReversed),
    (CounterNoticeWindow, CounterNoticeReceived),
    (CounterNoticeReceived, ResolvedUpheld),
    (CounterNoticeReceived, ResolvedReversed),
    (Submitted, Withdrawn),
    (Triage, Withdrawn),
    (ActionTaken, Withdrawn),
    (Notified, Withdrawn),
    (CounterNoticeWindow, Withdrawn),
    (CounterNoticeReceived, Withdrawn),
];

/// States in which a counter-notice may be filed.
///
/// An appeal is only meaningful once content has actually been acted on and
/// before the matter is closed.
pub const COUNTER_NOTICE_ELIGIBLE: [NoticeStatus; 3] =
    [ActionTaken, Notified, CounterNoticeWindow];

/// Whether `from -> to` is a legal transition
pub fn can_transition(from: NoticeStatus, to: NoticeStatus) -> bool {
    TRANSITIONS.contains(&(from, to))
}

/// Guard a transition, rejecting illegal edges with no partial mutation
///
/// Callers apply the status change only after this returns `Ok`, keeping the
/// notice record and the audit trail in lockstep.
pub fn guard_transition(from: NoticeStatus, to: NoticeStatus) -> Result<(), ComplianceError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(ComplianceError::TransitionRejected { from, to })
    }
}
