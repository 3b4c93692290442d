//! Repeat-infringer strike accounting.
//!
//! Safe-harbor eligibility requires an *enforced* repeat-infringer policy,
//! not a documented one: every upheld resolution lands here, and crossing
//! the configured threshold flags the account as termination-eligible.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::storage::{RecordStore, SUBDIR_STRIKES};
use super::types::{ComplianceError, RepeatInfringerRecord, StrikeEntry};

/// Strikes at which an account becomes termination-eligible
pub const DEFAULT_STRIKE_THRESHOLD: u32 = 3;

fn strike_filename(artist_id: &str) -> String {
    format!("{}.strikes", artist_id)
}

/// Strike ledger keyed by content owner
pub struct RepeatInfringerTracker {
    store: Arc<RecordStore>,
    threshold: u32,
}

impl RepeatInfringerTracker {
    pub fn new(store: Arc<RecordStore>, threshold: u32) -> Self {
        Self { store, threshold }
    }

    /// Record a strike for an upheld notice
    ///
    /// Returns the updated record; the caller audits the escalation when
    /// `termination_eligible` flips.
    pub fn register_strike(
        &self,
        artist_id: &str,
        ticket_id: &str,
        now: DateTime<Utc>,
    ) -> Result<RepeatInfringerRecord, ComplianceError> {
        let mut record = self.strike_status(artist_id, now)?;

        record.strike_count += 1;
        record.strikes.push(StrikeEntry {
            ticket_id: ticket_id.to_string(),
            recorded_at: now,
        });
        record.termination_eligible = record.strike_count >= self.threshold;
        record.updated_at = now;

        self.store
            .store(SUBDIR_STRIKES, &strike_filename(artist_id), &record)?;

        if record.termination_eligible {
            tracing::warn!(
                "Artist {} reached {} strikes, termination-eligible",
                artist_id,
                record.strike_count
            );
        }

        Ok(record)
    }

    /// Current standing for one content owner (zero strikes if unseen)
    pub fn strike_status(
        &self,
        artist_id: &str,
        now: DateTime<Utc>,
    ) -> Result<RepeatInfringerRecord, ComplianceError> {
        let filename = strike_filename(artist_id);
        if self.store.exists(SUBDIR_STRIKES, &filename) {
            self.store.load(SUBDIR_STRIKES, &filename)
        } else {
            Ok(RepeatInfringerRecord {
                artist_id: artist_id.to_string(),
                strike_count: 0,
                termination_eligible: false,
                strikes: Vec::new(),
                updated_at: now,
            })
        }
    }

    /// All accounts currently flagged termination-eligible
    pub fn termination_eligible(&self) -> Result<Vec<RepeatInfringerRecord>, ComplianceError> {
        let records: Vec<RepeatInfringerRecord> =
            self.store.load_all(SUBDIR_STRIKES, "strikes")?;
        Ok(records.into_iter().filter(|r| r.termination_eligible).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tracker() -> (tempfile::TempDir, RepeatInfringerTracker) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(RecordStore::with_base_dir(dir.path(), &[3u8; 32]).unwrap());
        let tracker = RepeatInfringerTracker::new(store, DEFAULT_STRIKE_THRESHOLD);
        (dir, tracker)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_third_strike_flips_termination_eligibility() {
        let (_dir, tracker) = tracker();

        let first = tracker.register_strike("artist-9", "TDN-2024-AAAAAA", now()).unwrap();
        assert_eq!(first.strike_count, 1);
        assert!(!first.termination_eligible);

        let second = tracker.register_strike("artist-9", "TDN-2024-BBBBBB", now()).unwrap();
        assert_eq!(second.strike_count, 2);
        assert!(!second.termination_eligible);

        let third = tracker.register_strike("artist-9", "TDN-2024-CCCCCC", now()).unwrap();
        assert_eq!(third.strike_count, 3);
        assert!(third.termination_eligible);
    }

    #[test]
    fn test_strikes_carry_ticket_provenance() {
        let (_dir, tracker) = tracker();

        tracker.register_strike("artist-9", "TDN-2024-AAAAAA", now()).unwrap();
        let record = tracker.strike_status("artist-9", now()).unwrap();

        assert_eq!(record.strikes.len(), 1);
        assert_eq!(record.strikes[0].ticket_id, "TDN-2024-AAAAAA");
    }

    #[test]
    fn test_unseen_artist_has_clean_record() {
        let (_dir, tracker) = tracker();

        let record = tracker.strike_status("artist-0", now()).unwrap();
        assert_eq!(record.strike_count, 0);
        assert!(!record.termination_eligible);
        assert!(tracker.termination_eligible().unwrap().is_empty());
    }

    #[test]
    fn test_eligible_listing_only_returns_flagged_accounts() {
        let (_dir, tracker) = tracker();

        for ticket in ["TDN-2024-AAAAAA", "TDN-2024-BBBBBB", "TDN-2024-CCCCCC"] {
            tracker.register_strike("artist-1", ticket, now()).unwrap();
        }
        tracker.register_strike("artist-2", "TDN-2024-DDDDDD", now()).unwrap();

        let eligible = tracker.termination_eligible().unwrap();
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].artist_id, "artist-1");
    }
}
