//! Fingerprint scanning against known copyrighted reference material.
//!
//! The matching algorithm itself is an external capability behind the
//! [`FingerprintScanner`] trait; this module owns the persistent scan
//! records and the auto-action threshold decision. Every attempt is
//! recorded, matched or not, and a failed scan routes to manual review
//! instead of blocking intake.

use std::sync::Arc;

use chrono::NaiveDate;

use super::clock::Clock;
use super::storage::{RecordStore, SUBDIR_SCANS};
use super::types::{ComplianceError, ContentType, FingerprintScanRecord, ScanStatus};

/// Confidence at or above which a match triggers automatic action
pub const DEFAULT_AUTO_ACTION_THRESHOLD: f64 = 0.90;

/// Result of one scan by the external capability
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub match_found: bool,
    /// Match confidence in `[0.0, 1.0]`
    pub confidence_score: f64,
    pub provider: String,
    pub fingerprint_hash: String,
}

/// Errors from the external matching capability
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Scan provider unavailable: {0}")]
    Unavailable(String),

    #[error("Content not found: {0}")]
    ContentNotFound(String),
}

/// External content-matching capability
pub trait FingerprintScanner: Send + Sync {
    /// Scan one piece of content against the reference catalog
    fn scan(&self, content_id: &str, content_type: ContentType) -> Result<ScanOutcome, ScanError>;

    /// Provider identifier recorded on every attempt
    fn provider(&self) -> &str;
}

/// Deterministic scanner for tests
///
/// Reports a fixed match decision and confidence, with a hash derived from
/// the content id.
pub struct StubScanner {
    match_found: bool,
    confidence: f64,
}

impl StubScanner {
    pub fn matching(confidence: f64) -> Self {
        Self { match_found: true, confidence }
    }

    pub fn clean() -> Self {
        Self { match_found: false, confidence: 0.0 }
    }
}

impl FingerprintScanner for StubScanner {
    fn scan(&self, content_id: &str, _content_type: ContentType) -> Result<ScanOutcome, ScanError> {
        let digest = crate::security::crypto::sha256(content_id.as_bytes());
        Ok(ScanOutcome {
            match_found: self.match_found,
            confidence_score: self.confidence,
            provider: self.provider().to_string(),
            fingerprint_hash: crate::security::crypto::hex_encode(&digest[..16]),
        })
    }

    fn provider(&self) -> &str {
        "stub"
    }
}

/// Scan orchestration and record persistence
pub struct ScanService {
    scanner: Arc<dyn FingerprintScanner>,
    store: Arc<RecordStore>,
    clock: Arc<dyn Clock>,
    auto_action_threshold: f64,
}

impl ScanService {
    pub fn new(
        scanner: Arc<dyn FingerprintScanner>,
        store: Arc<RecordStore>,
        clock: Arc<dyn Clock>,
        auto_action_threshold: f64,
    ) -> Self {
        Self { scanner, store, clock, auto_action_threshold }
    }

    /// Scan content and persist a record of the attempt
    ///
    /// On provider failure the record carries `scan_status = failed` and the
    /// caller routes the notice to manual review; the error never propagates
    /// into intake.
    pub fn run_scan(
        &self,
        content_id: &str,
        content_type: ContentType,
    ) -> Result<FingerprintScanRecord, ComplianceError> {
        let scanned_at = self.clock.now();

        let record = match self.scanner.scan(content_id, content_type) {
            Ok(outcome) => {
                let auto_action = outcome.match_found
                    && outcome.confidence_score >= self.auto_action_threshold;
                FingerprintScanRecord {
                    content_id: content_id.to_string(),
                    content_type,
                    fingerprint_hash: Some(outcome.fingerprint_hash),
                    scan_provider: outcome.provider,
                    match_found: outcome.match_found,
                    confidence_score: outcome.confidence_score,
                    auto_action_taken: auto_action,
                    scan_status: ScanStatus::Completed,
                    scanned_at,
                }
            }
            Err(e) => {
                tracing::warn!("Fingerprint scan failed for {}: {}", content_id, e);
                FingerprintScanRecord {
                    content_id: content_id.to_string(),
                    content_type,
                    fingerprint_hash: None,
                    scan_provider: self.scanner.provider().to_string(),
                    match_found: false,
                    confidence_score: 0.0,
                    auto_action_taken: false,
                    scan_status: ScanStatus::Failed,
                    scanned_at,
                }
            }
        };

        let filename = format!("scans_{}.jsonl", scanned_at.format("%Y-%m-%d"));
        self.store.append_jsonl(SUBDIR_SCANS, &filename, &record)?;

        Ok(record)
    }

    /// Read the scan records for a specific date
    pub fn records_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<FingerprintScanRecord>, ComplianceError> {
        let filename = format!("scans_{}.jsonl", date.format("%Y-%m-%d"));
        self.store.read_jsonl(SUBDIR_SCANS, &filename)
    }
}
