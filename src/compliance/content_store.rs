//! Content-store capability: takedown actions against hosted content.
//!
//! Commands are expected to be idempotent on the remote side; the engine
//! retries freely and records outcomes in the audit trail rather than here.

use super::types::ContentType;

/// Errors from the content store
#[derive(Debug, thiserror::Error)]
pub enum ContentStoreError {
    #[error("Content store unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown content: {0}")]
    UnknownContent(String),
}

/// External store hosting the targeted content
pub trait ContentStore: Send + Sync {
    /// Disable access without deleting the underlying object
    fn disable(&self, content_id: &str, content_type: ContentType) -> Result<(), ContentStoreError>;

    /// Permanently remove the object
    fn remove(&self, content_id: &str, content_type: ContentType) -> Result<(), ContentStoreError>;

    /// Block access from the named regions only
    fn geo_block(
        &self,
        content_id: &str,
        content_type: ContentType,
        regions: &[String],
    ) -> Result<(), ContentStoreError>;

    /// Restore access after a reversal
    fn reinstate(
        &self,
        content_id: &str,
        content_type: ContentType,
    ) -> Result<(), ContentStoreError>;
}

/// Content store that only logs
///
/// Default wiring for environments where the real store is reached through
/// a separate worker; also the test double.
#[derive(Debug, Default)]
pub struct LoggingContentStore;

impl ContentStore for LoggingContentStore {
    fn disable(
        &self,
        content_id: &str,
        content_type: ContentType,
    ) -> Result<(), ContentStoreError> {
        tracing::info!("Disabling {} content {}", content_type, content_id);
        Ok(())
    }

    fn remove(&self, content_id: &str, content_type: ContentType) -> Result<(), ContentStoreError> {
        tracing::info!("Removing {} content {}", content_type, content_id);
        Ok(())
    }

    fn geo_block(
        &self,
        content_id: &str,
        content_type: ContentType,
        regions: &[String],
    ) -> Result<(), ContentStoreError> {
        tracing::info!(
            "Geo-blocking {} content {} in {:?}",
            content_type,
            content_id,
            regions
        );
        Ok(())
    }

    fn reinstate(
        &self,
        content_id: &str,
        content_type: ContentType,
    ) -> Result<(), ContentStoreError> {
        tracing::info!("Reinstating {} content {}", content_type, content_id);
        Ok(())
    }
}
