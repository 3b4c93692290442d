//! Risk assessment adapter with a fail-open contract.
//!
//! Wraps an external automated-triage capability. A network error, timeout,
//! or unparseable response all collapse to a fixed default assessment: an
//! AI-dependency outage must never become a compliance-deadline failure, so
//! the adapter is infallible from the intake path's point of view.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::Priority;

/// Risk tier suggested by the assessment capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

/// Result of an automated notice assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Whether the notice looks like a plausible claim
    pub is_valid: bool,
    pub risk_level: RiskLevel,
    pub suggested_priority: Priority,
    pub notes: String,
}

impl RiskAssessment {
    /// The fixed fail-open default
    pub fn unavailable_default() -> Self {
        Self {
            is_valid: true,
            risk_level: RiskLevel::Medium,
            suggested_priority: Priority::Normal,
            notes: "Automated assessment unavailable".to_string(),
        }
    }
}

/// Errors from the external assessment capability
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("Assessment service unavailable: {0}")]
    Unavailable(String),

    #[error("Assessment response could not be parsed: {0}")]
    Parse(String),

    #[error("Assessment timed out")]
    Timeout,
}

/// External automated-assessment capability
#[async_trait]
pub trait RiskAssessor: Send + Sync {
    /// Assess the claim text of a notice
    async fn assess(&self, text: &str) -> Result<RiskAssessment, AssessmentError>;
}

/// Assessor that is never reachable
///
/// Default wiring when no assessment capability is configured; every intake
/// then proceeds on the fail-open default.
pub struct UnavailableAssessor;

#[async_trait]
impl RiskAssessor for UnavailableAssessor {
    async fn assess(&self, _text: &str) -> Result<RiskAssessment, AssessmentError> {
        Err(AssessmentError::Unavailable("no assessor configured".into()))
    }
}

/// Fail-open wrapper around a [`RiskAssessor`]
///
/// Bounds every call with a timeout and maps every failure mode, parse
/// failures included, to [`RiskAssessment::unavailable_default`].
pub struct RiskAssessmentAdapter {
    assessor: Arc<dyn RiskAssessor>,
    timeout: Duration,
}

impl RiskAssessmentAdapter {
    pub fn new(assessor: Arc<dyn RiskAssessor>, timeout: Duration) -> Self {
        Self { assessor, timeout }
    }

    /// Adapter with no live capability behind it
    pub fn unavailable() -> Self {
        Self::new(Arc::new(UnavailableAssessor), Duration::from_secs(5))
    }

    /// Assess, falling back to the fixed default on any failure
    ///
    /// Infallible: intake calls this without a surrounding error path.
    pub async fn assess_or_default(&self, text: &str) -> RiskAssessment {
        match tokio::time::timeout(self.timeout, self.assessor.assess(text)).await {
            Ok(Ok(assessment)) => assessment,
            Ok(Err(e)) => {
                tracing::warn!("Risk assessment failed, proceeding fail-open: {}", e);
                RiskAssessment::unavailable_default()
            }
            Err(_) => {
                tracing::warn!(
                    "Risk assessment timed out after {:?}, proceeding fail-open",
                    self.timeout
                );
                RiskAssessment::unavailable_default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct HealthyAssessor;

    #[async_trait]
    impl RiskAssessor for HealthyAssessor {
        async fn assess(&self, _text: &str) -> Result<RiskAssessment, AssessmentError> {
            Ok(RiskAssessment {
                is_valid: true,
                risk_level: RiskLevel::High,
                suggested_priority: Priority::High,
                notes: "Verified rights holder, exact match".to_string(),
            })
        }
    }

    struct SlowAssessor;

    #[async_trait]
    impl RiskAssessor for SlowAssessor {
        async fn assess(&self, _text: &str) -> Result<RiskAssessment, AssessmentError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            unreachable!("timeout fires first")
        }
    }

    struct GarbageAssessor;

    #[async_trait]
    impl RiskAssessor for GarbageAssessor {
        async fn assess(&self, _text: &str) -> Result<RiskAssessment, AssessmentError> {
            Err(AssessmentError::Parse("unexpected token '<'".into()))
        }
    }

    #[tokio::test]
    async fn test_healthy_assessment_passes_through() {
        let adapter =
            RiskAssessmentAdapter::new(Arc::new(HealthyAssessor), Duration::from_secs(1));
        let assessment = adapter.assess_or_default("claim text").await;

        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert_eq!(assessment.suggested_priority, Priority::High);
    }

    #[tokio::test]
    async fn test_timeout_fails_open() {
        let adapter =
            RiskAssessmentAdapter::new(Arc::new(SlowAssessor), Duration::from_millis(10));
        let assessment = adapter.assess_or_default("claim text").await;

        assert!(assessment.is_valid);
        assert_eq!(assessment.risk_level, RiskLevel::Medium);
        assert_eq!(assessment.suggested_priority, Priority::Normal);
        assert_eq!(assessment.notes, "Automated assessment unavailable");
    }

    #[tokio::test]
    async fn test_parse_failure_is_treated_as_unavailable() {
        let adapter =
            RiskAssessmentAdapter::new(Arc::new(GarbageAssessor), Duration::from_secs(1));
        let assessment = adapter.assess_or_default("claim text").await;

        assert_eq!(assessment.notes, "Automated assessment unavailable");
    }

    #[tokio::test]
    async fn test_unconfigured_adapter_fails_open() {
        let assessment = RiskAssessmentAdapter::unavailable()
            .assess_or_default("claim text")
            .await;
        assert!(assessment.is_valid);
    }
}
