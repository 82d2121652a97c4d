//! Tri-state health verdict for operational surfacing.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Overall health of the caching layer.
///
/// `Degraded` is an expected, non-alerting state: no remote backend is
/// configured and the fallback map is the intended mode (e.g. local
/// development). `Unhealthy` means a remote backend is configured but
/// unreachable, which should page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Remote backend reachable and stats gatherable.
    Healthy,
    /// No remote backend configured; serving from the fallback map.
    Degraded,
    /// Remote backend configured but unreachable.
    Unhealthy,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded => write!(f, "degraded"),
            Self::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// A health verdict with backend-specific details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// The tri-state verdict.
    pub status: HealthStatus,
    /// Backend and metadata details for operators.
    pub details: Value,
}

impl HealthReport {
    /// Creates a `Healthy` report.
    #[must_use]
    pub fn healthy(details: Value) -> Self {
        Self {
            status: HealthStatus::Healthy,
            details,
        }
    }

    /// Creates a `Degraded` report.
    #[must_use]
    pub fn degraded(details: Value) -> Self {
        Self {
            status: HealthStatus::Degraded,
            details,
        }
    }

    /// Creates an `Unhealthy` report.
    #[must_use]
    pub fn unhealthy(details: Value) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            details,
        }
    }

    /// Returns `true` if the verdict is `Healthy`.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}
