//! Health check result types.
//!
//! A report aggregates per-dependency checks into one overall status.
//! `HealthStatus` derives `Ord` with variants declared healthiest-first,
//! so the aggregate is simply the `max` of all sub-check statuses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status of a single dependency or of the service as a whole.
///
/// Variant order matters: `error > degraded > ok` under the derived `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
    Error,
}

/// Result of probing a single dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: HealthStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HealthCheck {
    pub fn ok() -> Self {
        Self {
            status: HealthStatus::Ok,
            detail: None,
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Error,
            detail: Some(detail.into()),
        }
    }
}

/// Aggregate health report across all probed dependencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub checks: BTreeMap<String, HealthCheck>,
}

impl HealthReport {
    /// Build a report from sub-checks; the aggregate status is the worst
    /// of all checks, or `ok` when none were probed.
    pub fn from_checks(checks: BTreeMap<String, HealthCheck>) -> Self {
        let status = checks
            .values()
            .map(|c| c.status)
            .max()
            .unwrap_or(HealthStatus::Ok);
        Self { status, checks }
    }

    /// The fast-path report: `ok`, no sub-checks, no I/O performed.
    pub fn ok() -> Self {
        Self {
            status: HealthStatus::Ok,
            checks: BTreeMap::new(),
        }
    }
}
