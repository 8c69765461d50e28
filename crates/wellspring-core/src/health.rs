//! Health aggregation across service dependencies.
//!
//! Each dependency is probed independently; one failing probe never
//! prevents the others from being evaluated. The aggregate status is the
//! worst of all sub-checks.

use std::collections::BTreeMap;

use tracing::warn;
use wellspring_types::health::{HealthCheck, HealthReport};

use crate::chat::repository::HistoryStore;

/// Composes dependency probes into one overall status.
pub struct HealthService<S: HistoryStore> {
    store: S,
}

impl<S: HistoryStore> HealthService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Evaluate service health.
    ///
    /// With `include_dependencies = false` this is a fast path: `ok`,
    /// no sub-checks, no I/O. Otherwise every known dependency is
    /// probed (currently: the store).
    pub async fn evaluate(&self, include_dependencies: bool) -> HealthReport {
        if !include_dependencies {
            return HealthReport::ok();
        }

        let mut checks = BTreeMap::new();

        let database = match self.store.ping().await {
            Ok(()) => HealthCheck::ok(),
            Err(err) => {
                warn!(error = %err, "database health probe failed");
                HealthCheck::error(err.to_string())
            }
        };
        checks.insert("database".to_string(), database);

        HealthReport::from_checks(checks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use wellspring_types::chat::{ChatMessage, MessageRecord, SessionSummary};
    use wellspring_types::error::RepositoryError;
    use wellspring_types::health::HealthStatus;

    struct ProbeStore {
        healthy: bool,
    }

    impl HistoryStore for ProbeStore {
        async fn fetch_history(
            &self,
            _session_id: &Uuid,
            _limit: u32,
        ) -> Result<Vec<ChatMessage>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn store_messages(
            &self,
            _records: &[MessageRecord],
        ) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn upsert_session_summary(
            &self,
            _summary: &SessionSummary,
        ) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn ping(&self) -> Result<(), RepositoryError> {
            if self.healthy {
                Ok(())
            } else {
                Err(RepositoryError::Connection)
            }
        }
    }

    #[tokio::test]
    async fn test_basic_check_skips_probes() {
        let service = HealthService::new(ProbeStore { healthy: false });
        let report = service.evaluate(false).await;
        assert_eq!(report.status, HealthStatus::Ok);
        assert!(report.checks.is_empty());
    }

    #[tokio::test]
    async fn test_healthy_database_aggregates_ok() {
        let service = HealthService::new(ProbeStore { healthy: true });
        let report = service.evaluate(true).await;
        assert_eq!(report.status, HealthStatus::Ok);
        assert_eq!(report.checks["database"].status, HealthStatus::Ok);
    }

    #[tokio::test]
    async fn test_failing_database_aggregates_error() {
        let service = HealthService::new(ProbeStore { healthy: false });
        let report = service.evaluate(true).await;
        assert_eq!(report.status, HealthStatus::Error);
        let check = &report.checks["database"];
        assert_eq!(check.status, HealthStatus::Error);
        assert!(check.detail.as_deref().unwrap().contains("connection"));
    }
}
