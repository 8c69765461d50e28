//! Health check HTTP handler.
//!
//! GET /health?include={basic|dependencies|all}
//!
//! `basic` (the default) skips dependency probing entirely; the other
//! modes probe each dependency and aggregate the worst status.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use wellspring_types::health::{HealthReport, HealthStatus};

use crate::state::AppState;

/// Which checks to run.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IncludeMode {
    #[default]
    Basic,
    Dependencies,
    All,
}

impl IncludeMode {
    fn probes_dependencies(self) -> bool {
        !matches!(self, IncludeMode::Basic)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HealthQuery {
    #[serde(default)]
    pub include: IncludeMode,
}

/// GET /health - Evaluate service health.
pub async fn health_check(
    State(state): State<AppState>,
    Query(query): Query<HealthQuery>,
) -> (StatusCode, Json<HealthReport>) {
    let report = state
        .health_service
        .evaluate(query.include.probes_dependencies())
        .await;

    let status = if report.status == HealthStatus::Error {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (status, Json(report))
}
