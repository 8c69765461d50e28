//! Newsletter signup HTTP handler.

use axum::Json;
use axum::extract::State;

use wellspring_types::newsletter::{NewsletterResponse, NewsletterSignup};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /newsletter - Record a signup (idempotent upsert by email).
pub async fn subscribe(
    State(state): State<AppState>,
    Json(payload): Json<NewsletterSignup>,
) -> Result<Json<NewsletterResponse>, AppError> {
    let response = state.newsletter_service.subscribe(payload).await?;
    Ok(Json(response))
}
