//! Newsletter signup service.
//!
//! A single idempotent upsert keyed by email, with basic input
//! validation. No orchestration beyond that.

use tracing::info;
use wellspring_types::error::{ChatError, RepositoryError};
use wellspring_types::newsletter::{NewsletterResponse, NewsletterSignup};

/// Store trait for newsletter signups.
///
/// Implemented in wellspring-infra alongside the history store.
pub trait NewsletterStore: Send + Sync {
    /// Idempotent upsert keyed by email.
    fn store_signup(
        &self,
        signup: &NewsletterSignup,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

pub struct NewsletterService<S: NewsletterStore> {
    store: S,
}

impl<S: NewsletterStore> NewsletterService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a signup, normalizing the email to lowercase.
    pub async fn subscribe(
        &self,
        mut signup: NewsletterSignup,
    ) -> Result<NewsletterResponse, ChatError> {
        let email = signup.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(ChatError::Validation(
                "a valid email address is required".to_string(),
            ));
        }
        signup.email = email;

        self.store.store_signup(&signup).await?;
        info!(source = %signup.source, "newsletter signup recorded");

        Ok(NewsletterResponse::subscribed())
    }
}
