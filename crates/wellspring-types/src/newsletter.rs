//! Newsletter signup types.
//!
//! A simple upsert path outside the chat orchestration core: one signup
//! record keyed by email, with free-form metadata.

use serde::{Deserialize, Serialize};

fn default_source() -> String {
    "api".to_string()
}

/// A newsletter signup request/record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterSignup {
    pub email: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Response confirming a signup was recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterResponse {
    pub status: String,
}

impl NewsletterResponse {
    pub fn subscribed() -> Self {
        Self {
            status: "subscribed".to_string(),
        }
    }
}
