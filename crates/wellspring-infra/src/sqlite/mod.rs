//! SQLite persistence layer.

pub mod history;
pub mod newsletter;
pub mod pool;
