//! Infrastructure implementations for Wellspring.
//!
//! Implements the traits defined in wellspring-core against concrete
//! backends: SQLite (via sqlx) for persistence and an OpenAI-compatible
//! endpoint (via async-openai) for completions. Also hosts the TOML
//! configuration loader.

pub mod config;
pub mod llm;
pub mod sqlite;
