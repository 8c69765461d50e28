//! Business logic for Wellspring.
//!
//! Defines the repository and provider traits that the infrastructure
//! crate implements, and the services that orchestrate them: the chat
//! flow, prompt assembly, health aggregation, and the newsletter upsert.
//! This crate never depends on wellspring-infra.

pub mod chat;
pub mod completion;
pub mod health;
pub mod newsletter;
