//! Shared domain types for Wellspring.
//!
//! This crate defines the data shapes exchanged between the HTTP layer,
//! the chat orchestration core, and the infrastructure adapters. It has
//! no I/O and no dependencies on the rest of the workspace.

pub mod chat;
pub mod config;
pub mod error;
pub mod health;
pub mod newsletter;
