//! Chat domain: history store trait and orchestration service.

pub mod repository;
pub mod service;
