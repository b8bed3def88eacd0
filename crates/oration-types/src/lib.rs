//! Shared domain types for Oration.
//!
//! This crate contains the core domain types used across the Oration chat
//! service: sessions, messages, LLM request shapes, provider configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror, secrecy.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
