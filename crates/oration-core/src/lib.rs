//! Business logic and repository trait definitions for Oration.
//!
//! This crate defines the "ports" (the `ChatRepository` and
//! `ProviderConnector` traits) that the infrastructure layer implements,
//! plus the send-message pipeline built on top of them. It depends only on
//! `oration-types` -- never on `oration-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
