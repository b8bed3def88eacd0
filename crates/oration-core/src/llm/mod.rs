//! LLM provider abstractions for Oration.
//!
//! This module defines the core traits and utilities for LLM provider integration:
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `ProviderConnector`: port that builds a live provider for a `ProviderKind`
//! - `selector`: pure choice between the mock responder and the live providers

pub mod box_provider;
pub mod connector;
pub mod provider;
pub mod selector;
