//! Infrastructure layer for Oration.
//!
//! Contains implementations of the ports defined in `oration-core`: the SQLite
//! chat repository, the Gemini and OpenAI providers with their connector,
//! plus configuration loading and the data directory layout.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod sqlite;
