//! Chat sessions and the send-message pipeline.
//!
//! - `normalize`: loosely-typed payload -> [`SendMessageInput`](oration_types::chat::SendMessageInput)
//! - `title`: session title derived from the first message
//! - `prompt`: fixed assistant instruction and completion request assembly
//! - `reply`: mock and fallback assistant texts
//! - `repository`: the `ChatRepository` persistence port
//! - `service`: `ChatService`, which wires the stages together

pub mod normalize;
pub mod prompt;
pub mod reply;
pub mod repository;
pub mod service;
pub mod title;
