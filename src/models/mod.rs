//! Request models for the assistant API.

mod request;

pub use request::{ChatMessage, ChatRequest, Role};
