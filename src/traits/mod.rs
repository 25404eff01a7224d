//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - Streaming HTTP POST used to open an assistant response

pub mod http;

pub use http::{is_null_body_status, ByteStream, Headers, HttpClient, HttpError};
