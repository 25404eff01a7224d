//! Mock implementations for testing.
//!
//! Enables exercising the stream consumer without network access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client replaying configured body chunks

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
