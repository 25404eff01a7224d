//! Brainstream - reassembles an assistant's Server-Sent Events response into
//! typed events.
//!
//! This library exposes modules for use by the CLI and in integration tests.

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod prelude;
pub mod reassembler;
pub mod sse;
pub mod traits;
