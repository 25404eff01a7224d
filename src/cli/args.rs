//! Command-line argument parsing for the brainstream CLI.

use clap::Parser;

use crate::config::{parse_buffer_limit, ClientConfig, ConfigError};
use crate::models::ChatRequest;

/// Stream an answer from the assistant and print it as it arrives.
#[derive(Debug, Clone, Parser)]
#[command(name = "brainstream", version, about)]
pub struct CliArgs {
    /// Message to send
    pub message: String,

    /// Base URL of the assistant server (default: $BRAINSTREAM_URL or http://localhost:8000)
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Path of the streaming endpoint (default: $BRAINSTREAM_STREAM_PATH or /api/chat/stream)
    #[arg(long, value_name = "PATH")]
    pub path: Option<String>,

    /// Cap on unterminated event data in bytes, 0 disables it
    #[arg(long, value_name = "BYTES")]
    pub max_buffer_bytes: Option<String>,

    /// Print each event as a JSON line instead of rendering text
    #[arg(long)]
    pub raw: bool,

    /// System message sent before the user message
    #[arg(long, value_name = "TEXT")]
    pub system: Option<String>,
}

impl CliArgs {
    /// Layer command-line overrides on top of `base`.
    pub fn client_config(&self, base: ClientConfig) -> Result<ClientConfig, ConfigError> {
        let mut config = base;
        if let Some(url) = &self.url {
            config = config.with_base_url(url.clone());
        }
        if let Some(path) = &self.path {
            config = config.with_stream_path(path.clone());
        }
        if let Some(raw) = &self.max_buffer_bytes {
            let stream = config.stream.clone().with_max_buffer_bytes(parse_buffer_limit(raw)?);
            config = config.with_stream(stream);
        }
        Ok(config)
    }

    pub fn chat_request(&self) -> ChatRequest {
        let request = ChatRequest::from_prompt(self.message.clone());
        match &self.system {
            Some(system) => request.with_system(system.clone()),
            None => request,
        }
    }
}
