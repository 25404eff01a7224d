//! Assistant API client.
//!
//! Opens a streaming chat response over the [`HttpClient`] seam and feeds the
//! body through the reassembler.

use std::pin::Pin;

use futures_util::stream::{self, Stream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::error::StreamError;
use crate::models::ChatRequest;
use crate::reassembler::{consume_with_config, event_stream, StreamStats};
use crate::sse::StreamEvent;
use crate::traits::{ByteStream, Headers, HttpClient};

/// Boxed stream of reassembled events
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, StreamError>> + Send>>;

/// Client for the assistant's streaming chat endpoint.
///
/// Generic over the HTTP transport so tests can substitute
/// [`MockHttpClient`](crate::adapters::MockHttpClient).
pub struct AssistantClient<C: HttpClient = ReqwestHttpClient> {
    config: ClientConfig,
    http: C,
}

impl AssistantClient<ReqwestHttpClient> {
    /// Create a client with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with a custom configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            config,
            http: ReqwestHttpClient::new(),
        }
    }
}

impl Default for AssistantClient<ReqwestHttpClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: HttpClient> AssistantClient<C> {
    /// Create a client over a custom HTTP transport.
    pub fn with_http_client(config: ClientConfig, http: C) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http_client(&self) -> &C {
        &self.http
    }

    /// Send a chat request and dispatch each response event to `on_event`.
    ///
    /// Cancellation also ends a request still waiting for response headers;
    /// the returned stats then have `cancelled` set and no event is dispatched.
    ///
    /// # Errors
    /// - [`StreamError::Http`] on a non-2xx status, before any event
    /// - [`StreamError::MissingBody`] when the response has no body
    /// - any fatal error from [`consume_with_config`]
    pub async fn stream_chat<F>(
        &self,
        request: &ChatRequest,
        on_event: F,
        cancel: &CancellationToken,
    ) -> Result<StreamStats, StreamError>
    where
        F: FnMut(StreamEvent),
    {
        match self.open_unless_cancelled(request, cancel).await? {
            Some(body) => consume_with_config(body, on_event, cancel, &self.config.stream).await,
            None => Ok(StreamStats {
                cancelled: true,
                ..StreamStats::default()
            }),
        }
    }

    /// Send a chat request and return the response as a stream of events.
    ///
    /// If `cancel` fires before the response arrives, the stream is empty.
    pub async fn stream_events(
        &self,
        request: &ChatRequest,
        cancel: CancellationToken,
    ) -> Result<EventStream, StreamError> {
        match self.open_unless_cancelled(request, &cancel).await? {
            Some(body) => Ok(Box::pin(event_stream(
                body,
                self.config.stream.clone(),
                cancel,
            ))),
            None => Ok(Box::pin(stream::empty())),
        }
    }

    /// Open the response body, or `None` once `cancel` fires.
    async fn open_unless_cancelled(
        &self,
        request: &ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<ByteStream>, StreamError> {
        if cancel.is_cancelled() {
            debug!("Chat request cancelled before sending");
            return Ok(None);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Chat request cancelled while waiting for a response");
                Ok(None)
            }
            opened = self.open(request) => opened.map(Some),
        }
    }

    async fn open(&self, request: &ChatRequest) -> Result<ByteStream, StreamError> {
        let url = self.config.stream_url();
        let body = serde_json::to_string(request)?;

        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        info!(url = %url, messages = request.messages.len(), "Opening chat stream");

        Ok(self.http.post_stream(&url, &body, &headers).await?)
    }
}
