//! CLI module for brainstream.
//!
//! Sends one chat request, renders the streamed answer to stdout, and stops
//! cleanly on Ctrl-C. A second Ctrl-C exits immediately.
//!
//! # Usage
//!
//! ```ignore
//! use brainstream::cli::{run, CliArgs};
//! use clap::Parser;
//!
//! let stats = run(CliArgs::parse()).await?;
//! ```

pub mod args;
pub mod render;

pub use args::CliArgs;
pub use render::EventRenderer;

use color_eyre::eyre::{Report, WrapErr};
use color_eyre::{Result, Section};
use futures_util::stream::{self, Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::AssistantClient;
use crate::config::{ClientConfig, ConfigError};
use crate::error::StreamError;
use crate::reassembler::StreamStats;

/// Exit status after a forced second interrupt (128 + SIGINT)
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Run a single streaming chat from parsed arguments.
///
/// Configuration comes from the environment first, then command-line flags.
pub async fn run(args: CliArgs) -> Result<StreamStats> {
    let base = ClientConfig::from_env().map_err(|e| config_failure(e, "environment"))?;
    let config = args
        .client_config(base)
        .map_err(|e| config_failure(e, "command-line"))?;
    let request = args.chat_request();

    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let client = AssistantClient::with_config(config);
    let mut renderer = EventRenderer::new(std::io::stdout(), args.raw);

    let stats = client
        .stream_chat(&request, |event| renderer.handle(&event), &cancel)
        .await
        .map_err(|e| stream_failure(e, &client.config().stream_url()))?;

    renderer.finish().wrap_err("Failed to write output")?;

    if !stats.final_received && !stats.cancelled {
        warn!("Stream ended without a final event");
    }
    debug!(?stats, "Chat stream complete");

    Ok(stats)
}

/// Build the report for a failed stream.
fn stream_failure(err: StreamError, url: &str) -> Report {
    let category = err.category();
    warn!(code = err.error_code(), category = %category, error = %err, "Chat stream failed");

    let summary = format!("{} ({})", err.user_message(), url);
    Report::new(err)
        .wrap_err(summary)
        .suggestion(category.recovery_hint())
}

/// Build the report for an invalid setting.
fn config_failure(err: ConfigError, source: &str) -> Report {
    let hint = err.category().recovery_hint();
    Report::new(err)
        .wrap_err(format!("Invalid {} configuration", source))
        .suggestion(hint)
}

/// Cancel `cancel` on the first Ctrl-C and exit on the second.
fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    let interrupts = Box::pin(stream::unfold((), |_| async {
        tokio::signal::ctrl_c().await.ok().map(|_| ((), ()))
    }));

    tokio::spawn(handle_interrupts(interrupts, cancel, || {
        eprintln!("\nInterrupted");
        std::process::exit(INTERRUPTED_EXIT_CODE);
    }));
}

async fn handle_interrupts<S, F>(mut interrupts: S, cancel: CancellationToken, force_exit: F)
where
    S: Stream<Item = ()> + Unpin,
    F: FnOnce(),
{
    if interrupts.next().await.is_none() {
        return;
    }
    debug!("Interrupt received, cancelling stream");
    cancel.cancel();

    if interrupts.next().await.is_some() {
        force_exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_buffer_limit;

    #[test]
    fn test_stream_failure_report() {
        let report = stream_failure(
            StreamError::Http {
                status: 503,
                message: "unavailable".to_string(),
            },
            "http://brain/api/chat/stream",
        );

        assert_eq!(
            report.to_string(),
            "The assistant request failed with status 503. (http://brain/api/chat/stream)"
        );
        assert_eq!(
            report.downcast_ref::<StreamError>(),
            Some(&StreamError::Http {
                status: 503,
                message: "unavailable".to_string()
            })
        );
    }

    #[test]
    fn test_config_failure_report() {
        let err = parse_buffer_limit("lots").unwrap_err();
        let report = config_failure(err.clone(), "command-line");

        assert_eq!(report.to_string(), "Invalid command-line configuration");
        assert_eq!(report.downcast_ref::<ConfigError>(), Some(&err));
    }

    #[tokio::test]
    async fn test_first_interrupt_cancels() {
        let cancel = CancellationToken::new();
        let mut exited = false;

        handle_interrupts(stream::iter(vec![()]), cancel.clone(), || exited = true).await;

        assert!(cancel.is_cancelled());
        assert!(!exited);
    }

    #[tokio::test]
    async fn test_second_interrupt_forces_exit() {
        let cancel = CancellationToken::new();
        let mut exited = false;

        handle_interrupts(stream::iter(vec![(), ()]), cancel.clone(), || exited = true).await;

        assert!(cancel.is_cancelled());
        assert!(exited);
    }

    #[tokio::test]
    async fn test_no_interrupt_leaves_token() {
        let cancel = CancellationToken::new();
        handle_interrupts(stream::iter(Vec::<()>::new()), cancel.clone(), || {}).await;
        assert!(!cancel.is_cancelled());
    }
}
