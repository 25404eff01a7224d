use brainstream::cli::{run, CliArgs};

use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let stats = run(args).await?;
    if stats.cancelled {
        eprintln!("\n(cancelled)");
    } else {
        println!();
    }

    Ok(())
}
