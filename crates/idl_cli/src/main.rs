//! idl-etch - generate MDN documentation skeletons from WebIDL
//!
//! # Environment Variables
//!
//! - `IDL_ETCH_LOG` - Log level (default: "info")

mod cli;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // IDL_ETCH_LOG env var for log level configuration, default to "info"
    let filter =
        EnvFilter::try_from_env("IDL_ETCH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    cli::CommandLineInterface::load().execute().await
}
