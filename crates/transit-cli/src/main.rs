//! transit - Dublin public-transport knowledge graph
//!
//! Imports the DART, LUAS and bus datasets into Neo4j and explores the
//! resulting graph.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;
mod settings;

use commands::Cli;

const DEFAULT_FILTER: &str = "transit=info,transit_graph=info,transit_core=info";
const VERBOSE_FILTER: &str = "transit=debug,transit_graph=debug,transit_core=debug";

/// Initialize tracing with optional file logging.
///
/// `RUST_LOG` wins over `--verbose`. The returned guard flushes the file
/// writer and must live until exit.
fn init_tracing(log_file: Option<&Path>, verbose: bool) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| (if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER }).into());

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if let Some(path) = log_file {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .context("Log file path has no file name")?;

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name)
            .build(dir)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        let (writer, guard) = tracing_appender::non_blocking(appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false),
            )
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        Ok(None)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_file.as_deref(), cli.verbose)?;

    cli.execute().await
}
