use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tail_monitor::{ConsoleReporter, TailConfig, spawn_tail};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Print a file, then print whatever gets appended to it.
#[derive(Parser, Debug)]
#[command(name = "tail-monitor", version, about)]
struct Cli {
    /// File to tail
    file: PathBuf,

    /// Poll the file every N milliseconds instead of using OS notifications
    #[arg(long, value_name = "MS")]
    poll_interval_ms: Option<u64>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "tail_monitor=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = TailConfig::new();
    if let Some(ms) = cli.poll_interval_ms {
        config = config.with_poll_interval(Duration::from_millis(ms));
    }
    tracing::debug!(?cli, ?config, "parsed CLI arguments");

    let tail = match spawn_tail(ConsoleReporter, &cli.file, config).await {
        Ok(tail) => tail,
        Err(e) => {
            eprintln!("Error tailing {}: {}", cli.file.display(), e);
            process::exit(1);
        }
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("Error waiting for Ctrl-C: {}", e);
    }
    tail.shutdown().await;
}
