//! Token ledger daemon — hosts one in-memory ledger for the life of the process.

use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use token_node::tracing_spans::request_span;
use token_node::{handle_line, LedgerHost, NodeConfig};
use token_nullables::NullStore;
use token_utils::LogFormat;

#[derive(Parser)]
#[command(name = "token-daemon", about = "Fungible token ledger daemon")]
struct Cli {
    /// Total supply fixed at initialization.
    #[arg(long, env = "TOKEN_TOTAL_SUPPLY")]
    total_supply: Option<u64>,

    /// Account credited with the whole supply at initialization.
    #[arg(long, env = "TOKEN_ISSUER")]
    issuer: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "TOKEN_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "TOKEN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print Prometheus metrics to stderr on shutdown.
    #[arg(long, env = "TOKEN_ENABLE_METRICS")]
    metrics: bool,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Serve newline-delimited JSON requests on stdin, one response line each on stdout.
    Run,
    /// Print the effective configuration as TOML and exit.
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(path)?,
        None => NodeConfig::default(),
    };

    let config = NodeConfig {
        total_supply: cli.total_supply.unwrap_or(file_config.total_supply),
        issuer: cli.issuer.or(file_config.issuer),
        log_format: cli.log_format.unwrap_or(file_config.log_format),
        log_level: cli.log_level.unwrap_or(file_config.log_level),
        enable_metrics: cli.metrics || file_config.enable_metrics,
    };

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Run => {
            token_utils::init_logging(config.log_format, &config.log_level)
                .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;
            if let Some(path) = &cli.config {
                tracing::info!("Loaded config from {}", path.display());
            }
            run(config).await?;
        }
    }

    Ok(())
}

async fn run(config: NodeConfig) -> anyhow::Result<()> {
    let host = LedgerHost::new(NullStore::new(), &config)?;
    tracing::info!(
        "Serving ledger (supply {}, issuer {}) on stdin/stdout",
        config.total_supply,
        config.issuer.as_deref().unwrap_or("none")
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut line_no = 0u64;

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received — stopping");
                break;
            }
        };
        let Some(line) = line else {
            tracing::info!("stdin closed — stopping");
            break;
        };
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let response = {
            let _span = request_span(line_no).entered();
            handle_line(&host, &line)
        };
        stdout.write_all(response.to_line().as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    let snapshot = host.snapshot()?;
    tracing::info!(
        accounts = snapshot.account_count(),
        circulating = %snapshot.circulating(),
        hash = %snapshot.hash_hex(),
        "final ledger state"
    );
    if config.enable_metrics {
        eprint!("{}", host.metrics().encode()?);
    }

    tracing::info!("token daemon exited cleanly");
    Ok(())
}
