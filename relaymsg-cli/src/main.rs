//! relaymsg: entry point.
//!
//! ```text
//! relaymsg --host H --port P "message" ...   Send each message as one line
//! echo hi | relaymsg --host H --port P       Send each stdin line
//! relaymsg --config <path> ...               Load a custom config TOML
//! relaymsg --gen-config                      Write default config to stdout
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use relaymsg_cli::app::relay_all;
use relaymsg_cli::config::RelayConfig;
use relaymsg_core::SecureSender;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "relaymsg", about = "Send text lines over TLS, one connection per message")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "relaymsg.toml")]
    config: PathBuf,

    /// Destination host (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Destination port (overrides config).
    #[arg(short, long)]
    port: Option<String>,

    /// Extra PEM trust roots (overrides config).
    #[arg(long)]
    ca_file: Option<String>,

    /// Do not load the platform trust store.
    #[arg(long)]
    no_native_roots: bool,

    /// Print notifications as JSON lines.
    #[arg(long)]
    json: bool,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    /// Messages to send. Read from stdin, one per line, when omitted.
    messages: Vec<String>,
}

async fn read_stdin_lines() -> std::io::Result<Vec<String>> {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut out = Vec::new();
    while let Some(line) = lines.next_line().await? {
        out.push(line);
    }
    Ok(out)
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // --gen-config: dump defaults and exit.
    if cli.gen_config {
        let text = toml::to_string_pretty(&RelayConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    // Load config, then apply flag overrides.
    let mut config = RelayConfig::load(&cli.config);
    if let Some(host) = cli.host {
        config.destination.host = host;
    }
    if let Some(port) = cli.port {
        config.destination.port = port;
    }
    if let Some(ca_file) = cli.ca_file {
        config.tls.ca_file = ca_file;
    }
    if cli.no_native_roots {
        config.tls.native_roots = false;
    }

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("relaymsg v{}", env!("CARGO_PKG_VERSION"));

    let sender = SecureSender::from_settings(&config.to_tls_settings()?)?;

    let messages = if cli.messages.is_empty() {
        read_stdin_lines().await?
    } else {
        cli.messages
    };

    let mut stdout = std::io::stdout();
    let report = relay_all(
        &sender,
        &config.destination.host,
        &config.destination.port,
        &messages,
        &mut stdout,
        cli.json,
    )
    .await?;

    info!("{} sent, {} failed", report.sent, report.failed);
    if !report.all_sent() {
        std::process::exit(1);
    }
    Ok(())
}
