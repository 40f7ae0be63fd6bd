//! `dns-health` entry point.
//!
//! Runs one analysis and prints the report as JSON on stdout. Logs go to
//! stderr so the output can be piped.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use dns_health_engine::{AnalyzerConfig, HealthAnalyzer, ResolverEndpoint, Transport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Score the DNS health of a domain.
#[derive(Debug, Parser)]
#[command(name = "dns-health", version, about)]
struct Cli {
    /// Domain or URL to analyze (e.g. `example.com` or `https://example.com/`)
    domain: String,

    /// TOML configuration file
    #[arg(short, long, env = "DNS_HEALTH_CONFIG")]
    config: Option<PathBuf>,

    /// Per-query timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// DNS-over-HTTPS JSON endpoint used as the primary resolver
    #[arg(long, conflicts_with = "system_resolver")]
    resolver: Option<String>,

    /// Use the host resolver configuration as the primary resolver
    #[arg(long)]
    system_resolver: bool,

    /// Print the report on a single line
    #[arg(long)]
    compact: bool,
}

impl Cli {
    fn load_config(&self) -> Result<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                AnalyzerConfig::from_toml(&text)
                    .with_context(|| format!("Invalid config file {}", path.display()))?
            }
            None => AnalyzerConfig::default(),
        };

        if let Some(secs) = self.timeout {
            config.query_timeout_secs = secs;
        }
        if let Some(url) = &self.resolver {
            config.primary = ResolverEndpoint::doh("custom", url);
        } else if self.system_resolver {
            config.primary = ResolverEndpoint {
                name: "system".to_string(),
                transport: Transport::System,
            };
        }
        Ok(config)
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;
    let analyzer =
        HealthAnalyzer::from_config(&config).context("Failed to initialize the analyzer")?;

    let report = analyzer.analyze(&cli.domain).await;

    let output = if cli.compact {
        serde_json::to_string(&report)
    } else {
        serde_json::to_string_pretty(&report)
    }
    .context("Failed to serialize report")?;
    println!("{output}");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .init();

    let cli = Cli::parse();
    tracing::debug!("Analyzing {}", cli.domain);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
