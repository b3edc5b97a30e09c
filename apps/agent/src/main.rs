mod config;
mod errors;
mod llm_client;
mod portfolio;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlamaClient;
use crate::portfolio::{AgentSettings, PortfolioAgent};

/// Generate a portfolio HTML page from a free-text description.
#[derive(Debug, Parser)]
#[command(name = "portfolio-agent", version, about)]
struct Args {
    /// File containing the prompt. Reads stdin when omitted.
    #[arg(short, long)]
    prompt_file: Option<PathBuf>,

    /// Where to write the HTML. Writes stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Model weights path (overrides MODEL_PATH).
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// llama.cpp server URL (overrides LLM_SERVER_URL).
    #[arg(long)]
    server_url: Option<String>,

    /// Model call timeout in seconds (overrides MODEL_TIMEOUT_SECS).
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::from_env()?;
    apply_overrides(&mut config, &args);

    // Initialize structured logging. stderr only, stdout carries the HTML.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("portfolio_agent={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting portfolio-agent v{}", env!("CARGO_PKG_VERSION"));

    let prompt = read_prompt(args.prompt_file.as_deref()).await?;
    if prompt.trim().is_empty() {
        bail!("Prompt is empty");
    }

    let llm = LlamaClient::new(config.llm_server_url.clone())?;
    info!("LLM client initialized (server: {})", llm.base_url());

    let agent = PortfolioAgent::new(Arc::new(llm), AgentSettings::from_config(&config));
    info!(
        "Model weights: {} (timeout {}s)",
        agent.settings().model_path.display(),
        agent.settings().model_timeout.as_secs()
    );

    let html = agent.generate(&prompt).await;
    write_output(args.output.as_deref(), &html).await
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(path) = &args.model_path {
        config.model_path = path.clone();
    }
    if let Some(url) = &args.server_url {
        config.llm_server_url = url.clone();
    }
    if let Some(secs) = args.timeout_secs {
        config.model_timeout = Duration::from_secs(secs);
    }
}

async fn read_prompt(path: Option<&std::path::Path>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read prompt file {}", path.display())),
        None => {
            let mut prompt = String::new();
            tokio::io::stdin()
                .read_to_string(&mut prompt)
                .await
                .context("Failed to read prompt from stdin")?;
            Ok(prompt)
        }
    }
}

async fn write_output(path: Option<&std::path::Path>, html: &str) -> Result<()> {
    match path {
        Some(path) => {
            tokio::fs::write(path, html)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Portfolio written to {}", path.display());
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(html.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
