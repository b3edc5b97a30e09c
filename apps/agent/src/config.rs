use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_MODEL_PATH: &str = "ia/model/deepseek-coder.gguf";
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numbers are a startup error.
#[derive(Debug, Clone)]
pub struct Config {
    pub model_path: PathBuf,
    pub model_base_dir: PathBuf,
    pub llm_server_url: String,
    pub model_timeout: Duration,
    pub model_max_tokens: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let model_base_dir = match std::env::var("MODEL_BASE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir().context("Cannot determine current directory")?,
        };

        Ok(Config {
            model_path: PathBuf::from(env_or("MODEL_PATH", DEFAULT_MODEL_PATH)),
            model_base_dir,
            llm_server_url: env_or("LLM_SERVER_URL", DEFAULT_SERVER_URL),
            model_timeout: Duration::from_secs(
                env_or("MODEL_TIMEOUT_SECS", "120")
                    .parse::<u64>()
                    .context("MODEL_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            model_max_tokens: env_or("MODEL_MAX_TOKENS", "2048")
                .parse::<u32>()
                .context("MODEL_MAX_TOKENS must be a positive integer")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// Absolute location of the model weights.
    pub fn resolved_model_path(&self) -> PathBuf {
        resolve_model_path(&self.model_base_dir, &self.model_path)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Relative weight paths are anchored at the deployment's base directory.
pub fn resolve_model_path(base_dir: &Path, model_path: &Path) -> PathBuf {
    if model_path.is_absolute() {
        model_path.to_path_buf()
    } else {
        base_dir.join(model_path)
    }
}
