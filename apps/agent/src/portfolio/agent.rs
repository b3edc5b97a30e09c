//! Generation Orchestrator — prompt in, complete HTML document out.
//!
//! Flow: resolve weights → parse prompt → build instruction → model call (with timeout)
//!       → validate output → render model content, or render the deterministic fallback.
//!
//! Three tiers:
//! 1. model content passed validation → model page
//! 2. model failed, timed out or answered garbage → fallback page from the parsed record
//! 3. weights missing or an internal failure → minimal error page
//!
//! `generate` never fails; `run` is the fallible pipeline behind it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::GenerationError;
use crate::llm_client::{GenerationParams, TextModel};
use crate::portfolio::cards::build_cards;
use crate::portfolio::model_output::{try_parse_model_output, ValidatedContent};
use crate::portfolio::parser::parse;
use crate::portfolio::prompts::build_instruction;
use crate::portfolio::record::{IgnoredLine, PortfolioRecord};
use crate::portfolio::template::{render, render_page, PageContent, RenderDefaults};

/// Marker present in every error page, so callers can tell it apart from a portfolio.
pub const FATAL_ERROR_MARKER: &str = "portfolio-fatal-error";

/// Everything the orchestrator needs besides the model handle.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    /// Resolved location of the model weights. Must exist for any page to be produced.
    pub model_path: PathBuf,
    pub model_timeout: Duration,
    pub params: GenerationParams,
    pub defaults: RenderDefaults,
}

impl AgentSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model_path: config.resolved_model_path(),
            model_timeout: config.model_timeout,
            params: GenerationParams {
                max_tokens: config.model_max_tokens,
                ..GenerationParams::default()
            },
            defaults: RenderDefaults::default(),
        }
    }
}

/// Which tier produced the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Model,
    Fallback,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct Generation {
    pub html: String,
    pub source: ContentSource,
    /// Prompt lines the parser could not use.
    pub ignored: Vec<IgnoredLine>,
}

/// Owns the model handle. Share one agent across requests: the handle is
/// `Send + Sync` and no per-request state lives here.
#[derive(Clone)]
pub struct PortfolioAgent {
    model: Arc<dyn TextModel>,
    settings: AgentSettings,
}

impl PortfolioAgent {
    pub fn new(model: Arc<dyn TextModel>, settings: AgentSettings) -> Self {
        Self { model, settings }
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    /// Always returns a renderable HTML document.
    pub async fn generate(&self, prompt_text: &str) -> String {
        match self.run(prompt_text).await {
            Ok(generation) => {
                if generation.source == ContentSource::Fallback {
                    info!(
                        "Served fallback page ({} prompt lines ignored)",
                        generation.ignored.len()
                    );
                }
                generation.html
            }
            Err(e) => {
                error!("Portfolio generation failed [{}]: {e}", e.code());
                error_page(&e)
            }
        }
    }

    /// Runs the pipeline, reporting which tier produced the page.
    ///
    /// Errors only when no page can be produced at all.
    pub async fn run(&self, prompt_text: &str) -> Result<Generation, GenerationError> {
        let span = info_span!("generate", request_id = %Uuid::new_v4());
        self.run_inner(prompt_text).instrument(span).await
    }

    async fn run_inner(&self, prompt_text: &str) -> Result<Generation, GenerationError> {
        // Step 1: weights must exist, otherwise fail closed
        self.ensure_weights().await?;

        // Step 2: parse the prompt
        let parsed = parse(prompt_text);
        for line in &parsed.ignored {
            debug!("Ignored prompt line {} ({:?}): {}", line.line, line.reason, line.text);
        }
        info!(
            "Prompt parsed: {} projects, {} style overrides, {} ignored lines",
            parsed.record.projects.len(),
            parsed.record.styles.len(),
            parsed.ignored.len()
        );

        // Steps 3–5: model-assisted attempt, validated or discarded
        let content = self.model_content(&parsed.record).await?;

        // Step 6: render whichever content survived
        let (html, source) = match content {
            Some(content) => (
                render_model_content(&parsed.record, &content, &self.settings.defaults),
                ContentSource::Model,
            ),
            None => (
                render_fallback(&parsed.record, &self.settings.defaults),
                ContentSource::Fallback,
            ),
        };

        info!("Portfolio rendered from {:?} content ({} bytes)", source, html.len());

        Ok(Generation {
            html,
            source,
            ignored: parsed.ignored,
        })
    }

    async fn ensure_weights(&self) -> Result<(), GenerationError> {
        let path = &self.settings.model_path;
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => Ok(()),
            Ok(_) => Err(GenerationError::ModelUnavailable { path: path.clone() }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(GenerationError::ModelUnavailable { path: path.clone() })
            }
            Err(e) => Err(GenerationError::Internal(
                anyhow::Error::new(e)
                    .context(format!("Cannot inspect model weights at {}", path.display())),
            )),
        }
    }

    /// `Ok(None)` means the model path failed in a recoverable way.
    async fn model_content(
        &self,
        record: &PortfolioRecord,
    ) -> Result<Option<ValidatedContent>, GenerationError> {
        let instruction = build_instruction(record);

        match self.call_model(&instruction).await {
            Ok(text) => Ok(try_parse_model_output(&text)),
            Err(e) if e.is_recoverable() => {
                warn!("Model call failed [{}], using fallback: {e}", e.code());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn call_model(&self, instruction: &str) -> Result<String, GenerationError> {
        let timeout = self.settings.model_timeout;
        let call = self.model.complete(instruction, &self.settings.params);

        let text = tokio::time::timeout(timeout, call)
            .await
            .map_err(|_| GenerationError::ModelTimeout(timeout))??;

        debug!("Model answered with {} bytes", text.len());
        Ok(text)
    }
}

/// Deterministic page: parsed record + project cards.
pub fn render_fallback(record: &PortfolioRecord, defaults: &RenderDefaults) -> String {
    let projects_html = build_cards(&record.projects, defaults);
    render(record, &projects_html, defaults)
}

/// Page from validated model content. Contact and style values still come from the record.
pub fn render_model_content(
    record: &PortfolioRecord,
    content: &ValidatedContent,
    defaults: &RenderDefaults,
) -> String {
    let base = PageContent::from_record(record, &content.projects_html, defaults);
    render_page(&PageContent {
        name: &content.name,
        profession: &content.profession,
        photo_url: &content.photo,
        bio: &content.bio,
        ..base
    })
}

/// Escape text for HTML (minimal, deterministic).
fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Minimal self-contained page describing a fatal failure.
pub fn error_page(err: &GenerationError) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Error generando el portafolio</title>
    <style>
        body {{ font-family: system-ui, sans-serif; background: #fef2f2; color: #7f1d1d; display: flex; align-items: center; justify-content: center; min-height: 100vh; margin: 0; }}
        main {{ max-width: 36rem; padding: 2rem; background: #ffffff; border-radius: 0.75rem; box-shadow: 0 10px 25px rgba(0, 0, 0, 0.08); }}
        code {{ font-size: 0.85rem; opacity: 0.7; }}
    </style>
</head>
<body>
    <main class="{marker}" data-error-code="{code}">
        <h1>No se pudo generar el portafolio</h1>
        <p>{message}</p>
        <code>{code}</code>
    </main>
</body>
</html>
"#,
        marker = FATAL_ERROR_MARKER,
        code = err.code(),
        message = esc(&err.to_string()),
    )
}
