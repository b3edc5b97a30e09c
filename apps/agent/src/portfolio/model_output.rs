//! Model Output Validator: turns raw model text into trusted page content, or nothing.
//!
//! The model is an untrusted, best-effort source. Its answer is accepted only when it
//! is a JSON object with every required field non-blank and a `projects` fragment
//! wrapped in the grid marker. Anything else sends the caller to the fallback path.

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::llm_client::prompts::END_OF_OUTPUT;
use crate::llm_client::strip_json_fences;
use crate::portfolio::cards::PROJECTS_GRID_MARKER;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelOutputError {
    #[error("no JSON object found in model output")]
    NoJsonObject,

    #[error("model output is not valid JSON: {0}")]
    Json(String),

    #[error("model output is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("projects fragment lacks the 'projects-grid' wrapper")]
    MissingProjectsMarker,
}

/// Wire shape of the model's answer. Every field is optional here so that a
/// missing one is reported by name instead of as a generic serde error.
#[derive(Debug, Default, Deserialize)]
struct RawModelContent {
    name: Option<String>,
    profession: Option<String>,
    photo: Option<String>,
    bio: Option<String>,
    projects: Option<String>,
}

/// Model content that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedContent {
    pub name: String,
    pub profession: String,
    pub photo: String,
    pub bio: String,
    /// Pre-rendered HTML fragment, already wrapped in the grid.
    pub projects_html: String,
}

/// Returns the outermost `{ ... }` slice of the text, if any.
fn extract_json_object(text: &str) -> Option<&str> {
    let text = text.split(END_OF_OUTPUT).next().unwrap_or(text);
    let text = strip_json_fences(text);
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ModelOutputError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ModelOutputError::MissingField(field))
}

/// Parses and validates the model's answer.
pub fn parse_model_output(text: &str) -> Result<ValidatedContent, ModelOutputError> {
    let json = extract_json_object(text).ok_or(ModelOutputError::NoJsonObject)?;
    let raw: RawModelContent =
        serde_json::from_str(json).map_err(|e| ModelOutputError::Json(e.to_string()))?;

    let content = ValidatedContent {
        name: required(raw.name, "name")?,
        profession: required(raw.profession, "profession")?,
        photo: required(raw.photo, "photo")?,
        bio: required(raw.bio, "bio")?,
        projects_html: required(raw.projects, "projects")?,
    };

    if !content.projects_html.contains(PROJECTS_GRID_MARKER) {
        return Err(ModelOutputError::MissingProjectsMarker);
    }

    Ok(content)
}

/// First stage of the generation pipeline: `None` means "use the fallback".
pub fn try_parse_model_output(text: &str) -> Option<ValidatedContent> {
    match parse_model_output(text) {
        Ok(content) => Some(content),
        Err(e) => {
            warn!("Rejected model output: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_json() -> String {
        serde_json::json!({
            "name": "Ana Pérez",
            "profession": "Diseñadora UX",
            "photo": "https://img.example.com/ana.png",
            "bio": "Diseño productos digitales centrados en las personas.",
            "projects": "<div class=\"projects-grid\"><div class=\"project-card\">App</div></div>"
        })
        .to_string()
    }

    #[test]
    fn test_accepts_valid_output() {
        let content = parse_model_output(&valid_json()).unwrap();
        assert_eq!(content.name, "Ana Pérez");
        assert_eq!(content.profession, "Diseñadora UX");
        assert!(content.projects_html.contains("project-card"));
    }

    #[test]
    fn test_accepts_output_with_noise_and_end_marker() {
        let text = format!("Claro, aquí está:\n```json\n{}\n```\n<<FIN>> y algo más }}", valid_json());
        assert!(parse_model_output(&text).is_ok());
    }

    #[test]
    fn test_rejects_plain_text() {
        assert_eq!(
            parse_model_output("Lo siento, no puedo ayudar con eso."),
            Err(ModelOutputError::NoJsonObject)
        );
    }

    #[test]
    fn test_rejects_truncated_json() {
        let result = parse_model_output(r#"{"name": "Ana", "profession": "Dev}"#);
        assert!(matches!(result, Err(ModelOutputError::Json(_))));
    }

    #[test]
    fn test_rejects_missing_field() {
        let text = r#"{"name": "Ana", "profession": "Dev", "photo": "a.png", "projects": "<div class=\"projects-grid\"></div>"}"#;
        assert_eq!(
            parse_model_output(text),
            Err(ModelOutputError::MissingField("bio"))
        );
    }

    #[test]
    fn test_rejects_blank_field() {
        let text = r#"{"name": "  ", "profession": "Dev", "photo": "a.png", "bio": "b", "projects": "<div class=\"projects-grid\"></div>"}"#;
        assert_eq!(
            parse_model_output(text),
            Err(ModelOutputError::MissingField("name"))
        );
    }

    #[test]
    fn test_rejects_projects_without_marker() {
        let text = r#"{"name": "Ana", "profession": "Dev", "photo": "a.png", "bio": "b", "projects": "<ul><li>App</li></ul>"}"#;
        assert_eq!(
            parse_model_output(text),
            Err(ModelOutputError::MissingProjectsMarker)
        );
    }

    #[test]
    fn test_try_parse_maps_errors_to_none() {
        assert!(try_parse_model_output("```").is_none());
        assert!(try_parse_model_output(&valid_json()).is_some());
    }
}
