use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Errors that can stop or degrade a generation.
///
/// Only `ModelUnavailable` and `Internal` ever reach the caller, as an error page.
/// The model variants are recovered by the deterministic fallback.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Model weights not found at {}", .path.display())]
    ModelUnavailable { path: PathBuf },

    #[error("Model call timed out after {}s", .0.as_secs())]
    ModelTimeout(Duration),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl GenerationError {
    /// Stable machine-readable code, used in logs and on the error page.
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::ModelUnavailable { .. } => "MODEL_UNAVAILABLE",
            GenerationError::ModelTimeout(_) => "MODEL_TIMEOUT",
            GenerationError::Llm(_) => "LLM_ERROR",
            GenerationError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True when the deterministic fallback can still produce a page.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GenerationError::ModelTimeout(_) | GenerationError::Llm(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let missing = GenerationError::ModelUnavailable {
            path: PathBuf::from("ia/model/x.gguf"),
        };
        assert_eq!(missing.code(), "MODEL_UNAVAILABLE");
        assert_eq!(
            GenerationError::ModelTimeout(Duration::from_secs(5)).code(),
            "MODEL_TIMEOUT"
        );
        assert_eq!(GenerationError::Llm(LlmError::EmptyContent).code(), "LLM_ERROR");
    }

    #[test]
    fn test_messages_mention_details() {
        let missing = GenerationError::ModelUnavailable {
            path: PathBuf::from("ia/model/x.gguf"),
        };
        assert!(missing.to_string().contains("ia/model/x.gguf"));
        assert_eq!(
            GenerationError::ModelTimeout(Duration::from_secs(30)).to_string(),
            "Model call timed out after 30s"
        );
    }

    #[test]
    fn test_only_model_call_failures_are_recoverable() {
        assert!(GenerationError::ModelTimeout(Duration::from_secs(1)).is_recoverable());
        assert!(GenerationError::Llm(LlmError::EmptyContent).is_recoverable());
        assert!(!GenerationError::ModelUnavailable {
            path: PathBuf::from("x")
        }
        .is_recoverable());
        assert!(!GenerationError::Internal(anyhow::anyhow!("boom")).is_recoverable());
    }
}
