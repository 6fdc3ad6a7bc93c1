use thiserror::Error;

/// Generic message used when the service rejects a run without saying why.
pub const GENERIC_FAILURE: &str = "Something went wrong";

/// Everything that can end a pipeline run in `Failed`.
///
/// `Display` is exactly the carried message so it can be shown to the user
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// User input problem: no file, wrong extension, run already in flight.
    #[error("{reason}")]
    Validation { reason: String },

    /// Network or service problem: unreachable endpoint, non-2xx status,
    /// undecodable body.
    #[error("{message}")]
    Transport { message: String },
}

impl PipelineError {
    pub fn validation(reason: impl Into<String>) -> Self {
        PipelineError::Validation {
            reason: reason.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        PipelineError::Transport {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            PipelineError::Validation { reason } => reason,
            PipelineError::Transport { message } => message,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, PipelineError::Validation { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, PipelineError::Transport { .. })
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PipelineError::transport(format!("Request timed out: {}", err))
        } else {
            PipelineError::transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::transport(format!("Malformed analysis response: {}", err))
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No completed analysis to export")]
    NoResult,

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        assert_eq!(PipelineError::transport("bad file").to_string(), "bad file");
        assert_eq!(
            PipelineError::validation("No file selected").to_string(),
            "No file selected"
        );
    }

    #[test]
    fn json_errors_become_transport_errors() {
        let err: PipelineError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.is_transport());
        assert!(err.message().starts_with("Malformed analysis response"));
    }
}
