//! Failures of a single generative backend attempt.

use thiserror::Error;

use crate::model::ModelCandidate;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("model '{0}' not found")]
    ModelNotFound(ModelCandidate),

    #[error("backend request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("backend transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned no text")]
    EmptyResponse,

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Whether retrying the same candidate could plausibly succeed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Permanent,
    Transient,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Permanent => "permanent",
            FailureKind::Transient => "transient",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BackendError {
    pub fn kind(&self) -> FailureKind {
        match self {
            BackendError::ModelNotFound(_) => FailureKind::Permanent,
            BackendError::Http { status: 404, .. } => FailureKind::Permanent,
            other => {
                let msg = other.to_string().to_lowercase();
                if msg.contains("not found") || msg.contains("404") || msg.contains("unsupported")
                {
                    FailureKind::Permanent
                } else {
                    FailureKind::Transient
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_is_permanent() {
        let err = BackendError::ModelNotFound("gemini-0.1-nope".into());
        assert_eq!(err.kind(), FailureKind::Permanent);
    }

    #[test]
    fn status_404_is_permanent() {
        let err = BackendError::Http { status: 404, message: "gone".into() };
        assert_eq!(err.kind(), FailureKind::Permanent);
    }

    #[test]
    fn unsupported_message_is_permanent() {
        let err = BackendError::Http {
            status: 400,
            message: "generateContent is unsupported for this model".into(),
        };
        assert_eq!(err.kind(), FailureKind::Permanent);
    }

    #[test]
    fn quota_and_parse_failures_are_transient() {
        let quota = BackendError::Http { status: 429, message: "quota exceeded".into() };
        assert_eq!(quota.kind(), FailureKind::Transient);

        let parse = BackendError::Malformed("no JSON object in reply".into());
        assert_eq!(parse.kind(), FailureKind::Transient);
        assert_eq!(BackendError::EmptyResponse.kind(), FailureKind::Transient);
    }
}
