use crate::model::Key;

/// Failure of a call against a REST resource.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Key },

    #[error("validation failed: {message}")]
    Validation {
        /// Machine-readable error key reported by the backend (`idexists`, `idnull`, ...).
        key: Option<String>,
        message: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server responded with {status}: {message}")]
    Server { status: u16, message: String },

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn validation(key: &str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            key: Some(key.to_string()),
            message: message.into(),
        }
    }

    /// Backend error key, when the failure carried one.
    pub fn error_key(&self) -> Option<&str> {
        match self {
            ApiError::Validation { key, .. } => key.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}
