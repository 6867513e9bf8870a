//! HostError - Failures surfaced by host ports

/// Failures reported by host collaborators
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("invalid document path: {0}")]
    InvalidPath(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// The host refused the operation
    #[error("rejected by host: {0}")]
    Rejected(String),
}

impl HostError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        HostError::NotFound { kind, id: id.to_string() }
    }

    pub fn serialization(message: impl ToString) -> Self {
        HostError::Serialization(message.to_string())
    }
}

impl From<serde_json::Error> for HostError {
    fn from(error: serde_json::Error) -> Self {
        HostError::serialization(error)
    }
}
