//! Error Types
//!
//! Typed failures of the remote store and the note editor.

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Liste non trouvée")]
    NotFound,
    #[error("Accès non autorisé")]
    Unauthorized,
    #[error("Code d'accès incorrect")]
    IncorrectCode,
    #[error("Serveur injoignable")]
    NetworkUnreachable,
    #[error("Échec de l'opération: {operation}")]
    ValidationFailed { operation: &'static str },
    #[error("Réponse illisible: {0}")]
    Decode(String),
}

impl ApiError {
    /// The stored token no longer grants access: go back to the access flow
    pub fn requires_access(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::NetworkUnreachable
        }
    }
}

/// Editor operation refused by the note's current state
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("note is pinned; unpin it before editing")]
    Pinned,
    #[error("note is already pinned")]
    AlreadyPinned,
    #[error("note is not pinned")]
    NotPinned,
    #[error("a pin request is already in flight")]
    PinPending,
    #[error("note is not saved yet")]
    NotSaved,
    #[error("no checklist item at index {0}")]
    NoSuchItem(usize),
    #[error("color {0} is not in the palette")]
    UnknownColor(String),
    #[error("empty checklist text")]
    EmptyItem,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unauthorized_requires_access() {
        assert!(ApiError::Unauthorized.requires_access());
        assert!(!ApiError::NotFound.requires_access());
        assert!(!ApiError::NetworkUnreachable.requires_access());
        assert!(!ApiError::ValidationFailed { operation: "update note" }.requires_access());
    }

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::IncorrectCode.to_string(), "Code d'accès incorrect");
        assert_eq!(
            ApiError::ValidationFailed { operation: "delete note" }.to_string(),
            "Échec de l'opération: delete note"
        );
    }
}
