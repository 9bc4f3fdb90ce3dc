use crate::models::ErrorResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkClientError {
    // HTTP ошибки
    #[cfg(feature = "native")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    // Ответы сервера с кодом ошибки
    #[error("Resource not found")]
    NotFound(Option<String>),

    #[error("Unauthorized: {}", .0.as_deref().unwrap_or("no detail"))]
    Unauthorized(Option<String>),

    #[error("Forbidden: {}", .0.as_deref().unwrap_or("no detail"))]
    Forbidden(Option<String>),

    #[error("Invalid request: {}", .0.as_deref().unwrap_or("no detail"))]
    InvalidRequest(Option<String>),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    // Транспортные ошибки
    #[error("Transport error: {0}")]
    TransportError(String),

    // Ошибки сериализации/десериализации
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // Локальное хранилище сессии
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl NetworkClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, NetworkClientError::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, NetworkClientError::Unauthorized(_))
    }

    /// Message the backend put in a JSON `detail` field, if any. Server
    /// failures (`Status`) never carry one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            NetworkClientError::NotFound(detail)
            | NetworkClientError::Unauthorized(detail)
            | NetworkClientError::Forbidden(detail)
            | NetworkClientError::InvalidRequest(detail) => detail.as_deref(),
            _ => None,
        }
    }

    /// Maps a non-success status and its raw body to an error. Only a JSON
    /// `detail` becomes the user-facing detail; HTML pages and other bodies are
    /// kept for `Status` display only.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|e| e.detail.message());

        match status {
            400 | 409 | 422 => NetworkClientError::InvalidRequest(detail),
            401 => NetworkClientError::Unauthorized(detail),
            403 => NetworkClientError::Forbidden(detail),
            404 => NetworkClientError::NotFound(detail),
            _ => NetworkClientError::Status {
                status,
                message: detail.unwrap_or_else(|| body.trim().to_string()),
            },
        }
    }
}

impl From<serde_json::Error> for NetworkClientError {
    fn from(err: serde_json::Error) -> Self {
        NetworkClientError::SerializationError(err.to_string())
    }
}

pub type Result<T, E = NetworkClientError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_extracts_backend_detail() {
        let err = NetworkClientError::from_status(401, r#"{"detail": "Invalid credentials"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.detail(), Some("Invalid credentials"));

        let err = NetworkClientError::from_status(403, r#"{"detail": "You don't have permission to edit this post"}"#);
        assert!(matches!(err, NetworkClientError::Forbidden(_)));
    }

    #[test]
    fn plain_text_bodies_are_not_user_detail() {
        let err = NetworkClientError::from_status(400, "content is required\n");
        assert_eq!(err.detail(), None);
        assert_eq!(err.to_string(), "Invalid request: no detail");

        let err = NetworkClientError::from_status(500, "Internal Server Error\n");
        assert_eq!(err.detail(), None);
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
    }

    #[test]
    fn csrf_html_page_is_not_user_detail() {
        let body = "<!DOCTYPE html><html><body><h1>Forbidden (403)</h1>\
                    <p>CSRF verification failed. Request aborted.</p></body></html>";
        let err = NetworkClientError::from_status(403, body);
        assert!(matches!(err, NetworkClientError::Forbidden(None)));
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn validation_list_joins_field_messages() {
        let body = r#"{"detail": [
            {"type": "missing", "loc": ["body", "payload", "email"], "msg": "Field required"},
            {"type": "string_too_short", "loc": ["body", "payload", "username"], "msg": "String should have at least 3 characters"}
        ]}"#;
        let err = NetworkClientError::from_status(422, body);
        assert_eq!(
            err.detail(),
            Some("Field required; String should have at least 3 characters")
        );

        let err = NetworkClientError::from_status(422, r#"{"detail": [{"type": "missing"}]}"#);
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn blank_detail_string_counts_as_missing() {
        let err = NetworkClientError::from_status(401, r#"{"detail": "  "}"#);
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn empty_not_found_has_no_detail() {
        let err = NetworkClientError::from_status(404, "");
        assert!(err.is_not_found());
        assert_eq!(err.detail(), None);
    }
}
