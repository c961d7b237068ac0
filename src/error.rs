// Client-side API error taxonomy
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Every failure a backend call can end in, as seen by the screens.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    // 401 on the token endpoint
    #[error("Credenciales inválidas")]
    InvalidCredentials,

    // 401 anywhere else
    #[error("La sesión ha expirado")]
    SessionExpired,

    // 403
    #[error("Forbidden: {0}")]
    Forbidden(String),

    // 404
    #[error("Not found: {0}")]
    NotFound(String),

    // 400 / 422
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    // 5xx
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    // Any other non-success status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // Connection refused, DNS failure, timeout
    #[error("Network error: {0}")]
    Network(String),

    // Response body did not decode into the expected shape
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),
}

impl ApiError {
    /// HTTP status the error was built from, when there was one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::InvalidCredentials | ApiError::SessionExpired => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Validation { .. } => Some(400),
            ApiError::Server { status, .. } | ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::UnexpectedShape(_) => None,
        }
    }

    /// Stable code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::SessionExpired => "SESSION_EXPIRED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Server { .. } => "SERVER_ERROR",
            ApiError::Http { .. } => "HTTP_ERROR",
            ApiError::Network(_) => "NETWORK_UNREACHABLE",
            ApiError::UnexpectedShape(_) => "UNEXPECTED_SHAPE",
        }
    }

    /// Field-keyed messages for inline form display, empty for everything else
    pub fn field_errors(&self) -> Option<&HashMap<String, String>> {
        match self {
            ApiError::Validation { field_errors, .. } if !field_errors.is_empty() => Some(field_errors),
            _ => None,
        }
    }

    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = HashMap::new();
        field_errors.insert(field.into(), message.clone());
        ApiError::Validation { message, field_errors }
    }

    pub fn unexpected_shape(message: impl Into<String>) -> Self {
        ApiError::UnexpectedShape(message.into())
    }

    /// Build an error from a non-success status and the (possibly empty) body.
    ///
    /// `detail` may be a plain string or a list of `{loc, msg}` validation
    /// entries; the list form is reduced to a map keyed by the last `loc`
    /// segment.
    pub fn from_status(status: u16, body: Option<&Value>) -> Self {
        let detail = body.and_then(|b| b.get("detail"));
        let field_errors = detail.map(detail_field_errors).unwrap_or_default();
        let message = detail
            .and_then(detail_message)
            .unwrap_or_else(|| default_message(status).to_string());

        match status {
            400 | 422 => ApiError::Validation { message, field_errors },
            401 => ApiError::SessionExpired,
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            500..=599 => ApiError::Server { status, message },
            _ => ApiError::Http { status, message },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::UnexpectedShape(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::from_status(status.as_u16(), None)
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::UnexpectedShape(err.to_string())
    }
}

fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}

fn detail_field_errors(detail: &Value) -> HashMap<String, String> {
    let mut out = HashMap::new();
    let Some(items) = detail.as_array() else {
        return out;
    };

    for item in items {
        let Some(msg) = item.get("msg").and_then(Value::as_str) else {
            continue;
        };
        let field = item
            .get("loc")
            .and_then(Value::as_array)
            .and_then(|loc| loc.last())
            .map(|segment| match segment {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
        if let Some(field) = field {
            out.insert(field, msg.to_string());
        }
    }
    out
}

fn default_message(status: u16) -> &'static str {
    match status {
        400 | 422 => "Datos inválidos",
        403 => "Acceso denegado",
        404 => "Recurso no encontrado",
        500..=599 => "Error interno del servidor",
        _ => "Error inesperado",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validation_array_keys_by_last_loc_segment() {
        let body = json!({
            "detail": [
                {"loc": ["body", "first_name"], "msg": "field required"},
                {"loc": ["body", "contacts", 0], "msg": "bad contact"}
            ]
        });
        let err = ApiError::from_status(422, Some(&body));
        let fields = err.field_errors().expect("field errors");
        assert_eq!(fields.get("first_name").map(String::as_str), Some("field required"));
        assert_eq!(fields.get("0").map(String::as_str), Some("bad contact"));
        assert_eq!(err.to_string(), "field required; bad contact");
    }

    #[test]
    fn string_detail_becomes_banner_message() {
        let body = json!({"detail": "Email already registered"});
        let err = ApiError::from_status(400, Some(&body));
        assert_eq!(err.to_string(), "Email already registered");
        assert!(err.field_errors().is_none());
    }

    #[test]
    fn statuses_map_to_taxonomy() {
        assert_eq!(ApiError::from_status(401, None), ApiError::SessionExpired);
        assert!(matches!(ApiError::from_status(403, None), ApiError::Forbidden(_)));
        assert!(matches!(ApiError::from_status(404, None), ApiError::NotFound(_)));
        assert!(matches!(ApiError::from_status(503, None), ApiError::Server { status: 503, .. }));
        assert!(matches!(ApiError::from_status(409, None), ApiError::Http { status: 409, .. }));
    }

    #[test]
    fn missing_detail_falls_back_to_status_message() {
        let err = ApiError::from_status(404, Some(&json!({})));
        assert_eq!(err, ApiError::NotFound("Recurso no encontrado".to_string()));
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.error_code(), "NOT_FOUND");
    }
}
