use serde_json::Value;

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

/// Fallback when a failed response carries nothing readable.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred.";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Extracts a human-readable message from a failed response body.
///
/// Looks at `detail` first and falls back to the body itself when `detail`
/// is missing: a string is used as is, an object contributes its `message`,
/// and a list of validation errors contributes its `msg` fields.
#[must_use]
pub fn describe_error(body: Option<&Value>) -> String {
    let Some(body) = body else {
        return UNKNOWN_ERROR.to_string();
    };

    let message = match error_detail(body) {
        Value::String(text) => Some(text.clone()),
        Value::Object(object) => object
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    };

    message
        .filter(|text| !text.trim().is_empty())
        .map_or_else(|| UNKNOWN_ERROR.to_string(), sanitize_body)
}

/// Picks the part of an error body that describes the failure: `detail`
/// when it is present and non-empty, otherwise the whole body.
#[must_use]
pub fn error_detail(body: &Value) -> &Value {
    match body.get("detail") {
        Some(detail) if is_truthy(detail) => detail,
        _ => body,
    }
}

// `null`, `""` and `false` do not count as a detail.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and truncating.
#[must_use]
pub fn sanitize_body(body: String) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_CHARS {
        return trimmed.to_string();
    }

    let mut truncated: String = trimmed.chars().take(MAX_ERROR_CHARS).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_describe_error_string_detail() {
        let body = json!({"detail": "Invalid PIN"});
        assert_eq!(describe_error(Some(&body)), "Invalid PIN");
    }

    #[test]
    fn test_describe_error_object_detail() {
        let body = json!({"detail": {"message": "PIN is required for this action."}});
        assert_eq!(
            describe_error(Some(&body)),
            "PIN is required for this action."
        );
    }

    #[test]
    fn test_describe_error_validation_list() {
        let body = json!({"detail": [
            {"loc": ["body", "pin_code"], "msg": "String should match pattern '^\\d{4}$'"},
            {"loc": ["body", "value"], "msg": "Field required"}
        ]});
        assert_eq!(
            describe_error(Some(&body)),
            "String should match pattern '^\\d{4}$'; Field required"
        );
    }

    #[test]
    fn test_describe_error_without_detail() {
        assert_eq!(
            describe_error(Some(&json!({"message": "Service unavailable"}))),
            "Service unavailable"
        );
        assert_eq!(describe_error(Some(&json!({"detail": null}))), UNKNOWN_ERROR);
        assert_eq!(describe_error(Some(&json!({"error": 42}))), UNKNOWN_ERROR);
        assert_eq!(describe_error(Some(&json!("plain text"))), "plain text");
    }

    #[test]
    fn test_describe_error_without_body() {
        assert_eq!(describe_error(None), UNKNOWN_ERROR);
        assert_eq!(describe_error(Some(&json!([]))), UNKNOWN_ERROR);
        assert_eq!(describe_error(Some(&json!({"detail": "   "}))), UNKNOWN_ERROR);
    }

    #[test]
    fn test_sanitize_body_truncates() {
        let long = "x".repeat(MAX_ERROR_CHARS + 10);
        let sanitized = sanitize_body(format!("  {long}  "));
        assert_eq!(sanitized.chars().count(), MAX_ERROR_CHARS + 3);
        assert!(sanitized.ends_with("..."));
        assert_eq!(sanitize_body(" short ".to_string()), "short");
    }

    #[test]
    fn test_status() {
        let err = ApiError::Http {
            status: 403,
            message: "Forbidden".to_string(),
        };
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "Request failed (403): Forbidden");
        assert_eq!(ApiError::Network("down".to_string()).status(), None);
    }
}
