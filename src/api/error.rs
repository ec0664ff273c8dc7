use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API URL `{0}`")]
    InvalidUrl(String),
    #[error("not logged in; run `jobmatch-client login` first")]
    MissingToken,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Builds a status error from a backend error body. The backend reports
    /// either `{"error": "..."}`, `{"message": "..."}` or `{"errors": [...]}`.
    pub fn from_body(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                if let Some(errors) = json.get("errors").and_then(|v| v.as_array()) {
                    let joined: Vec<&str> = errors.iter().filter_map(|e| e.as_str()).collect();
                    if !joined.is_empty() {
                        return Some(joined.join(", "));
                    }
                }
                json.get("error")
                    .or_else(|| json.get("message"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        ApiError::Status { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_of(err: ApiError) -> String {
        match err {
            ApiError::Status { message, .. } => message,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn picks_backend_error_fields() {
        let joined = ApiError::from_body(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"errors":["Email has already been taken","Password is too short"]}"#,
        );
        assert_eq!(message_of(joined), "Email has already been taken, Password is too short");

        let single = ApiError::from_body(StatusCode::NOT_FOUND, r#"{"error":"not found"}"#);
        assert_eq!(message_of(single), "not found");

        let login = ApiError::from_body(StatusCode::UNAUTHORIZED, r#"{"message":"invalid"}"#);
        assert_eq!(message_of(login), "invalid");
    }

    #[test]
    fn falls_back_to_status_reason() {
        let err = ApiError::from_body(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.to_string(), "HTTP 500 Internal Server Error: Internal Server Error");
    }
}
