use axum::http::StatusCode;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn bad_gateway(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::bad_gateway(err)
    }
}

impl From<DraftError> for AppError {
    fn from(err: DraftError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Failure talking to the remote bin.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unreachable: {0}")]
    Network(#[from] reqwest::Error),
    #[error("store returned an unexpected document: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("store rejected the request with status {status}{}", body_suffix(.body))]
    Rejected { status: u16, body: String },
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("{field} must be a non-negative whole number, got '{value}'")]
    InvalidCount { field: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn rejected_store_maps_to_bad_gateway() {
        let err = AppError::from(StoreError::Rejected {
            status: 401,
            body: "invalid key".into(),
        });
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            err.message,
            "store rejected the request with status 401: invalid key"
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn draft_error_maps_to_bad_request() {
        let err = AppError::from(DraftError::InvalidCount {
            field: "medium solved".into(),
            value: "abc".into(),
        });
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("'abc'"));
    }

    #[test]
    fn rejection_without_body_has_no_trailing_colon() {
        let err = StoreError::Rejected {
            status: 503,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "store rejected the request with status 503");
        assert_eq!(
            ConfigError::Missing("JSONBIN_MASTER_KEY").to_string(),
            "environment variable JSONBIN_MASTER_KEY is not set"
        );
    }
}
