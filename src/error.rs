use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Errors raised by the pricing and ROI calculations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    /// Unknown enum value, negative volume or out-of-range parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The pricing tables have no entry for the requested lookup
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),
}

impl CalcError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn missing(msg: impl Into<String>) -> Self {
        Self::ConfigurationMissing(msg.into())
    }
}

/// Application error types returned by the HTTP layer
#[derive(Debug)]
pub enum AppError {
    /// Request could not be parsed or failed validation
    InvalidInput(String),
    /// Pricing tables do not cover the request
    ConfigurationMissing(String),
    /// Unknown resource (e.g. scenario key)
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::ConfigurationMissing(msg) => write!(f, "Configuration missing: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::ConfigurationMissing(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        };

        crate::metrics::record_error(error_type_name(&self));

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": error_type_name(&self),
            }
        }));

        (status, body).into_response()
    }
}

pub fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::InvalidInput(_) => "invalid_input",
        AppError::ConfigurationMissing(_) => "configuration_missing",
        AppError::NotFound(_) => "not_found",
    }
}

impl From<CalcError> for AppError {
    fn from(err: CalcError) -> Self {
        match err {
            CalcError::InvalidInput(msg) => Self::InvalidInput(msg),
            CalcError::ConfigurationMissing(msg) => Self::ConfigurationMissing(msg),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_error_display() {
        let error = CalcError::invalid("unknown framework: foo");
        assert_eq!(error.to_string(), "Invalid input: unknown framework: foo");

        let error = CalcError::missing("no infrastructure tier covers 5 requests");
        assert_eq!(
            error.to_string(),
            "Configuration missing: no infrastructure tier covers 5 requests"
        );
    }

    #[test]
    fn test_error_type_name() {
        assert_eq!(error_type_name(&AppError::InvalidInput("x".to_string())), "invalid_input");
        assert_eq!(
            error_type_name(&AppError::ConfigurationMissing("x".to_string())),
            "configuration_missing"
        );
        assert_eq!(error_type_name(&AppError::NotFound("x".to_string())), "not_found");
    }

    #[test]
    fn test_calc_error_conversion() {
        let app: AppError = CalcError::missing("tier").into();
        assert!(matches!(app, AppError::ConfigurationMissing(_)));
    }

    #[tokio::test]
    async fn test_error_response_status() {
        let response = AppError::InvalidInput("negative volume".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::ConfigurationMissing("tier".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = AppError::NotFound("moon_base".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_every_error_is_a_client_error() {
        let errors = [
            AppError::InvalidInput("x".to_string()),
            AppError::ConfigurationMissing("x".to_string()),
            AppError::NotFound("x".to_string()),
        ];
        for error in errors {
            assert!(error.into_response().status().is_client_error());
        }
    }
}
