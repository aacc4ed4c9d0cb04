use crate::config::ConfigError;
use crate::questionnaire::{CatalogError, CodecError, SelectionError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Catalog(CatalogError),
    Codec(CodecError),
    Selection(SelectionError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Catalog(err) => write!(f, "catalog error: {}", err),
            AppError::Codec(err) => write!(f, "invalid answer parameters: {}", err),
            AppError::Selection(err) => write!(f, "invalid selection: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Catalog(err) => Some(err),
            AppError::Codec(err) => Some(err),
            AppError::Selection(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Codec(_) => StatusCode::BAD_REQUEST,
            AppError::Selection(SelectionError::Incomplete { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Selection(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AppError::Selection(SelectionError::Incomplete { unanswered }) => Json(json!({
                "error": self.to_string(),
                "unanswered": unanswered,
            })),
            _ => Json(json!({ "error": self.to_string() })),
        };
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<CatalogError> for AppError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<CodecError> for AppError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

impl From<SelectionError> for AppError {
    fn from(value: SelectionError) -> Self {
        Self::Selection(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_submission_maps_to_unprocessable_entity() {
        let err = AppError::from(SelectionError::Incomplete { unanswered: 2 });
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.to_string(),
            "invalid selection: 2 question(s) still need an answer"
        );
    }

    #[test]
    fn catalog_failures_are_server_errors() {
        let err = AppError::from(CatalogError::NoQuestions);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn unknown_options_are_bad_requests() {
        let err = AppError::from(SelectionError::UnknownOption {
            question: "budget".to_string(),
            value: "lots".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
