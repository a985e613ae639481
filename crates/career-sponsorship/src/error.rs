use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::careers::DraftError;
use crate::workflows::sponsorship::{CodeError, SponsorshipError};
use crate::workflows::Notice;
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
    Draft(DraftError),
    Code(CodeError),
    Sponsorship(SponsorshipError),
}

impl AppError {
    /// Notice for workflow failures; infrastructure failures have none.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            AppError::Draft(err) => Some(err.into()),
            AppError::Code(err) => Some(err.into()),
            AppError::Sponsorship(err) => Some(err.into()),
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) | AppError::Server(_) => {
                None
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Draft(err) => write!(f, "career draft error: {}", err),
            AppError::Code(err) => write!(f, "sponsorship code error: {}", err),
            AppError::Sponsorship(err) => write!(f, "sponsorship error: {}", err),
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
            AppError::Draft(err) => Some(err),
            AppError::Code(err) => Some(err),
            AppError::Sponsorship(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Draft(_) | AppError::Code(_) | AppError::Sponsorship(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string(), "notice": self.notice() }));
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

impl From<DraftError> for AppError {
    fn from(value: DraftError) -> Self {
        Self::Draft(value)
    }
}

impl From<CodeError> for AppError {
    fn from(value: CodeError) -> Self {
        Self::Code(value)
    }
}

impl From<SponsorshipError> for AppError {
    fn from(value: SponsorshipError) -> Self {
        Self::Sponsorship(value)
    }
}
