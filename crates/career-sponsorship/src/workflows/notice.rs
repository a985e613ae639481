//! User-facing notifications derived from workflow outcomes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use super::careers::{DraftError, RegistryError, StoreError, TeacherError, ValidationError};
use super::sponsorship::{CodeError, SponsorshipError, TemplateError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: &'static str,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: "Success",
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: "Warning",
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error",
            message: message.into(),
        }
    }
}

impl From<&ValidationError> for Notice {
    fn from(err: &ValidationError) -> Self {
        Notice::warning(err.to_string())
    }
}

impl From<&StoreError> for Notice {
    fn from(err: &StoreError) -> Self {
        Notice::error(err.user_message())
    }
}

impl From<&DraftError> for Notice {
    fn from(err: &DraftError) -> Self {
        match err {
            DraftError::Validation(inner) => inner.into(),
            DraftError::Store(inner) => inner.into(),
            DraftError::NoActiveDraft | DraftError::DraftInProgress | DraftError::NoTrainings => {
                Notice::warning(err.to_string())
            }
        }
    }
}

impl From<&RegistryError> for Notice {
    fn from(err: &RegistryError) -> Self {
        match err {
            RegistryError::Validation(inner) => inner.into(),
            RegistryError::Store(inner) => inner.into(),
            RegistryError::MissingIdentifier(_)
            | RegistryError::TrainingIndex { .. }
            | RegistryError::Refresh(_) => Notice::error(err.to_string()),
        }
    }
}

impl From<&TeacherError> for Notice {
    fn from(err: &TeacherError) -> Self {
        match err {
            TeacherError::Validation(inner) => inner.into(),
            TeacherError::Store(inner) => inner.into(),
            TeacherError::MissingIdentifier(_) => Notice::error(err.to_string()),
        }
    }
}

impl From<&CodeError> for Notice {
    fn from(err: &CodeError) -> Self {
        Notice::warning(err.to_string())
    }
}

impl From<&TemplateError> for Notice {
    fn from(err: &TemplateError) -> Self {
        Notice::error(err.user_message())
    }
}

impl From<&SponsorshipError> for Notice {
    fn from(err: &SponsorshipError) -> Self {
        match err {
            SponsorshipError::Validation(inner) => inner.into(),
            SponsorshipError::Code(inner) => inner.into(),
            SponsorshipError::Catalog(_) => {
                Notice::error("The selected template could not be downloaded.")
            }
            SponsorshipError::Template(inner) => inner.into(),
        }
    }
}

/// JSON error body carrying both the technical error and the notice to show.
pub(crate) fn error_response<E>(status: StatusCode, err: &E) -> Response
where
    E: std::error::Error,
    for<'a> Notice: From<&'a E>,
{
    let notice = Notice::from(err);
    let body = Json(json!({ "error": err.to_string(), "notice": notice }));
    (status, body).into_response()
}
