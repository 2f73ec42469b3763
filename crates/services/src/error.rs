//! Shared error types for the services crate.

use api::ApiError;
use studysync_core::model::{CONNECTION_LOST_MESSAGE, VariantParseError, WorkflowError};
use thiserror::Error;

/// Errors emitted while opening or running a creation stream.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CreationError {
    #[error("a newer creation attempt replaced this one")]
    Superseded,
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CreationError {
    /// Text shown on the commitment step when the stream could not start.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err
                .detail()
                .map_or_else(|| CONNECTION_LOST_MESSAGE.to_string(), str::to_string),
            Self::Workflow(err) => err.to_string(),
            Self::Superseded => CONNECTION_LOST_MESSAGE.to_string(),
        }
    }
}

/// Errors emitted by `AssessmentService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssessmentError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `LearningPathService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LearningPathError {
    #[error("learning path not found")]
    NotFound,
    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for LearningPathError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound => Self::NotFound,
            other => Self::Api(other),
        }
    }
}

/// Errors emitted by `StudySessionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StudySessionError {
    #[error("study session not found")]
    NotFound,
    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for StudySessionError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound => Self::NotFound,
            other => Self::Api(other),
        }
    }
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz not found")]
    NotFound,
    #[error("answer every question before submitting ({answered}/{total})")]
    Incomplete { answered: usize, total: usize },
    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for QuizError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound => Self::NotFound,
            other => Self::Api(other),
        }
    }
}

/// Errors emitted by `CalendarExportService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("calendar export is empty")]
    Empty,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("could not save calendar: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid configuration values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid stream timeout `{0}`: expected whole seconds")]
    InvalidTimeout(String),
    #[error(transparent)]
    Onboarding(#[from] VariantParseError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
