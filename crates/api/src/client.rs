use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use studysync_core::model::{
    AssessmentId, CreationRequest, Dashboard, IcsFile, LearningPathId, LearningPathListItem,
    ModuleId, ModuleQuiz, ProficiencyQuestion, QuizEvaluation, StudySession, StudySessionId,
    Topic,
};
use thiserror::Error;

use crate::http::HttpBackend;
use crate::memory::InMemoryBackend;

/// Errors surfaced by backend adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("request failed with status {status}: {detail}")]
    HttpStatus { status: u16, detail: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid request: {0}")]
    Request(String),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("connection error: {0}")]
    Connection(String),
}

impl ApiError {
    /// Server-provided detail, when the backend sent one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::HttpStatus { detail, .. } if !detail.is_empty() => Some(detail),
            _ => None,
        }
    }
}

/// Raw `data:` payloads of the creation stream, in arrival order.
pub type PayloadStream = BoxStream<'static, Result<String, ApiError>>;

/// Proficiency assessment and module quiz endpoints.
#[async_trait]
pub trait AssessmentApi: Send + Sync {
    /// Fetch the proficiency questions for a topic.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body cannot be decoded.
    async fn proficiency_questions(
        &self,
        topic: &Topic,
    ) -> Result<Vec<ProficiencyQuestion>, ApiError>;

    /// Fetch (or lazily generate) the quiz for a module.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the module or path is unknown.
    async fn module_quiz(
        &self,
        module_id: &ModuleId,
        learning_path_id: &LearningPathId,
    ) -> Result<ModuleQuiz, ApiError>;

    /// Fetch a completed quiz with the answers previously submitted.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the quiz has not been taken.
    async fn quiz_results(
        &self,
        module_id: &ModuleId,
        learning_path_id: &LearningPathId,
    ) -> Result<ModuleQuiz, ApiError>;

    /// Submit answers keyed by question index.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body cannot be decoded.
    async fn submit_quiz(
        &self,
        assessment_id: &AssessmentId,
        responses: &BTreeMap<String, String>,
    ) -> Result<QuizEvaluation, ApiError>;
}

/// Learning path listing, dashboards and the creation stream.
#[async_trait]
pub trait LearningPathApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn list_learning_paths(&self) -> Result<Vec<LearningPathListItem>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the path does not exist.
    async fn dashboard(&self, id: &LearningPathId) -> Result<Dashboard, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the path does not exist.
    async fn sessions(&self, id: &LearningPathId) -> Result<Vec<StudySession>, ApiError>;

    /// Open the creation stream for one attempt.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the stream cannot be opened.
    async fn creation_stream(&self, request: &CreationRequest) -> Result<PayloadStream, ApiError>;
}

/// Study session detail and calendar export.
#[async_trait]
pub trait ScheduleApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the session does not exist.
    async fn session(&self, id: &StudySessionId) -> Result<StudySession, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the session does not exist.
    async fn complete_session(&self, id: &StudySessionId, notes: &str) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the export cannot be downloaded.
    async fn export_ics(&self, learning_path_id: &LearningPathId) -> Result<IcsFile, ApiError>;
}

/// Aggregates the endpoint groups behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Backend {
    pub assessments: Arc<dyn AssessmentApi>,
    pub learning_paths: Arc<dyn LearningPathApi>,
    pub schedule: Arc<dyn ScheduleApi>,
}

impl Backend {
    #[must_use]
    pub fn http(client: HttpBackend) -> Self {
        Self {
            assessments: Arc::new(client.clone()),
            learning_paths: Arc::new(client.clone()),
            schedule: Arc::new(client),
        }
    }

    #[must_use]
    pub fn in_memory(backend: InMemoryBackend) -> Self {
        Self {
            assessments: Arc::new(backend.clone()),
            learning_paths: Arc::new(backend.clone()),
            schedule: Arc::new(backend),
        }
    }
}
