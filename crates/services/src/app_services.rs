use std::sync::Arc;

use api::{Backend, HttpBackend};
use studysync_core::model::OnboardingVariant;

use crate::Clock;
use crate::assessment_service::AssessmentService;
use crate::calendar_export_service::CalendarExportService;
use crate::config::ApiConfig;
use crate::creation::CreationService;
use crate::error::AppServicesError;
use crate::learning_path_service::LearningPathService;
use crate::quiz_service::QuizService;
use crate::study_session_service::StudySessionService;

/// Assembles app-facing services over one backend.
#[derive(Clone)]
pub struct AppServices {
    onboarding: OnboardingVariant,
    creation: Arc<CreationService>,
    assessments: Arc<AssessmentService>,
    learning_paths: Arc<LearningPathService>,
    study_sessions: Arc<StudySessionService>,
    quizzes: Arc<QuizService>,
    calendar: Arc<CalendarExportService>,
}

impl AppServices {
    /// Build services talking HTTP to `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Api` if the base url is unusable.
    pub fn http(config: &ApiConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let backend = Backend::http(HttpBackend::new(&config.base_url)?);
        Ok(Self::with_backend(config, clock, &backend))
    }

    #[must_use]
    pub fn with_backend(config: &ApiConfig, clock: Clock, backend: &Backend) -> Self {
        Self {
            onboarding: config.onboarding,
            creation: Arc::new(CreationService::new(
                clock,
                Arc::clone(&backend.learning_paths),
                config.stream_timeout,
            )),
            assessments: Arc::new(AssessmentService::new(Arc::clone(&backend.assessments))),
            learning_paths: Arc::new(LearningPathService::new(Arc::clone(
                &backend.learning_paths,
            ))),
            study_sessions: Arc::new(StudySessionService::new(Arc::clone(&backend.schedule))),
            quizzes: Arc::new(QuizService::new(Arc::clone(&backend.assessments))),
            calendar: Arc::new(CalendarExportService::new(
                Arc::clone(&backend.schedule),
                config.download_dir.clone(),
            )),
        }
    }

    #[must_use]
    pub fn onboarding(&self) -> OnboardingVariant {
        self.onboarding
    }

    #[must_use]
    pub fn creation(&self) -> Arc<CreationService> {
        Arc::clone(&self.creation)
    }

    #[must_use]
    pub fn assessments(&self) -> Arc<AssessmentService> {
        Arc::clone(&self.assessments)
    }

    #[must_use]
    pub fn learning_paths(&self) -> Arc<LearningPathService> {
        Arc::clone(&self.learning_paths)
    }

    #[must_use]
    pub fn study_sessions(&self) -> Arc<StudySessionService> {
        Arc::clone(&self.study_sessions)
    }

    #[must_use]
    pub fn quizzes(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }

    #[must_use]
    pub fn calendar(&self) -> Arc<CalendarExportService> {
        Arc::clone(&self.calendar)
    }
}
