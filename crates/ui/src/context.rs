use std::sync::Arc;

use services::{
    AssessmentService, CalendarExportService, CreationService, LearningPathService, QuizService,
    StudySessionService,
};
use studysync_core::model::OnboardingVariant;

pub trait UiApp: Send + Sync {
    fn onboarding(&self) -> OnboardingVariant;

    fn creation(&self) -> Arc<CreationService>;
    fn assessments(&self) -> Arc<AssessmentService>;
    fn learning_paths(&self) -> Arc<LearningPathService>;
    fn study_sessions(&self) -> Arc<StudySessionService>;
    fn quizzes(&self) -> Arc<QuizService>;
    fn calendar(&self) -> Arc<CalendarExportService>;
}

#[derive(Clone)]
pub struct AppContext {
    onboarding: OnboardingVariant,

    creation: Arc<CreationService>,
    assessments: Arc<AssessmentService>,
    learning_paths: Arc<LearningPathService>,
    study_sessions: Arc<StudySessionService>,
    quizzes: Arc<QuizService>,
    calendar: Arc<CalendarExportService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            onboarding: app.onboarding(),
            creation: app.creation(),
            assessments: app.assessments(),
            learning_paths: app.learning_paths(),
            study_sessions: app.study_sessions(),
            quizzes: app.quizzes(),
            calendar: app.calendar(),
        }
    }

    /// Which onboarding flow new learners walk through.
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

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
