#![forbid(unsafe_code)]

pub mod app_services;
pub mod assessment_service;
pub mod calendar_export_service;
pub mod config;
pub mod creation;
pub mod error;
pub mod learning_path_service;
pub mod quiz_service;
pub mod study_session_service;

pub use studysync_core::Clock;

pub use app_services::AppServices;
pub use assessment_service::AssessmentService;
pub use calendar_export_service::CalendarExportService;
pub use config::ApiConfig;
pub use creation::{CreationService, ProgressSubscription};
pub use error::{
    AppServicesError, AssessmentError, ConfigError, CreationError, ExportError,
    LearningPathError, QuizError, StudySessionError,
};
pub use learning_path_service::LearningPathService;
pub use quiz_service::QuizService;
pub use study_session_service::StudySessionService;
