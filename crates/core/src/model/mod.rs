mod assessment;
mod ids;
mod learning_path;
mod levels;
mod progress;
mod quiz;
mod schedule;
mod topic;
mod workflow;

pub use ids::{AssessmentId, LearningPathId, ModuleId, ParseIdError, StudySessionId};
pub use levels::{CommitmentLevel, CommitmentProfile, LevelError, ProficiencyLevel};
pub use topic::{StudyWindow, StudyWindowError, Topic, TopicError};

pub use assessment::{AnswerSheet, AssessmentResponse, ProficiencyQuestion};
pub use learning_path::{
    Curriculum, CurriculumModule, Dashboard, DashboardProgress, LearningPathListItem, QuizStatus,
    Subtopic, UpcomingSession,
};
pub use progress::{
    AttemptId, CompletionData, ProgressEntry, ProgressEvent, ProgressLog, ProgressParseError,
    ProgressPhase, StreamMessage, StreamSignal,
};
pub use quiz::{ModuleQuiz, QuestionResult, QuizAnswers, QuizEvaluation, QuizQuestion, score_percent};
pub use schedule::{IcsFile, SessionCompletion, StudyResource, StudySession};
pub use workflow::{
    CONNECTION_LOST_MESSAGE, CreationRequest, EventOutcome, GENERIC_CREATION_ERROR,
    MISSING_PATH_ID_MESSAGE, OnboardingMachine, OnboardingStep, OnboardingVariant,
    TIMED_OUT_MESSAGE, TopicOutcome, VariantParseError, WorkflowError,
};
