mod dashboard_vm;
mod markdown_vm;
mod onboarding_vm;
mod quiz_vm;
mod session_vm;
mod time_fmt;

pub use dashboard_vm::{
    DashboardVm, ModuleCardVm, ModuleQuizVm, ProgressSummaryVm, SessionListState, SessionRowVm,
    SubtopicVm, UpcomingSessionVm, map_dashboard, map_session_rows,
};
pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use onboarding_vm::{
    AssessmentQuestionVm, ChoiceVm, CommitmentOptionVm, LearningPathCardVm, ProficiencyOptionVm,
    ProgressRowVm, StepState, StepVm, commitment_options, creation_headline,
    map_assessment_questions, map_learning_path_cards, map_progress_rows, proficiency_options,
    step_indicator,
};
pub use quiz_vm::{OptionMark, QuizOptionVm, QuizQuestionVm, QuizSummaryVm, QuizVm};
pub use session_vm::{CompletionVm, ResourceVm, StudySessionVm};
pub use time_fmt::format_date_input;
