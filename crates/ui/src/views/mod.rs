mod dashboard;
mod onboarding;
mod quiz;
mod state;
mod study_session;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use dashboard::DashboardView;
pub use onboarding::OnboardingView;
pub use quiz::QuizView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use study_session::StudySessionView;
