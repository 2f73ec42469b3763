use studysync_core::model::{
    CurriculumModule, Dashboard, DashboardProgress, QuizStatus, StudySession, UpcomingSession,
    score_percent,
};

use crate::views::ViewError;
use crate::vm::time_fmt::{format_hours, format_minutes, format_schedule};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardVm {
    pub learning_path_id: String,
    pub topic: String,
    pub weeks_str: Option<String>,
    pub progress: ProgressSummaryVm,
    pub modules: Vec<ModuleCardVm>,
    pub upcoming: Vec<UpcomingSessionVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressSummaryVm {
    pub completion: u32,
    pub sessions_str: String,
    /// Absent until a quiz has been taken.
    pub average_score_str: Option<String>,
    pub quizzes_taken: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleCardVm {
    pub module_id: String,
    pub title: String,
    pub duration_str: Option<String>,
    pub objectives: Vec<String>,
    pub subtopics: Vec<SubtopicVm>,
    pub prerequisites: Vec<String>,
    pub quiz: ModuleQuizVm,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubtopicVm {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModuleQuizVm {
    NotTaken,
    Completed { score_str: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpcomingSessionVm {
    pub id: String,
    pub title: String,
    pub when_str: String,
    pub duration_str: String,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn completion_percent(value: f64) -> u32 {
    value.clamp(0.0, 100.0).round() as u32
}

impl From<&DashboardProgress> for ProgressSummaryVm {
    fn from(progress: &DashboardProgress) -> Self {
        Self {
            completion: completion_percent(progress.completion_percentage),
            sessions_str: format!("{} / {}", progress.sessions_completed, progress.total_sessions),
            average_score_str: (progress.quizzes_taken > 0)
                .then(|| format!("{}%", score_percent(progress.average_quiz_score))),
            quizzes_taken: progress.quizzes_taken,
        }
    }
}

impl From<Option<&QuizStatus>> for ModuleQuizVm {
    fn from(status: Option<&QuizStatus>) -> Self {
        match status {
            Some(status) if status.completed => Self::Completed {
                score_str: status
                    .score
                    .map_or_else(|| "Done".to_string(), |score| format!("{}%", score_percent(score))),
            },
            _ => Self::NotTaken,
        }
    }
}

fn map_module(module: &CurriculumModule, status: Option<&QuizStatus>) -> ModuleCardVm {
    ModuleCardVm {
        module_id: module.module_id.to_string(),
        title: module.title.clone(),
        duration_str: module.duration_hours.map(format_hours),
        objectives: module.learning_objectives.clone(),
        subtopics: module
            .subtopics
            .iter()
            .map(|subtopic| SubtopicVm {
                title: subtopic.title().to_string(),
                description: subtopic.description().map(str::to_string),
            })
            .collect(),
        prerequisites: module.prerequisites.clone(),
        quiz: ModuleQuizVm::from(status),
    }
}

impl From<&UpcomingSession> for UpcomingSessionVm {
    fn from(session: &UpcomingSession) -> Self {
        let title = session
            .session_topic
            .as_deref()
            .map(str::trim)
            .filter(|topic| !topic.is_empty())
            .unwrap_or(&session.module_title)
            .to_string();
        Self {
            id: session.id.to_string(),
            title,
            when_str: format_schedule(session.scheduled_time),
            duration_str: format_minutes(session.duration_minutes),
        }
    }
}

#[must_use]
pub fn map_dashboard(dashboard: &Dashboard) -> DashboardVm {
    DashboardVm {
        learning_path_id: dashboard.learning_path_id.to_string(),
        topic: dashboard.topic.clone(),
        weeks_str: dashboard
            .curriculum
            .total_duration_weeks
            .map(|weeks| format!("{weeks} weeks")),
        progress: ProgressSummaryVm::from(&dashboard.progress),
        modules: dashboard
            .modules()
            .iter()
            .map(|module| map_module(module, dashboard.quiz_status_for(&module.module_id)))
            .collect(),
        upcoming: dashboard.upcoming_sessions.iter().map(UpcomingSessionVm::from).collect(),
    }
}

//
// ─── SESSION LIST ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRowVm {
    pub id: String,
    pub title: String,
    pub module_title: String,
    pub when_str: String,
    pub duration_str: String,
    pub completed: bool,
}

impl From<&StudySession> for SessionRowVm {
    fn from(session: &StudySession) -> Self {
        Self {
            id: session.id.to_string(),
            title: session.headline().to_string(),
            module_title: session.module_title.clone(),
            when_str: format_schedule(session.scheduled_time),
            duration_str: format_minutes(session.duration_minutes),
            completed: session.completed,
        }
    }
}

#[must_use]
pub fn map_session_rows(sessions: &[StudySession]) -> Vec<SessionRowVm> {
    sessions.iter().map(SessionRowVm::from).collect()
}

/// The full session list is fetched the first time it is shown and then kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionListState {
    #[default]
    NotLoaded,
    Loading,
    Loaded(Vec<SessionRowVm>),
    Failed(ViewError),
}

impl SessionListState {
    #[must_use]
    pub fn needs_fetch(&self) -> bool {
        matches!(self, Self::NotLoaded | Self::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use studysync_core::model::{
        Curriculum, LearningPathId, ModuleId, StudySessionId, Subtopic,
    };

    fn dashboard() -> Dashboard {
        let module = |id: &str, title: &str| CurriculumModule {
            module_id: ModuleId::new(id),
            title: title.into(),
            duration_hours: Some(4.0),
            learning_objectives: vec!["Explain moves".into()],
            subtopics: vec![
                Subtopic::Title("Moves".into()),
                Subtopic::Detailed {
                    title: "Borrowing".into(),
                    description: Some("Shared refs".into()),
                    estimated_minutes: None,
                },
            ],
            prerequisites: Vec::new(),
        };
        Dashboard {
            learning_path_id: LearningPathId::new("lp-1"),
            topic: "Rust".into(),
            progress: DashboardProgress {
                completion_percentage: 33.4,
                sessions_completed: 1,
                total_sessions: 3,
                average_quiz_score: 0.75,
                quizzes_taken: 1,
            },
            curriculum: Curriculum {
                topic: Some("Rust".into()),
                total_duration_weeks: Some(6.0),
                modules: vec![module("m1", "Ownership"), module("m2", "Traits")],
            },
            quiz_status: BTreeMap::from([(
                ModuleId::new("m1"),
                QuizStatus {
                    completed: true,
                    score: Some(0.75),
                },
            )]),
            upcoming_sessions: vec![UpcomingSession {
                id: StudySessionId::new("s2"),
                module_title: "Traits".into(),
                session_topic: Some("  ".into()),
                scheduled_time: NaiveDate::from_ymd_opt(2025, 1, 7)
                    .unwrap()
                    .and_hms_opt(18, 0, 0)
                    .unwrap(),
                duration_minutes: 45,
            }],
        }
    }

    #[test]
    fn maps_progress_and_quiz_status() {
        let vm = map_dashboard(&dashboard());
        assert_eq!(vm.weeks_str.as_deref(), Some("6 weeks"));
        assert_eq!(vm.progress.completion, 33);
        assert_eq!(vm.progress.sessions_str, "1 / 3");
        assert_eq!(vm.progress.average_score_str.as_deref(), Some("75%"));
        assert_eq!(
            vm.modules[0].quiz,
            ModuleQuizVm::Completed {
                score_str: "75%".into()
            }
        );
        assert_eq!(vm.modules[1].quiz, ModuleQuizVm::NotTaken);
        assert_eq!(vm.modules[0].subtopics[1].description.as_deref(), Some("Shared refs"));
    }

    #[test]
    fn blank_session_topic_falls_back_to_module() {
        let vm = map_dashboard(&dashboard());
        assert_eq!(vm.upcoming[0].title, "Traits");
        assert_eq!(vm.upcoming[0].when_str, "Tue, Jan 7 at 18:00");
        assert_eq!(vm.upcoming[0].duration_str, "45 min");
    }

    #[test]
    fn average_hidden_before_first_quiz() {
        let progress = DashboardProgress::default();
        assert_eq!(ProgressSummaryVm::from(&progress).average_score_str, None);
    }

    #[test]
    fn session_list_fetches_until_loaded() {
        assert!(SessionListState::NotLoaded.needs_fetch());
        assert!(SessionListState::Failed(ViewError::Unknown).needs_fetch());
        assert!(!SessionListState::Loading.needs_fetch());
        assert!(!SessionListState::Loaded(Vec::new()).needs_fetch());
    }
}
