use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::{LearningPathId, ModuleId, StudySessionId};

//
// ─── CURRICULUM ────────────────────────────────────────────────────────────────
//

/// A subtopic is either a bare title or a described study unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subtopic {
    Title(String),
    Detailed {
        title: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        estimated_minutes: Option<u32>,
    },
}

impl Subtopic {
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Title(title) | Self::Detailed { title, .. } => title,
        }
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Title(_) => None,
            Self::Detailed { description, .. } => description.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumModule {
    pub module_id: ModuleId,
    pub title: String,
    #[serde(default)]
    pub duration_hours: Option<f64>,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub subtopics: Vec<Subtopic>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Curriculum {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub total_duration_weeks: Option<f64>,
    #[serde(default)]
    pub modules: Vec<CurriculumModule>,
}

//
// ─── DASHBOARD ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardProgress {
    #[serde(default)]
    pub completion_percentage: f64,
    #[serde(default)]
    pub sessions_completed: u32,
    #[serde(default)]
    pub total_sessions: u32,
    /// Mean score of completed quizzes, `0.0..=1.0`.
    #[serde(default)]
    pub average_quiz_score: f64,
    #[serde(default)]
    pub quizzes_taken: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizStatus {
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingSession {
    pub id: StudySessionId,
    pub module_title: String,
    #[serde(default)]
    pub session_topic: Option<String>,
    pub scheduled_time: NaiveDateTime,
    pub duration_minutes: u32,
}

/// Aggregate status of one learning path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub learning_path_id: LearningPathId,
    pub topic: String,
    #[serde(default)]
    pub progress: DashboardProgress,
    #[serde(default)]
    pub curriculum: Curriculum,
    #[serde(default)]
    pub quiz_status: BTreeMap<ModuleId, QuizStatus>,
    #[serde(default)]
    pub upcoming_sessions: Vec<UpcomingSession>,
}

impl Dashboard {
    #[must_use]
    pub fn modules(&self) -> &[CurriculumModule] {
        &self.curriculum.modules
    }

    #[must_use]
    pub fn quiz_status_for(&self, module_id: &ModuleId) -> Option<&QuizStatus> {
        self.quiz_status.get(module_id)
    }
}

/// Entry in the list of previously generated learning paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPathListItem {
    pub id: LearningPathId,
    pub topic: String,
    #[serde(default)]
    pub proficiency_level: Option<String>,
    #[serde(default)]
    pub commitment_level: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}
