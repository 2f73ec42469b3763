use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelError {
    #[error("unknown proficiency level: {0}")]
    UnknownProficiency(String),

    #[error("unknown commitment level: {0}")]
    UnknownCommitment(String),
}

//
// ─── PROFICIENCY ───────────────────────────────────────────────────────────────
//

/// Self-reported or assessed skill tier for a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ProficiencyLevel {
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    /// Wire value used in query strings and JSON bodies.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Beginner => "New to this topic, starting from the fundamentals.",
            Self::Intermediate => "Comfortable with the basics, ready to go deeper.",
            Self::Advanced => "Experienced, looking for advanced material.",
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProficiencyLevel {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(LevelError::UnknownProficiency(s.to_string())),
        }
    }
}

//
// ─── COMMITMENT ────────────────────────────────────────────────────────────────
//

/// Weekly time-investment tier chosen by the learner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentLevel {
    Light,
    #[default]
    Moderate,
    Intensive,
}

/// Session cadence the scheduler derives from a commitment level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitmentProfile {
    pub sessions_per_week: u32,
    pub session_minutes: u32,
    pub weekly_hours: u32,
}

impl CommitmentLevel {
    pub const ALL: [Self; 3] = [Self::Light, Self::Moderate, Self::Intensive];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Intensive => "intensive",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Moderate => "Moderate",
            Self::Intensive => "Intensive",
        }
    }

    #[must_use]
    pub fn profile(self) -> CommitmentProfile {
        match self {
            Self::Light => CommitmentProfile {
                sessions_per_week: 2,
                session_minutes: 30,
                weekly_hours: 2,
            },
            Self::Moderate => CommitmentProfile {
                sessions_per_week: 3,
                session_minutes: 45,
                weekly_hours: 5,
            },
            Self::Intensive => CommitmentProfile {
                sessions_per_week: 5,
                session_minutes: 60,
                weekly_hours: 10,
            },
        }
    }
}

impl CommitmentProfile {
    /// Short human summary, e.g. "3 sessions/week × 45 min (~5 h/week)".
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} sessions/week × {} min (~{} h/week)",
            self.sessions_per_week, self.session_minutes, self.weekly_hours
        )
    }
}

impl fmt::Display for CommitmentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitmentLevel {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "intensive" => Ok(Self::Intensive),
            _ => Err(LevelError::UnknownCommitment(s.to_string())),
        }
    }
}
