use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::{ModuleId, StudySessionId};

/// A learning resource attached to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyResource {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One scheduled study occurrence tied to a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: StudySessionId,
    pub module_id: ModuleId,
    pub module_title: String,
    #[serde(default)]
    pub session_topic: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    pub scheduled_time: NaiveDateTime,
    pub duration_minutes: u32,
    #[serde(default)]
    pub session_number: Option<u32>,
    #[serde(default)]
    pub resources: Vec<StudyResource>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl StudySession {
    /// Session topic when present, otherwise the module title.
    #[must_use]
    pub fn headline(&self) -> &str {
        self.session_topic
            .as_deref()
            .filter(|topic| !topic.trim().is_empty())
            .unwrap_or(&self.module_title)
    }
}

/// Body sent when marking a session complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCompletion {
    pub notes: String,
}

/// Downloaded calendar export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsFile {
    /// Name suggested by `Content-Disposition`, if any.
    pub suggested_name: Option<String>,
    pub contents: Vec<u8>,
}

impl IcsFile {
    /// File name to save under: the server's suggestion, else `studysync_<topic>.ics`.
    #[must_use]
    pub fn file_name(&self, topic: &str) -> String {
        self.suggested_name
            .as_deref()
            .map(sanitize_file_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| {
                format!("studysync_{}.ics", sanitize_file_name(&topic.replace(' ', "_")))
            })
    }
}

fn sanitize_file_name(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            other => other,
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}
