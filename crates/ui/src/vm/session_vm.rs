use studysync_core::model::{StudyResource, StudySession};

use crate::vm::markdown_vm::markdown_to_html;
use crate::vm::time_fmt::{format_minutes, format_schedule};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudySessionVm {
    pub id: String,
    pub title: String,
    pub module_title: String,
    pub number_str: Option<String>,
    pub when_str: String,
    pub duration_str: String,
    pub objectives: Vec<String>,
    /// Sanitized HTML rendered from the generated description.
    pub description_html: Option<String>,
    pub resources: Vec<ResourceVm>,
    pub completion: CompletionVm,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceVm {
    pub title: String,
    pub kind: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompletionVm {
    Pending,
    Done {
        completed_str: Option<String>,
        notes: Option<String>,
    },
}

/// Only plain web links are rendered as anchors.
fn web_url(raw: Option<&str>) -> Option<String> {
    let url = raw?.trim();
    (url.starts_with("https://") || url.starts_with("http://")).then(|| url.to_string())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

impl From<&StudyResource> for ResourceVm {
    fn from(resource: &StudyResource) -> Self {
        Self {
            title: resource.title.clone(),
            kind: non_blank(resource.kind.as_deref()),
            url: web_url(resource.url.as_deref()),
            description: non_blank(resource.description.as_deref()),
        }
    }
}

impl From<&StudySession> for StudySessionVm {
    fn from(session: &StudySession) -> Self {
        let completion = if session.completed {
            CompletionVm::Done {
                completed_str: session.completed_at.map(format_schedule),
                notes: non_blank(session.notes.as_deref()),
            }
        } else {
            CompletionVm::Pending
        };
        Self {
            id: session.id.to_string(),
            title: session.headline().to_string(),
            module_title: session.module_title.clone(),
            number_str: session.session_number.map(|n| format!("Session {n}")),
            when_str: format_schedule(session.scheduled_time),
            duration_str: format_minutes(session.duration_minutes),
            objectives: session.learning_objectives.clone(),
            description_html: non_blank(session.description.as_deref())
                .map(|text| markdown_to_html(&text)),
            resources: session.resources.iter().map(ResourceVm::from).collect(),
            completion,
        }
    }
}

impl StudySessionVm {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self.completion, CompletionVm::Done { .. })
    }
}
