use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::LearningPathId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// A stream payload that could not be decoded into a `ProgressEvent`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed progress payload: {reason}")]
pub struct ProgressParseError {
    pub reason: String,
}

//
// ─── EVENTS ────────────────────────────────────────────────────────────────────
//

/// Payload carried by a `complete` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionData {
    #[serde(default)]
    pub learning_path_id: Option<LearningPathId>,
}

/// One notification emitted by the creation job.
///
/// Extra fields sent by the backend (`data: null` on progress events, a
/// `phase` on terminal events) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressEvent {
    Progress {
        #[serde(default)]
        phase: Option<String>,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        timestamp: Option<String>,
    },
    Complete {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        data: Option<CompletionData>,
    },
    Error {
        #[serde(default)]
        message: Option<String>,
    },
}

impl ProgressEvent {
    /// Decode one stream payload.
    ///
    /// # Errors
    ///
    /// Returns `ProgressParseError` for non-JSON payloads or unknown event types.
    pub fn from_json(payload: &str) -> Result<Self, ProgressParseError> {
        serde_json::from_str(payload).map_err(|err| ProgressParseError {
            reason: err.to_string(),
        })
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Backend stage that emitted a progress event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressPhase {
    Profiling,
    Curriculum,
    Scheduling,
    Resources,
    Assessments,
    Other(String),
}

impl ProgressPhase {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "profiling" => Self::Profiling,
            "curriculum" => Self::Curriculum,
            "scheduling" => Self::Scheduling,
            "resources" => Self::Resources,
            "assessments" => Self::Assessments,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Profiling => "Profiling your level",
            Self::Curriculum => "Designing the curriculum",
            Self::Scheduling => "Building your schedule",
            Self::Resources => "Finding resources",
            Self::Assessments => "Writing quizzes",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ProgressPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── LOG ───────────────────────────────────────────────────────────────────────
//

/// Immutable record of one received progress event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEntry {
    pub phase: String,
    pub message: String,
    pub timestamp: Option<String>,
    pub received_at: DateTime<Utc>,
}

/// Ordered, append-only history of progress for one creation attempt.
///
/// Only the onboarding machine appends to or resets the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressLog {
    entries: Vec<ProgressEntry>,
}

impl ProgressLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, entry: ProgressEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn reset(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn entries(&self) -> &[ProgressEntry] {
        &self.entries
    }

    #[must_use]
    pub fn last(&self) -> Option<&ProgressEntry> {
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProgressEntry> {
        self.entries.iter()
    }
}

//
// ─── STREAM DELIVERY ───────────────────────────────────────────────────────────
//

/// Monotonic counter identifying one creation attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttemptId(u64);

impl AttemptId {
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the stream delivered, after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSignal {
    Event(ProgressEvent),
    Malformed { payload: String, reason: String },
    /// Transport failed or the stream ended before a terminal event.
    Disconnected,
    /// No event arrived within the configured wait.
    TimedOut,
}

/// A signal tagged with the attempt it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMessage {
    pub attempt: AttemptId,
    pub received_at: DateTime<Utc>,
    pub signal: StreamSignal,
}

impl StreamMessage {
    #[must_use]
    pub fn new(attempt: AttemptId, received_at: DateTime<Utc>, signal: StreamSignal) -> Self {
        Self {
            attempt,
            received_at,
            signal,
        }
    }

    /// Decode a raw payload into an event or a malformed signal.
    #[must_use]
    pub fn decode(attempt: AttemptId, received_at: DateTime<Utc>, payload: &str) -> Self {
        let signal = match ProgressEvent::from_json(payload) {
            Ok(event) => StreamSignal::Event(event),
            Err(err) => StreamSignal::Malformed {
                payload: payload.to_string(),
                reason: err.reason,
            },
        };
        Self::new(attempt, received_at, signal)
    }
}
