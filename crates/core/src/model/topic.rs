use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopicError {
    #[error("topic cannot be empty")]
    Empty,
}

/// A learning topic, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Validate raw user input.
    ///
    /// # Errors
    ///
    /// Returns `TopicError::Empty` if the input is empty or whitespace-only.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, TopicError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TopicError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//
// ─── STUDY WINDOW ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StudyWindowError {
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// Optional calendar bounds for the generated schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StudyWindow {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl StudyWindow {
    /// Build a window, enforcing `end >= start` when both are present.
    ///
    /// # Errors
    ///
    /// Returns `StudyWindowError::EndBeforeStart` when the range is inverted.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, StudyWindowError> {
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                return Err(StudyWindowError::EndBeforeStart { start, end });
            }
        }
        Ok(Self { start, end })
    }

    /// Parse `YYYY-MM-DD` inputs as produced by a date picker; blank means unset.
    ///
    /// # Errors
    ///
    /// Returns `StudyWindowError` for malformed dates or an inverted range.
    pub fn parse(start: &str, end: &str) -> Result<Self, StudyWindowError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    #[must_use]
    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

fn parse_date(raw: &str) -> Result<Option<NaiveDate>, StudyWindowError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| StudyWindowError::InvalidDate(raw.to_string()))
}
