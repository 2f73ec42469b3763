use std::sync::Arc;

use api::ScheduleApi;
use studysync_core::model::{StudySession, StudySessionId};
use tracing::info;

use crate::error::StudySessionError;

/// Session detail and completion.
#[derive(Clone)]
pub struct StudySessionService {
    schedule: Arc<dyn ScheduleApi>,
}

impl StudySessionService {
    #[must_use]
    pub fn new(schedule: Arc<dyn ScheduleApi>) -> Self {
        Self { schedule }
    }

    /// # Errors
    ///
    /// Returns `StudySessionError::NotFound` for an unknown id.
    pub async fn get(&self, id: &StudySessionId) -> Result<StudySession, StudySessionError> {
        Ok(self.schedule.session(id).await?)
    }

    /// Mark a session complete and return its refreshed state.
    ///
    /// # Errors
    ///
    /// Returns `StudySessionError` if either backend call fails.
    pub async fn complete(
        &self,
        id: &StudySessionId,
        notes: &str,
    ) -> Result<StudySession, StudySessionError> {
        self.schedule.complete_session(id, notes.trim()).await?;
        info!(session_id = %id, "study session completed");
        self.get(id).await
    }
}
