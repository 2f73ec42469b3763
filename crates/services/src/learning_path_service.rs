use std::sync::Arc;

use api::LearningPathApi;
use studysync_core::model::{Dashboard, LearningPathId, LearningPathListItem, StudySession};

use crate::error::LearningPathError;

/// Read access to generated learning paths.
#[derive(Clone)]
pub struct LearningPathService {
    learning_paths: Arc<dyn LearningPathApi>,
}

impl LearningPathService {
    #[must_use]
    pub fn new(learning_paths: Arc<dyn LearningPathApi>) -> Self {
        Self { learning_paths }
    }

    /// List previously generated paths, newest first.
    ///
    /// # Errors
    ///
    /// Returns `LearningPathError::Api` if the backend call fails.
    pub async fn list(&self) -> Result<Vec<LearningPathListItem>, LearningPathError> {
        let mut items = self.learning_paths.list_learning_paths().await?;
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    /// # Errors
    ///
    /// Returns `LearningPathError::NotFound` for an unknown id.
    pub async fn dashboard(&self, id: &LearningPathId) -> Result<Dashboard, LearningPathError> {
        Ok(self.learning_paths.dashboard(id).await?)
    }

    /// All sessions of a path in schedule order.
    ///
    /// # Errors
    ///
    /// Returns `LearningPathError::NotFound` for an unknown id.
    pub async fn sessions(
        &self,
        id: &LearningPathId,
    ) -> Result<Vec<StudySession>, LearningPathError> {
        let mut sessions = self.learning_paths.sessions(id).await?;
        sessions.sort_by_key(|session| session.scheduled_time);
        Ok(sessions)
    }
}
