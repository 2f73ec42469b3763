use std::sync::Arc;

use api::AssessmentApi;
use studysync_core::model::{ProficiencyQuestion, Topic};
use tracing::debug;

use crate::error::AssessmentError;

/// Fetches the proficiency assessment shown during onboarding.
#[derive(Clone)]
pub struct AssessmentService {
    assessments: Arc<dyn AssessmentApi>,
}

impl AssessmentService {
    #[must_use]
    pub fn new(assessments: Arc<dyn AssessmentApi>) -> Self {
        Self { assessments }
    }

    /// Load the questions for `topic`.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Api` if the backend call fails.
    pub async fn proficiency_questions(
        &self,
        topic: &Topic,
    ) -> Result<Vec<ProficiencyQuestion>, AssessmentError> {
        let questions = self.assessments.proficiency_questions(topic).await?;
        debug!(topic = topic.as_str(), count = questions.len(), "loaded proficiency questions");
        Ok(questions)
    }
}
