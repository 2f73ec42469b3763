use std::sync::Arc;

use api::AssessmentApi;
use studysync_core::model::{LearningPathId, ModuleId, ModuleQuiz, QuizAnswers, QuizEvaluation};
use tracing::info;

use crate::error::QuizError;

/// Module quizzes: take, submit, review.
#[derive(Clone)]
pub struct QuizService {
    assessments: Arc<dyn AssessmentApi>,
}

impl QuizService {
    #[must_use]
    pub fn new(assessments: Arc<dyn AssessmentApi>) -> Self {
        Self { assessments }
    }

    /// # Errors
    ///
    /// Returns `QuizError::NotFound` if the module has no quiz.
    pub async fn load(
        &self,
        module_id: &ModuleId,
        learning_path_id: &LearningPathId,
    ) -> Result<ModuleQuiz, QuizError> {
        Ok(self.assessments.module_quiz(module_id, learning_path_id).await?)
    }

    /// Load a taken quiz together with the answers that were submitted.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotFound` if the quiz was never submitted.
    pub async fn review(
        &self,
        module_id: &ModuleId,
        learning_path_id: &LearningPathId,
    ) -> Result<ModuleQuiz, QuizError> {
        Ok(self.assessments.quiz_results(module_id, learning_path_id).await?)
    }

    /// Submit answers for grading; every question must be answered.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Incomplete` before any network call when answers
    /// are missing, or `QuizError::Api` if grading fails.
    pub async fn submit(
        &self,
        quiz: &ModuleQuiz,
        answers: &QuizAnswers,
    ) -> Result<QuizEvaluation, QuizError> {
        let total = quiz.questions.len();
        if !answers.is_complete(total) {
            return Err(QuizError::Incomplete {
                answered: answers.len(),
                total,
            });
        }
        let evaluation = self
            .assessments
            .submit_quiz(&quiz.assessment_id, &answers.to_responses())
            .await?;
        info!(
            assessment_id = %quiz.assessment_id,
            score = evaluation.score,
            passed = evaluation.passed,
            "quiz submitted"
        );
        Ok(evaluation)
    }
}
