use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{AssessmentId, ModuleId};

/// Multiple-choice question with lettered options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// A module quiz as served for taking or reviewing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleQuiz {
    pub assessment_id: AssessmentId,
    #[serde(default)]
    pub module_id: Option<ModuleId>,
    #[serde(default)]
    pub module_title: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub score: Option<f64>,
    /// Previously submitted answers; present in review mode.
    #[serde(default)]
    pub user_responses: Option<BTreeMap<String, String>>,
}

/// Letter chosen per question, keyed by question index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizAnswers {
    answers: BTreeMap<usize, String>,
}

impl QuizAnswers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild answers from a stored `{"0": "B"}` map, skipping bad keys.
    #[must_use]
    pub fn from_responses(responses: &BTreeMap<String, String>) -> Self {
        let answers = responses
            .iter()
            .filter_map(|(key, value)| {
                let index = key.trim_start_matches('q').parse::<usize>().ok()?;
                Some((index, value.clone()))
            })
            .collect();
        Self { answers }
    }

    pub fn select(&mut self, index: usize, letter: impl Into<String>) {
        self.answers.insert(index, letter.into());
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    #[must_use]
    pub fn is_complete(&self, question_count: usize) -> bool {
        question_count > 0 && (0..question_count).all(|index| self.answers.contains_key(&index))
    }

    /// Wire form expected by the submit endpoint.
    #[must_use]
    pub fn to_responses(&self) -> BTreeMap<String, String> {
        self.answers
            .iter()
            .map(|(index, letter)| (index.to_string(), letter.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub user_answer: String,
    #[serde(default)]
    pub correct_answer: String,
    pub is_correct: bool,
    #[serde(default)]
    pub explanation: String,
}

/// Graded quiz submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizEvaluation {
    #[serde(default)]
    pub assessment_id: Option<AssessmentId>,
    /// Fraction correct, `0.0..=1.0`.
    pub score: f64,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub total_questions: u32,
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub results: Vec<QuestionResult>,
    #[serde(default)]
    pub knowledge_gaps: Vec<String>,
}

impl QuizEvaluation {
    #[must_use]
    pub fn percent(&self) -> u32 {
        score_percent(self.score)
    }

    #[must_use]
    pub fn result_for(&self, index: usize) -> Option<&QuestionResult> {
        let key = index.to_string();
        self.results.iter().find(|result| result.question_id == key)
    }
}

/// Convert a `0.0..=1.0` score into a whole percentage.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn score_percent(score: f64) -> u32 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u32
}
