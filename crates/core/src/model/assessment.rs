use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ProficiencyLevel;

/// One proficiency question generated for a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProficiencyQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub difficulty: Option<ProficiencyLevel>,
}

/// Answer submitted with the creation request, in question order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResponse {
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<ProficiencyLevel>,
}

/// Selected choice per question index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    answers: BTreeMap<usize, String>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the answer for a question.
    pub fn answer(&mut self, index: usize, choice: impl Into<String>) {
        self.answers.insert(index, choice.into());
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

    /// True when every index in `0..question_count` has an answer.
    #[must_use]
    pub fn covers(&self, question_count: usize) -> bool {
        (0..question_count).all(|index| self.answers.contains_key(&index))
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    /// Pair answers with their questions; unanswered questions are skipped.
    #[must_use]
    pub fn responses(&self, questions: &[ProficiencyQuestion]) -> Vec<AssessmentResponse> {
        questions
            .iter()
            .enumerate()
            .filter_map(|(index, question)| {
                self.get(index).map(|answer| AssessmentResponse {
                    question: question.question.clone(),
                    answer: answer.to_string(),
                    difficulty: question.difficulty,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str) -> ProficiencyQuestion {
        ProficiencyQuestion {
            question: text.to_string(),
            options: vec!["a".into(), "b".into()],
            kind: Some("multiple_choice".into()),
            difficulty: Some(ProficiencyLevel::Beginner),
        }
    }

    #[test]
    fn covers_requires_every_index() {
        let mut sheet = AnswerSheet::new();
        assert!(sheet.covers(0));
        assert!(!sheet.covers(2));
        sheet.answer(1, "b");
        assert!(!sheet.covers(2));
        sheet.answer(0, "a");
        assert!(sheet.covers(2));
    }

    #[test]
    fn responses_follow_question_order() {
        let questions = vec![question("Q1"), question("Q2")];
        let mut sheet = AnswerSheet::new();
        sheet.answer(1, "b");
        sheet.answer(0, "a");
        let responses = sheet.responses(&questions);
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].question, "Q1");
        assert_eq!(responses[0].answer, "a");
        assert_eq!(responses[1].answer, "b");
    }

    #[test]
    fn question_tolerates_missing_optional_fields() {
        let parsed: ProficiencyQuestion =
            serde_json::from_str(r#"{"question":"What is ownership?"}"#).unwrap();
        assert!(parsed.options.is_empty());
        assert_eq!(parsed.difficulty, None);
    }
}
