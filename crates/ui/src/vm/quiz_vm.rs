use studysync_core::model::{ModuleQuiz, QuizAnswers, QuizEvaluation, score_percent};

use crate::vm::markdown_vm::markdown_to_html;

/// A module quiz being taken, just graded, or reviewed later.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizVm {
    quiz: ModuleQuiz,
    answers: QuizAnswers,
    evaluation: Option<QuizEvaluation>,
    review: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionMark {
    Plain,
    Correct,
    Incorrect,
}

impl OptionMark {
    #[must_use]
    pub fn class(self, selected: bool) -> &'static str {
        match (self, selected) {
            (Self::Correct, _) => "quiz-option correct",
            (Self::Incorrect, _) => "quiz-option incorrect",
            (Self::Plain, true) => "quiz-option selected",
            (Self::Plain, false) => "quiz-option",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizOptionVm {
    pub letter: String,
    pub text: String,
    pub selected: bool,
    pub mark: OptionMark,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizQuestionVm {
    pub index: usize,
    pub number: usize,
    pub text: String,
    pub options: Vec<QuizOptionVm>,
    pub explanation_html: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizSummaryVm {
    pub percent: u32,
    pub correct_str: String,
    /// Only known for a fresh grading.
    pub passed: Option<bool>,
    pub gaps: Vec<String>,
}

impl QuizVm {
    #[must_use]
    pub fn new(quiz: ModuleQuiz) -> Self {
        Self {
            quiz,
            answers: QuizAnswers::new(),
            evaluation: None,
            review: false,
        }
    }

    /// Read-only view of a taken quiz with its submitted answers.
    #[must_use]
    pub fn review(quiz: ModuleQuiz) -> Self {
        let answers = quiz
            .user_responses
            .as_ref()
            .map(QuizAnswers::from_responses)
            .unwrap_or_default();
        Self {
            quiz,
            answers,
            evaluation: None,
            review: true,
        }
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.quiz
            .module_title
            .clone()
            .unwrap_or_else(|| "Module quiz".to_string())
    }

    #[must_use]
    pub fn quiz(&self) -> &ModuleQuiz {
        &self.quiz
    }

    #[must_use]
    pub fn answers(&self) -> &QuizAnswers {
        &self.answers
    }

    #[must_use]
    pub fn is_review(&self) -> bool {
        self.review
    }

    /// No more answers are accepted once graded or when reviewing.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.review || self.evaluation.is_some()
    }

    /// Returns whether the selection was applied.
    pub fn select(&mut self, index: usize, letter: &str) -> bool {
        let known = self
            .quiz
            .questions
            .get(index)
            .is_some_and(|question| question.options.contains_key(letter));
        if self.is_finished() || !known {
            return false;
        }
        self.answers.select(index, letter);
        true
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_finished() && self.answers.is_complete(self.quiz.questions.len())
    }

    #[must_use]
    pub fn progress_str(&self) -> String {
        format!(
            "{} of {} answered",
            self.answers.len(),
            self.quiz.questions.len()
        )
    }

    pub fn apply_evaluation(&mut self, evaluation: QuizEvaluation) {
        self.evaluation = Some(evaluation);
    }

    fn correct_letter(&self, index: usize) -> Option<String> {
        self.evaluation
            .as_ref()
            .and_then(|evaluation| evaluation.result_for(index))
            .map(|result| result.correct_answer.clone())
            .filter(|letter| !letter.is_empty())
            .or_else(|| self.quiz.questions.get(index)?.correct_answer.clone())
    }

    fn explanation(&self, index: usize) -> Option<String> {
        self.evaluation
            .as_ref()
            .and_then(|evaluation| evaluation.result_for(index))
            .map(|result| result.explanation.clone())
            .filter(|text| !text.trim().is_empty())
            .or_else(|| self.quiz.questions.get(index)?.explanation.clone())
            .filter(|text| !text.trim().is_empty())
    }

    #[must_use]
    pub fn questions(&self) -> Vec<QuizQuestionVm> {
        let finished = self.is_finished();
        self.quiz
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let chosen = self.answers.get(index);
                let correct = finished.then(|| self.correct_letter(index)).flatten();
                let options = question
                    .options
                    .iter()
                    .map(|(letter, text)| {
                        let selected = chosen == Some(letter.as_str());
                        let mark = match correct.as_deref() {
                            Some(right) if right == letter => OptionMark::Correct,
                            Some(_) if selected => OptionMark::Incorrect,
                            _ => OptionMark::Plain,
                        };
                        QuizOptionVm {
                            letter: letter.clone(),
                            text: text.clone(),
                            selected,
                            mark,
                        }
                    })
                    .collect();
                QuizQuestionVm {
                    index,
                    number: index + 1,
                    text: question.question.clone(),
                    options,
                    explanation_html: finished
                        .then(|| self.explanation(index))
                        .flatten()
                        .map(|text| markdown_to_html(&text)),
                }
            })
            .collect()
    }

    /// Score banner once graded or when reviewing.
    #[must_use]
    pub fn summary(&self) -> Option<QuizSummaryVm> {
        if let Some(evaluation) = &self.evaluation {
            return Some(QuizSummaryVm {
                percent: evaluation.percent(),
                correct_str: format!(
                    "{} / {} correct",
                    evaluation.correct_count, evaluation.total_questions
                ),
                passed: Some(evaluation.passed),
                gaps: evaluation.knowledge_gaps.clone(),
            });
        }
        if !self.review {
            return None;
        }
        let total = self.quiz.questions.len();
        let correct = (0..total)
            .filter(|index| {
                let right = self.correct_letter(*index);
                right.is_some() && self.answers.get(*index) == right.as_deref()
            })
            .count();
        #[allow(clippy::cast_precision_loss)]
        let computed = if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        };
        Some(QuizSummaryVm {
            percent: score_percent(self.quiz.score.unwrap_or(computed)),
            correct_str: format!("{correct} / {total} correct"),
            passed: None,
            gaps: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use studysync_core::model::{AssessmentId, QuestionResult, QuizQuestion};

    fn quiz() -> ModuleQuiz {
        let question = |text: &str, correct: &str| QuizQuestion {
            question: text.into(),
            options: BTreeMap::from([
                ("A".to_string(), "yes".to_string()),
                ("B".to_string(), "no".to_string()),
            ]),
            correct_answer: Some(correct.into()),
            explanation: Some("Moves transfer *ownership*.".into()),
        };
        ModuleQuiz {
            assessment_id: AssessmentId::new("a1"),
            module_id: None,
            module_title: Some("Ownership".into()),
            questions: vec![question("Is a move a copy?", "B"), question("Is &T shared?", "A")],
            completed: false,
            score: None,
            user_responses: None,
        }
    }

    fn evaluation() -> QuizEvaluation {
        QuizEvaluation {
            assessment_id: Some(AssessmentId::new("a1")),
            score: 0.5,
            correct_count: 1,
            total_questions: 2,
            passed: false,
            results: vec![
                QuestionResult {
                    question_id: "0".into(),
                    question: "Is a move a copy?".into(),
                    user_answer: "A".into(),
                    correct_answer: "B".into(),
                    is_correct: false,
                    explanation: "A move is not a copy.".into(),
                },
                QuestionResult {
                    question_id: "1".into(),
                    question: "Is &T shared?".into(),
                    user_answer: "A".into(),
                    correct_answer: "A".into(),
                    is_correct: true,
                    explanation: String::new(),
                },
            ],
            knowledge_gaps: vec!["Move semantics".into()],
        }
    }

    #[test]
    fn submit_enabled_only_when_every_question_answered() {
        let mut vm = QuizVm::new(quiz());
        assert!(!vm.can_submit());
        assert!(vm.select(0, "A"));
        assert!(!vm.can_submit());
        assert!(!vm.select(1, "Z"));
        assert!(vm.select(1, "A"));
        assert!(vm.can_submit());
        assert_eq!(vm.progress_str(), "2 of 2 answered");
    }

    #[test]
    fn grading_marks_options_and_locks_answers() {
        let mut vm = QuizVm::new(quiz());
        vm.select(0, "A");
        vm.select(1, "A");
        vm.apply_evaluation(evaluation());

        assert!(!vm.can_submit());
        assert!(!vm.select(0, "B"));

        let questions = vm.questions();
        assert_eq!(questions[0].options[0].mark, OptionMark::Incorrect);
        assert_eq!(questions[0].options[1].mark, OptionMark::Correct);
        assert!(questions[0].explanation_html.as_deref().unwrap().contains("not a copy"));
        // Blank explanation in the result falls back to the quiz's own.
        assert!(questions[1].explanation_html.as_deref().unwrap().contains("<em>ownership</em>"));

        let summary = vm.summary().unwrap();
        assert_eq!(summary.percent, 50);
        assert_eq!(summary.correct_str, "1 / 2 correct");
        assert_eq!(summary.passed, Some(false));
        assert_eq!(summary.gaps, vec!["Move semantics".to_string()]);
    }

    #[test]
    fn review_restores_submitted_answers() {
        let mut taken = quiz();
        taken.completed = true;
        taken.user_responses = Some(BTreeMap::from([
            ("0".to_string(), "B".to_string()),
            ("1".to_string(), "B".to_string()),
        ]));
        let vm = QuizVm::review(taken);

        assert!(vm.is_finished());
        let questions = vm.questions();
        assert!(questions[0].options[1].selected);
        assert_eq!(questions[1].options[1].mark, OptionMark::Incorrect);
        let summary = vm.summary().unwrap();
        assert_eq!(summary.percent, 50);
        assert_eq!(summary.passed, None);
    }

    #[test]
    fn explanations_hidden_while_taking() {
        let vm = QuizVm::new(quiz());
        assert!(vm.questions().iter().all(|q| q.explanation_html.is_none()));
        assert_eq!(vm.summary(), None);
    }
}
