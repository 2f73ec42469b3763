use studysync_core::model::{
    AnswerSheet, CommitmentLevel, LearningPathListItem, OnboardingMachine, OnboardingStep,
    OnboardingVariant, ProficiencyLevel, ProficiencyQuestion, ProgressLog, ProgressPhase,
};

use crate::vm::time_fmt::{format_clock, format_day};

//
// ─── STEPS ─────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepState {
    Done,
    Current,
    Upcoming,
}

impl StepState {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Done => "step step-done",
            Self::Current => "step step-current",
            Self::Upcoming => "step",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepVm {
    pub label: &'static str,
    pub state: StepState,
}

fn step_label(step: OnboardingStep) -> &'static str {
    match step {
        OnboardingStep::Topic => "Topic",
        OnboardingStep::Assessment => "Your level",
        OnboardingStep::Commitment => "Schedule",
        OnboardingStep::Creating => "Building",
    }
}

/// Breadcrumb for the variant's steps, marking progress up to `current`.
#[must_use]
pub fn step_indicator(variant: OnboardingVariant, current: OnboardingStep) -> Vec<StepVm> {
    let steps: &[OnboardingStep] = if variant.has_assessment() {
        &[
            OnboardingStep::Topic,
            OnboardingStep::Assessment,
            OnboardingStep::Commitment,
            OnboardingStep::Creating,
        ]
    } else {
        &[
            OnboardingStep::Topic,
            OnboardingStep::Commitment,
            OnboardingStep::Creating,
        ]
    };
    let position = steps.iter().position(|step| *step == current).unwrap_or(0);
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| StepVm {
            label: step_label(*step),
            state: match index.cmp(&position) {
                std::cmp::Ordering::Less => StepState::Done,
                std::cmp::Ordering::Equal => StepState::Current,
                std::cmp::Ordering::Greater => StepState::Upcoming,
            },
        })
        .collect()
}

//
// ─── CHOICES ───────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssessmentQuestionVm {
    pub index: usize,
    pub text: String,
    pub options: Vec<ChoiceVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceVm {
    pub value: String,
    pub selected: bool,
}

#[must_use]
pub fn map_assessment_questions(
    questions: &[ProficiencyQuestion],
    answers: &AnswerSheet,
) -> Vec<AssessmentQuestionVm> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| AssessmentQuestionVm {
            index,
            text: question.question.clone(),
            options: question
                .options
                .iter()
                .map(|option| ChoiceVm {
                    value: option.clone(),
                    selected: answers.get(index) == Some(option.as_str()),
                })
                .collect(),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProficiencyOptionVm {
    pub level: ProficiencyLevel,
    pub label: &'static str,
    pub description: &'static str,
    pub selected: bool,
}

#[must_use]
pub fn proficiency_options(selected: Option<ProficiencyLevel>) -> Vec<ProficiencyOptionVm> {
    ProficiencyLevel::ALL
        .into_iter()
        .map(|level| ProficiencyOptionVm {
            level,
            label: level.label(),
            description: level.description(),
            selected: selected == Some(level),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitmentOptionVm {
    pub level: CommitmentLevel,
    pub label: &'static str,
    pub summary: String,
    pub selected: bool,
}

#[must_use]
pub fn commitment_options(selected: CommitmentLevel) -> Vec<CommitmentOptionVm> {
    CommitmentLevel::ALL
        .into_iter()
        .map(|level| CommitmentOptionVm {
            level,
            label: level.label(),
            summary: level.profile().summary(),
            selected: selected == level,
        })
        .collect()
}

//
// ─── CREATION PROGRESS ─────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressRowVm {
    pub label: String,
    pub message: String,
    pub time_str: String,
}

#[must_use]
pub fn map_progress_rows(log: &ProgressLog) -> Vec<ProgressRowVm> {
    log.iter()
        .map(|entry| ProgressRowVm {
            label: ProgressPhase::parse(&entry.phase).label().to_string(),
            message: entry.message.clone(),
            time_str: format_clock(entry.received_at),
        })
        .collect()
}

/// Headline above the progress log.
#[must_use]
pub fn creation_headline(machine: &OnboardingMachine) -> String {
    match machine.phase() {
        Some(phase) => format!("{phase}…"),
        None => "Starting…".to_string(),
    }
}

//
// ─── EXISTING PATHS ────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LearningPathCardVm {
    pub id: String,
    pub topic: String,
    pub detail: String,
    pub created_str: Option<String>,
}

fn level_label<T>(raw: Option<&str>, label: impl Fn(T) -> &'static str) -> Option<String>
where
    T: std::str::FromStr,
{
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(raw.parse::<T>().map_or_else(|_| raw.to_string(), |level| label(level).to_string()))
}

impl From<&LearningPathListItem> for LearningPathCardVm {
    fn from(item: &LearningPathListItem) -> Self {
        let levels: Vec<String> = [
            level_label(item.proficiency_level.as_deref(), ProficiencyLevel::label),
            level_label(item.commitment_level.as_deref(), CommitmentLevel::label),
        ]
        .into_iter()
        .flatten()
        .collect();
        Self {
            id: item.id.to_string(),
            topic: item.topic.clone(),
            detail: levels.join(" · "),
            created_str: item.created_at.map(format_day),
        }
    }
}

#[must_use]
pub fn map_learning_path_cards(items: &[LearningPathListItem]) -> Vec<LearningPathCardVm> {
    items.iter().map(LearningPathCardVm::from).collect()
}
