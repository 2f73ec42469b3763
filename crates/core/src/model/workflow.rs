use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::{
    AnswerSheet, AssessmentResponse, AttemptId, CommitmentLevel, LearningPathId, ProficiencyLevel,
    ProficiencyQuestion, ProgressEntry, ProgressEvent, ProgressLog, ProgressPhase, StreamMessage,
    StreamSignal, StudyWindow, Topic, TopicError,
};

/// Shown when the stream drops before a terminal event.
pub const CONNECTION_LOST_MESSAGE: &str = "Connection lost. Please try again.";
/// Shown when an `error` event carries no message.
pub const GENERIC_CREATION_ERROR: &str =
    "Something went wrong while creating your learning path. Please try again.";
/// Shown when a `complete` event has no learning path id.
pub const MISSING_PATH_ID_MESSAGE: &str =
    "Learning path was created but no id was returned. Please try again.";
/// Shown when no event arrives within the configured wait.
pub const TIMED_OUT_MESSAGE: &str = "Timed out waiting for the learning path. Please try again.";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WorkflowError {
    #[error("expected step {expected}, currently at {actual}")]
    WrongStep {
        expected: OnboardingStep,
        actual: OnboardingStep,
    },

    #[error(transparent)]
    Topic(#[from] TopicError),

    #[error("{answered} of {total} questions answered")]
    AssessmentIncomplete { answered: usize, total: usize },

    #[error("no proficiency level selected")]
    MissingProficiency,

    #[error("question {index} does not exist ({total} questions)")]
    UnknownQuestion { index: usize, total: usize },

    #[error("a learning path is being created")]
    CreationInProgress,

    #[error("proficiency questions are still loading")]
    QuestionsPending,

    #[error("could not encode request: {0}")]
    Encode(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown onboarding variant: {0}")]
pub struct VariantParseError(String);

//
// ─── VARIANTS & STEPS ──────────────────────────────────────────────────────────
//

/// The two onboarding configurations of the same machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OnboardingVariant {
    /// Topic → Commitment → Creating; proficiency is self-reported.
    Simple,
    /// Topic → Assessment → Commitment → Creating.
    #[default]
    Assessed,
}

impl OnboardingVariant {
    #[must_use]
    pub fn has_assessment(self) -> bool {
        matches!(self, Self::Assessed)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Assessed => "assessment",
        }
    }

    /// Step reached after a valid topic is submitted.
    #[must_use]
    pub fn step_after_topic(self) -> OnboardingStep {
        match self {
            Self::Simple => OnboardingStep::Commitment,
            Self::Assessed => OnboardingStep::Assessment,
        }
    }

    /// Step reached when backing out of the commitment step.
    #[must_use]
    pub fn step_before_commitment(self) -> OnboardingStep {
        match self {
            Self::Simple => OnboardingStep::Topic,
            Self::Assessed => OnboardingStep::Assessment,
        }
    }
}

impl FromStr for OnboardingVariant {
    type Err = VariantParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "assessment" | "assessed" => Ok(Self::Assessed),
            _ => Err(VariantParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OnboardingStep {
    Topic,
    Assessment,
    Commitment,
    Creating,
}

impl OnboardingStep {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Topic => "topic",
            Self::Assessment => "assessment",
            Self::Commitment => "commitment",
            Self::Creating => "creating",
        }
    }
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── REQUESTS & OUTCOMES ───────────────────────────────────────────────────────
//

/// Parameters for one creation attempt, snapshotted from the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationRequest {
    pub attempt: AttemptId,
    pub topic: Topic,
    pub commitment: CommitmentLevel,
    pub proficiency: Option<ProficiencyLevel>,
    pub window: StudyWindow,
    pub responses: Option<Vec<AssessmentResponse>>,
}

impl CreationRequest {
    /// Query parameters for the creation stream endpoint.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Encode` if the assessment responses cannot be serialized.
    pub fn query_pairs(&self) -> Result<Vec<(&'static str, String)>, WorkflowError> {
        let mut pairs = vec![
            ("topic", self.topic.as_str().to_string()),
            ("commitment_level", self.commitment.as_str().to_string()),
        ];
        if let Some(level) = self.proficiency {
            pairs.push(("proficiency_level", level.as_str().to_string()));
        }
        if let Some(start) = self.window.start() {
            pairs.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.window.end() {
            pairs.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(responses) = self.responses.as_ref().filter(|r| !r.is_empty()) {
            let encoded = serde_json::to_string(responses)
                .map_err(|err| WorkflowError::Encode(err.to_string()))?;
            pairs.push(("assessment_responses", encoded));
        }
        Ok(pairs)
    }
}

/// What the caller must do after submitting a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicOutcome {
    /// The machine moved on without any external call.
    Advanced(OnboardingStep),
    /// Fetch proficiency questions for the topic, then report back with
    /// `questions_loaded` or `questions_failed`.
    FetchQuestions(Topic),
}

/// Effect of feeding one stream message into the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Progress recorded; keep reading.
    Continue,
    /// Payload could not be decoded; keep reading.
    Dropped,
    /// Terminal success; navigate to the dashboard.
    Completed(LearningPathId),
    /// Terminal failure; the machine is back at `Commitment`.
    Failed,
    /// Message belongs to a stale or finished attempt.
    Ignored,
}

impl EventOutcome {
    /// True when the stream must be closed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed | Self::Ignored)
    }
}

//
// ─── MACHINE ───────────────────────────────────────────────────────────────────
//

/// Onboarding flow state, owned by the page that displays it.
///
/// Every mutation goes through a transition method; the struct never talks
/// to the network itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingMachine {
    variant: OnboardingVariant,
    step: OnboardingStep,
    topic_input: String,
    topic: Option<Topic>,
    proficiency: Option<ProficiencyLevel>,
    commitment: CommitmentLevel,
    window: StudyWindow,
    questions: Vec<ProficiencyQuestion>,
    answers: AnswerSheet,
    questions_pending: bool,
    attempt: AttemptId,
    log: ProgressLog,
    phase: Option<ProgressPhase>,
    error: Option<String>,
    completed: Option<LearningPathId>,
}

impl OnboardingMachine {
    #[must_use]
    pub fn new(variant: OnboardingVariant) -> Self {
        // The simple variant has no quiz, so a self-reported level is preselected.
        let proficiency = match variant {
            OnboardingVariant::Simple => Some(ProficiencyLevel::Beginner),
            OnboardingVariant::Assessed => None,
        };
        Self {
            variant,
            step: OnboardingStep::Topic,
            topic_input: String::new(),
            topic: None,
            proficiency,
            commitment: CommitmentLevel::default(),
            window: StudyWindow::default(),
            questions: Vec::new(),
            answers: AnswerSheet::new(),
            questions_pending: false,
            attempt: AttemptId::default(),
            log: ProgressLog::new(),
            phase: None,
            error: None,
            completed: None,
        }
    }

    // ── accessors ──

    #[must_use]
    pub fn variant(&self) -> OnboardingVariant {
        self.variant
    }

    #[must_use]
    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    #[must_use]
    pub fn topic_input(&self) -> &str {
        &self.topic_input
    }

    #[must_use]
    pub fn topic(&self) -> Option<&Topic> {
        self.topic.as_ref()
    }

    #[must_use]
    pub fn proficiency(&self) -> Option<ProficiencyLevel> {
        self.proficiency
    }

    #[must_use]
    pub fn commitment(&self) -> CommitmentLevel {
        self.commitment
    }

    #[must_use]
    pub fn window(&self) -> StudyWindow {
        self.window
    }

    #[must_use]
    pub fn questions(&self) -> &[ProficiencyQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn is_loading_questions(&self) -> bool {
        self.questions_pending
    }

    #[must_use]
    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    #[must_use]
    pub fn log(&self) -> &ProgressLog {
        &self.log
    }

    #[must_use]
    pub fn phase(&self) -> Option<&ProgressPhase> {
        self.phase.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn completed(&self) -> Option<&LearningPathId> {
        self.completed.as_ref()
    }

    /// True while a creation attempt is waiting for its terminal event.
    #[must_use]
    pub fn is_creating(&self) -> bool {
        self.step == OnboardingStep::Creating && self.completed.is_none()
    }

    // ── topic ──

    /// Update the raw topic text; only editable on the topic step.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::WrongStep` outside the topic step.
    pub fn set_topic_input(&mut self, raw: impl Into<String>) -> Result<(), WorkflowError> {
        self.expect_step(OnboardingStep::Topic)?;
        self.topic_input = raw.into();
        Ok(())
    }

    #[must_use]
    pub fn can_submit_topic(&self) -> bool {
        self.step == OnboardingStep::Topic
            && !self.questions_pending
            && Topic::parse(&self.topic_input).is_ok()
    }

    /// Validate the topic and advance (simple variant) or request questions.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Topic` for blank input, `QuestionsPending`
    /// while an earlier fetch is outstanding, `WrongStep` elsewhere.
    pub fn submit_topic(&mut self) -> Result<TopicOutcome, WorkflowError> {
        self.expect_step(OnboardingStep::Topic)?;
        if self.questions_pending {
            return Err(WorkflowError::QuestionsPending);
        }
        let topic = Topic::parse(&self.topic_input)?;
        self.error = None;
        self.topic = Some(topic.clone());
        match self.variant {
            OnboardingVariant::Simple => {
                self.step = OnboardingStep::Commitment;
                Ok(TopicOutcome::Advanced(self.step))
            }
            OnboardingVariant::Assessed => {
                self.questions_pending = true;
                Ok(TopicOutcome::FetchQuestions(topic))
            }
        }
    }

    /// Questions arrived for the submitted topic.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::WrongStep` if no fetch is outstanding.
    pub fn questions_loaded(
        &mut self,
        questions: Vec<ProficiencyQuestion>,
    ) -> Result<(), WorkflowError> {
        self.expect_step(OnboardingStep::Topic)?;
        if !self.questions_pending {
            return Err(WorkflowError::WrongStep {
                expected: OnboardingStep::Assessment,
                actual: self.step,
            });
        }
        self.questions_pending = false;
        self.questions = questions;
        self.answers.clear();
        self.step = OnboardingStep::Assessment;
        Ok(())
    }

    /// The question fetch failed; stay on the topic step with a message.
    pub fn questions_failed(&mut self, message: impl Into<String>) {
        if self.step == OnboardingStep::Topic {
            self.questions_pending = false;
            self.error = Some(message.into());
        }
    }

    // ── assessment ──

    /// Record the selected choice for a question.
    ///
    /// # Errors
    ///
    /// Returns `WrongStep` outside the assessment step or `UnknownQuestion`
    /// for an out-of-range index.
    pub fn answer_question(
        &mut self,
        index: usize,
        choice: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        self.expect_step(OnboardingStep::Assessment)?;
        let total = self.questions.len();
        if index >= total {
            return Err(WorkflowError::UnknownQuestion { index, total });
        }
        self.answers.answer(index, choice);
        Ok(())
    }

    /// Choose a proficiency level. Assessment step in the assessed variant,
    /// commitment step in the simple one.
    ///
    /// # Errors
    ///
    /// Returns `WrongStep` when the current step does not collect a level.
    pub fn select_proficiency(&mut self, level: ProficiencyLevel) -> Result<(), WorkflowError> {
        let step = match self.variant {
            OnboardingVariant::Assessed => OnboardingStep::Assessment,
            OnboardingVariant::Simple => OnboardingStep::Commitment,
        };
        self.expect_step(step)?;
        self.proficiency = Some(level);
        Ok(())
    }

    #[must_use]
    pub fn can_continue_assessment(&self) -> bool {
        self.step == OnboardingStep::Assessment
            && self.answers.covers(self.questions.len())
            && self.proficiency.is_some()
    }

    /// Leave the assessment step.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentIncomplete` or `MissingProficiency` when guarded.
    pub fn submit_assessment(&mut self) -> Result<(), WorkflowError> {
        self.expect_step(OnboardingStep::Assessment)?;
        let total = self.questions.len();
        if !self.answers.covers(total) {
            return Err(WorkflowError::AssessmentIncomplete {
                answered: self.answers.len(),
                total,
            });
        }
        if self.proficiency.is_none() {
            return Err(WorkflowError::MissingProficiency);
        }
        self.step = OnboardingStep::Commitment;
        Ok(())
    }

    // ── commitment ──

    /// # Errors
    ///
    /// Returns `WrongStep` outside the commitment step.
    pub fn select_commitment(&mut self, level: CommitmentLevel) -> Result<(), WorkflowError> {
        self.expect_step(OnboardingStep::Commitment)?;
        self.commitment = level;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `WrongStep` outside the commitment step.
    pub fn set_window(&mut self, window: StudyWindow) -> Result<(), WorkflowError> {
        self.expect_step(OnboardingStep::Commitment)?;
        self.window = window;
        Ok(())
    }

    /// Step back one screen, keeping every entered value.
    ///
    /// # Errors
    ///
    /// Returns `CreationInProgress` while creating; going back from the topic
    /// step is a no-op.
    pub fn go_back(&mut self) -> Result<OnboardingStep, WorkflowError> {
        self.step = match self.step {
            OnboardingStep::Topic => OnboardingStep::Topic,
            OnboardingStep::Assessment => OnboardingStep::Topic,
            OnboardingStep::Commitment => self.variant.step_before_commitment(),
            OnboardingStep::Creating => return Err(WorkflowError::CreationInProgress),
        };
        self.error = None;
        Ok(self.step)
    }

    // ── creation ──

    /// Start a new creation attempt: reset progress, bump the attempt id and
    /// snapshot the request.
    ///
    /// # Errors
    ///
    /// Returns `WrongStep` outside the commitment step, or `Topic` if no
    /// topic was ever submitted.
    pub fn begin_creation(&mut self) -> Result<CreationRequest, WorkflowError> {
        self.expect_step(OnboardingStep::Commitment)?;
        let topic = self.topic.clone().ok_or(WorkflowError::Topic(TopicError::Empty))?;
        let responses = self
            .variant
            .has_assessment()
            .then(|| self.answers.responses(&self.questions));

        self.log.reset();
        self.phase = None;
        self.error = None;
        self.completed = None;
        self.attempt = self.attempt.next();
        self.step = OnboardingStep::Creating;

        Ok(CreationRequest {
            attempt: self.attempt,
            topic,
            commitment: self.commitment,
            proficiency: self.proficiency,
            window: self.window,
            responses,
        })
    }

    /// Opening the stream failed before any message arrived.
    pub fn creation_failed(&mut self, attempt: AttemptId, message: impl Into<String>) {
        if attempt == self.attempt && self.is_creating() {
            self.fail(message.into());
        }
    }

    /// Apply one stream message to the current attempt.
    pub fn receive(&mut self, message: StreamMessage) -> EventOutcome {
        if message.attempt != self.attempt || !self.is_creating() {
            return EventOutcome::Ignored;
        }

        match message.signal {
            StreamSignal::Event(ProgressEvent::Progress {
                phase,
                message: text,
                timestamp,
            }) => {
                let phase = phase.unwrap_or_default();
                self.phase = Some(ProgressPhase::parse(&phase));
                self.log.append(ProgressEntry {
                    phase,
                    message: text.unwrap_or_default(),
                    timestamp,
                    received_at: message.received_at,
                });
                EventOutcome::Continue
            }
            StreamSignal::Event(ProgressEvent::Complete { data, .. }) => {
                match data.and_then(|data| data.learning_path_id) {
                    Some(id) => {
                        self.completed = Some(id.clone());
                        EventOutcome::Completed(id)
                    }
                    None => {
                        self.fail(MISSING_PATH_ID_MESSAGE.to_string());
                        EventOutcome::Failed
                    }
                }
            }
            StreamSignal::Event(ProgressEvent::Error { message: text }) => {
                let text = text
                    .filter(|text| !text.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_CREATION_ERROR.to_string());
                self.fail(text);
                EventOutcome::Failed
            }
            StreamSignal::Malformed { .. } => EventOutcome::Dropped,
            StreamSignal::Disconnected => {
                self.fail(CONNECTION_LOST_MESSAGE.to_string());
                EventOutcome::Failed
            }
            StreamSignal::TimedOut => {
                self.fail(TIMED_OUT_MESSAGE.to_string());
                EventOutcome::Failed
            }
        }
    }

    fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.step = OnboardingStep::Commitment;
    }

    fn expect_step(&self, expected: OnboardingStep) -> Result<(), WorkflowError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WorkflowError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }
}
