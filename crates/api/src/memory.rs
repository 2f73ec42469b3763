use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use futures_util::future;
use futures_util::stream::{self, StreamExt};
use studysync_core::model::{
    AssessmentId, CreationRequest, Dashboard, IcsFile, LearningPathId, LearningPathListItem,
    ModuleId, ModuleQuiz, ProficiencyQuestion, QuizAnswers, QuizEvaluation, QuestionResult,
    StudySession, StudySessionId, Topic,
};

use crate::client::{ApiError, AssessmentApi, LearningPathApi, PayloadStream, ScheduleApi};

/// One step of a scripted creation stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedFrame {
    /// A raw `data:` payload.
    Payload(String),
    /// A transport failure; the stream ends after it.
    Error(String),
    /// The stream stays open without producing anything.
    Stall,
}

impl ScriptedFrame {
    #[must_use]
    pub fn payload(raw: impl Into<String>) -> Self {
        Self::Payload(raw.into())
    }
}

#[derive(Default)]
struct State {
    questions: HashMap<String, Vec<ProficiencyQuestion>>,
    learning_paths: Vec<LearningPathListItem>,
    dashboards: HashMap<LearningPathId, Dashboard>,
    sessions: HashMap<LearningPathId, Vec<StudySession>>,
    quizzes: HashMap<(LearningPathId, ModuleId), ModuleQuiz>,
    submissions: HashMap<AssessmentId, BTreeMap<String, String>>,
    calendars: HashMap<LearningPathId, IcsFile>,
    streams: VecDeque<Vec<ScriptedFrame>>,
    creation_requests: Vec<CreationRequest>,
    completions: Vec<(StudySessionId, String)>,
    session_fetches: usize,
    question_fetches: usize,
}

/// Scriptable backend for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<State>>,
    open_streams: Arc<AtomicUsize>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, ApiError> {
        self.state
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))
    }

    fn with_state(&self, apply: impl FnOnce(&mut State)) {
        if let Ok(mut guard) = self.state.lock() {
            apply(&mut guard);
        }
    }

    pub fn set_questions(&self, topic: &str, questions: Vec<ProficiencyQuestion>) {
        self.with_state(|state| {
            state.questions.insert(topic.to_string(), questions);
        });
    }

    pub fn add_learning_path(&self, item: LearningPathListItem) {
        self.with_state(|state| state.learning_paths.push(item));
    }

    pub fn set_dashboard(&self, dashboard: Dashboard) {
        self.with_state(|state| {
            state
                .dashboards
                .insert(dashboard.learning_path_id.clone(), dashboard);
        });
    }

    pub fn set_sessions(&self, learning_path_id: LearningPathId, sessions: Vec<StudySession>) {
        self.with_state(|state| {
            state.sessions.insert(learning_path_id, sessions);
        });
    }

    pub fn set_quiz(&self, learning_path_id: LearningPathId, module_id: ModuleId, quiz: ModuleQuiz) {
        self.with_state(|state| {
            state.quizzes.insert((learning_path_id, module_id), quiz);
        });
    }

    pub fn set_calendar(&self, learning_path_id: LearningPathId, file: IcsFile) {
        self.with_state(|state| {
            state.calendars.insert(learning_path_id, file);
        });
    }

    /// Queue the frames served by the next `creation_stream` call.
    pub fn push_stream(&self, frames: Vec<ScriptedFrame>) {
        self.with_state(|state| state.streams.push_back(frames));
    }

    #[must_use]
    pub fn creation_requests(&self) -> Vec<CreationRequest> {
        self.lock()
            .map(|state| state.creation_requests.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn completions(&self) -> Vec<(StudySessionId, String)> {
        self.lock()
            .map(|state| state.completions.clone())
            .unwrap_or_default()
    }

    /// Number of `sessions` list requests served.
    #[must_use]
    pub fn session_fetches(&self) -> usize {
        self.lock().map(|state| state.session_fetches).unwrap_or(0)
    }

    /// Number of proficiency question requests served.
    #[must_use]
    pub fn question_fetches(&self) -> usize {
        self.lock().map(|state| state.question_fetches).unwrap_or(0)
    }

    /// Creation streams handed out and not yet dropped by the client.
    #[must_use]
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }
}

/// Held by a scripted stream; dropping the stream releases it.
struct OpenStream(Arc<AtomicUsize>);

impl OpenStream {
    fn claim(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for OpenStream {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn scripted_stream(frames: Vec<ScriptedFrame>, open: OpenStream) -> PayloadStream {
    stream::unfold((frames.into_iter(), open), |(mut frames, open)| async move {
        match frames.next()? {
            ScriptedFrame::Payload(raw) => Some((Ok(raw), (frames, open))),
            ScriptedFrame::Error(reason) => Some((
                Err(ApiError::Stream(reason)),
                (Vec::new().into_iter(), open),
            )),
            ScriptedFrame::Stall => {
                future::pending::<()>().await;
                None
            }
        }
    })
    .boxed()
}

/// Grade a submission against the stored correct answers.
fn grade(quiz: &ModuleQuiz, responses: &BTreeMap<String, String>) -> QuizEvaluation {
    let answers = QuizAnswers::from_responses(responses);
    let results: Vec<QuestionResult> = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let user_answer = answers.get(index).unwrap_or_default().to_string();
            let correct_answer = question.correct_answer.clone().unwrap_or_default();
            QuestionResult {
                question_id: index.to_string(),
                question: question.question.clone(),
                is_correct: !user_answer.is_empty() && user_answer == correct_answer,
                user_answer,
                correct_answer,
                explanation: question.explanation.clone().unwrap_or_default(),
            }
        })
        .collect();
    let correct = results.iter().filter(|r| r.is_correct).count();
    let total = results.len();
    #[allow(clippy::cast_precision_loss)]
    let score = if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    };
    QuizEvaluation {
        assessment_id: Some(quiz.assessment_id.clone()),
        score,
        correct_count: u32::try_from(correct).unwrap_or(u32::MAX),
        total_questions: u32::try_from(total).unwrap_or(u32::MAX),
        passed: score >= 0.7,
        knowledge_gaps: results
            .iter()
            .filter(|r| !r.is_correct)
            .map(|r| r.question.clone())
            .collect(),
        results,
    }
}

#[async_trait]
impl AssessmentApi for InMemoryBackend {
    async fn proficiency_questions(
        &self,
        topic: &Topic,
    ) -> Result<Vec<ProficiencyQuestion>, ApiError> {
        let mut guard = self.lock()?;
        guard.question_fetches += 1;
        Ok(guard
            .questions
            .get(topic.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn module_quiz(
        &self,
        module_id: &ModuleId,
        learning_path_id: &LearningPathId,
    ) -> Result<ModuleQuiz, ApiError> {
        let guard = self.lock()?;
        guard
            .quizzes
            .get(&(learning_path_id.clone(), module_id.clone()))
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn quiz_results(
        &self,
        module_id: &ModuleId,
        learning_path_id: &LearningPathId,
    ) -> Result<ModuleQuiz, ApiError> {
        let guard = self.lock()?;
        let quiz = guard
            .quizzes
            .get(&(learning_path_id.clone(), module_id.clone()))
            .filter(|quiz| quiz.completed)
            .cloned()
            .ok_or(ApiError::NotFound)?;
        let responses = guard.submissions.get(&quiz.assessment_id).cloned();
        Ok(ModuleQuiz {
            user_responses: responses.or(quiz.user_responses.clone()),
            ..quiz
        })
    }

    async fn submit_quiz(
        &self,
        assessment_id: &AssessmentId,
        responses: &BTreeMap<String, String>,
    ) -> Result<QuizEvaluation, ApiError> {
        let mut guard = self.lock()?;
        let quiz = guard
            .quizzes
            .values_mut()
            .find(|quiz| &quiz.assessment_id == assessment_id)
            .ok_or(ApiError::NotFound)?;
        let evaluation = grade(quiz, responses);
        quiz.completed = true;
        quiz.score = Some(evaluation.score);
        guard
            .submissions
            .insert(assessment_id.clone(), responses.clone());
        Ok(evaluation)
    }
}

#[async_trait]
impl LearningPathApi for InMemoryBackend {
    async fn list_learning_paths(&self) -> Result<Vec<LearningPathListItem>, ApiError> {
        Ok(self.lock()?.learning_paths.clone())
    }

    async fn dashboard(&self, id: &LearningPathId) -> Result<Dashboard, ApiError> {
        self.lock()?
            .dashboards
            .get(id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn sessions(&self, id: &LearningPathId) -> Result<Vec<StudySession>, ApiError> {
        let mut guard = self.lock()?;
        guard.session_fetches += 1;
        guard.sessions.get(id).cloned().ok_or(ApiError::NotFound)
    }

    async fn creation_stream(&self, request: &CreationRequest) -> Result<PayloadStream, ApiError> {
        let mut guard = self.lock()?;
        guard.creation_requests.push(request.clone());
        let frames = guard
            .streams
            .pop_front()
            .ok_or_else(|| ApiError::Connection("no scripted stream".into()))?;
        Ok(scripted_stream(frames, OpenStream::claim(&self.open_streams)))
    }
}

#[async_trait]
impl ScheduleApi for InMemoryBackend {
    async fn session(&self, id: &StudySessionId) -> Result<StudySession, ApiError> {
        self.lock()?
            .sessions
            .values()
            .flatten()
            .find(|session| &session.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn complete_session(&self, id: &StudySessionId, notes: &str) -> Result<(), ApiError> {
        let mut guard = self.lock()?;
        let session = guard
            .sessions
            .values_mut()
            .flatten()
            .find(|session| &session.id == id)
            .ok_or(ApiError::NotFound)?;
        session.completed = true;
        if !notes.trim().is_empty() {
            session.notes = Some(notes.to_string());
        }
        guard.completions.push((id.clone(), notes.to_string()));
        Ok(())
    }

    async fn export_ics(&self, learning_path_id: &LearningPathId) -> Result<IcsFile, ApiError> {
        self.lock()?
            .calendars
            .get(learning_path_id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }
}
