use std::collections::BTreeMap;
use std::sync::Arc;

use api::{
    ApiError, AssessmentApi, Backend, InMemoryBackend, LearningPathApi, PayloadStream,
    ScheduleApi, ScriptedFrame,
};
use chrono::NaiveDate;
use dioxus::prelude::{ReadableExt, WritableExt};
use studysync_core::model::{
    AssessmentId, CreationRequest, Curriculum, CurriculumModule, Dashboard, DashboardProgress,
    IcsFile, LearningPathId, LearningPathListItem, ModuleId, ModuleQuiz, OnboardingVariant,
    ProficiencyQuestion, QuizEvaluation, QuizQuestion, QuizStatus, StudyResource, StudySession,
    StudySessionId, Topic, UpcomingSession,
};

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with};

const PROGRESS: &str =
    r#"{"type":"progress","phase":"curriculum","message":"Building curriculum","data":null}"#;
const COMPLETE: &str =
    r#"{"type":"complete","phase":"complete","message":"Learning path created","data":{"learning_path_id":"lp-1"}}"#;
const FAILED: &str = r#"{"type":"error","phase":"error","message":"LLM provider unavailable"}"#;

fn at(day: u32, hour: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn dashboard() -> Dashboard {
    let module = |id: &str, title: &str| CurriculumModule {
        module_id: ModuleId::new(id),
        title: title.into(),
        duration_hours: Some(3.0),
        learning_objectives: vec![format!("Understand {title}")],
        subtopics: Vec::new(),
        prerequisites: Vec::new(),
    };
    Dashboard {
        learning_path_id: LearningPathId::new("lp-1"),
        topic: "Rust".into(),
        progress: DashboardProgress {
            completion_percentage: 50.0,
            sessions_completed: 2,
            total_sessions: 4,
            average_quiz_score: 0.8,
            quizzes_taken: 1,
        },
        curriculum: Curriculum {
            topic: Some("Rust".into()),
            total_duration_weeks: Some(4.0),
            modules: vec![module("m1", "Ownership"), module("m2", "Traits")],
        },
        quiz_status: BTreeMap::from([(
            ModuleId::new("m1"),
            QuizStatus {
                completed: true,
                score: Some(0.8),
            },
        )]),
        upcoming_sessions: vec![UpcomingSession {
            id: StudySessionId::new("s3"),
            module_title: "Traits".into(),
            session_topic: Some("Trait objects".into()),
            scheduled_time: at(7, 18),
            duration_minutes: 45,
        }],
    }
}

fn session(completed: bool) -> StudySession {
    StudySession {
        id: StudySessionId::new("s1"),
        module_id: ModuleId::new("m1"),
        module_title: "Ownership".into(),
        session_topic: Some("Moves and copies".into()),
        description: Some("Work through **chapter 4**.".into()),
        learning_objectives: vec!["Explain moves".into()],
        scheduled_time: at(6, 18),
        duration_minutes: 45,
        session_number: Some(1),
        resources: vec![StudyResource {
            kind: Some("book".into()),
            title: "The Rust Book".into(),
            url: Some("https://doc.rust-lang.org/book/".into()),
            description: None,
        }],
        completed,
        completed_at: completed.then(|| at(6, 19)),
        notes: completed.then(|| "Went well".to_string()),
    }
}

fn quiz() -> ModuleQuiz {
    let question = |text: &str, correct: &str| QuizQuestion {
        question: text.into(),
        options: BTreeMap::from([
            ("A".to_string(), "Yes".to_string()),
            ("B".to_string(), "No".to_string()),
        ]),
        correct_answer: Some(correct.into()),
        explanation: Some("Ownership moves by default.".into()),
    };
    ModuleQuiz {
        assessment_id: AssessmentId::new("a1"),
        module_id: Some(ModuleId::new("m1")),
        module_title: Some("Ownership".into()),
        questions: vec![question("Is a move a copy?", "B"), question("Is &T shared?", "A")],
        completed: false,
        score: None,
        user_responses: None,
    }
}

//
// ─── ONBOARDING ────────────────────────────────────────────────────────────────
//

#[tokio::test(flavor = "current_thread")]
async fn onboarding_smoke_lists_existing_learning_paths() {
    let backend = InMemoryBackend::new();
    backend.add_learning_path(LearningPathListItem {
        id: LearningPathId::new("lp-9"),
        topic: "Rust for services".into(),
        proficiency_level: Some("intermediate".into()),
        commitment_level: Some("moderate".into()),
        status: Some("active".into()),
        created_at: Some(at(3, 9)),
    });
    let mut harness = setup_view_harness(ViewKind::Onboarding, &backend);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("What do you want to learn?"), "missing topic step in {html}");
    assert!(html.contains("Your learning paths"), "missing list in {html}");
    assert!(html.contains("Rust for services"), "missing path in {html}");
    assert!(html.contains("Intermediate · Moderate"), "missing levels in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn onboarding_smoke_loads_assessment_questions() {
    let backend = InMemoryBackend::new();
    backend.set_questions(
        "Rust",
        vec![ProficiencyQuestion {
            question: "Have you written a macro?".into(),
            options: vec!["Never".into(), "Once or twice".into()],
            kind: None,
            difficulty: None,
        }],
    );
    let mut harness = setup_view_harness(ViewKind::Onboarding, &backend);
    harness.rebuild();
    harness.settle().await;

    harness.act(|handles| {
        let mut machine = handles.machine();
        machine.write().set_topic_input("Rust").unwrap();
    });
    harness.act(|handles| handles.submit_topic().call(()));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Where are you starting with Rust?"), "missing assessment in {html}");
    assert!(html.contains("Have you written a macro?"), "missing question in {html}");
    assert!(html.contains("Once or twice"), "missing option in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn onboarding_smoke_repeated_topic_submit_fetches_once() {
    let backend = InMemoryBackend::new();
    backend.set_questions(
        "Rust",
        vec![ProficiencyQuestion {
            question: "Have you written a macro?".into(),
            options: vec!["Never".into(), "Once or twice".into()],
            kind: None,
            difficulty: None,
        }],
    );
    let mut harness = setup_view_harness(ViewKind::Onboarding, &backend);
    harness.rebuild();
    harness.settle().await;

    harness.act(|handles| {
        let mut machine = handles.machine();
        machine.write().set_topic_input("Rust").unwrap();
    });
    harness.act(|handles| {
        handles.submit_topic().call(());
        handles.submit_topic().call(());
    });
    harness.settle().await;

    assert_eq!(backend.question_fetches(), 1);
    let html = harness.render();
    assert!(html.contains("Where are you starting with Rust?"), "missing assessment in {html}");
    assert!(!html.contains("Could not load"), "unexpected error in {html}");
}

async fn simple_harness_at_commitment(
    backend: &InMemoryBackend,
) -> super::test_harness::ViewHarness {
    let mut harness = setup_view_harness_with(
        ViewKind::Onboarding,
        OnboardingVariant::Simple,
        Backend::in_memory(backend.clone()),
    );
    harness.rebuild();
    harness.settle().await;
    harness.act(|handles| {
        let mut machine = handles.machine();
        machine.write().set_topic_input("Rust").unwrap();
        machine.write().submit_topic().unwrap();
    });
    harness.settle().await;
    harness
}

#[tokio::test(flavor = "current_thread")]
async fn onboarding_smoke_streams_progress_while_creating() {
    let backend = InMemoryBackend::new();
    backend.push_stream(vec![ScriptedFrame::payload(PROGRESS), ScriptedFrame::Stall]);
    let mut harness = simple_harness_at_commitment(&backend).await;

    let html = harness.render();
    assert!(html.contains("How much time can you commit?"), "missing commitment in {html}");
    assert!(html.contains("Your current level"), "simple flow asks for a level in {html}");

    harness.act(|handles| handles.start_creation().call(()));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Building your learning path"), "missing creating step in {html}");
    assert!(html.contains("Designing the curriculum"), "missing phase label in {html}");
    assert!(html.contains("Building curriculum"), "missing progress message in {html}");
    assert_eq!(backend.creation_requests().len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn onboarding_smoke_error_event_returns_to_commitment() {
    let backend = InMemoryBackend::new();
    backend.push_stream(vec![
        ScriptedFrame::payload(PROGRESS),
        ScriptedFrame::payload(FAILED),
    ]);
    let mut harness = simple_harness_at_commitment(&backend).await;

    harness.act(|handles| handles.start_creation().call(()));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("LLM provider unavailable"), "missing error in {html}");
    assert!(html.contains("Create learning path"), "missing retry button in {html}");
    let machine = harness.act(|handles| handles.machine().peek().clone());
    assert_eq!(machine.topic(), Some(&Topic::parse("Rust").unwrap()));
}

#[tokio::test(flavor = "current_thread")]
async fn onboarding_smoke_complete_event_opens_dashboard() {
    let backend = InMemoryBackend::new();
    backend.set_dashboard(dashboard());
    backend.push_stream(vec![
        ScriptedFrame::payload(PROGRESS),
        ScriptedFrame::payload(COMPLETE),
    ]);
    let mut harness = simple_harness_at_commitment(&backend).await;

    harness.act(|handles| handles.start_creation().call(()));
    harness.settle().await;
    harness.settle().await;

    let html = harness.render();
    assert!(!html.contains("Building your learning path"), "still creating in {html}");
    assert!(html.contains("Export to calendar"), "dashboard not shown in {html}");
    assert!(html.contains("Ownership"), "missing module in {html}");
    assert_eq!(backend.open_streams(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn onboarding_smoke_unmount_closes_stalled_stream() {
    let backend = InMemoryBackend::new();
    backend.push_stream(vec![ScriptedFrame::payload(PROGRESS), ScriptedFrame::Stall]);
    let mut harness = simple_harness_at_commitment(&backend).await;

    harness.act(|handles| handles.start_creation().call(()));
    harness.settle().await;
    assert!(harness.render().contains("Building curriculum"));
    assert_eq!(backend.open_streams(), 1);

    drop(harness);
    assert_eq!(backend.open_streams(), 0);
}

//
// ─── DASHBOARD ─────────────────────────────────────────────────────────────────
//

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_renders_progress_and_modules() {
    let backend = InMemoryBackend::new();
    backend.set_dashboard(dashboard());
    backend.set_sessions(LearningPathId::new("lp-1"), vec![session(false)]);
    let mut harness = setup_view_harness(ViewKind::Dashboard("lp-1".into()), &backend);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Rust"), "missing topic in {html}");
    assert!(html.contains("2 / 4"), "missing session count in {html}");
    assert!(html.contains("80%"), "missing average score in {html}");
    assert!(html.contains("Ownership"), "missing module in {html}");
    assert!(html.contains("Review quiz"), "missing review link in {html}");
    assert!(html.contains("Take quiz"), "missing quiz link in {html}");
    assert!(html.contains("Trait objects"), "missing upcoming session in {html}");
    assert!(html.contains("Export to calendar"), "missing export in {html}");
    // The full session list is only fetched when its tab is opened.
    assert_eq!(backend.session_fetches(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_unknown_path_is_not_retried() {
    let backend = InMemoryBackend::new();
    let mut harness = setup_view_harness(ViewKind::Dashboard("missing".into()), &backend);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("couldn"), "missing not found in {html}");
    assert!(html.contains("Start a new learning path"), "missing way out in {html}");
    assert!(!html.contains("Retry"), "not found should not offer retry in {html}");
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

#[tokio::test(flavor = "current_thread")]
async fn session_smoke_renders_details_and_complete_button() {
    let backend = InMemoryBackend::new();
    backend.set_sessions(LearningPathId::new("lp-1"), vec![session(false)]);
    let mut harness = setup_view_harness(ViewKind::Session("s1".into()), &backend);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Moves and copies"), "missing title in {html}");
    assert!(html.contains("<strong>chapter 4</strong>"), "missing description in {html}");
    assert!(html.contains("https://doc.rust-lang.org/book/"), "missing resource in {html}");
    assert!(html.contains("Mark complete"), "missing complete button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn session_smoke_completed_session_shows_notes() {
    let backend = InMemoryBackend::new();
    backend.set_sessions(LearningPathId::new("lp-1"), vec![session(true)]);
    let mut harness = setup_view_harness(ViewKind::Session("s1".into()), &backend);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Completed"), "missing completion in {html}");
    assert!(html.contains("Went well"), "missing notes in {html}");
    assert!(!html.contains("Mark complete"), "complete button still shown in {html}");
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

#[tokio::test(flavor = "current_thread")]
async fn quiz_smoke_renders_questions_with_submit_locked() {
    let backend = InMemoryBackend::new();
    backend.set_quiz(LearningPathId::new("lp-1"), ModuleId::new("m1"), quiz());
    let mut harness = setup_view_harness(
        ViewKind::Quiz {
            module_id: "m1".into(),
            learning_path_id: "lp-1".into(),
            review: false,
        },
        &backend,
    );
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Is a move a copy?"), "missing question in {html}");
    assert!(html.contains("0 of 2 answered"), "missing progress in {html}");
    assert!(html.contains("Submit answers"), "missing submit in {html}");
    assert!(!html.contains("Ownership moves by default"), "explanation leaked in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_smoke_review_shows_score_and_explanations() {
    let backend = InMemoryBackend::new();
    let mut taken = quiz();
    taken.completed = true;
    taken.score = Some(0.5);
    taken.user_responses = Some(BTreeMap::from([
        ("0".to_string(), "B".to_string()),
        ("1".to_string(), "B".to_string()),
    ]));
    backend.set_quiz(LearningPathId::new("lp-1"), ModuleId::new("m1"), taken);
    let mut harness = setup_view_harness(
        ViewKind::Quiz {
            module_id: "m1".into(),
            learning_path_id: "lp-1".into(),
            review: true,
        },
        &backend,
    );
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("50%"), "missing score in {html}");
    assert!(html.contains("Ownership moves by default"), "missing explanation in {html}");
    assert!(!html.contains("Submit answers"), "review should be read-only in {html}");
}

//
// ─── FAILURES ──────────────────────────────────────────────────────────────────
//

struct FailingBackend;

fn fail<T>() -> Result<T, ApiError> {
    Err(ApiError::Connection("fail".to_string()))
}

#[async_trait::async_trait]
impl AssessmentApi for FailingBackend {
    async fn proficiency_questions(
        &self,
        _topic: &Topic,
    ) -> Result<Vec<ProficiencyQuestion>, ApiError> {
        fail()
    }

    async fn module_quiz(
        &self,
        _module_id: &ModuleId,
        _learning_path_id: &LearningPathId,
    ) -> Result<ModuleQuiz, ApiError> {
        fail()
    }

    async fn quiz_results(
        &self,
        _module_id: &ModuleId,
        _learning_path_id: &LearningPathId,
    ) -> Result<ModuleQuiz, ApiError> {
        fail()
    }

    async fn submit_quiz(
        &self,
        _assessment_id: &AssessmentId,
        _responses: &BTreeMap<String, String>,
    ) -> Result<QuizEvaluation, ApiError> {
        fail()
    }
}

#[async_trait::async_trait]
impl LearningPathApi for FailingBackend {
    async fn list_learning_paths(&self) -> Result<Vec<LearningPathListItem>, ApiError> {
        fail()
    }

    async fn dashboard(&self, _id: &LearningPathId) -> Result<Dashboard, ApiError> {
        fail()
    }

    async fn sessions(&self, _id: &LearningPathId) -> Result<Vec<StudySession>, ApiError> {
        fail()
    }

    async fn creation_stream(
        &self,
        _request: &CreationRequest,
    ) -> Result<PayloadStream, ApiError> {
        fail()
    }
}

#[async_trait::async_trait]
impl ScheduleApi for FailingBackend {
    async fn session(&self, _id: &StudySessionId) -> Result<StudySession, ApiError> {
        fail()
    }

    async fn complete_session(&self, _id: &StudySessionId, _notes: &str) -> Result<(), ApiError> {
        fail()
    }

    async fn export_ics(&self, _learning_path_id: &LearningPathId) -> Result<IcsFile, ApiError> {
        fail()
    }
}

fn failing_backend() -> Backend {
    let failing = Arc::new(FailingBackend);
    Backend {
        assessments: failing.clone(),
        learning_paths: failing.clone(),
        schedule: failing,
    }
}

#[tokio::test(flavor = "current_thread")]
async fn onboarding_smoke_renders_error_state() {
    let mut harness = setup_view_harness_with(
        ViewKind::Onboarding,
        OnboardingVariant::Assessed,
        failing_backend(),
    );
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("What do you want to learn?"), "topic step should still render in {html}");
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn onboarding_smoke_stream_that_cannot_open_reports_connection_lost() {
    let mut harness = setup_view_harness_with(
        ViewKind::Onboarding,
        OnboardingVariant::Simple,
        failing_backend(),
    );
    harness.rebuild();
    harness.settle().await;
    harness.act(|handles| {
        let mut machine = handles.machine();
        machine.write().set_topic_input("Rust").unwrap();
        machine.write().submit_topic().unwrap();
    });
    harness.act(|handles| handles.start_creation().call(()));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Connection lost"), "missing connection error in {html}");
    assert!(html.contains("Create learning path"), "missing commitment step in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn session_smoke_renders_error_state() {
    let mut harness = setup_view_harness_with(
        ViewKind::Session("s1".into()),
        OnboardingVariant::Assessed,
        failing_backend(),
    );
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_smoke_renders_error_state() {
    let mut harness = setup_view_harness_with(
        ViewKind::Quiz {
            module_id: "m1".into(),
            learning_path_id: "lp-1".into(),
            review: false,
        },
        OnboardingVariant::Assessed,
        failing_backend(),
    );
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}
