use std::collections::BTreeMap;
use std::sync::Arc;

use api::InMemoryBackend;
use chrono::NaiveDate;
use services::{LearningPathError, LearningPathService, QuizError, QuizService, StudySessionService};
use studysync_core::model::{
    AssessmentId, LearningPathId, LearningPathListItem, ModuleId, ModuleQuiz, QuizAnswers,
    QuizQuestion, StudySession, StudySessionId,
};

fn session(id: &str, day: u32) -> StudySession {
    StudySession {
        id: StudySessionId::new(id),
        module_id: ModuleId::new("m1"),
        module_title: "Ownership".into(),
        session_topic: Some(format!("Session {id}")),
        description: None,
        learning_objectives: vec!["Explain moves".into()],
        scheduled_time: NaiveDate::from_ymd_opt(2025, 1, day)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap(),
        duration_minutes: 45,
        session_number: None,
        resources: Vec::new(),
        completed: false,
        completed_at: None,
        notes: None,
    }
}

fn quiz() -> ModuleQuiz {
    let question = |text: &str, correct: &str| QuizQuestion {
        question: text.into(),
        options: BTreeMap::from([
            ("A".to_string(), "yes".to_string()),
            ("B".to_string(), "no".to_string()),
        ]),
        correct_answer: Some(correct.into()),
        explanation: Some("see the book".into()),
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

#[tokio::test]
async fn sessions_come_back_in_schedule_order() {
    let backend = InMemoryBackend::new();
    let lp = LearningPathId::new("lp-1");
    backend.set_sessions(lp.clone(), vec![session("s3", 9), session("s1", 6), session("s2", 7)]);
    let service = LearningPathService::new(Arc::new(backend));

    let ids: Vec<String> = service
        .sessions(&lp)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id.to_string())
        .collect();
    assert_eq!(ids, vec!["s1", "s2", "s3"]);
}

#[tokio::test]
async fn learning_paths_list_newest_first() {
    let backend = InMemoryBackend::new();
    for (id, day) in [("old", 1), ("new", 3), ("mid", 2)] {
        backend.add_learning_path(LearningPathListItem {
            id: LearningPathId::new(id),
            topic: format!("Topic {id}"),
            proficiency_level: Some("beginner".into()),
            commitment_level: Some("moderate".into()),
            status: Some("active".into()),
            created_at: NaiveDate::from_ymd_opt(2025, 1, day).unwrap().and_hms_opt(9, 0, 0),
        });
    }
    let service = LearningPathService::new(Arc::new(backend));

    let ids: Vec<String> = service
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.id.to_string())
        .collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}

#[tokio::test]
async fn unknown_dashboard_is_not_found() {
    let service = LearningPathService::new(Arc::new(InMemoryBackend::new()));
    assert!(matches!(
        service.dashboard(&LearningPathId::new("nope")).await,
        Err(LearningPathError::NotFound)
    ));
}

#[tokio::test]
async fn completing_a_session_records_notes() {
    let backend = InMemoryBackend::new();
    backend.set_sessions(LearningPathId::new("lp-1"), vec![session("s1", 6)]);
    let service = StudySessionService::new(Arc::new(backend.clone()));

    let updated = service
        .complete(&StudySessionId::new("s1"), "  read chapter 4  ")
        .await
        .unwrap();
    assert!(updated.completed);
    assert_eq!(updated.notes.as_deref(), Some("read chapter 4"));
    assert_eq!(backend.completions(), vec![(
        StudySessionId::new("s1"),
        "read chapter 4".to_string()
    )]);
}

#[tokio::test]
async fn quiz_submit_requires_every_answer_then_enables_review() {
    let backend = InMemoryBackend::new();
    let lp = LearningPathId::new("lp-1");
    let module = ModuleId::new("m1");
    backend.set_quiz(lp.clone(), module.clone(), quiz());
    let service = QuizService::new(Arc::new(backend));

    let quiz = service.load(&module, &lp).await.unwrap();
    let mut answers = QuizAnswers::new();
    answers.select(0, "B");
    assert!(matches!(
        service.submit(&quiz, &answers).await,
        Err(QuizError::Incomplete {
            answered: 1,
            total: 2
        })
    ));

    answers.select(1, "A");
    let evaluation = service.submit(&quiz, &answers).await.unwrap();
    assert_eq!(evaluation.correct_count, 2);
    assert_eq!(evaluation.percent(), 100);
    assert!(evaluation.passed);

    let review = service.review(&module, &lp).await.unwrap();
    let restored = QuizAnswers::from_responses(review.user_responses.as_ref().unwrap());
    assert_eq!(restored, answers);
}
