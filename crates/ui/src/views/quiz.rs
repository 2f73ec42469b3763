use dioxus::prelude::*;
use dioxus_router::Link;
use services::QuizError;
use studysync_core::model::{LearningPathId, ModuleId};
use tracing::warn;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizQuestionVm, QuizSummaryVm, QuizVm};

#[component]
pub fn QuizView(module_id: String, learning_path_id: String, review: bool) -> Element {
    let ctx = use_context::<AppContext>();
    let quizzes = ctx.quizzes();
    let module = ModuleId::new(module_id);
    let path_id = LearningPathId::new(learning_path_id.clone());

    let vm = use_signal(|| None::<QuizVm>);
    let submitting = use_signal(|| false);
    let submit_error = use_signal(|| None::<String>);

    let resource = {
        let quizzes = quizzes.clone();
        use_resource(move || {
            let quizzes = quizzes.clone();
            let module = module.clone();
            let path_id = path_id.clone();
            async move {
                let mut vm = vm;
                let loaded = if review {
                    quizzes.review(&module, &path_id).await.map(QuizVm::review)
                } else {
                    quizzes.load(&module, &path_id).await.map(QuizVm::new)
                };
                let loaded = loaded.map_err(|err| match err {
                    QuizError::NotFound => ViewError::NotFound,
                    _ => ViewError::Unknown,
                })?;
                vm.set(Some(loaded));
                Ok::<_, ViewError>(())
            }
        })
    };

    let select = use_callback(move |(index, letter): (usize, String)| {
        let mut vm = vm;
        if let Some(quiz) = vm.write().as_mut() {
            quiz.select(index, &letter);
        }
    });

    let submit = use_callback(move |()| {
        let mut submitting = submitting;
        let Some((quiz, answers)) = vm
            .peek()
            .as_ref()
            .filter(|quiz| quiz.can_submit())
            .map(|quiz| (quiz.quiz().clone(), quiz.answers().clone()))
        else {
            return;
        };
        if submitting() {
            return;
        }
        submitting.set(true);
        let quizzes = quizzes.clone();
        spawn(async move {
            let mut vm = vm;
            let mut submit_error = submit_error;
            match quizzes.submit(&quiz, &answers).await {
                Ok(evaluation) => {
                    submit_error.set(None);
                    if let Some(current) = vm.write().as_mut() {
                        current.apply_evaluation(evaluation);
                    }
                }
                Err(err) => {
                    warn!(assessment_id = %quiz.assessment_id, error = %err, "quiz submission failed");
                    submit_error.set(Some(err.to_string()));
                }
            }
            submitting.set(false);
        });
    });

    let retry_action = use_callback(move |()| {
        let mut resource = resource;
        resource.restart();
    });

    let state = match view_state_from_resource(&resource) {
        ViewState::Ready(()) => vm().map_or(ViewState::Loading, ViewState::Ready),
        ViewState::Idle => ViewState::Idle,
        ViewState::Loading => ViewState::Loading,
        ViewState::Error(err) => ViewState::Error(err),
    };

    rsx! {
        div { class: "page quiz",
            Link { class: "btn btn-link", to: Route::Dashboard { learning_path_id: learning_path_id.clone() },
                "← Back to dashboard"
            }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(quiz) => rsx! {
                    QuizBody {
                        title: quiz.title(),
                        questions: quiz.questions(),
                        summary: quiz.summary(),
                        finished: quiz.is_finished(),
                        can_submit: quiz.can_submit(),
                        progress_str: quiz.progress_str(),
                        submitting: submitting(),
                        submit_error: submit_error(),
                        on_select: move |choice: (usize, String)| select.call(choice),
                        on_submit: move |()| submit.call(()),
                    }
                },
                ViewState::Error(err) => rsx! {
                    h2 { "Quiz" }
                    p { "{err.message()}" }
                    if err.is_retryable() {
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| retry_action.call(()),
                            "Retry"
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn QuizBody(
    title: String,
    questions: Vec<QuizQuestionVm>,
    summary: Option<QuizSummaryVm>,
    finished: bool,
    can_submit: bool,
    progress_str: String,
    submitting: bool,
    submit_error: Option<String>,
    on_select: EventHandler<(usize, String)>,
    on_submit: EventHandler<()>,
) -> Element {
    rsx! {
        h2 { "{title}" }

        if let Some(summary) = summary {
            ScoreBanner { summary }
        }

        for question in questions {
            QuestionCard { key: "{question.index}", question, locked: finished, on_select }
        }

        if !finished {
            div { class: "actions",
                span { class: "muted", "{progress_str}" }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: !can_submit || submitting,
                    onclick: move |_| on_submit.call(()),
                    if submitting { "Submitting..." } else { "Submit answers" }
                }
            }
            if let Some(message) = submit_error {
                p { class: "error", "{message}" }
            }
        }
    }
}

#[component]
fn ScoreBanner(summary: QuizSummaryVm) -> Element {
    let verdict = match summary.passed {
        Some(true) => "Passed",
        Some(false) => "Keep practicing",
        None => "Your answers",
    };

    rsx! {
        section { class: "card score",
            h3 { "{summary.percent}%" }
            p { "{verdict} · {summary.correct_str}" }
            if !summary.gaps.is_empty() {
                h4 { "Worth revisiting" }
                ul {
                    for gap in summary.gaps.clone() {
                        li { "{gap}" }
                    }
                }
            }
        }
    }
}

#[component]
fn QuestionCard(
    question: QuizQuestionVm,
    locked: bool,
    on_select: EventHandler<(usize, String)>,
) -> Element {
    let index = question.index;

    rsx! {
        fieldset { class: "card question",
            legend { "{question.number}. {question.text}" }
            div { class: "choices",
                for option in question.options.clone() {
                    button {
                        key: "{option.letter}",
                        class: option.mark.class(option.selected),
                        r#type: "button",
                        disabled: locked,
                        onclick: {
                            let letter = option.letter.clone();
                            move |_| on_select.call((index, letter.clone()))
                        },
                        strong { "{option.letter}. " }
                        "{option.text}"
                    }
                }
            }
            if let Some(html) = &question.explanation_html {
                div { class: "explanation markdown", dangerous_inner_html: "{html}" }
            }
        }
    }
}
