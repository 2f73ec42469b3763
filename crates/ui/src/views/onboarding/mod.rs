mod steps;

#[cfg(test)]
use std::{cell::RefCell, rc::Rc};

use dioxus::core::Task;
use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use studysync_core::model::{OnboardingMachine, OnboardingStep, TopicOutcome};
use tracing::{debug, warn};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{LearningPathCardVm, map_learning_path_cards, step_indicator};

use steps::{AssessmentStep, CommitmentStep, CreatingStep, TopicStep};

const QUESTIONS_FAILED_MESSAGE: &str = "Could not load assessment questions. Please try again.";

#[component]
pub fn OnboardingView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let variant = ctx.onboarding();
    let assessments = ctx.assessments();
    let creation = ctx.creation();
    let learning_paths = ctx.learning_paths();

    let machine = use_signal(|| OnboardingMachine::new(variant));
    let pump = use_signal(|| None::<Task>);

    let paths = use_resource(move || {
        let learning_paths = learning_paths.clone();
        async move {
            let items = learning_paths
                .list()
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(map_learning_path_cards(&items))
        }
    });

    {
        // Leaving the page must not leave a stream running behind it.
        let creation = creation.clone();
        use_drop(move || creation.close_current());
    }

    let submit_topic = use_callback(move |()| {
        let mut machine = machine;
        let outcome = machine.write().submit_topic();
        match outcome {
            Ok(TopicOutcome::Advanced(step)) => debug!(%step, "topic accepted"),
            Ok(TopicOutcome::FetchQuestions(topic)) => {
                let assessments = assessments.clone();
                spawn(async move {
                    let mut machine = machine;
                    match assessments.proficiency_questions(&topic).await {
                        Ok(questions) => {
                            if let Err(err) = machine.write().questions_loaded(questions) {
                                debug!(error = %err, "questions arrived after leaving the topic step");
                            }
                        }
                        Err(err) => {
                            warn!(error = %err, "could not load proficiency questions");
                            machine.write().questions_failed(QUESTIONS_FAILED_MESSAGE);
                        }
                    }
                });
            }
            Err(err) => debug!(error = %err, "topic rejected"),
        }
    });

    let start_creation = use_callback(move |()| {
        let mut machine = machine;
        let mut pump = pump;
        let request = match machine.write().begin_creation() {
            Ok(request) => request,
            Err(err) => {
                debug!(error = %err, "cannot start creation");
                return;
            }
        };
        if let Some(previous) = pump.write().take() {
            previous.cancel();
        }

        let creation = creation.clone();
        let task = spawn(async move {
            let mut machine = machine;
            let mut subscription = match creation.open(&request).await {
                Ok(subscription) => subscription,
                Err(err) => {
                    warn!(attempt = %request.attempt, error = %err, "could not open creation stream");
                    machine
                        .write()
                        .creation_failed(request.attempt, err.user_message());
                    return;
                }
            };
            let created = subscription
                .drive(|message| machine.write().receive(message))
                .await;
            if let Some(id) = created {
                let _ = navigator.push(Route::Dashboard {
                    learning_path_id: id.to_string(),
                });
            }
        });
        pump.set(Some(task));
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<OnboardingTestHandles>() {
                handles.register(machine, submit_topic, start_creation);
            }
        }
    }

    let retry_action = use_callback(move |()| {
        let mut paths = paths;
        paths.restart();
    });

    let step = machine.read().step();
    let steps = step_indicator(variant, step);
    let paths_state = view_state_from_resource(&paths);

    rsx! {
        div { class: "page onboarding",
            h2 { "Create a learning path" }

            ol { class: "steps",
                for item in steps {
                    li { class: item.state.class(), "{item.label}" }
                }
            }

            match step {
                OnboardingStep::Topic => rsx! {
                    TopicStep { machine, on_submit: submit_topic }
                },
                OnboardingStep::Assessment => rsx! {
                    AssessmentStep { machine }
                },
                OnboardingStep::Commitment => rsx! {
                    CommitmentStep { machine, on_create: start_creation }
                },
                OnboardingStep::Creating => rsx! {
                    CreatingStep { machine }
                },
            }

            if step == OnboardingStep::Topic {
                section { class: "card existing-paths",
                    h3 { "Your learning paths" }
                    match paths_state {
                        ViewState::Idle | ViewState::Loading => rsx! {
                            p { "Loading..." }
                        },
                        ViewState::Ready(cards) => rsx! {
                            if cards.is_empty() {
                                p { class: "muted", "Nothing here yet. Pick a topic above to get started." }
                            } else {
                                ul {
                                    for card in cards {
                                        LearningPathCard { key: "{card.id}", card }
                                    }
                                }
                            }
                        },
                        ViewState::Error(err) => rsx! {
                            p { "{err.message()}" }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| retry_action.call(()),
                                "Retry"
                            }
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn LearningPathCard(card: LearningPathCardVm) -> Element {
    rsx! {
        li { class: "path-card",
            Link { to: Route::Dashboard { learning_path_id: card.id.clone() },
                span { class: "path-topic", "{card.topic}" }
            }
            if !card.detail.is_empty() {
                span { class: "muted", " {card.detail}" }
            }
            if let Some(created) = card.created_str {
                span { class: "muted", " · {created}" }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct OnboardingTestHandles {
    machine: Rc<RefCell<Option<Signal<OnboardingMachine>>>>,
    submit_topic: Rc<RefCell<Option<Callback<()>>>>,
    start_creation: Rc<RefCell<Option<Callback<()>>>>,
}

#[cfg(test)]
impl OnboardingTestHandles {
    pub(crate) fn register(
        &self,
        machine: Signal<OnboardingMachine>,
        submit_topic: Callback<()>,
        start_creation: Callback<()>,
    ) {
        *self.machine.borrow_mut() = Some(machine);
        *self.submit_topic.borrow_mut() = Some(submit_topic);
        *self.start_creation.borrow_mut() = Some(start_creation);
    }

    pub(crate) fn machine(&self) -> Signal<OnboardingMachine> {
        (*self.machine.borrow()).expect("onboarding machine registered")
    }

    pub(crate) fn submit_topic(&self) -> Callback<()> {
        (*self.submit_topic.borrow()).expect("submit callback registered")
    }

    pub(crate) fn start_creation(&self) -> Callback<()> {
        (*self.start_creation.borrow()).expect("start callback registered")
    }
}
