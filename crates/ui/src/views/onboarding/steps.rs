use dioxus::prelude::*;
use studysync_core::model::{OnboardingMachine, StudyWindow};
use tracing::debug;

use crate::vm::{
    commitment_options, creation_headline, format_date_input, map_assessment_questions,
    map_progress_rows, proficiency_options,
};

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

#[component]
pub(super) fn TopicStep(machine: Signal<OnboardingMachine>, on_submit: Callback<()>) -> Element {
    let (input, can_submit, loading, error) = {
        let m = machine.read();
        (
            m.topic_input().to_string(),
            m.can_submit_topic(),
            m.is_loading_questions(),
            m.error().map(str::to_string),
        )
    };

    rsx! {
        section { class: "card",
            h3 { "What do you want to learn?" }
            div { class: "field-row",
                input {
                    id: "topic-input",
                    r#type: "text",
                    placeholder: "e.g. Python programming",
                    value: "{input}",
                    disabled: loading,
                    oninput: move |evt: FormEvent| {
                        let mut machine = machine;
                        let _ = machine.write().set_topic_input(evt.value());
                    },
                    onkeydown: move |evt: KeyboardEvent| {
                        if evt.data.key() == Key::Enter && machine.read().can_submit_topic() {
                            on_submit.call(());
                        }
                    },
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: !can_submit,
                    onclick: move |_| on_submit.call(()),
                    if loading { "Loading questions..." } else { "Continue" }
                }
            }
            if let Some(message) = error {
                p { class: "error", "{message}" }
            }
        }
    }
}

//
// ─── ASSESSMENT ────────────────────────────────────────────────────────────────
//

#[component]
pub(super) fn AssessmentStep(machine: Signal<OnboardingMachine>) -> Element {
    let (topic, questions, levels, can_continue) = {
        let m = machine.read();
        (
            m.topic().map(|topic| topic.as_str().to_string()).unwrap_or_default(),
            map_assessment_questions(m.questions(), m.answers()),
            proficiency_options(m.proficiency()),
            m.can_continue_assessment(),
        )
    };

    rsx! {
        section { class: "card",
            h3 { "Where are you starting with {topic}?" }

            for question in questions {
                fieldset { key: "{question.index}", class: "question",
                    legend { "{question.text}" }
                    div { class: "choices",
                        for choice in question.options {
                            AnswerChoice {
                                machine,
                                index: question.index,
                                value: choice.value,
                                selected: choice.selected,
                            }
                        }
                    }
                }
            }

            h4 { "How would you rate yourself?" }
            div { class: "choices",
                for option in levels {
                    button {
                        class: if option.selected { "choice selected" } else { "choice" },
                        r#type: "button",
                        onclick: move |_| {
                            let mut machine = machine;
                            let _ = machine.write().select_proficiency(option.level);
                        },
                        strong { "{option.label}" }
                        span { class: "muted", "{option.description}" }
                    }
                }
            }

            div { class: "actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| {
                        let mut machine = machine;
                        let _ = machine.write().go_back();
                    },
                    "Back"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: !can_continue,
                    onclick: move |_| {
                        let mut machine = machine;
                        if let Err(err) = machine.write().submit_assessment() {
                            debug!(error = %err, "assessment not complete");
                        }
                    },
                    "Continue"
                }
            }
        }
    }
}

#[component]
fn AnswerChoice(
    machine: Signal<OnboardingMachine>,
    index: usize,
    value: String,
    selected: bool,
) -> Element {
    let label = value.clone();
    rsx! {
        button {
            class: if selected { "choice selected" } else { "choice" },
            r#type: "button",
            onclick: move |_| {
                let mut machine = machine;
                let _ = machine.write().answer_question(index, value.clone());
            },
            "{label}"
        }
    }
}

//
// ─── COMMITMENT ────────────────────────────────────────────────────────────────
//

#[component]
pub(super) fn CommitmentStep(
    machine: Signal<OnboardingMachine>,
    on_create: Callback<()>,
) -> Element {
    let mut start_input = use_signal(|| format_date_input(machine.peek().window().start()));
    let mut end_input = use_signal(|| format_date_input(machine.peek().window().end()));
    let date_error = use_signal(|| None::<String>);

    let apply_window = use_callback(move |()| {
        let mut machine = machine;
        let mut date_error = date_error;
        match StudyWindow::parse(&start_input.read(), &end_input.read()) {
            Ok(window) => {
                date_error.set(None);
                let _ = machine.write().set_window(window);
            }
            Err(err) => date_error.set(Some(err.to_string())),
        }
    });

    let (commitments, levels, error) = {
        let m = machine.read();
        let levels = (!m.variant().has_assessment()).then(|| proficiency_options(m.proficiency()));
        (
            commitment_options(m.commitment()),
            levels,
            m.error().map(str::to_string),
        )
    };
    let can_create = date_error.read().is_none();

    rsx! {
        section { class: "card",
            h3 { "How much time can you commit?" }

            if let Some(message) = error {
                div { class: "banner error", role: "alert", "{message}" }
            }

            if let Some(levels) = levels {
                h4 { "Your current level" }
                div { class: "choices",
                    for option in levels {
                        button {
                            class: if option.selected { "choice selected" } else { "choice" },
                            r#type: "button",
                            onclick: move |_| {
                                let mut machine = machine;
                                let _ = machine.write().select_proficiency(option.level);
                            },
                            strong { "{option.label}" }
                            span { class: "muted", "{option.description}" }
                        }
                    }
                }
            }

            div { class: "choices",
                for option in commitments {
                    button {
                        class: if option.selected { "choice selected" } else { "choice" },
                        r#type: "button",
                        onclick: move |_| {
                            let mut machine = machine;
                            let _ = machine.write().select_commitment(option.level);
                        },
                        strong { "{option.label}" }
                        span { class: "muted", "{option.summary}" }
                    }
                }
            }

            h4 { "Study window (optional)" }
            div { class: "field-row",
                label { "Start"
                    input {
                        r#type: "date",
                        value: "{start_input}",
                        oninput: move |evt: FormEvent| {
                            start_input.set(evt.value());
                            apply_window.call(());
                        },
                    }
                }
                label { "End"
                    input {
                        r#type: "date",
                        value: "{end_input}",
                        oninput: move |evt: FormEvent| {
                            end_input.set(evt.value());
                            apply_window.call(());
                        },
                    }
                }
            }
            if let Some(message) = date_error() {
                p { class: "error", "{message}" }
            }

            div { class: "actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| {
                        let mut machine = machine;
                        let _ = machine.write().go_back();
                    },
                    "Back"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: !can_create,
                    onclick: move |_| on_create.call(()),
                    "Create learning path"
                }
            }
        }
    }
}

//
// ─── CREATING ──────────────────────────────────────────────────────────────────
//

#[component]
pub(super) fn CreatingStep(machine: Signal<OnboardingMachine>) -> Element {
    let (headline, rows) = {
        let m = machine.read();
        (creation_headline(&m), map_progress_rows(m.log()))
    };

    rsx! {
        section { class: "card creating", aria_live: "polite",
            h3 { "Building your learning path" }
            p { class: "phase", "{headline}" }
            p { class: "muted", "This usually takes a minute or two." }
            ol { class: "progress-log",
                for (index, row) in rows.into_iter().enumerate() {
                    li { key: "{index}",
                        span { class: "log-time", "{row.time_str}" }
                        strong { " {row.label}" }
                        if !row.message.is_empty() {
                            span { " {row.message}" }
                        }
                    }
                }
            }
        }
    }
}
