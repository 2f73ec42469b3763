use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::StudySessionError;
use studysync_core::model::StudySessionId;
use tracing::warn;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CompletionVm, ResourceVm, StudySessionVm};

fn view_error(err: &StudySessionError) -> ViewError {
    match err {
        StudySessionError::NotFound => ViewError::NotFound,
        _ => ViewError::Unknown,
    }
}

#[component]
pub fn StudySessionView(session_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let study_sessions = ctx.study_sessions();
    let navigator = use_navigator();
    let id = StudySessionId::new(session_id);

    // Replaced by the refreshed session once it is marked complete.
    let current = use_signal(|| None::<StudySessionVm>);
    let notes = use_signal(String::new);
    let saving = use_signal(|| false);
    let save_error = use_signal(|| None::<ViewError>);

    let resource = {
        let study_sessions = study_sessions.clone();
        let id = id.clone();
        use_resource(move || {
            let study_sessions = study_sessions.clone();
            let id = id.clone();
            async move {
                let session = study_sessions
                    .get(&id)
                    .await
                    .map_err(|err| view_error(&err))?;
                Ok::<_, ViewError>(StudySessionVm::from(&session))
            }
        })
    };

    let complete = use_callback(move |()| {
        let mut saving = saving;
        if saving() {
            return;
        }
        saving.set(true);
        let study_sessions = study_sessions.clone();
        let id = id.clone();
        let text = notes.peek().clone();
        spawn(async move {
            let mut current = current;
            let mut save_error = save_error;
            match study_sessions.complete(&id, &text).await {
                Ok(session) => {
                    save_error.set(None);
                    current.set(Some(StudySessionVm::from(&session)));
                }
                Err(err) => {
                    warn!(session_id = %id, error = %err, "could not complete session");
                    save_error.set(Some(view_error(&err)));
                }
            }
            saving.set(false);
        });
    });

    let retry_action = use_callback(move |()| {
        let mut resource = resource;
        resource.restart();
    });

    let state = match current() {
        Some(vm) => ViewState::Ready(vm),
        None => view_state_from_resource(&resource),
    };

    rsx! {
        div { class: "page study-session",
            button {
                class: "btn btn-link",
                r#type: "button",
                onclick: move |_| navigator.go_back(),
                "← Back"
            }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(session) => rsx! {
                    SessionDetails {
                        session,
                        notes: notes(),
                        saving: saving(),
                        save_error: save_error(),
                        on_notes: move |text: String| {
                            let mut notes = notes;
                            notes.set(text);
                        },
                        on_complete: move |()| complete.call(()),
                    }
                },
                ViewState::Error(err) => rsx! {
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
fn SessionDetails(
    session: StudySessionVm,
    notes: String,
    saving: bool,
    save_error: Option<ViewError>,
    on_notes: EventHandler<String>,
    on_complete: EventHandler<()>,
) -> Element {
    rsx! {
        header { class: "page-header",
            h2 { "{session.title}" }
            p { class: "muted",
                if let Some(number) = &session.number_str {
                    "{number} · "
                }
                "{session.module_title}"
            }
            p { "{session.when_str} · {session.duration_str}" }
        }

        if !session.objectives.is_empty() {
            section { class: "card",
                h3 { "Objectives" }
                ul {
                    for objective in session.objectives.clone() {
                        li { "{objective}" }
                    }
                }
            }
        }

        if let Some(html) = &session.description_html {
            section { class: "card description",
                h3 { "What to do" }
                div { class: "markdown", dangerous_inner_html: "{html}" }
            }
        }

        if !session.resources.is_empty() {
            section { class: "card",
                h3 { "Resources" }
                ul { class: "resources",
                    for resource in session.resources.clone() {
                        ResourceItem { resource }
                    }
                }
            }
        }

        section { class: "card completion",
            match session.completion.clone() {
                CompletionVm::Done { completed_str, notes: saved_notes } => rsx! {
                    p { class: "badge",
                        "Completed"
                        if let Some(at) = completed_str {
                            " {at}"
                        }
                    }
                    if let Some(text) = saved_notes {
                        blockquote { "{text}" }
                    }
                },
                CompletionVm::Pending => rsx! {
                    h3 { "Done with this session?" }
                    textarea {
                        id: "session-notes",
                        placeholder: "Notes (optional)",
                        value: "{notes}",
                        disabled: saving,
                        oninput: move |evt: FormEvent| on_notes.call(evt.value()),
                    }
                    if let Some(err) = save_error {
                        p { class: "error", "{err.message()}" }
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: saving,
                        onclick: move |_| on_complete.call(()),
                        if saving { "Saving..." } else { "Mark complete" }
                    }
                },
            }
        }
    }
}

#[component]
fn ResourceItem(resource: ResourceVm) -> Element {
    rsx! {
        li {
            if let Some(url) = &resource.url {
                a { href: "{url}", target: "_blank", rel: "noopener noreferrer", "{resource.title}" }
            } else {
                span { "{resource.title}" }
            }
            if let Some(kind) = &resource.kind {
                span { class: "badge", " {kind}" }
            }
            if let Some(description) = &resource.description {
                p { class: "muted", "{description}" }
            }
        }
    }
}
