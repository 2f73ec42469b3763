use dioxus::prelude::*;
use dioxus_router::Link;
use services::LearningPathError;
use studysync_core::model::LearningPathId;
use tracing::warn;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    DashboardVm, ModuleCardVm, ModuleQuizVm, ProgressSummaryVm, SessionListState, SessionRowVm,
    UpcomingSessionVm, map_dashboard, map_session_rows,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Overview,
    Sessions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum ExportStatus {
    Saving,
    Saved(String),
    Failed(String),
}

#[component]
pub fn DashboardView(learning_path_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let learning_paths = ctx.learning_paths();
    let calendar = ctx.calendar();
    let path_id = LearningPathId::new(learning_path_id);

    let resource = {
        let learning_paths = learning_paths.clone();
        let path_id = path_id.clone();
        use_resource(move || {
            let learning_paths = learning_paths.clone();
            let path_id = path_id.clone();
            async move {
                let dashboard = learning_paths
                    .dashboard(&path_id)
                    .await
                    .map_err(|err| match err {
                        LearningPathError::NotFound => ViewError::NotFound,
                        _ => ViewError::Unknown,
                    })?;
                Ok::<_, ViewError>(map_dashboard(&dashboard))
            }
        })
    };

    let tab = use_signal(|| Tab::Overview);
    let sessions = use_signal(SessionListState::default);
    let export_status = use_signal(|| None::<ExportStatus>);

    let show_sessions = {
        let path_id = path_id.clone();
        use_callback(move |()| {
            let mut tab = tab;
            let mut sessions = sessions;
            tab.set(Tab::Sessions);
            if !sessions.peek().needs_fetch() {
                return;
            }
            sessions.set(SessionListState::Loading);
            let learning_paths = learning_paths.clone();
            let path_id = path_id.clone();
            spawn(async move {
                let next = match learning_paths.sessions(&path_id).await {
                    Ok(items) => SessionListState::Loaded(map_session_rows(&items)),
                    Err(err) => {
                        warn!(learning_path_id = %path_id, error = %err, "could not load sessions");
                        SessionListState::Failed(ViewError::Unknown)
                    }
                };
                sessions.set(next);
            });
        })
    };

    let export_calendar = use_callback(move |topic: String| {
        let mut export_status = export_status;
        if matches!(*export_status.peek(), Some(ExportStatus::Saving)) {
            return;
        }
        export_status.set(Some(ExportStatus::Saving));
        let calendar = calendar.clone();
        let path_id = path_id.clone();
        spawn(async move {
            let status = match calendar.export(&path_id, &topic).await {
                Ok(path) => ExportStatus::Saved(path.display().to_string()),
                Err(err) => {
                    warn!(learning_path_id = %path_id, error = %err, "calendar export failed");
                    ExportStatus::Failed(err.to_string())
                }
            };
            export_status.set(Some(status));
        });
    });

    let retry_action = use_callback(move |()| {
        let mut resource = resource;
        resource.restart();
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page dashboard",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    DashboardBody {
                        data,
                        tab: tab(),
                        sessions: sessions(),
                        export_status: export_status(),
                        on_tab: move |next: Tab| {
                            if next == Tab::Sessions {
                                show_sessions.call(());
                            } else {
                                let mut tab = tab;
                                tab.set(next);
                            }
                        },
                        on_export: move |topic: String| export_calendar.call(topic),
                    }
                },
                ViewState::Error(err) => rsx! {
                    h2 { "Dashboard" }
                    p { "{err.message()}" }
                    if err.is_retryable() {
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| retry_action.call(()),
                            "Retry"
                        }
                    } else {
                        Link { class: "btn btn-secondary", to: Route::Onboarding {}, "Start a new learning path" }
                    }
                },
            }
        }
    }
}

#[component]
fn DashboardBody(
    data: DashboardVm,
    tab: Tab,
    sessions: SessionListState,
    export_status: Option<ExportStatus>,
    on_tab: EventHandler<Tab>,
    on_export: EventHandler<String>,
) -> Element {
    let saving = matches!(export_status, Some(ExportStatus::Saving));
    let topic = data.topic.clone();

    rsx! {
        header { class: "page-header",
            h2 { "{data.topic}" }
            if let Some(weeks) = &data.weeks_str {
                span { class: "muted", "{weeks}" }
            }
            button {
                class: "btn btn-secondary",
                r#type: "button",
                disabled: saving,
                onclick: move |_| on_export.call(topic.clone()),
                if saving { "Exporting..." } else { "Export to calendar" }
            }
        }
        match export_status {
            Some(ExportStatus::Saved(path)) => rsx! {
                p { class: "notice", "Calendar saved to {path}" }
            },
            Some(ExportStatus::Failed(message)) => rsx! {
                p { class: "error", "Calendar export failed: {message}" }
            },
            _ => rsx! {},
        }

        ProgressPanel { progress: data.progress.clone() }

        nav { class: "tabs",
            button {
                class: if tab == Tab::Overview { "tab active" } else { "tab" },
                r#type: "button",
                onclick: move |_| on_tab.call(Tab::Overview),
                "Overview"
            }
            button {
                class: if tab == Tab::Sessions { "tab active" } else { "tab" },
                r#type: "button",
                onclick: move |_| on_tab.call(Tab::Sessions),
                "All sessions"
            }
        }

        match tab {
            Tab::Overview => rsx! {
                section { class: "card",
                    h3 { "Upcoming sessions" }
                    if data.upcoming.is_empty() {
                        p { class: "muted", "No upcoming sessions." }
                    } else {
                        ul { class: "session-list",
                            for session in data.upcoming.clone() {
                                UpcomingRow { key: "{session.id}", session }
                            }
                        }
                    }
                }
                section { class: "modules",
                    h3 { "Modules" }
                    for module in data.modules.clone() {
                        ModuleCard {
                            key: "{module.module_id}",
                            module,
                            learning_path_id: data.learning_path_id.clone(),
                        }
                    }
                }
            },
            Tab::Sessions => rsx! {
                section { class: "card",
                    h3 { "All sessions" }
                    match sessions {
                        SessionListState::NotLoaded | SessionListState::Loading => rsx! {
                            p { "Loading..." }
                        },
                        SessionListState::Loaded(rows) => rsx! {
                            if rows.is_empty() {
                                p { class: "muted", "No sessions scheduled." }
                            } else {
                                ul { class: "session-list",
                                    for row in rows {
                                        SessionRow { key: "{row.id}", row }
                                    }
                                }
                            }
                        },
                        SessionListState::Failed(err) => rsx! {
                            p { "{err.message()}" }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| on_tab.call(Tab::Sessions),
                                "Retry"
                            }
                        },
                    }
                }
            },
        }
    }
}

#[component]
fn ProgressPanel(progress: ProgressSummaryVm) -> Element {
    let average = progress.average_score_str.clone().unwrap_or_else(|| "-".to_string());

    rsx! {
        section { class: "card progress",
            div { class: "progress-bar",
                div { class: "progress-fill", style: "width: {progress.completion}%" }
            }
            dl { class: "stats",
                dt { "Complete" }
                dd { "{progress.completion}%" }

                dt { "Sessions" }
                dd { "{progress.sessions_str}" }

                dt { "Quizzes taken" }
                dd { "{progress.quizzes_taken}" }

                dt { "Average score" }
                dd { "{average}" }
            }
        }
    }
}

#[component]
fn UpcomingRow(session: UpcomingSessionVm) -> Element {
    rsx! {
        li {
            Link { to: Route::StudySession { session_id: session.id.clone() },
                span { class: "session-title", "{session.title}" }
            }
            span { class: "muted", " {session.when_str} · {session.duration_str}" }
        }
    }
}

#[component]
fn SessionRow(row: SessionRowVm) -> Element {
    rsx! {
        li { class: if row.completed { "done" } else { "" },
            Link { to: Route::StudySession { session_id: row.id.clone() },
                span { class: "session-title", "{row.title}" }
            }
            span { class: "muted", " {row.module_title} · {row.when_str} · {row.duration_str}" }
            if row.completed {
                span { class: "badge", "Completed" }
            }
        }
    }
}

#[component]
fn ModuleCard(module: ModuleCardVm, learning_path_id: String) -> Element {
    let quiz_route = |review: bool| Route::Quiz {
        module_id: module.module_id.clone(),
        learning_path_id: learning_path_id.clone(),
        review,
    };
    let prerequisites = module.prerequisites.join(", ");

    rsx! {
        article { class: "card module",
            header {
                h4 { "{module.title}" }
                if let Some(duration) = &module.duration_str {
                    span { class: "muted", "{duration}" }
                }
            }
            if !module.objectives.is_empty() {
                ul { class: "objectives",
                    for objective in module.objectives.clone() {
                        li { "{objective}" }
                    }
                }
            }
            if !module.subtopics.is_empty() {
                ul { class: "subtopics",
                    for subtopic in module.subtopics.clone() {
                        li {
                            strong { "{subtopic.title}" }
                            if let Some(description) = subtopic.description {
                                span { class: "muted", " {description}" }
                            }
                        }
                    }
                }
            }
            if !prerequisites.is_empty() {
                p { class: "muted", "Prerequisites: {prerequisites}" }
            }
            footer {
                match module.quiz.clone() {
                    ModuleQuizVm::NotTaken => rsx! {
                        Link { class: "btn btn-primary", to: quiz_route(false), "Take quiz" }
                    },
                    ModuleQuizVm::Completed { score_str } => rsx! {
                        span { class: "badge", "Quiz score {score_str}" }
                        Link { class: "btn btn-secondary", to: quiz_route(true), "Review quiz" }
                    },
                }
            }
        }
    }
}
