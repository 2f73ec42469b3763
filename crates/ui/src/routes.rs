use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{DashboardView, OnboardingView, QuizView, StudySessionView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", OnboardingView)] Onboarding {},
        #[route("/dashboard/:learning_path_id", DashboardView)] Dashboard { learning_path_id: String },
        #[route("/session/:session_id", StudySessionView)] StudySession { session_id: String },
        #[route("/quiz/:module_id?:learning_path_id&:review", QuizView)]
        Quiz { module_id: String, learning_path_id: String, review: bool },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Header {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Header() -> Element {
    rsx! {
        header { class: "topbar",
            h1 { "StudySync" }
            nav {
                Link { to: Route::Onboarding {}, "New learning path" }
            }
        }
    }
}
