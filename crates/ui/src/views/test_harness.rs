use std::sync::Arc;

use api::{Backend, InMemoryBackend};
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{
    ApiConfig, AppServices, AssessmentService, CalendarExportService, CreationService,
    LearningPathService, QuizService, StudySessionService,
};
use studysync_core::model::OnboardingVariant;
use studysync_core::time::fixed_clock;

use crate::context::{UiApp, build_app_context};
use crate::views::onboarding::OnboardingTestHandles;
use crate::views::{DashboardView, OnboardingView, QuizView, StudySessionView};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn onboarding(&self) -> OnboardingVariant {
        self.services.onboarding()
    }

    fn creation(&self) -> Arc<CreationService> {
        self.services.creation()
    }

    fn assessments(&self) -> Arc<AssessmentService> {
        self.services.assessments()
    }

    fn learning_paths(&self) -> Arc<LearningPathService> {
        self.services.learning_paths()
    }

    fn study_sessions(&self) -> Arc<StudySessionService> {
        self.services.study_sessions()
    }

    fn quizzes(&self) -> Arc<QuizService> {
        self.services.quizzes()
    }

    fn calendar(&self) -> Arc<CalendarExportService> {
        self.services.calendar()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Onboarding,
    Dashboard(String),
    Session(String),
    Quiz {
        module_id: String,
        learning_path_id: String,
        review: bool,
    },
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    onboarding_handles: Option<OnboardingTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    if let Some(handles) = props.onboarding_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
    #[route("/dashboard/:learning_path_id")]
    Dashboard { learning_path_id: String },
}

#[component]
fn Dashboard(learning_path_id: String) -> Element {
    rsx! { DashboardView { learning_path_id } }
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Onboarding => rsx! { OnboardingView {} },
        ViewKind::Dashboard(learning_path_id) => rsx! { DashboardView { learning_path_id } },
        ViewKind::Session(session_id) => rsx! { StudySessionView { session_id } },
        ViewKind::Quiz {
            module_id,
            learning_path_id,
            review,
        } => rsx! { QuizView { module_id, learning_path_id, review } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub onboarding_handles: Option<OnboardingTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive several rounds so chained async work (open, then read) lands.
    pub async fn settle(&mut self) {
        for _ in 0..6 {
            self.drive_async().await;
        }
    }

    /// Run `f` with the dom's runtime current, as event handlers do.
    pub fn act<O>(&mut self, f: impl FnOnce(&OnboardingTestHandles) -> O) -> O {
        let handles = self
            .onboarding_handles
            .clone()
            .expect("onboarding handles registered");
        let out = self.dom.in_runtime(|| f(&handles));
        drive_dom(&mut self.dom);
        out
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, backend: &InMemoryBackend) -> ViewHarness {
    setup_view_harness_with(
        view,
        OnboardingVariant::Assessed,
        Backend::in_memory(backend.clone()),
    )
}

pub fn setup_view_harness_with(
    view: ViewKind,
    onboarding: OnboardingVariant,
    backend: Backend,
) -> ViewHarness {
    let config = ApiConfig {
        onboarding,
        download_dir: Some(std::env::temp_dir().join("studysync-ui-tests")),
        ..ApiConfig::default()
    };
    let services = AppServices::with_backend(&config, fixed_clock(), &backend);
    let onboarding_handles = match view {
        ViewKind::Onboarding => Some(OnboardingTestHandles::default()),
        _ => None,
    };

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: Arc::new(TestApp { services }),
            view,
            onboarding_handles: onboarding_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        onboarding_handles,
    }
}
