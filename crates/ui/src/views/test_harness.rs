use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use drill_core::model::LevelTable;
use drill_core::time::fixed_now;
use services::{Clock, GameLoopService, LeaderboardService};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::cues::QueuedCues;
use crate::views::play::PlayTestHandles;
use crate::views::{LeaderboardView, PlayView};

#[derive(Clone)]
struct TestApp {
    game_loop: Arc<GameLoopService>,
    leaderboard: Arc<LeaderboardService>,
    cues: QueuedCues,
}

impl UiApp for TestApp {
    fn game_loop(&self) -> Arc<GameLoopService> {
        Arc::clone(&self.game_loop)
    }

    fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard)
    }

    fn cues(&self) -> QueuedCues {
        self.cues.clone()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Play,
    Leaderboard,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    play_handles: PlayTestHandles,
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
    use_context_provider(|| props.view);
    use_context_provider(|| props.play_handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Play => rsx! { PlayView {} },
        ViewKind::Leaderboard => rsx! { LeaderboardView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub cues: QueuedCues,
    pub play_handles: PlayTestHandles,
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

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with_storage(view, Storage::in_memory())
}

pub fn setup_view_harness_with_storage(view: ViewKind, storage: Storage) -> ViewHarness {
    let cues = QueuedCues::new();
    let game_loop = Arc::new(
        GameLoopService::new(
            Clock::fixed(fixed_now()),
            Arc::new(LevelTable::standard().unwrap()),
            Arc::clone(&storage.players),
        )
        .with_cues(Arc::new(cues.clone()))
        .with_seed(42),
    );
    let leaderboard = Arc::new(LeaderboardService::new(Arc::clone(&storage.players)));
    let play_handles = PlayTestHandles::default();

    let app = Arc::new(TestApp {
        game_loop,
        leaderboard,
        cues: cues.clone(),
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            play_handles: play_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        storage,
        cues,
        play_handles,
    }
}
