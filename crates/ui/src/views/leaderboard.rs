use dioxus::prelude::*;
use dioxus_router::Link;

use services::LeaderboardEntry;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn LeaderboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let leaderboard = ctx.leaderboard();

    let resource = use_resource(move || {
        let leaderboard = leaderboard.clone();
        async move {
            leaderboard.top_players().await.map_err(|err| {
                log::error!("loading leaderboard failed: {err}");
                ViewError::Unknown
            })
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page leaderboard-page",
            header { class: "leaderboard__header",
                h2 { "Leaderboard" }
                Link { class: "btn btn-secondary", to: Route::Play {}, "Back" }
            }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(rows) => rsx! {
                    if rows.is_empty() {
                        p { class: "leaderboard__empty", "No players yet." }
                    } else {
                        LeaderboardTable { rows }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
            }
        }
    }
}

#[component]
fn LeaderboardTable(rows: Vec<LeaderboardEntry>) -> Element {
    rsx! {
        table { class: "leaderboard",
            thead {
                tr {
                    th { "Rank" }
                    th { "Name" }
                    th { "Last level" }
                    th { "Score" }
                }
            }
            tbody {
                for row in rows {
                    tr { key: "{row.name}",
                        td { "{row.rank}" }
                        td { "{row.name}" }
                        td { "{row.last_level}" }
                        td { "{row.score}" }
                    }
                }
            }
        }
    }
}
