use std::time::Duration;

use dioxus::document::eval;
use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::cues::cue_script;
use crate::routes::Route;
use crate::views::ViewError;
use crate::vm::{
    EnterAction, GameSnapshot, GameVm, Screen, enter_action, feedback_class, screen_for,
    start_game,
};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// How often pending timer callbacks are polled.
const POLL_INTERVAL_MS: u64 = 200;

const ANSWER_INPUT_ID: &str = "answer-input";
const NAME_INPUT_ID: &str = "name-input";

fn focus_script(id: &str) -> String {
    format!("document.getElementById({id:?})?.focus();")
}

/// Put the session back into its signal and refresh what the view renders.
fn restore(
    mut game: Signal<Option<GameVm>>,
    mut snapshot: Signal<Option<GameSnapshot>>,
    vm: GameVm,
) {
    snapshot.set(Some(vm.snapshot()));
    game.set(Some(vm));
}

#[component]
pub fn PlayView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let game_loop = ctx.game_loop();

    let game = use_signal(|| None::<GameVm>);
    let snapshot = use_signal(|| None::<GameSnapshot>);
    let mut name_input = use_signal(String::new);
    let mut answer_input = use_signal(String::new);
    let error = use_signal(|| None::<ViewError>);

    {
        let game_loop = game_loop.clone();
        use_future(move || {
            let game_loop = game_loop.clone();
            let mut game = game;
            let mut error = error;
            async move {
                loop {
                    tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
                    let now = game_loop.clock().now();
                    if !game.read().as_ref().is_some_and(|vm| vm.is_due(now)) {
                        continue;
                    }
                    let local_vm = {
                        let mut guard = game.write();
                        guard.take()
                    };
                    let Some(mut vm) = local_vm else {
                        continue;
                    };
                    let result = vm.run_due(&game_loop).await;
                    restore(game, snapshot, vm);
                    if let Err(err) = result {
                        error.set(Some(err));
                    }
                }
            }
        });
    }

    let on_start = {
        let game_loop = game_loop.clone();
        use_callback(move |()| {
            let game_loop = game_loop.clone();
            let mut error = error;
            // A game already in flight owns the session.
            if snapshot.read().is_some() {
                return;
            }
            let name = name_input();
            spawn(async move {
                match start_game(&game_loop, &name).await {
                    Ok(vm) => {
                        restore(game, snapshot, vm);
                        error.set(None);
                        let _ = eval(&focus_script(ANSWER_INPUT_ID));
                    }
                    Err(err) => error.set(Some(err)),
                }
            });
        })
    };

    let on_submit = {
        let game_loop = game_loop.clone();
        let cues = ctx.cues();
        use_callback(move |()| {
            let game_loop = game_loop.clone();
            let cues = cues.clone();
            let mut game = game;
            let mut error = error;
            let mut answer_input = answer_input;
            let raw = answer_input();
            spawn(async move {
                let local_vm = {
                    let mut guard = game.write();
                    guard.take()
                };
                let Some(mut vm) = local_vm else {
                    log::debug!("session busy; keeping the typed answer");
                    return;
                };
                answer_input.set(String::new());

                let result = vm.submit(&game_loop, &raw).await;

                // Always put the session back so the UI remains usable even after errors.
                restore(game, snapshot, vm);
                match result {
                    Ok(_) => error.set(None),
                    Err(err) => error.set(Some(err)),
                }
                for cue in cues.drain() {
                    let _ = eval(&cue_script(cue));
                }
                let _ = eval(&focus_script(ANSWER_INPUT_ID));
            });
        })
    };

    let on_play_again = {
        let game_loop = game_loop.clone();
        use_callback(move |()| {
            let game_loop = game_loop.clone();
            let mut game = game;
            let mut error = error;
            spawn(async move {
                let local_vm = {
                    let mut guard = game.write();
                    guard.take()
                };
                let Some(mut vm) = local_vm else {
                    return;
                };
                let result = vm.play_again(&game_loop).await;
                restore(game, snapshot, vm);
                match result {
                    Ok(()) => error.set(None),
                    Err(err) => error.set(Some(err)),
                }
            });
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<PlayTestHandles>() {
                handles.register(on_start, on_submit, name_input, answer_input);
            }
        }
    }

    let screen = screen_for(snapshot.read().as_ref());

    use_effect(move || {
        if screen_for(snapshot.read().as_ref()) == Screen::Welcome {
            let _ = eval(&focus_script(NAME_INPUT_ID));
        }
    });

    let on_key = use_callback(move |evt: KeyboardEvent| {
        if evt.data.key() != Key::Enter {
            return;
        }
        match enter_action(screen_for(snapshot.read().as_ref())) {
            EnterAction::Start => {
                evt.prevent_default();
                on_start.call(());
            }
            EnterAction::Submit => {
                evt.prevent_default();
                on_submit.call(());
            }
            EnterAction::Ignore => {}
        }
    });

    let view = snapshot.read().clone();

    rsx! {
        div { class: "page play-page", id: "play-root", tabindex: "0", onkeydown: on_key,
            if let Some(err) = *error.read() {
                p { class: "error", "{err.message()}" }
            }
            match (screen, view) {
                (Screen::Game, Some(view)) => rsx! {
                    section { class: "game",
                        header { class: "game__header",
                            h2 { class: "game__greeting", "{view.greeting}" }
                            span { class: "game__level", "{view.level_label}" }
                        }
                        p { class: "game__question",
                            if let Some(prompt) = view.prompt.as_deref() {
                                "{prompt}"
                            }
                        }
                        div { class: "game__answer",
                            input {
                                id: ANSWER_INPUT_ID,
                                r#type: "text",
                                autocomplete: "off",
                                value: "{answer_input}",
                                oninput: move |evt| answer_input.set(evt.value()),
                            }
                            button {
                                class: "btn btn-primary",
                                id: "submit-answer",
                                r#type: "button",
                                onclick: move |_| on_submit.call(()),
                                "Submit"
                            }
                        }
                        if let Some(feedback) = view.feedback.as_ref() {
                            p { class: feedback_class(feedback.tone), "{feedback.message}" }
                        }
                        footer { class: "game__footer",
                            span { class: "game__score", "{view.score_label}" }
                            span { class: "game__progress", "{view.progress_label}" }
                            span { class: "game__timer", "{view.timer_label}" }
                        }
                    }
                },
                (Screen::Congrats, Some(view)) => rsx! {
                    section { class: "congrats",
                        h2 { "{view.congrats_message}" }
                        p { class: "congrats__score", "{view.score_label}" }
                        button {
                            class: "btn btn-primary",
                            id: "play-again",
                            r#type: "button",
                            onclick: move |_| on_play_again.call(()),
                            "Play again"
                        }
                        button {
                            class: "btn btn-secondary",
                            id: "show-leaderboard",
                            r#type: "button",
                            onclick: move |_| {
                                let _ = navigator.push(Route::Leaderboard {});
                            },
                            "Leaderboard"
                        }
                    }
                },
                _ => rsx! {
                    section { class: "welcome",
                        h1 { "Times Table Drill" }
                        label { r#for: NAME_INPUT_ID, "Your name" }
                        input {
                            id: NAME_INPUT_ID,
                            r#type: "text",
                            placeholder: "Player",
                            value: "{name_input}",
                            oninput: move |evt| name_input.set(evt.value()),
                        }
                        div { class: "welcome__actions",
                            button {
                                class: "btn btn-primary",
                                id: "start-game",
                                r#type: "button",
                                onclick: move |_| on_start.call(()),
                                "Start"
                            }
                            button {
                                class: "btn btn-secondary",
                                id: "show-leaderboard",
                                r#type: "button",
                                onclick: move |_| {
                                    let _ = navigator.push(Route::Leaderboard {});
                                },
                                "Leaderboard"
                            }
                        }
                    }
                },
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct PlayTestHandles {
    start: Rc<RefCell<Option<Callback<()>>>>,
    submit: Rc<RefCell<Option<Callback<()>>>>,
    name_input: Rc<RefCell<Option<Signal<String>>>>,
    answer_input: Rc<RefCell<Option<Signal<String>>>>,
}

#[cfg(test)]
impl PlayTestHandles {
    pub(crate) fn register(
        &self,
        start: Callback<()>,
        submit: Callback<()>,
        name_input: Signal<String>,
        answer_input: Signal<String>,
    ) {
        *self.start.borrow_mut() = Some(start);
        *self.submit.borrow_mut() = Some(submit);
        *self.name_input.borrow_mut() = Some(name_input);
        *self.answer_input.borrow_mut() = Some(answer_input);
    }

    pub(crate) fn start(&self) -> Callback<()> {
        (*self.start.borrow()).expect("start registered")
    }

    pub(crate) fn submit(&self) -> Callback<()> {
        (*self.submit.borrow()).expect("submit registered")
    }

    pub(crate) fn name_input(&self) -> Signal<String> {
        (*self.name_input.borrow()).expect("name input registered")
    }

    pub(crate) fn answer_input(&self) -> Signal<String> {
        (*self.answer_input.borrow()).expect("answer input registered")
    }
}
