use drill_core::model::PlayerRecord;
use storage::repository::{KeyValueStore, Storage};

use super::test_harness::{
    ViewHarness, ViewKind, setup_view_harness, setup_view_harness_with_storage,
};

async fn seed(storage: &Storage, name: &str, level: u32, score: u32) {
    storage
        .players
        .set(name, &PlayerRecord::new(level, score).to_json().unwrap())
        .await
        .expect("seed record");
}

async fn start_as(harness: &mut ViewHarness, name: &str) {
    let handles = harness.play_handles.clone();
    harness.dom.in_runtime(|| {
        let mut name_input = handles.name_input();
        name_input.set(name.to_string());
        handles.start().call(());
    });
    harness.drive_async().await;
    harness.drive_async().await;
}

#[tokio::test(flavor = "current_thread")]
async fn welcome_screen_smoke_renders_name_entry() {
    let mut harness = setup_view_harness(ViewKind::Play);
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("Times Table Drill"));
    assert!(html.contains("id=\"name-input\""));
    assert!(html.contains("Start"));
    assert!(html.contains("Leaderboard"));
    assert!(!html.contains("Score:"));
}

#[tokio::test(flavor = "current_thread")]
async fn starting_a_game_shows_first_question() {
    let mut harness = setup_view_harness(ViewKind::Play);
    harness.rebuild();
    start_as(&mut harness, "Ada").await;

    let html = harness.render();
    assert!(html.contains("Hello, Ada!"), "{html}");
    assert!(html.contains("Level 1"));
    assert!(html.contains("What is "));
    assert!(html.contains("Score: 0"));
    assert!(html.contains("Time: 00:00"));
    assert!(html.contains("0 / 90"));
}

#[tokio::test(flavor = "current_thread")]
async fn wrong_answer_shows_negative_feedback() {
    let mut harness = setup_view_harness(ViewKind::Play);
    harness.rebuild();
    start_as(&mut harness, "Ada").await;

    let handles = harness.play_handles.clone();
    harness.dom.in_runtime(|| {
        let mut answer_input = handles.answer_input();
        answer_input.set("-1".to_string());
        handles.submit().call(());
    });
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Incorrect! The correct answer is"), "{html}");
    assert!(html.contains("feedback--negative"));
    assert!(html.contains("Score: 0"));
    assert!(html.contains("1 / 90"));
    assert!(harness.cues.drain().is_empty(), "view drains played cues");
    let typed = harness.dom.in_runtime(|| handles.answer_input()());
    assert!(typed.is_empty(), "input cleared once the answer is taken");
}

#[tokio::test(flavor = "current_thread")]
async fn submit_without_a_session_keeps_the_typed_answer() {
    let mut harness = setup_view_harness(ViewKind::Play);
    harness.rebuild();

    let handles = harness.play_handles.clone();
    harness.dom.in_runtime(|| {
        let mut answer_input = handles.answer_input();
        answer_input.set("42".to_string());
        handles.submit().call(());
    });
    harness.drive_async().await;

    let typed = harness.dom.in_runtime(|| handles.answer_input()());
    assert_eq!(typed, "42");
}

#[tokio::test(flavor = "current_thread")]
async fn finished_player_sees_congratulations() {
    let storage = Storage::in_memory();
    seed(&storage, "Grace", 4, 280).await;
    let mut harness = setup_view_harness_with_storage(ViewKind::Play, storage);
    harness.rebuild();
    start_as(&mut harness, "Grace").await;

    let html = harness.render();
    assert!(html.contains("Congratulations, Grace!"), "{html}");
    assert!(html.contains("Play again"));
    assert!(html.contains("id=\"show-leaderboard\""), "{html}");
    assert!(harness.storage.players.get("Grace").await.unwrap().is_none());
}

#[tokio::test(flavor = "current_thread")]
async fn leaderboard_view_smoke_renders_ranked_rows() {
    let storage = Storage::in_memory();
    seed(&storage, "Linus", 1, 45).await;
    seed(&storage, "Grace", 2, 120).await;
    let mut harness = setup_view_harness_with_storage(ViewKind::Leaderboard, storage);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    let grace = html.find("Grace").expect("Grace listed");
    let linus = html.find("Linus").expect("Linus listed");
    assert!(grace < linus);
    assert!(html.contains("Last level"));
    assert!(html.contains("120"));
}

#[tokio::test(flavor = "current_thread")]
async fn leaderboard_view_smoke_handles_empty_store() {
    let mut harness = setup_view_harness(ViewKind::Leaderboard);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("No players yet."));
}
