use std::sync::{Arc, Mutex};

use chrono::Duration;
use drill_core::model::{LevelTable, PlayerRecord};
use drill_core::time::fixed_now;
use services::{
    Clock, Cue, CuePlayer, GameError, GameLoopService, GamePhase, GameSession, TimerSlot,
};
use storage::repository::{InMemoryStore, KeyValueStore};

#[derive(Default)]
struct RecordingCues {
    played: Mutex<Vec<Cue>>,
}

impl CuePlayer for RecordingCues {
    fn play(&self, cue: Cue) {
        self.played.lock().unwrap().push(cue);
    }
}

fn service(store: &InMemoryStore, cues: Arc<RecordingCues>) -> GameLoopService {
    GameLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(LevelTable::standard().unwrap()),
        Arc::new(store.clone()),
    )
    .with_cues(cues)
    .with_seed(2024)
}

async fn stored(store: &InMemoryStore, name: &str) -> Option<PlayerRecord> {
    store
        .get(name)
        .await
        .unwrap()
        .map(|raw| PlayerRecord::from_json(&raw).unwrap())
}

async fn answer_all_correctly(svc: &GameLoopService, session: &mut GameSession) {
    while let Some(question) = session.current_question().copied() {
        let result = svc
            .submit_answer_at(session, &question.answer().to_string(), fixed_now())
            .await
            .unwrap();
        assert!(result.check.correct);
    }
}

#[tokio::test]
async fn perfect_first_level_persists_progress_and_advances() {
    let store = InMemoryStore::new();
    let cues = Arc::new(RecordingCues::default());
    let svc = service(&store, Arc::clone(&cues));

    let mut session = svc.start("Ada").await.unwrap();
    assert_eq!(session.player().as_str(), "Ada");
    assert_eq!(session.level(), 1);
    assert_eq!(session.questions().len(), 90);

    answer_all_correctly(&svc, &mut session).await;

    assert_eq!(session.score(), 90);
    assert_eq!(session.phase(), GamePhase::LevelPassed);
    assert_eq!(stored(&store, "Ada").await, Some(PlayerRecord::new(2, 90)));
    assert_eq!(cues.played.lock().unwrap().len(), 90);
    assert!(cues.played.lock().unwrap().iter().all(|cue| *cue == Cue::Correct));

    // Nothing happens before the transition delay elapses.
    let early = svc
        .run_due_at(&mut session, fixed_now() + Duration::milliseconds(999))
        .await
        .unwrap();
    assert!(early.is_empty());
    assert_eq!(session.phase(), GamePhase::LevelPassed);

    let fired = svc
        .run_due_at(&mut session, fixed_now() + Duration::seconds(1))
        .await
        .unwrap();
    assert_eq!(fired, vec![TimerSlot::ClearFeedback, TimerSlot::LevelTransition]);
    assert_eq!(session.phase(), GamePhase::InLevel);
    assert_eq!(session.level(), 2);
    assert_eq!(session.question_index(), 0);
    assert_eq!(session.questions().len(), 90);
    assert_eq!(session.score(), 90);
    assert!(session.feedback().is_none());
    assert!(
        session
            .questions()
            .iter()
            .all(|q| (11..=20).contains(&q.operand2()))
    );
}

#[tokio::test]
async fn one_mistake_replays_the_same_level_with_score_kept() {
    let store = InMemoryStore::new();
    let cues = Arc::new(RecordingCues::default());
    let svc = service(&store, Arc::clone(&cues));

    let mut session = svc.start("Bea").await.unwrap();
    let first_set = session.questions().clone();

    let wrong = svc
        .submit_answer_at(&mut session, "not a number", fixed_now())
        .await
        .unwrap();
    assert!(!wrong.check.correct);
    assert_eq!(session.score(), 0);
    answer_all_correctly(&svc, &mut session).await;

    assert_eq!(session.score(), 89);
    assert_eq!(session.phase(), GamePhase::LevelFailed);
    assert_eq!(stored(&store, "Bea").await, Some(PlayerRecord::new(1, 89)));
    assert_eq!(cues.played.lock().unwrap()[0], Cue::Wrong);

    svc.run_due_at(&mut session, fixed_now() + Duration::seconds(1))
        .await
        .unwrap();
    assert_eq!(session.phase(), GamePhase::InLevel);
    assert_eq!(session.level(), 1);
    assert_eq!(session.score(), 89);
    assert_eq!(session.questions().len(), 90);
    assert_ne!(session.questions(), &first_set, "set should be reshuffled");
}

#[tokio::test]
async fn finishing_the_last_level_removes_the_record() {
    let store = InMemoryStore::new();
    store
        .set("Cy", &PlayerRecord::new(3, 0).to_json().unwrap())
        .await
        .unwrap();
    store
        .set("Other", &PlayerRecord::new(2, 7).to_json().unwrap())
        .await
        .unwrap();
    let svc = service(&store, Arc::new(RecordingCues::default()));

    let mut session = svc.start("Cy").await.unwrap();
    assert_eq!(session.level(), 3);
    assert_eq!(session.questions().len(), 100);
    answer_all_correctly(&svc, &mut session).await;
    assert_eq!(stored(&store, "Cy").await, Some(PlayerRecord::new(4, 100)));

    svc.run_due_at(&mut session, fixed_now() + Duration::seconds(1))
        .await
        .unwrap();
    assert!(session.is_complete());
    assert_eq!(stored(&store, "Cy").await, None);
    assert!(matches!(
        svc.submit_answer_at(&mut session, "1", fixed_now()).await,
        Err(GameError::NotAcceptingAnswers)
    ));

    svc.play_again(&mut session).await.unwrap();
    assert_eq!(session.phase(), GamePhase::InLevel);
    assert_eq!(session.level(), 1);
    assert_eq!(session.score(), 0);
    assert_eq!(stored(&store, "Cy").await, None);
    assert_eq!(stored(&store, "Other").await, Some(PlayerRecord::new(2, 7)));
}

#[tokio::test]
async fn stored_level_past_the_table_completes_immediately() {
    let store = InMemoryStore::new();
    store
        .set("Dee", &PlayerRecord::new(4, 120).to_json().unwrap())
        .await
        .unwrap();
    let svc = service(&store, Arc::new(RecordingCues::default()));

    let session = svc.start("Dee").await.unwrap();
    assert!(session.is_complete());
    assert!(session.current_question().is_none());
    assert_eq!(stored(&store, "Dee").await, None);
}

#[tokio::test]
async fn correct_answer_at_maximum_score_saturates() {
    let store = InMemoryStore::new();
    store
        .set("Max", r#"{"level":1,"score":4294967295}"#)
        .await
        .unwrap();
    let svc = service(&store, Arc::new(RecordingCues::default()));

    let mut session = svc.start("Max").await.unwrap();
    assert_eq!(session.score(), u32::MAX);

    let question = *session.current_question().unwrap();
    let result = svc
        .submit_answer_at(&mut session, &question.answer().to_string(), fixed_now())
        .await
        .unwrap();
    assert!(result.check.correct);
    assert_eq!(session.score(), u32::MAX);
}

#[tokio::test]
async fn malformed_or_missing_progress_starts_fresh() {
    let store = InMemoryStore::new();
    store.set("Eve", "garbage").await.unwrap();
    let svc = service(&store, Arc::new(RecordingCues::default()));

    let eve = svc.start("  Eve  ").await.unwrap();
    assert_eq!(eve.player().as_str(), "Eve");
    assert_eq!((eve.level(), eve.score()), (1, 0));

    let anon = svc.start("   ").await.unwrap();
    assert_eq!(anon.player().as_str(), "Player");
    assert_eq!((anon.level(), anon.score()), (1, 0));
}

#[tokio::test]
async fn timer_ticks_once_per_second_and_feedback_clears() {
    let store = InMemoryStore::new();
    let svc = service(&store, Arc::new(RecordingCues::default()));
    let t0 = fixed_now();

    let mut session = svc.start_at("Fay", t0).await.unwrap();
    assert_eq!(session.timer_display(), "00:00");

    let question = session.current_question().copied().unwrap();
    svc.submit_answer_at(&mut session, &question.answer().to_string(), t0)
        .await
        .unwrap();
    assert_eq!(session.feedback().unwrap().message, "Correct!");

    let fired = svc
        .run_due_at(&mut session, t0 + Duration::seconds(1))
        .await
        .unwrap();
    assert_eq!(fired, vec![TimerSlot::Tick, TimerSlot::ClearFeedback]);
    assert_eq!(session.timer_display(), "00:01");
    assert!(session.feedback().is_none());

    svc.run_due_at(&mut session, t0 + Duration::seconds(61))
        .await
        .unwrap();
    assert_eq!(session.timer_display(), "01:01");
    assert_eq!(
        session.timers().deadline(TimerSlot::Tick),
        Some(t0 + Duration::seconds(62))
    );
}
