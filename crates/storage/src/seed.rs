//! Demo player records for populating a fresh leaderboard.

use drill_core::model::{PlayerName, PlayerRecord};

const DEMO_NAMES: [&str; 8] = [
    "Ada", "Grace", "Alan", "Edsger", "Barbara", "Donald", "Frances", "Ken",
];

/// `count` distinct demo players spread over levels 1..=3.
///
/// Names repeat with a numeric suffix once the base list runs out.
#[must_use]
pub fn demo_records(count: u32) -> Vec<(PlayerName, PlayerRecord)> {
    (0..count)
        .map(|i| {
            let index = i as usize;
            let base = DEMO_NAMES[index % DEMO_NAMES.len()];
            let round = index / DEMO_NAMES.len();
            let name = if round == 0 {
                base.to_owned()
            } else {
                format!("{base} {}", round + 1)
            };
            let level = i % 3 + 1;
            let score = (i * 37) % 91;
            (
                PlayerName::from_input(&name),
                PlayerRecord::new(level, score),
            )
        })
        .collect()
}
