mod leaderboard;
mod play;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use leaderboard::LeaderboardView;
pub use play::PlayView;
pub use state::{ViewError, ViewState, view_state_from_resource};
