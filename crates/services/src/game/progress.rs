/// Aggregated view of level progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameProgress {
    pub level: u32,
    pub score: u32,
    pub answered: usize,
    pub total: usize,
    pub remaining: usize,
}
