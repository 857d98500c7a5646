use std::fmt;
use std::str::FromStr;

use clap::Parser;
use drill_core::model::{PlayerName, PlayerRecord};
use storage::repository::{KeyValueStore, Storage};
use storage::seed::demo_records;

/// `NAME:LEVEL:SCORE` triple given on the command line.
#[derive(Debug, Clone)]
struct SeedRecord {
    name: PlayerName,
    record: PlayerRecord,
}

#[derive(Debug)]
struct SeedRecordError(String);

impl fmt::Display for SeedRecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected NAME:LEVEL:SCORE, got {:?}", self.0)
    }
}

impl std::error::Error for SeedRecordError {}

impl FromStr for SeedRecord {
    type Err = SeedRecordError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || SeedRecordError(raw.to_owned());
        let mut parts = raw.rsplitn(3, ':');
        let score = parts.next().and_then(|v| v.parse().ok()).ok_or_else(invalid)?;
        let level = parts.next().and_then(|v| v.parse().ok()).ok_or_else(invalid)?;
        let name = parts.next().filter(|v| !v.trim().is_empty()).ok_or_else(invalid)?;
        Ok(Self {
            name: PlayerName::from_input(name),
            record: PlayerRecord::new(level, score),
        })
    }
}

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Write demo player records for the leaderboard")]
struct Args {
    /// SQLite URL
    #[arg(long = "db", env = "DRILL_DB_URL", default_value = "sqlite:drill.sqlite3?mode=rwc")]
    db_url: String,

    /// Number of generated demo players
    #[arg(long, env = "DRILL_SEED_PLAYERS", default_value_t = 12)]
    players: u32,

    /// Extra explicit records (repeatable)
    #[arg(long = "record", value_name = "NAME:LEVEL:SCORE")]
    records: Vec<SeedRecord>,
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let storage = Storage::sqlite(&args.db_url).await?;

    let mut seeded = 0_usize;
    let explicit = args.records.into_iter().map(|seed| (seed.name, seed.record));
    for (name, record) in demo_records(args.players).into_iter().chain(explicit) {
        storage.players.set(name.as_str(), &record.to_json()?).await?;
        seeded += 1;
    }

    println!("Seeded {seeded} player records into {}", args.db_url);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
