use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock, GameLoopService, LeaderboardService};
use storage::repository::{KeyValueStore, Storage};
use storage::seed::demo_records;
use ui::{App, QueuedCues, UiApp, build_app_context};

const IN_MEMORY_URL: &str = "sqlite::memory:";

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("invalid --db value: {raw}")]
    InvalidDbUrl { raw: String },
}

#[derive(Debug, Parser)]
#[command(name = "drill", about = "Times-table drill game")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// SQLite URL or file path
    #[arg(
        long = "db",
        env = "DRILL_DB_URL",
        default_value = "sqlite://drill.sqlite3",
        global = true
    )]
    db_url: String,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Launch the desktop game (default)
    Ui,
    /// Write demo player records
    Seed {
        /// Number of demo players
        #[arg(long, default_value_t = 12)]
        players: u32,
    },
}

struct DesktopApp {
    services: AppServices,
    cues: QueuedCues,
}

impl UiApp for DesktopApp {
    fn game_loop(&self) -> Arc<GameLoopService> {
        self.services.game_loop()
    }

    fn leaderboard(&self) -> Arc<LeaderboardService> {
        self.services.leaderboard()
    }

    fn cues(&self) -> QueuedCues {
        self.cues.clone()
    }
}

fn normalize_sqlite_url(raw: &str) -> Result<String, StartupError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StartupError::InvalidDbUrl {
            raw: raw.to_string(),
        });
    }
    if trimmed == IN_MEMORY_URL || trimmed.starts_with("sqlite://") {
        return Ok(trimmed.to_string());
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    Ok(format!("sqlite://{}", absolute.display()))
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == IN_MEMORY_URL {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| StartupError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(StartupError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn seed(db_url: &str, players: u32) -> Result<(), Box<dyn std::error::Error>> {
    let storage = Storage::sqlite(db_url).await?;
    let records = demo_records(players);
    for (name, record) in &records {
        storage.players.set(name.as_str(), &record.to_json()?).await?;
    }
    log::info!("seeded {} player records into {db_url}", records.len());
    println!("Seeded {} player records into {db_url}", records.len());
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let db_url = normalize_sqlite_url(&cli.db_url)?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&db_url)?;

    match cli.command.unwrap_or(Command::Ui) {
        Command::Ui => {
            log::info!("opening player store at {db_url}");
            let cues = QueuedCues::new();
            let services =
                AppServices::new_sqlite(&db_url, Clock::default_clock(), Arc::new(cues.clone()))
                    .await?;

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services, cues });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Times Table Drill")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Seed { players } => seed(&db_url, players).await,
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
