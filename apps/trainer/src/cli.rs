//! CLI interface for vocab-trainer

use crate::config::{TrainerConfig, DEFAULT_ALGORITHM, DEFAULT_USER};
use crate::error::Result;
use crate::runner::Trainer;
use crate::session::{Phase, Review, SessionController};
use crate::store::SqliteStore;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use vocab_core::level::LevelStats;
use vocab_core::parser;
use vocab_core::types::{FilterToggle, Filters, MasteryLevel, ReviewableItem};

#[derive(Debug, Parser)]
#[command(name = "vocab-trainer")]
#[command(about = "Spaced-repetition vocabulary trainer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the SQLite database
    #[arg(long, env = "VOCAB_DB_PATH", global = true)]
    pub db: Option<PathBuf>,

    /// User whose progress is loaded and saved
    #[arg(long, env = "VOCAB_USER", default_value = DEFAULT_USER, global = true)]
    pub user: String,

    /// Keep progress in memory only
    #[arg(long, env = "VOCAB_LOCAL_ONLY", global = true)]
    pub local_only: bool,

    /// Scheduling algorithm
    #[arg(long, env = "VOCAB_ALGORITHM", default_value = DEFAULT_ALGORITHM, global = true)]
    pub algorithm: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import a word list into the catalog
    Import {
        /// Word list file
        file: PathBuf,
        /// Remove existing words and progress first
        #[arg(long)]
        replace: bool,
    },
    /// Start an interactive study session
    Study {
        /// Level to include (0-3, repeatable; default: all)
        #[arg(long = "level", value_parser = parse_level)]
        levels: Vec<MasteryLevel>,
        /// Part to include (repeatable; default: all)
        #[arg(long = "part")]
        parts: Vec<u32>,
        /// Seed for card selection
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show per-level counts and overall progress
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn config(&self) -> Result<TrainerConfig> {
        TrainerConfig::new(self.db.clone(), &self.user, self.local_only, &self.algorithm)
    }
}

fn parse_level(value: &str) -> std::result::Result<MasteryLevel, String> {
    value
        .parse::<usize>()
        .ok()
        .and_then(MasteryLevel::from_index)
        .ok_or_else(|| format!("level must be 0-3, got {value:?}"))
}

/// Run a parsed subcommand.
pub async fn execute(command: Command, config: &TrainerConfig) -> Result<()> {
    config.ensure_data_dir()?;
    match command {
        Command::Import { file, replace } => import(&file, replace, config).await,
        Command::Study { levels, parts, seed } => {
            let filters = if levels.is_empty() {
                Filters::new(MasteryLevel::ALL, parts)
            } else {
                Filters::new(levels, parts)
            };
            study(filters, seed, config).await
        }
        Command::Stats { json } => stats(json, config).await,
    }
}

async fn import(file: &Path, replace: bool, config: &TrainerConfig) -> Result<()> {
    let content = tokio::fs::read_to_string(file).await?;
    let parsed = parser::parse(&content)?;
    for category in &parsed.unknown_categories {
        tracing::warn!(category = %category, "unknown category, using fallback part");
    }

    let store = SqliteStore::open(&config.database_path)?;
    if replace {
        store.clear_words()?;
    }
    let ids = store.import_words(&parsed.words)?;
    let skipped = parsed.words.len() - ids.len();
    tracing::info!(imported = ids.len(), skipped, path = %file.display(), "word list imported");

    println!(
        "Imported {} words, skipped {} already in catalog ({} total)",
        ids.len(),
        skipped,
        store.word_count()?
    );
    Ok(())
}

async fn open_trainer(
    config: &TrainerConfig,
    filters: Filters,
    seed: Option<u64>,
) -> Result<Trainer<SqliteStore>> {
    let store = SqliteStore::open(&config.database_path)?;
    let mut session = SessionController::new(config.algorithm()?, filters, config.persistence);
    if let Some(seed) = seed {
        session = session.with_seed(seed);
    }
    let mut trainer = Trainer::new(session, Arc::new(Mutex::new(store)), config.user_id.clone());
    trainer.load().await;
    Ok(trainer)
}

async fn stats(json: bool, config: &TrainerConfig) -> Result<()> {
    let trainer = open_trainer(config, Filters::default(), None).await?;
    let session = trainer.session();
    let report = StatsReport::new(&session.stats(), session.due_count());
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}

async fn study(filters: Filters, seed: Option<u64>, config: &TrainerConfig) -> Result<()> {
    let mut trainer = open_trainer(config, filters, seed).await?;
    if !config.persistence {
        println!("Local-only mode: progress will not be saved.");
    }
    prompt(trainer.session())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            StudyCommand::Quit => break,
            StudyCommand::Continue => {
                let session = trainer.session_mut();
                if !session.advance_to_next() {
                    session.refresh();
                }
            }
            StudyCommand::Answer(text) => {
                if let Some(review) = trainer.submit_answer(&text) {
                    print_review(trainer.session(), &review);
                }
            }
            StudyCommand::GiveUp => {
                if let Some(review) = trainer.give_up() {
                    print_review(trainer.session(), &review);
                }
            }
            StudyCommand::Skip => {
                if let Some(review) = trainer.skip() {
                    print_review(trainer.session(), &review);
                }
            }
            StudyCommand::Toggle(toggle) => {
                let session = trainer.session_mut();
                session.toggle_filter(toggle);
                println!("Filters: {}", describe_filters(session.filters()));
            }
            StudyCommand::Stats => {
                let session = trainer.session();
                print!("{}", StatsReport::new(&session.stats(), session.due_count()).render());
            }
            StudyCommand::Unknown(input) => println!("Unknown command: {input}"),
        }
        prompt(trainer.session())?;
    }

    trainer.flush().await;
    Ok(())
}

/// One line of input during a study session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudyCommand {
    Answer(String),
    Continue,
    GiveUp,
    Skip,
    Toggle(FilterToggle),
    Stats,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> StudyCommand {
    let line = line.trim();
    if line.is_empty() {
        return StudyCommand::Continue;
    }
    let Some(command) = line.strip_prefix(':') else {
        return StudyCommand::Answer(line.to_string());
    };

    let mut words = command.split_whitespace();
    let name = words.next().unwrap_or_default();
    let arg = words.next();
    match (name, arg) {
        ("give-up", None) => StudyCommand::GiveUp,
        ("skip", None) => StudyCommand::Skip,
        ("stats", None) => StudyCommand::Stats,
        ("quit" | "q", None) => StudyCommand::Quit,
        ("level", Some(arg)) => match parse_level(arg) {
            Ok(level) => StudyCommand::Toggle(FilterToggle::Level(level)),
            Err(_) => StudyCommand::Unknown(line.to_string()),
        },
        ("part", Some(arg)) => match arg.parse() {
            Ok(part) => StudyCommand::Toggle(FilterToggle::Part(part)),
            Err(_) => StudyCommand::Unknown(line.to_string()),
        },
        _ => StudyCommand::Unknown(line.to_string()),
    }
}

/// Stats output for `stats` and `:stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsReport {
    pub new: usize,
    pub learning: usize,
    pub familiar: usize,
    pub mastered: usize,
    pub total: usize,
    pub due: usize,
    pub progress_percentage: u32,
}

impl StatsReport {
    pub fn new(stats: &LevelStats, due: usize) -> Self {
        Self {
            new: stats.count(MasteryLevel::New),
            learning: stats.count(MasteryLevel::Learning),
            familiar: stats.count(MasteryLevel::Familiar),
            mastered: stats.count(MasteryLevel::Mastered),
            total: stats.total(),
            due,
            progress_percentage: stats.progress_percentage(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "New: {}  Learning: {}  Familiar: {}  Mastered: {}\n\
             Total: {}  Due now: {}  Progress: {}%\n",
            self.new,
            self.learning,
            self.familiar,
            self.mastered,
            self.total,
            self.due,
            self.progress_percentage
        )
    }
}

pub fn level_label(level: MasteryLevel) -> &'static str {
    match level {
        MasteryLevel::New => "New",
        MasteryLevel::Learning => "Learning",
        MasteryLevel::Familiar => "Familiar",
        MasteryLevel::Mastered => "Mastered",
    }
}

pub fn describe_filters(filters: &Filters) -> String {
    let levels: Vec<&str> = filters.levels.iter().map(|level| level_label(*level)).collect();
    let parts: Vec<String> = filters.parts.iter().map(u32::to_string).collect();
    format!("levels [{}], parts [{}]", levels.join(", "), parts.join(", "))
}

/// Front of the card.
pub fn render_card(item: &ReviewableItem) -> String {
    let kind = item
        .item
        .kind
        .as_deref()
        .map(|kind| format!(" ({kind})"))
        .unwrap_or_default();
    format!(
        "[Part {} | {}] {}{}",
        item.item.part,
        level_label(item.level),
        item.item.source,
        kind
    )
}

fn print_review(session: &SessionController, review: &Review) {
    println!("{}", review.feedback.message);
    if let Some(item) = session.item(review.item_id) {
        if !item.item.example.is_empty() {
            println!("  {}", item.item.example);
        }
        println!(
            "  Next review in {} day(s), now {}",
            item.memory.interval_days,
            level_label(item.level)
        );
    }
}

fn prompt(session: &SessionController) -> Result<()> {
    match session.phase() {
        Phase::Reviewing => println!("(Enter for next card)"),
        Phase::Presenting => match session.current_item() {
            Some(item) => {
                println!("{}", render_card(item));
                print!("> ");
            }
            None => println!("{}", session.state().feedback.message),
        },
        Phase::Idle => {}
    }
    std::io::stdout().flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vocab_core::types::{MemoryState, VocabularyItem};

    #[test]
    fn parses_study_commands() {
        assert_eq!(parse_command("  "), StudyCommand::Continue);
        assert_eq!(parse_command(" Dog "), StudyCommand::Answer("Dog".into()));
        assert_eq!(parse_command(":give-up"), StudyCommand::GiveUp);
        assert_eq!(parse_command(":skip"), StudyCommand::Skip);
        assert_eq!(parse_command(":stats"), StudyCommand::Stats);
        assert_eq!(parse_command(":quit"), StudyCommand::Quit);
        assert_eq!(
            parse_command(":level 2"),
            StudyCommand::Toggle(FilterToggle::Level(MasteryLevel::Familiar))
        );
        assert_eq!(
            parse_command(":part 7"),
            StudyCommand::Toggle(FilterToggle::Part(7))
        );
    }

    #[test]
    fn rejects_bad_arguments() {
        assert_eq!(parse_command(":level 4"), StudyCommand::Unknown(":level 4".into()));
        assert_eq!(parse_command(":part x"), StudyCommand::Unknown(":part x".into()));
        assert_eq!(parse_command(":skip now"), StudyCommand::Unknown(":skip now".into()));
        assert_eq!(parse_command(":jump"), StudyCommand::Unknown(":jump".into()));
    }

    #[test]
    fn parses_level_argument() {
        assert_eq!(parse_level("0"), Ok(MasteryLevel::New));
        assert_eq!(parse_level("3"), Ok(MasteryLevel::Mastered));
        assert!(parse_level("-1").is_err());
    }

    #[test]
    fn cli_reads_global_flags() {
        let cli = Cli::try_parse_from([
            "vocab-trainer",
            "study",
            "--level",
            "0",
            "--level",
            "1",
            "--part",
            "3",
            "--user",
            "ana",
            "--local-only",
        ])
        .unwrap();
        assert_eq!(cli.user, "ana");
        assert!(cli.local_only);
        match cli.command {
            Command::Study { levels, parts, seed } => {
                assert_eq!(levels, vec![MasteryLevel::New, MasteryLevel::Learning]);
                assert_eq!(parts, vec![3]);
                assert_eq!(seed, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn stats_report() {
        let stats = LevelStats {
            counts: [2, 1, 0, 1],
        };
        let report = StatsReport::new(&stats, 3);
        assert_eq!(report.total, 4);
        assert_eq!(report.progress_percentage, 33);
        assert_eq!(
            report.render(),
            "New: 2  Learning: 1  Familiar: 0  Mastered: 1\nTotal: 4  Due now: 3  Progress: 33%\n"
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mastered"], 1);
        assert_eq!(json["due"], 3);
    }

    #[test]
    fn card_and_filter_rendering() {
        let item = ReviewableItem {
            item: VocabularyItem {
                id: 1,
                part: 2,
                source: "perro".into(),
                target: "dog".into(),
                kind: Some("noun".into()),
                example: String::new(),
            },
            memory: MemoryState::default(),
            level: MasteryLevel::New,
        };
        assert_eq!(render_card(&item), "[Part 2 | New] perro (noun)");

        let filters = Filters::new([MasteryLevel::New, MasteryLevel::Mastered], [1, 4]);
        assert_eq!(describe_filters(&filters), "levels [New, Mastered], parts [1, 4]");
    }
}
