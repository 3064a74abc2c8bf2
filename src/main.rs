use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vocab_srs::export::json::{export_json_to_path, import_json};
use vocab_srs::models::{MatchingOutcome, QualityPolicy};
use vocab_srs::*;

#[derive(Parser)]
#[command(name = "vocab", about = "Spaced repetition vocabulary trainer", version)]
struct Cli {
    /// Config file (default: ./vocab.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Add a word to the collection
    Add { word: String, translation: String },

    /// List every word with its review state
    List,

    /// Show the words to practice today
    Due {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Sort a word into learning or known
    Mark { id: String, status: MarkAs },

    /// Record a review with a quality from 0 (blackout) to 5 (perfect)
    Grade { id: String, quality: u8 },

    /// Grade the words of a finished matching round by its move count
    Match {
        #[arg(long)]
        moves: usize,
        ids: Vec<String>,
    },

    /// Move the calendar forward by one day
    AdvanceDay,

    /// Count words per status
    Stats,

    /// Write the collection to a JSON file
    Export { path: PathBuf },

    /// Merge a JSON collection into the store
    Import { path: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum MarkAs {
    Learning,
    Known,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    let store = VocabularyStore::open(&config.database_path)?;

    if seed_on_first_start(&store, cli.command.as_ref())? {
        println!("Sample data created!");
    }

    match cli.command.unwrap_or(Command::Due { limit: None }) {
        Command::Add { word, translation } => {
            let item = store.add_word(WordContent::new(word, translation))?;
            println!("{}", describe(&item));
        }
        Command::List => {
            for item in store.load_all()? {
                println!("{}", describe(&item));
            }
        }
        Command::Due { limit } => {
            let limit = limit.unwrap_or(config.due_limit);
            let pool = store.practice_pool(limit)?;
            println!("{} words to practice on {}", pool.len(), store.current_date()?);
            for item in &pool {
                println!("  {}", describe(item));
            }
        }
        Command::Mark { id, status } => {
            let item = match status {
                MarkAs::Learning => store.set_status(&id, Status::Learning)?,
                MarkAs::Known => store.mark_known(&id)?,
            };
            println!("{}", describe(&item));
        }
        Command::Grade { id, quality } => {
            let item = store.grade(&id, Quality::new(quality)?)?;
            println!("{}", describe(&item));
        }
        Command::Match { moves, ids } => {
            let outcome = MatchingOutcome {
                pairs: ids.len(),
                moves,
            };
            let quality = config.matching.assess(&outcome);
            let graded = store.record_practice(&ids, quality)?;
            println!("Graded {graded} words with quality {quality}");
        }
        Command::AdvanceDay => {
            println!("Current date: {}", store.advance_day()?);
        }
        Command::Stats => {
            let counts = store.status_counts()?;
            println!(
                "{} words: {} new, {} learning, {} known",
                counts.total(),
                counts.new,
                counts.learning,
                counts.known
            );
        }
        Command::Export { path } => {
            let items = store.load_all()?;
            export_json_to_path(&items, &path)?;
            println!("Exported {} words to {}", items.len(), path.display());
        }
        Command::Import { path } => {
            let items = import_json(&path)?;
            let count = store.import_items(&items)?;
            println!("Imported {count} words from {}", path.display());
        }
    }

    Ok(())
}

/// Fills an empty store with sample words, but only on a bare `vocab` start.
/// Explicit commands such as `import` always see the store as it is.
fn seed_on_first_start(store: &VocabularyStore, command: Option<&Command>) -> Result<bool> {
    if command.is_some() || store.status_counts()?.total() > 0 {
        return Ok(false);
    }
    seed_sample_words(store)?;
    Ok(true)
}

fn seed_sample_words(store: &VocabularyStore) -> Result<()> {
    for (word, translation) in [
        ("der Apfel", "apple"),
        ("das Fenster", "window"),
        ("die Freundschaft", "friendship"),
    ] {
        let item = store.add_word(WordContent::new(word, translation))?;
        store.set_status(&item.id, Status::Learning)?;
    }
    Ok(())
}

fn describe(item: &VocabularyItem) -> String {
    let next = item
        .next_review()
        .map(|date| date.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}  {} = {}  [{}] interval {}d, next {}",
        item.id,
        item.content.word,
        item.content.translation,
        item.status(),
        item.interval(),
        next
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeds_only_on_bare_start() {
        let store = VocabularyStore::open_in_memory().unwrap();
        assert!(seed_on_first_start(&store, None).unwrap());
        assert_eq!(store.status_counts().unwrap().learning, 3);

        // Second start finds the words already there
        assert!(!seed_on_first_start(&store, None).unwrap());
        assert_eq!(store.load_all().unwrap().len(), 3);
    }

    #[test]
    fn test_commands_never_seed() {
        let store = VocabularyStore::open_in_memory().unwrap();
        let import = Command::Import {
            path: PathBuf::from("words.json"),
        };
        let stats = Command::Stats;

        assert!(!seed_on_first_start(&store, Some(&import)).unwrap());
        assert!(!seed_on_first_start(&store, Some(&stats)).unwrap());
        assert!(store.load_all().unwrap().is_empty());
    }
}
