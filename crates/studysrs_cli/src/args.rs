//! Command line arguments.
//!
//! Every global option can also come from the environment, so a shell
//! profile can pin the database and logging setup once.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Kanji and vocabulary study corpus.
#[derive(Parser, Debug, Clone)]
#[command(name = "studysrs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct StudyArgs {
    /// SQLite database file; created and migrated on first use.
    #[arg(long, env = "STUDYSRS_DB", default_value = "studysrs.sqlite3")]
    pub db: PathBuf,

    /// Log level (trace|debug|info|warn|error). Defaults by build mode.
    #[arg(long, env = "STUDYSRS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logs go to stderr when unset.
    #[arg(long, env = "STUDYSRS_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Kanji entries and their confusions.
    #[command(subcommand)]
    Kanji(KanjiCommand),
    /// Vocabulary words.
    #[command(subcommand)]
    Word(WordCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum KanjiCommand {
    /// Add a kanji, optionally confused with stored characters or ids.
    Add(KanjiAddArgs),
    /// Show a kanji by id.
    Get { id: i64 },
    /// Show a kanji by its character.
    Find { character: String },
    /// List kanji having TERM as one whole meaning segment.
    Search { term: String },
    /// Overwrite character, meaning and confusions of a stored kanji.
    Update(KanjiUpdateArgs),
    /// Delete a kanji by id.
    Delete { id: i64 },
    /// List every kanji.
    List,
}

#[derive(Args, Debug, Clone)]
pub struct KanjiAddArgs {
    pub character: String,
    pub meaning: String,
    /// Characters this kanji is easily confused with.
    #[arg(long = "confused-with", value_delimiter = ',')]
    pub confused_with: Vec<String>,
    /// Ids of kanji this one is easily confused with.
    #[arg(long = "confused-id", value_delimiter = ',', conflicts_with = "confused_with")]
    pub confused_ids: Vec<i64>,
}

#[derive(Args, Debug, Clone)]
pub struct KanjiUpdateArgs {
    pub id: i64,
    pub character: String,
    pub meaning: String,
    /// Full replacement list of confusion ids; omit to clear.
    #[arg(long = "confused-id", value_delimiter = ',')]
    pub confused_ids: Vec<i64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum WordCommand {
    /// Add a word with its reading and meaning.
    Add {
        word: String,
        reading: String,
        meaning: String,
    },
    /// Show a word by id.
    Get { id: i64 },
    /// List words written as WORD.
    ByWord { word: String },
    /// List words read as READING.
    ByReading { reading: String },
    /// List words having TERM as one whole meaning segment.
    Search { term: String },
    /// Overwrite a stored word.
    Update {
        id: i64,
        word: String,
        reading: String,
        meaning: String,
    },
    /// Delete a word by id.
    Delete { id: i64 },
    /// List every word.
    List,
}
