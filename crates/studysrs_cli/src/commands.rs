//! Command execution against the core services.

use crate::args::{Command, KanjiCommand, StudyArgs, WordCommand};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use studysrs_core::db::{open_db, DbError};
use studysrs_core::{
    KanjiDto, KanjiService, KanjiServiceError, SqliteKanjiRepository, SqliteWordRepository,
    WordDto, WordService, WordServiceError,
};

#[derive(Debug)]
pub enum CliError {
    Logging(String),
    Db(DbError),
    Kanji(KanjiServiceError),
    Word(WordServiceError),
    Output(serde_json::Error),
    NotFound(String),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(message) => write!(f, "logging: {message}"),
            Self::Db(err) => write!(f, "database: {err}"),
            Self::Kanji(err) => write!(f, "{err}"),
            Self::Word(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "output: {err}"),
            Self::NotFound(what) => write!(f, "{what} not found or invalid"),
        }
    }
}

impl Error for CliError {}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<KanjiServiceError> for CliError {
    fn from(value: KanjiServiceError) -> Self {
        Self::Kanji(value)
    }
}

impl From<WordServiceError> for CliError {
    fn from(value: WordServiceError) -> Self {
        Self::Word(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}

pub fn execute_command(args: StudyArgs) -> Result<(), CliError> {
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| studysrs_core::default_log_level().to_string());
    let logging = match args.log_dir.as_deref() {
        Some(dir) => studysrs_core::init_logging(&level, dir),
        None => studysrs_core::init_stderr_logging(&level),
    };
    logging.map_err(CliError::Logging)?;

    let conn = open_db(&args.db)?;
    let output = Output {
        pretty: args.pretty,
    };

    match args.command {
        Command::Kanji(command) => {
            let service = KanjiService::new(SqliteKanjiRepository::new(&conn));
            run_kanji(&service, command, &output)
        }
        Command::Word(command) => {
            let service = WordService::new(SqliteWordRepository::new(&conn));
            run_word(&service, command, &output)
        }
    }
}

fn run_kanji(
    service: &KanjiService<SqliteKanjiRepository<'_>>,
    command: KanjiCommand,
    output: &Output,
) -> Result<(), CliError> {
    match command {
        KanjiCommand::Add(add) => {
            let created = if !add.confused_ids.is_empty() {
                service.create_from_parts_with_confused_ids(
                    &add.character,
                    &add.meaning,
                    &add.confused_ids,
                )?
            } else {
                let confused = add
                    .confused_with
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>();
                service.create_from_parts_with_confused_characters(
                    &add.character,
                    &add.meaning,
                    &confused,
                )?
            };
            output.found("kanji", created)
        }
        KanjiCommand::Get { id } => output.found("kanji", service.find_by_id(id)?),
        KanjiCommand::Find { character } => {
            output.found("kanji", service.find_by_character(&character)?)
        }
        KanjiCommand::Search { term } => output.print(&service.find_all_by_meaning_term(&term)?),
        KanjiCommand::Update(update) => {
            let request = KanjiDto::new(update.character, update.meaning)
                .with_id(update.id)
                .with_confusions(update.confused_ids);
            output.found("kanji", service.update(&request)?)
        }
        KanjiCommand::Delete { id } => output.found("kanji", service.delete_by_id(id)?),
        KanjiCommand::List => output.print(&service.find_all()?),
    }
}

fn run_word(
    service: &WordService<SqliteWordRepository<'_>>,
    command: WordCommand,
    output: &Output,
) -> Result<(), CliError> {
    match command {
        WordCommand::Add {
            word,
            reading,
            meaning,
        } => output.found("word", service.create(&WordDto::new(word, reading, meaning))?),
        WordCommand::Get { id } => output.found("word", service.find_by_id(id)?),
        WordCommand::ByWord { word } => output.print(&service.find_all_by_word(&word)?),
        WordCommand::ByReading { reading } => {
            output.print(&service.find_all_by_reading(&reading)?)
        }
        WordCommand::Search { term } => output.print(&service.find_all_by_meaning_term(&term)?),
        WordCommand::Update {
            id,
            word,
            reading,
            meaning,
        } => {
            let request = WordDto::new(word, reading, meaning).with_id(id);
            output.found("word", service.update(&request)?)
        }
        WordCommand::Delete { id } => output.found("word", service.delete_by_id(id)?),
        WordCommand::List => output.print(&service.find_all()?),
    }
}

struct Output {
    pretty: bool,
}

impl Output {
    fn print<T: Serialize>(&self, value: &T) -> Result<(), CliError> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{text}");
        Ok(())
    }

    fn found<T: Serialize>(&self, what: &str, value: Option<T>) -> Result<(), CliError> {
        match value {
            Some(value) => self.print(&value),
            None => Err(CliError::NotFound(what.to_string())),
        }
    }
}
