//! Vocabulary repository contract and SQLite implementation.
//!
//! # Invariants
//! - `(word, reading)` is unique; `word` and `reading` alone are not.
//! - Multi-row reads are ordered by ascending id.

use crate::model::dto::WordDto;
use crate::model::identity::{Identity, RecordId};
use crate::model::word::Word;
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const WORD_SELECT_SQL: &str = "SELECT id, word, reading, meaning FROM vocabulary";

/// Partial Word used for structural matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordProbe {
    pub id: Option<RecordId>,
    pub word: Option<String>,
    pub reading: Option<String>,
    pub meaning: Option<String>,
}

impl WordProbe {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.word.is_none() && self.reading.is_none() && self.meaning.is_none()
    }
}

impl From<&WordDto> for WordProbe {
    fn from(value: &WordDto) -> Self {
        Self {
            id: value.id,
            word: value.word.clone(),
            reading: value.reading.clone(),
            meaning: value.meaning.clone(),
        }
    }
}

/// Datastore contract for vocabulary words.
pub trait WordRepository {
    fn get_word(&self, id: RecordId) -> RepoResult<Option<Word>>;
    fn exists_word(&self, id: RecordId) -> RepoResult<bool>;
    fn exists_by_word_and_reading(&self, word: &str, reading: &str) -> RepoResult<bool>;
    fn find_all_by_word(&self, word: &str) -> RepoResult<Vec<Word>>;
    fn find_all_by_reading(&self, reading: &str) -> RepoResult<Vec<Word>>;
    fn find_all_by_meaning_regex(&self, pattern: &str) -> RepoResult<Vec<Word>>;
    fn list_words(&self) -> RepoResult<Vec<Word>>;
    fn save_word(&self, word: &Word) -> RepoResult<Word>;
    fn delete_word(&self, id: RecordId) -> RepoResult<()>;
    fn find_matching(&self, probe: &WordProbe) -> RepoResult<Vec<Word>>;
    fn exists_matching(&self, probe: &WordProbe) -> RepoResult<bool>;
}

/// SQLite-backed vocabulary repository.
pub struct SqliteWordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWordRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_words(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Word>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut words = Vec::new();

        while let Some(row) = rows.next()? {
            words.push(parse_word_row(row)?);
        }

        Ok(words)
    }
}

impl WordRepository for SqliteWordRepository<'_> {
    fn get_word(&self, id: RecordId) -> RepoResult<Option<Word>> {
        let word = self
            .conn
            .query_row(
                &format!("{WORD_SELECT_SQL} WHERE id = ?1;"),
                [id],
                |row| Ok(parse_word_row(row)),
            )
            .optional()?;
        word.transpose()
    }

    fn exists_word(&self, id: RecordId) -> RepoResult<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM vocabulary WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn exists_by_word_and_reading(&self, word: &str, reading: &str) -> RepoResult<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM vocabulary WHERE word = ?1 AND reading = ?2);",
            params![word, reading],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn find_all_by_word(&self, word: &str) -> RepoResult<Vec<Word>> {
        self.query_words(
            &format!("{WORD_SELECT_SQL} WHERE word = ?1 ORDER BY id ASC;"),
            vec![Value::Text(word.to_string())],
        )
    }

    fn find_all_by_reading(&self, reading: &str) -> RepoResult<Vec<Word>> {
        self.query_words(
            &format!("{WORD_SELECT_SQL} WHERE reading = ?1 ORDER BY id ASC;"),
            vec![Value::Text(reading.to_string())],
        )
    }

    fn find_all_by_meaning_regex(&self, pattern: &str) -> RepoResult<Vec<Word>> {
        self.query_words(
            &format!("{WORD_SELECT_SQL} WHERE meaning REGEXP ?1 ORDER BY id ASC;"),
            vec![Value::Text(pattern.to_string())],
        )
    }

    fn list_words(&self) -> RepoResult<Vec<Word>> {
        self.query_words(&format!("{WORD_SELECT_SQL} ORDER BY id ASC;"), Vec::new())
    }

    fn save_word(&self, word: &Word) -> RepoResult<Word> {
        word.validate()?;

        let id = match word.identity {
            Identity::Unsaved => {
                self.conn.execute(
                    "INSERT INTO vocabulary (word, reading, meaning) VALUES (?1, ?2, ?3);",
                    params![word.word.as_str(), word.reading.as_str(), word.meaning.as_str()],
                )?;
                self.conn.last_insert_rowid()
            }
            Identity::Saved(id) => {
                self.conn.execute(
                    "INSERT INTO vocabulary (id, word, reading, meaning) VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(id) DO UPDATE SET
                        word = excluded.word,
                        reading = excluded.reading,
                        meaning = excluded.meaning;",
                    params![
                        id,
                        word.word.as_str(),
                        word.reading.as_str(),
                        word.meaning.as_str()
                    ],
                )?;
                id
            }
        };

        self.get_word(id)?.ok_or(RepoError::NotFound(id))
    }

    fn delete_word(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM vocabulary WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn find_matching(&self, probe: &WordProbe) -> RepoResult<Vec<Word>> {
        let (filter, bind_values) = probe_filter(probe);
        self.query_words(
            &format!("{WORD_SELECT_SQL} WHERE {filter} ORDER BY id ASC;"),
            bind_values,
        )
    }

    fn exists_matching(&self, probe: &WordProbe) -> RepoResult<bool> {
        let (filter, bind_values) = probe_filter(probe);
        let exists = self.conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM vocabulary WHERE {filter});"),
            params_from_iter(bind_values),
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

fn probe_filter(probe: &WordProbe) -> (String, Vec<Value>) {
    let mut filter = String::from("1 = 1");
    let mut bind_values: Vec<Value> = Vec::new();

    if let Some(id) = probe.id {
        filter.push_str(" AND id = ?");
        bind_values.push(Value::Integer(id));
    }
    let text_columns = [
        ("word", &probe.word),
        ("reading", &probe.reading),
        ("meaning", &probe.meaning),
    ];
    for (column, value) in text_columns {
        if let Some(value) = value {
            filter.push_str(&format!(" AND {column} = ?"));
            bind_values.push(Value::Text(value.clone()));
        }
    }

    (filter, bind_values)
}

fn parse_word_row(row: &Row<'_>) -> RepoResult<Word> {
    let word = Word::with_id(
        row.get("id")?,
        row.get::<_, String>("word")?,
        row.get::<_, String>("reading")?,
        row.get::<_, String>("meaning")?,
    );
    word.validate()
        .map_err(|err| RepoError::InvalidData(format!("vocabulary row: {err}")))?;
    Ok(word)
}
