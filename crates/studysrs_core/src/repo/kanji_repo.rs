//! Kanji repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide by-id, by-character, regex and example lookups over `kanjis`.
//! - Persist confusion edges as canonical rows in `kanji_confusions`.
//!
//! # Invariants
//! - Each unordered pair is one row `(higher_id, lower_id)`; the table's
//!   `CHECK` constraint rejects anything else.
//! - Saving a Kanji replaces every edge touching it, in one transaction.
//! - Edges to unsaved or unknown partners are skipped, never an error.
//! - Deleting a Kanji cascades to its edges, so no reader sees a dangling
//!   partner.

use crate::model::confusion::{canonical_edge, ConfusionPartner};
use crate::model::dto::KanjiDto;
use crate::model::identity::{Identity, RecordId};
use crate::model::kanji::Kanji;
use crate::repo::{RepoError, RepoResult};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const KANJI_SELECT_SQL: &str = "SELECT id, character, meaning FROM kanjis";

const KANJI_PARTNERS_SQL: &str = "SELECT kanjis.id AS id, kanjis.character AS character
     FROM kanji_confusions
     JOIN kanjis ON kanjis.id = kanji_confusions.confusion_id
     WHERE kanji_confusions.kanji_id = ?1
     UNION ALL
     SELECT kanjis.id AS id, kanjis.character AS character
     FROM kanji_confusions
     JOIN kanjis ON kanjis.id = kanji_confusions.kanji_id
     WHERE kanji_confusions.confusion_id = ?1
     ORDER BY id ASC";

/// Partial Kanji used for structural matching.
///
/// Only the fields that are `Some` take part in the match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KanjiProbe {
    pub id: Option<RecordId>,
    pub character: Option<String>,
    pub meaning: Option<String>,
}

impl KanjiProbe {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.character.is_none() && self.meaning.is_none()
    }
}

impl From<&KanjiDto> for KanjiProbe {
    fn from(value: &KanjiDto) -> Self {
        Self {
            id: value.id,
            character: value.character.clone(),
            meaning: value.meaning.clone(),
        }
    }
}

/// Datastore contract for Kanji records.
pub trait KanjiRepository {
    fn get_kanji(&self, id: RecordId) -> RepoResult<Option<Kanji>>;
    fn exists_kanji(&self, id: RecordId) -> RepoResult<bool>;
    fn exists_by_character(&self, character: &str) -> RepoResult<bool>;
    fn find_by_character(&self, character: &str) -> RepoResult<Option<Kanji>>;
    /// Kanji whose `meaning` matches `pattern` (regex, case-sensitive).
    fn find_all_by_meaning_regex(&self, pattern: &str) -> RepoResult<Vec<Kanji>>;
    fn list_kanjis(&self) -> RepoResult<Vec<Kanji>>;
    /// Upserts by identity and returns the stored state with its id.
    fn save_kanji(&self, kanji: &Kanji) -> RepoResult<Kanji>;
    fn delete_kanji(&self, id: RecordId) -> RepoResult<()>;
    fn find_matching(&self, probe: &KanjiProbe) -> RepoResult<Vec<Kanji>>;
    fn exists_matching(&self, probe: &KanjiProbe) -> RepoResult<bool>;
}

/// SQLite-backed Kanji repository.
pub struct SqliteKanjiRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKanjiRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_kanjis(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Kanji>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut kanjis = Vec::new();

        while let Some(row) = rows.next()? {
            kanjis.push(parse_kanji_row(row)?);
        }
        for kanji in &mut kanjis {
            self.load_confusions(kanji)?;
        }

        Ok(kanjis)
    }

    fn query_one(&self, sql: &str, bind_value: Value) -> RepoResult<Option<Kanji>> {
        let found = self
            .conn
            .query_row(sql, [bind_value], |row| Ok(parse_kanji_row(row)))
            .optional()?;

        match found {
            Some(kanji) => {
                let mut kanji = kanji?;
                self.load_confusions(&mut kanji)?;
                Ok(Some(kanji))
            }
            None => Ok(None),
        }
    }

    fn load_confusions(&self, kanji: &mut Kanji) -> RepoResult<()> {
        let Some(id) = kanji.id() else {
            return Ok(());
        };

        let mut stmt = self.conn.prepare_cached(KANJI_PARTNERS_SQL)?;
        let mut rows = stmt.query([id])?;
        while let Some(row) = rows.next()? {
            let partner =
                ConfusionPartner::saved(row.get("id")?, row.get::<_, String>("character")?);
            kanji.add_confusion_ref(partner);
        }
        Ok(())
    }
}

impl KanjiRepository for SqliteKanjiRepository<'_> {
    fn get_kanji(&self, id: RecordId) -> RepoResult<Option<Kanji>> {
        self.query_one(
            &format!("{KANJI_SELECT_SQL} WHERE id = ?1;"),
            Value::Integer(id),
        )
    }

    fn exists_kanji(&self, id: RecordId) -> RepoResult<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM kanjis WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn exists_by_character(&self, character: &str) -> RepoResult<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM kanjis WHERE character = ?1);",
            [character],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn find_by_character(&self, character: &str) -> RepoResult<Option<Kanji>> {
        self.query_one(
            &format!("{KANJI_SELECT_SQL} WHERE character = ?1;"),
            Value::Text(character.to_string()),
        )
    }

    fn find_all_by_meaning_regex(&self, pattern: &str) -> RepoResult<Vec<Kanji>> {
        self.query_kanjis(
            &format!("{KANJI_SELECT_SQL} WHERE meaning REGEXP ?1 ORDER BY id ASC;"),
            vec![Value::Text(pattern.to_string())],
        )
    }

    fn list_kanjis(&self) -> RepoResult<Vec<Kanji>> {
        self.query_kanjis(&format!("{KANJI_SELECT_SQL} ORDER BY id ASC;"), Vec::new())
    }

    fn save_kanji(&self, kanji: &Kanji) -> RepoResult<Kanji> {
        kanji.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let id = match kanji.identity {
            Identity::Unsaved => {
                tx.execute(
                    "INSERT INTO kanjis (character, meaning) VALUES (?1, ?2);",
                    params![kanji.character.as_str(), kanji.meaning.as_str()],
                )?;
                tx.last_insert_rowid()
            }
            Identity::Saved(id) => {
                tx.execute(
                    "INSERT INTO kanjis (id, character, meaning) VALUES (?1, ?2, ?3)
                     ON CONFLICT(id) DO UPDATE SET
                        character = excluded.character,
                        meaning = excluded.meaning;",
                    params![id, kanji.character.as_str(), kanji.meaning.as_str()],
                )?;
                id
            }
        };

        tx.execute(
            "DELETE FROM kanji_confusions WHERE kanji_id = ?1 OR confusion_id = ?1;",
            [id],
        )?;
        for partner in kanji.confusions() {
            let Some(partner_id) = partner.identity.id() else {
                debug!(
                    "event=kanji_edge_skip module=repo kanji_id={id} reason=unsaved_partner"
                );
                continue;
            };
            let Some((owner_id, confusion_id)) = canonical_edge(id, partner_id) else {
                continue;
            };

            tx.execute(
                "INSERT OR IGNORE INTO kanji_confusions (kanji_id, confusion_id)
                 SELECT ?1, ?2
                 WHERE EXISTS(SELECT 1 FROM kanjis WHERE id = ?3);",
                params![owner_id, confusion_id, partner_id],
            )?;
        }
        tx.commit()?;

        self.get_kanji(id)?.ok_or(RepoError::NotFound(id))
    }

    fn delete_kanji(&self, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM kanjis WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn find_matching(&self, probe: &KanjiProbe) -> RepoResult<Vec<Kanji>> {
        let (filter, bind_values) = probe_filter(probe);
        self.query_kanjis(
            &format!("{KANJI_SELECT_SQL} WHERE {filter} ORDER BY id ASC;"),
            bind_values,
        )
    }

    fn exists_matching(&self, probe: &KanjiProbe) -> RepoResult<bool> {
        let (filter, bind_values) = probe_filter(probe);
        let exists = self.conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM kanjis WHERE {filter});"),
            params_from_iter(bind_values),
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

/// `WHERE` conditions for the set fields of `probe`, with their bindings.
fn probe_filter(probe: &KanjiProbe) -> (String, Vec<Value>) {
    let mut filter = String::from("1 = 1");
    let mut bind_values: Vec<Value> = Vec::new();

    if let Some(id) = probe.id {
        filter.push_str(" AND id = ?");
        bind_values.push(Value::Integer(id));
    }
    if let Some(character) = &probe.character {
        filter.push_str(" AND character = ?");
        bind_values.push(Value::Text(character.clone()));
    }
    if let Some(meaning) = &probe.meaning {
        filter.push_str(" AND meaning = ?");
        bind_values.push(Value::Text(meaning.clone()));
    }

    (filter, bind_values)
}

fn parse_kanji_row(row: &Row<'_>) -> RepoResult<Kanji> {
    let id: RecordId = row.get("id")?;
    let kanji = Kanji::with_id(
        id,
        row.get::<_, String>("character")?,
        row.get::<_, String>("meaning")?,
    );
    if kanji.character.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank character in kanjis row {id}"
        )));
    }
    Ok(kanji)
}
