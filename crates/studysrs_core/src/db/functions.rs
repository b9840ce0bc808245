//! Scalar SQL functions installed on every connection.

use regex::Regex;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Error};
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Installs `regexp(pattern, text)` so `text REGEXP pattern` works.
///
/// The compiled pattern is cached per statement. `NULL` text never matches.
pub fn register_regexp(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let regex: Arc<Regex> = ctx.get_or_create_aux(0, |value| -> Result<_, BoxError> {
                Ok(Regex::new(value.as_str()?)?)
            })?;
            let text = ctx.get_raw(1);
            if matches!(text, ValueRef::Null) {
                return Ok(false);
            }
            let text = text
                .as_str()
                .map_err(|err| Error::UserFunctionError(err.into()))?;
            Ok(regex.is_match(text))
        },
    )
}
