//! Column conversion helpers shared by record mappers.

use super::error::{RepoError, RepoResult};
use crate::model::entity::EntityKind;
use rusqlite::Row;
use uuid::Uuid;

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn uuid_column(row: &Row<'_>, column: &'static str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    parse_uuid(&text, column)
}

pub(crate) fn opt_uuid_column(row: &Row<'_>, column: &'static str) -> RepoResult<Option<Uuid>> {
    match row.get::<_, Option<String>>(column)? {
        Some(text) => Ok(Some(parse_uuid(&text, column)?)),
        None => Ok(None),
    }
}

pub(crate) fn bool_column(row: &Row<'_>, column: &'static str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn kind_column(row: &Row<'_>, column: &'static str) -> RepoResult<EntityKind> {
    let text: String = row.get(column)?;
    EntityKind::parse(&text)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid entity kind `{text}` in {column}")))
}

/// Parses a text column through an enum's `parse` function.
pub(crate) fn enum_column<T>(
    row: &Row<'_>,
    column: &'static str,
    parse: fn(&str) -> Option<T>,
) -> RepoResult<T> {
    let text: String = row.get(column)?;
    parse(&text).ok_or_else(|| RepoError::InvalidData(format!("invalid value `{text}` in {column}")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn opt_uuid_text(value: Option<Uuid>) -> Option<String> {
    value.map(|id| id.to_string())
}
