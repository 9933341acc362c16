//! Per-organization tag get-or-create.
//!
//! # Invariants
//! - Tags are unique per `(org_id, slug)`; the slug is the lookup key.
//! - The display name keeps the casing of the first creation.
//! - A uniqueness violation on insert is resolved by re-reading the winning
//!   row, never surfaced to the caller.

use super::error::{RepoError, RepoResult};
use super::row::uuid_column;
use super::store::SqliteCrmStore;
use crate::model::entity::{EntityKind, OrgId};
use crate::model::org::Tag;
use crate::tenancy::input::ListInput;
use crate::tenancy::resolver::ensure_org_exists;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{params, Connection, ErrorCode, TransactionBehavior};
use std::collections::HashSet;
use uuid::Uuid;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Normalizes one raw tag into its lookup slug.
///
/// Returns `None` for blank input.
pub fn normalize_tag_slug(raw: &str) -> Option<String> {
    let display = normalize_display_name(raw)?;
    Some(display.to_lowercase())
}

fn normalize_display_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(WHITESPACE_RE.replace_all(trimmed, " ").into_owned())
}

impl SqliteCrmStore<'_> {
    /// Returns the tag records named by `input` within `org_id`, creating
    /// missing ones.
    ///
    /// Output is deduplicated by slug and keeps first-seen input order.
    /// Empty input returns an empty list without touching storage.
    pub fn resolve_tags(
        &mut self,
        org_id: OrgId,
        input: impl Into<ListInput>,
    ) -> RepoResult<Vec<Tag>> {
        let input: ListInput = input.into();
        let mut seen = HashSet::new();
        let wanted: Vec<(String, String)> = input
            .into_items()
            .iter()
            .filter_map(|raw| {
                let name = normalize_display_name(raw)?;
                let slug = name.to_lowercase();
                seen.insert(slug.clone()).then_some((name, slug))
            })
            .collect();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let registry = self.registry;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        ensure_org_exists(&tx, registry, EntityKind::Tag, org_id)?;

        let mut tags = Vec::with_capacity(wanted.len());
        let mut created = 0usize;
        for (name, slug) in &wanted {
            if let Some(tag) = find_tag(&tx, org_id, slug)? {
                tags.push(tag);
                continue;
            }
            let tag = insert_or_refetch(&tx, org_id, name, slug)?;
            created += 1;
            tags.push(tag);
        }
        tx.commit()?;

        info!(
            "event=tags_resolve module=repo status=ok requested={} created={}",
            wanted.len(),
            created
        );
        Ok(tags)
    }

    /// All tags of one organization, ordered by slug.
    pub fn list_tags(&self, org_id: OrgId) -> RepoResult<Vec<Tag>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, org_id, name, slug, created_at
             FROM tags
             WHERE org_id = ?1
             ORDER BY slug ASC;",
        )?;
        let mut rows = stmt.query([org_id.to_string()])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(tag_from_row(row)?);
        }
        Ok(tags)
    }
}

fn find_tag(conn: &Connection, org_id: OrgId, slug: &str) -> RepoResult<Option<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT id, org_id, name, slug, created_at
         FROM tags
         WHERE org_id = ?1 AND slug = ?2;",
    )?;
    let mut rows = stmt.query(params![org_id.to_string(), slug])?;
    match rows.next()? {
        Some(row) => Ok(Some(tag_from_row(row)?)),
        None => Ok(None),
    }
}

fn insert_or_refetch(conn: &Connection, org_id: OrgId, name: &str, slug: &str) -> RepoResult<Tag> {
    let id = Uuid::new_v4();
    let inserted = conn.execute(
        "INSERT INTO tags (id, org_id, name, slug) VALUES (?1, ?2, ?3, ?4);",
        params![id.to_string(), org_id.to_string(), name, slug],
    );

    match inserted {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == ErrorCode::ConstraintViolation =>
        {
            debug!("event=tag_insert module=repo status=conflict action=refetch");
        }
        Err(err) => return Err(err.into()),
    }

    find_tag(conn, org_id, slug)?
        .ok_or_else(|| RepoError::InvalidData(format!("tag `{slug}` missing after insert")))
}

fn tag_from_row(row: &rusqlite::Row<'_>) -> RepoResult<Tag> {
    Ok(Tag {
        id: uuid_column(row, "id")?,
        org_id: uuid_column(row, "org_id")?,
        name: row.get("name")?,
        slug: row.get("slug")?,
        created_at: row.get("created_at")?,
    })
}
