//! Listings over polymorphic rows and session-token housekeeping.
//!
//! # Invariants
//! - Listings are newest first; rows written within the same millisecond
//!   keep reverse insertion order.
//! - Tenant listings never return rows of another organization.

use super::error::{RepoError, RepoResult};
use super::records::{
    activity_from_row, attachment_from_row, comment_from_row, ACTIVITY_SELECT_SQL,
    ATTACHMENT_SELECT_SQL, COMMENT_SELECT_SQL,
};
use super::store::SqliteCrmStore;
use crate::model::activity::Activity;
use crate::model::attachment::Attachment;
use crate::model::comment::Comment;
use crate::model::entity::{EntityId, EntityKind, OrgId};
use crate::tenancy::PolymorphicRef;
use log::info;
use rusqlite::{params, Connection, Params, Row};

const LIST_DEFAULT_LIMIT: u32 = 50;
const LIST_LIMIT_MAX: u32 = 500;

/// Normalizes a tenant listing limit: `None`/`0` use the default, large
/// values clamp to the maximum.
pub fn normalize_list_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => LIST_DEFAULT_LIMIT,
        Some(value) if value > LIST_LIMIT_MAX => LIST_LIMIT_MAX,
        Some(value) => value,
    }
}

impl SqliteCrmStore<'_> {
    /// Comments attached to `target`, newest first.
    pub fn list_comments_for(&self, target: PolymorphicRef) -> RepoResult<Vec<Comment>> {
        query_rows(
            self.conn,
            &format!(
                "{COMMENT_SELECT_SQL}
                 WHERE target_kind = ?1 AND target_id = ?2
                 ORDER BY created_at DESC, rowid DESC;"
            ),
            params![target.kind.as_str(), target.id.to_string()],
            comment_from_row,
        )
    }

    /// Attachments on `target`, newest first.
    pub fn list_attachments_for(&self, target: PolymorphicRef) -> RepoResult<Vec<Attachment>> {
        query_rows(
            self.conn,
            &format!(
                "{ATTACHMENT_SELECT_SQL}
                 WHERE target_kind = ?1 AND target_id = ?2
                 ORDER BY created_at DESC, rowid DESC;"
            ),
            params![target.kind.as_str(), target.id.to_string()],
            attachment_from_row,
        )
    }

    /// Most recent comments across one organization.
    pub fn list_org_comments(&self, org_id: OrgId, limit: Option<u32>) -> RepoResult<Vec<Comment>> {
        query_rows(
            self.conn,
            &format!(
                "{COMMENT_SELECT_SQL}
                 WHERE org_id = ?1
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?2;"
            ),
            params![org_id.to_string(), i64::from(normalize_list_limit(limit))],
            comment_from_row,
        )
    }

    /// Most recent activity entries across one organization.
    pub fn list_org_activities(
        &self,
        org_id: OrgId,
        limit: Option<u32>,
    ) -> RepoResult<Vec<Activity>> {
        query_rows(
            self.conn,
            &format!(
                "{ACTIVITY_SELECT_SQL}
                 WHERE org_id = ?1
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?2;"
            ),
            params![org_id.to_string(), i64::from(normalize_list_limit(limit))],
            activity_from_row,
        )
    }

    /// Deactivates one session token and stamps its revocation time.
    pub fn revoke_session_token(&mut self, id: EntityId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE session_tokens
             SET
                is_active = 0,
                revoked_at = COALESCE(revoked_at, strftime('%s', 'now') * 1000),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::SessionToken,
                id,
            });
        }
        info!("event=session_revoke module=repo status=ok");
        Ok(())
    }

    /// Deletes tokens that expired at or before `now_ms`. Returns the count.
    pub fn cleanup_expired_sessions(&mut self, now_ms: i64) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM session_tokens WHERE expires_at <= ?1;",
            [now_ms],
        )?;
        info!("event=session_cleanup module=repo status=ok removed={removed}");
        Ok(removed)
    }
}

fn query_rows<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    map: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(map(row)?);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::normalize_list_limit;

    #[test]
    fn list_limit_defaults_and_clamps() {
        assert_eq!(normalize_list_limit(None), 50);
        assert_eq!(normalize_list_limit(Some(0)), 50);
        assert_eq!(normalize_list_limit(Some(7)), 7);
        assert_eq!(normalize_list_limit(Some(10_000)), 500);
    }
}
