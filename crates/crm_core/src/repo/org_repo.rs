//! Organization and user management.
//!
//! These two kinds sit outside tenancy, so they bypass the checked record
//! pipeline and validate only their own fields.

use super::error::{RepoError, RepoResult};
use super::records::load_by_id;
use super::row::{bool_column, bool_to_int, uuid_column};
use super::store::SqliteCrmStore;
use crate::model::entity::{EntityId, EntityKind, OrgId};
use crate::model::org::{Organization, User};
use crate::model::require_text;
use log::info;
use rusqlite::params;

impl SqliteCrmStore<'_> {
    /// Persists a new organization.
    pub fn create_organization(&mut self, org: &Organization) -> RepoResult<OrgId> {
        require_text(EntityKind::Organization, "api_key", &org.api_key)?;
        require_text(
            EntityKind::Organization,
            "default_currency",
            &org.default_currency,
        )?;

        self.conn.execute(
            "INSERT INTO organizations (
                id, name, api_key, is_active, default_currency, default_country
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                org.id.to_string(),
                org.name.as_deref(),
                org.api_key.as_str(),
                bool_to_int(org.is_active),
                org.default_currency.as_str(),
                org.default_country.as_deref(),
            ],
        )?;
        info!("event=org_create module=repo status=ok");
        Ok(org.id)
    }

    pub fn get_organization(&self, id: OrgId) -> RepoResult<Option<Organization>> {
        load_by_id(
            self.conn,
            "SELECT id, name, api_key, is_active, default_currency, default_country
             FROM organizations WHERE id = ?1;",
            id,
            |row| {
                Ok(Organization {
                    id: uuid_column(row, "id")?,
                    name: row.get("name")?,
                    api_key: row.get("api_key")?,
                    is_active: bool_column(row, "is_active")?,
                    default_currency: row.get("default_currency")?,
                    default_country: row.get("default_country")?,
                })
            },
        )
    }

    /// Marks an organization inactive. Its records stay untouched.
    pub fn deactivate_organization(&mut self, id: OrgId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE organizations
             SET is_active = 0, updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Organization,
                id,
            });
        }
        info!("event=org_deactivate module=repo status=ok");
        Ok(())
    }

    /// Deletes an organization and, through foreign-key cascades, every
    /// record scoped to it.
    pub fn delete_organization(&mut self, id: OrgId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM organizations WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Organization,
                id,
            });
        }
        info!("event=org_delete module=repo status=ok");
        Ok(())
    }

    pub fn create_user(&mut self, user: &User) -> RepoResult<EntityId> {
        require_text(EntityKind::User, "email", &user.email)?;
        self.conn.execute(
            "INSERT INTO users (id, email, is_active) VALUES (?1, ?2, ?3);",
            params![
                user.id.to_string(),
                user.email.trim(),
                bool_to_int(user.is_active)
            ],
        )?;
        Ok(user.id)
    }

    pub fn get_user(&self, id: EntityId) -> RepoResult<Option<User>> {
        load_by_id(
            self.conn,
            "SELECT id, email, is_active FROM users WHERE id = ?1;",
            id,
            |row| {
                Ok(User {
                    id: uuid_column(row, "id")?,
                    email: row.get("email")?,
                    is_active: bool_column(row, "is_active")?,
                })
            },
        )
    }
}
