//! Table-driven registry from entity kind to row resolver.
//!
//! # Responsibility
//! - Map every `EntityKind` to its table and its org/active columns.
//! - Resolve `(kind, id)` pairs into a uniform `TargetHandle`.
//!
//! # Invariants
//! - Table and column names come only from static descriptors, never from
//!   caller input.
//! - Kinds without an org column resolve with `org_id = None`.

use crate::model::entity::{EntityId, EntityKind, OrgId};
use crate::repo::error::{RepoError, RepoResult};
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension};
use std::collections::BTreeMap;
use uuid::Uuid;

static STANDARD_REGISTRY: Lazy<EntityRegistry> = Lazy::new(EntityRegistry::with_standard_kinds);

/// Resolved row of any registered kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetHandle {
    pub kind: EntityKind,
    pub id: EntityId,
    /// `None` for kinds that are not tenant-scoped.
    pub org_id: Option<OrgId>,
    /// `None` for kinds without an active flag.
    pub is_active: Option<bool>,
}

pub type ResolveFn = fn(&Connection, &EntityDescriptor, EntityId) -> RepoResult<Option<TargetHandle>>;

/// Storage description of one entity kind.
#[derive(Debug, Clone, Copy)]
pub struct EntityDescriptor {
    pub kind: EntityKind,
    pub table: &'static str,
    pub org_column: Option<&'static str>,
    pub active_column: Option<&'static str>,
    pub resolver: ResolveFn,
}

impl EntityDescriptor {
    /// Descriptor for a tenant-scoped table keyed by `id` with `org_id`.
    pub const fn tenant(kind: EntityKind, table: &'static str) -> Self {
        Self {
            kind,
            table,
            org_column: Some("org_id"),
            active_column: None,
            resolver: resolve_row,
        }
    }

    /// Descriptor for a table that is not tenant-scoped.
    pub const fn global(kind: EntityKind, table: &'static str) -> Self {
        Self {
            kind,
            table,
            org_column: None,
            active_column: None,
            resolver: resolve_row,
        }
    }

    pub const fn with_org_column(mut self, column: &'static str) -> Self {
        self.org_column = Some(column);
        self
    }

    pub const fn with_active_column(mut self, column: &'static str) -> Self {
        self.active_column = Some(column);
        self
    }

    pub const fn with_resolver(mut self, resolver: ResolveFn) -> Self {
        self.resolver = resolver;
        self
    }
}

/// Kind-to-descriptor registry used by tenancy checks.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<EntityKind, EntityDescriptor>,
}

impl EntityRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared registry covering every built-in kind.
    pub fn standard() -> &'static EntityRegistry {
        &STANDARD_REGISTRY
    }

    /// Builds a registry covering every built-in kind.
    pub fn with_standard_kinds() -> Self {
        let mut registry = Self::new();
        for descriptor in standard_descriptors() {
            registry.register(descriptor);
        }
        registry
    }

    /// Registers or replaces the descriptor for `descriptor.kind`.
    pub fn register(&mut self, descriptor: EntityDescriptor) -> Option<EntityDescriptor> {
        self.descriptors.insert(descriptor.kind, descriptor)
    }

    pub fn descriptor(&self, kind: EntityKind) -> Option<&EntityDescriptor> {
        self.descriptors.get(&kind)
    }

    pub fn contains(&self, kind: EntityKind) -> bool {
        self.descriptors.contains_key(&kind)
    }

    /// Resolves one `(kind, id)` pair.
    ///
    /// Returns `Ok(None)` when the row does not exist and
    /// `RepoError::UnregisteredKind` when the kind has no descriptor.
    pub fn resolve(
        &self,
        conn: &Connection,
        kind: EntityKind,
        id: EntityId,
    ) -> RepoResult<Option<TargetHandle>> {
        let descriptor = self
            .descriptor(kind)
            .ok_or(RepoError::UnregisteredKind(kind))?;
        (descriptor.resolver)(conn, descriptor, id)
    }
}

/// Default resolver: single-row lookup by primary key.
pub fn resolve_row(
    conn: &Connection,
    descriptor: &EntityDescriptor,
    id: EntityId,
) -> RepoResult<Option<TargetHandle>> {
    let org_expr = descriptor.org_column.unwrap_or("NULL");
    let active_expr = descriptor.active_column.unwrap_or("NULL");
    let sql = format!(
        "SELECT {org_expr}, {active_expr} FROM {} WHERE id = ?1;",
        descriptor.table
    );

    let row = conn
        .query_row(&sql, [id.to_string()], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, Option<i64>>(1)?,
            ))
        })
        .optional()?;

    let Some((org_text, active)) = row else {
        return Ok(None);
    };

    let org_id = match org_text {
        Some(value) => Some(Uuid::parse_str(&value).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid org uuid `{value}` in {}.{}",
                descriptor.table,
                descriptor.org_column.unwrap_or("org_id")
            ))
        })?),
        None => None,
    };

    Ok(Some(TargetHandle {
        kind: descriptor.kind,
        id,
        org_id,
        is_active: active.map(|value| value != 0),
    }))
}

fn standard_descriptors() -> [EntityDescriptor; 23] {
    use EntityKind as K;

    [
        EntityDescriptor::global(K::Organization, "organizations")
            .with_org_column("id")
            .with_active_column("is_active"),
        EntityDescriptor::global(K::User, "users").with_active_column("is_active"),
        EntityDescriptor::tenant(K::Profile, "profiles").with_active_column("is_active"),
        EntityDescriptor::tenant(K::Team, "teams"),
        EntityDescriptor::tenant(K::Tag, "tags"),
        EntityDescriptor::tenant(K::Account, "accounts").with_active_column("is_active"),
        EntityDescriptor::tenant(K::Contact, "contacts").with_active_column("is_active"),
        EntityDescriptor::tenant(K::Lead, "leads").with_active_column("is_active"),
        EntityDescriptor::tenant(K::Opportunity, "opportunities").with_active_column("is_active"),
        EntityDescriptor::tenant(K::Case, "cases").with_active_column("is_active"),
        EntityDescriptor::tenant(K::Task, "tasks"),
        EntityDescriptor::tenant(K::Board, "boards"),
        EntityDescriptor::tenant(K::BoardMember, "board_members"),
        EntityDescriptor::tenant(K::BoardColumn, "board_columns"),
        EntityDescriptor::tenant(K::BoardTask, "board_tasks"),
        EntityDescriptor::tenant(K::AccountEmail, "account_emails"),
        EntityDescriptor::tenant(K::AccountEmailLog, "account_email_logs"),
        EntityDescriptor::tenant(K::Comment, "comments"),
        EntityDescriptor::tenant(K::CommentFile, "comment_files"),
        EntityDescriptor::tenant(K::Attachment, "attachments"),
        EntityDescriptor::tenant(K::Document, "documents"),
        EntityDescriptor::tenant(K::Activity, "activities"),
        EntityDescriptor::tenant(K::SessionToken, "session_tokens").with_active_column("is_active"),
    ]
}

#[cfg(test)]
mod tests {
    use super::EntityRegistry;
    use crate::model::entity::EntityKind;

    #[test]
    fn standard_registry_covers_every_kind() {
        let registry = EntityRegistry::standard();
        for kind in EntityKind::ALL {
            assert!(registry.contains(kind), "missing descriptor for {kind}");
        }
    }

    #[test]
    fn only_users_are_outside_tenancy() {
        let registry = EntityRegistry::standard();
        for kind in EntityKind::ALL {
            let descriptor = registry.descriptor(kind).unwrap();
            assert_eq!(
                descriptor.org_column.is_none(),
                kind == EntityKind::User,
                "unexpected org column for {kind}"
            );
        }
    }
}
