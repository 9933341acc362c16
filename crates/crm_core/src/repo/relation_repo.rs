//! Bulk many-to-many assignment filtered by tenant membership.
//!
//! # Responsibility
//! - Describe every host/relation/link-table triple in one static table.
//! - Attach only targets that exist inside the caller's organization.
//!
//! # Invariants
//! - Unresolvable, cross-tenant or filtered ids are dropped, never errored;
//!   callers diff the returned ids against their input.
//! - Link inserts are idempotent.
//! - Link table names come only from `RELATIONS`.

use super::error::{RepoError, RepoResult};
use super::row::parse_uuid;
use super::store::SqliteCrmStore;
use crate::model::entity::{EntityId, EntityKind, OrgId};
use crate::model::entity::EntityKind as K;
use crate::tenancy::input::ListInput;
use crate::tenancy::registry::TargetHandle;
use log::{debug, info};
use rusqlite::{params, TransactionBehavior};
use std::collections::HashSet;
use uuid::Uuid;

/// One many-to-many relation of a host kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationSpec {
    pub host: EntityKind,
    pub name: &'static str,
    /// Link table with `host_id` and `target_id` columns.
    pub table: &'static str,
    pub target: EntityKind,
}

const fn relation(
    host: EntityKind,
    name: &'static str,
    table: &'static str,
    target: EntityKind,
) -> RelationSpec {
    RelationSpec {
        host,
        name,
        table,
        target,
    }
}

pub const RELATIONS: &[RelationSpec] = &[
    relation(K::Account, "contacts", "account_contacts", K::Contact),
    relation(K::Account, "assigned_to", "account_assigned_to", K::Profile),
    relation(K::Account, "teams", "account_teams", K::Team),
    relation(K::Account, "tags", "account_tags", K::Tag),
    relation(K::Contact, "assigned_to", "contact_assigned_to", K::Profile),
    relation(K::Contact, "teams", "contact_teams", K::Team),
    relation(K::Contact, "tags", "contact_tags", K::Tag),
    relation(K::Lead, "contacts", "lead_contacts", K::Contact),
    relation(K::Lead, "assigned_to", "lead_assigned_to", K::Profile),
    relation(K::Lead, "teams", "lead_teams", K::Team),
    relation(K::Lead, "tags", "lead_tags", K::Tag),
    relation(K::Opportunity, "contacts", "opportunity_contacts", K::Contact),
    relation(K::Opportunity, "assigned_to", "opportunity_assigned_to", K::Profile),
    relation(K::Opportunity, "teams", "opportunity_teams", K::Team),
    relation(K::Opportunity, "tags", "opportunity_tags", K::Tag),
    relation(K::Case, "contacts", "case_contacts", K::Contact),
    relation(K::Case, "assigned_to", "case_assigned_to", K::Profile),
    relation(K::Case, "teams", "case_teams", K::Team),
    relation(K::Case, "tags", "case_tags", K::Tag),
    relation(K::Task, "contacts", "task_contacts", K::Contact),
    relation(K::Task, "assigned_to", "task_assigned_to", K::Profile),
    relation(K::Task, "teams", "task_teams", K::Team),
    relation(K::Task, "tags", "task_tags", K::Tag),
    relation(K::BoardTask, "assigned_to", "board_task_assigned_to", K::Profile),
    relation(K::Team, "users", "team_users", K::Profile),
    relation(K::Document, "shared_to", "document_shared_to", K::Profile),
    relation(K::Document, "teams", "document_teams", K::Team),
];

/// Looks up the relation `name` of `host`.
pub fn relation_spec(host: EntityKind, name: &str) -> Option<&'static RelationSpec> {
    RELATIONS
        .iter()
        .find(|spec| spec.host == host && spec.name == name)
}

/// Extra predicate applied to in-tenant targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetFilter {
    /// Drop targets whose active flag is false. Kinds without an active
    /// flag always pass.
    pub active_only: bool,
}

impl TargetFilter {
    pub fn active_only() -> Self {
        Self { active_only: true }
    }

    fn accepts(&self, handle: &TargetHandle) -> bool {
        !self.active_only || handle.is_active != Some(false)
    }
}

impl SqliteCrmStore<'_> {
    /// Attaches the targets named by `ids` to a host record.
    ///
    /// Returns the ids actually linked (new or already present), in input
    /// order.
    ///
    /// # Errors
    /// - `RepoError::UnknownRelation` when `relation` is not defined for
    ///   `host_kind` or does not point at `target_kind`.
    /// - `RepoError::NotFound` when the host does not exist inside `org_id`.
    #[allow(clippy::too_many_arguments)]
    pub fn assign_related(
        &mut self,
        host_kind: EntityKind,
        host_id: EntityId,
        relation: &str,
        ids: impl Into<ListInput>,
        target_kind: EntityKind,
        org_id: OrgId,
        filter: TargetFilter,
    ) -> RepoResult<Vec<EntityId>> {
        let spec = relation_spec(host_kind, relation)
            .filter(|spec| spec.target == target_kind)
            .ok_or_else(|| RepoError::UnknownRelation {
                host: host_kind,
                relation: relation.to_string(),
            })?;
        let ids: ListInput = ids.into();
        let requested = ids.into_items();

        let registry = self.registry;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        match registry.resolve(&tx, host_kind, host_id)? {
            Some(host) if host.org_id == Some(org_id) => {}
            _ => {
                return Err(RepoError::NotFound {
                    kind: host_kind,
                    id: host_id,
                })
            }
        }

        if filter.active_only
            && registry
                .descriptor(target_kind)
                .is_some_and(|descriptor| descriptor.active_column.is_none())
        {
            debug!(
                "event=relation_assign module=repo status=filter_ignored kind={target_kind} reason=no_active_flag"
            );
        }

        let insert_sql = format!(
            "INSERT OR IGNORE INTO {} (host_id, target_id) VALUES (?1, ?2);",
            spec.table
        );
        let mut seen = HashSet::new();
        let mut attached = Vec::new();
        for raw in &requested {
            let Ok(target_id) = Uuid::parse_str(raw) else {
                continue;
            };
            if !seen.insert(target_id) {
                continue;
            }
            let Some(handle) = registry.resolve(&tx, target_kind, target_id)? else {
                continue;
            };
            if handle.org_id != Some(org_id) || !filter.accepts(&handle) {
                continue;
            }
            tx.execute(
                &insert_sql,
                params![host_id.to_string(), target_id.to_string()],
            )?;
            attached.push(target_id);
        }
        tx.commit()?;

        info!(
            "event=relation_assign module=repo status=ok host={host_kind} relation={} requested={} attached={}",
            spec.name,
            requested.len(),
            attached.len()
        );
        Ok(attached)
    }

    /// Target ids linked to a host through `relation`, in link order.
    pub fn list_related(
        &self,
        host_kind: EntityKind,
        host_id: EntityId,
        relation: &str,
    ) -> RepoResult<Vec<EntityId>> {
        let spec =
            relation_spec(host_kind, relation).ok_or_else(|| RepoError::UnknownRelation {
                host: host_kind,
                relation: relation.to_string(),
            })?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT target_id FROM {} WHERE host_id = ?1 ORDER BY rowid ASC;",
            spec.table
        ))?;
        let mut rows = stmt.query([host_id.to_string()])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let text: String = row.get(0)?;
            ids.push(parse_uuid(&text, "target_id")?);
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::{relation_spec, RELATIONS};
    use crate::model::entity::EntityKind;
    use std::collections::HashSet;

    #[test]
    fn relation_names_are_unique_per_host() {
        let mut seen = HashSet::new();
        for spec in RELATIONS {
            assert!(seen.insert((spec.host, spec.name)), "{} {}", spec.host, spec.name);
        }
    }

    #[test]
    fn lookup_matches_host_and_name() {
        let spec = relation_spec(EntityKind::Team, "users").expect("team users relation");
        assert_eq!(spec.table, "team_users");
        assert_eq!(spec.target, EntityKind::Profile);
        assert!(relation_spec(EntityKind::Contact, "contacts").is_none());
    }
}
