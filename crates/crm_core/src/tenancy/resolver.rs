//! Org-scoping resolver and direct-reference checks.
//!
//! # Responsibility
//! - Assign an organization to records that do not carry one explicitly.
//! - Reject records whose direct references cross the tenant boundary.
//!
//! # Invariants
//! - An explicit `org_id` is never overwritten.
//! - Parents are consulted strictly in `org_parents()` order; the first one
//!   that exists and has an organization wins.
//! - Failure to resolve is a validation error, never a silent default.

use super::registry::EntityRegistry;
use super::{TenantScoped, ValidationError};
use crate::model::entity::{EntityKind, OrgId};
use crate::repo::error::RepoResult;
use log::debug;
use rusqlite::Connection;

/// Determines the organization of `record`, mutating it in memory.
///
/// # Errors
/// - `RepoError::Validation` keyed by `org` when no organization can be
///   derived.
/// - Storage errors from parent lookups.
pub fn resolve_org<T: TenantScoped + ?Sized>(
    conn: &Connection,
    registry: &EntityRegistry,
    record: &mut T,
) -> RepoResult<OrgId> {
    if let Some(org_id) = record.org_id() {
        return Ok(org_id);
    }

    for parent in record.org_parents() {
        let Some(parent_id) = parent.id else {
            continue;
        };
        let Some(handle) = registry.resolve(conn, parent.kind, parent_id)? else {
            continue;
        };
        if let Some(org_id) = handle.org_id {
            debug!(
                "event=org_resolve module=tenancy status=ok kind={} source={}",
                record.kind(),
                parent.field
            );
            record.set_org_id(org_id);
            return Ok(org_id);
        }
    }

    Err(ValidationError::new(
        record.kind(),
        "org",
        format!("{} requires an organization", record.kind()),
    )
    .into())
}

/// Fails on `org` when the organization row does not exist.
pub fn ensure_org_exists(
    conn: &Connection,
    registry: &EntityRegistry,
    entity: EntityKind,
    org_id: OrgId,
) -> RepoResult<()> {
    if registry
        .resolve(conn, EntityKind::Organization, org_id)?
        .is_none()
    {
        return Err(ValidationError::new(
            entity,
            "org",
            format!("organization {org_id} does not exist"),
        )
        .into());
    }
    Ok(())
}

/// Verifies that every set direct reference lives in `org_id`.
///
/// Failures are keyed by the reference's own field name.
pub fn check_tenant_refs<T: TenantScoped + ?Sized>(
    conn: &Connection,
    registry: &EntityRegistry,
    record: &T,
    org_id: OrgId,
) -> RepoResult<()> {
    for link in record.tenant_refs() {
        let Some(target_id) = link.id else {
            continue;
        };
        match registry.resolve(conn, link.kind, target_id)? {
            None => {
                return Err(ValidationError::new(
                    record.kind(),
                    link.field,
                    format!("referenced {} {target_id} does not exist", link.kind),
                )
                .into());
            }
            Some(handle) if handle.org_id.is_some_and(|target_org| target_org != org_id) => {
                return Err(ValidationError::new(
                    record.kind(),
                    link.field,
                    format!("referenced {}'s organization must match", link.kind),
                )
                .into());
            }
            Some(_) => {}
        }
    }
    Ok(())
}
