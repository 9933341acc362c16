//! Polymorphic reference validator.
//!
//! # Responsibility
//! - Resolve `(kind, id)` pairs held by comments, attachments and activity.
//! - Reject references whose target lives in another organization.
//!
//! # Invariants
//! - Targets without an org column are compatible with every organization.
//! - Runs inside the caller's write transaction, for creates and updates.

use super::registry::{EntityRegistry, TargetHandle};
use super::{PolymorphicRef, TargetPolicy, ValidationError};
use crate::model::entity::{EntityKind, OrgId};
use crate::repo::error::RepoResult;
use rusqlite::Connection;

/// Message used for cross-tenant polymorphic references.
pub const ORG_MISMATCH_MESSAGE: &str = "referenced object's organization must match";

/// Validates the polymorphic target of an `entity` record owned by `org_id`.
///
/// Returns the resolved handle, or `None` when the target is missing and
/// `policy` is `TargetPolicy::IfExists`.
pub fn validate_reference(
    conn: &Connection,
    registry: &EntityRegistry,
    entity: EntityKind,
    target: PolymorphicRef,
    policy: TargetPolicy,
    org_id: OrgId,
) -> RepoResult<Option<TargetHandle>> {
    if !registry.contains(target.kind) {
        return Err(ValidationError::new(
            entity,
            "target_kind",
            format!("`{}` cannot be referenced", target.kind),
        )
        .into());
    }

    let Some(handle) = registry.resolve(conn, target.kind, target.id)? else {
        return match policy {
            TargetPolicy::MustExist => Err(ValidationError::new(
                entity,
                "target_id",
                format!("referenced {} {} does not exist", target.kind, target.id),
            )
            .into()),
            TargetPolicy::IfExists => Ok(None),
        };
    };

    match handle.org_id {
        Some(target_org) if target_org != org_id => {
            Err(ValidationError::new(entity, "org", ORG_MISMATCH_MESSAGE).into())
        }
        _ => Ok(Some(handle)),
    }
}
