//! Multi-tenant consistency core.
//!
//! # Responsibility
//! - Describe how each tenant-scoped record finds its organization.
//! - Resolve polymorphic `(kind, id)` references through one registry.
//! - Parse loosely-typed list input shared by tags and bulk assignment.
//!
//! # Invariants
//! - A tenant-scoped record is never written without an organization.
//! - Every tenant-scoped reference held by a record points into the same
//!   organization as the record itself.

use crate::model::entity::{EntityId, EntityKind, OrgId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod input;
pub mod reference;
pub mod registry;
pub mod resolver;

/// Field-keyed validation failure raised before any write is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Record type being written.
    pub entity: EntityKind,
    /// Field the failure is keyed by (`org`, `account`, `target_id`, ...).
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(entity: EntityKind, field: &'static str, message: impl Into<String>) -> Self {
        Self {
            entity,
            field,
            message: message.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.entity, self.field, self.message)
    }
}

impl Error for ValidationError {}

/// One foreign reference of a record to another tenant-scoped record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentLink {
    /// Field name used when reporting failures on this link.
    pub field: &'static str,
    pub kind: EntityKind,
    pub id: Option<EntityId>,
}

impl ParentLink {
    pub fn new(field: &'static str, kind: EntityKind, id: Option<EntityId>) -> Self {
        Self { field, kind, id }
    }
}

/// Dynamically typed reference stored as `(target_kind, target_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolymorphicRef {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl PolymorphicRef {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }
}

/// How a polymorphic record treats a target that does not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPolicy {
    /// Missing targets are rejected (comments, attachments).
    MustExist,
    /// Missing targets are accepted; existing ones are still org-checked.
    IfExists,
}

/// Contract shared by every record that belongs to an organization.
///
/// Implementations are declarative: they list parents and references, and
/// the store turns those lists into checks inside the write transaction.
pub trait TenantScoped {
    fn kind(&self) -> EntityKind;
    fn id(&self) -> EntityId;
    fn org_id(&self) -> Option<OrgId>;
    fn set_org_id(&mut self, org_id: OrgId);

    /// Parents consulted, in this exact order, when `org_id` is unset.
    fn org_parents(&self) -> Vec<ParentLink> {
        Vec::new()
    }

    /// Direct references that must live in the record's organization.
    fn tenant_refs(&self) -> Vec<ParentLink> {
        Vec::new()
    }

    fn polymorphic_target(&self) -> Option<(PolymorphicRef, TargetPolicy)> {
        None
    }

    /// Record-local field checks.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}
