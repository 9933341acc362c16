//! CRM domain records.
//!
//! # Responsibility
//! - Define the records persisted by the store.
//! - Declare, per record, how its organization is derived and which
//!   references must stay inside that organization.
//!
//! # Invariants
//! - Records are plain data; no model type touches storage.
//! - `org_id` is `Option` only until the store resolves it.

pub mod activity;
pub mod attachment;
pub mod board;
pub mod comment;
pub mod crm;
pub mod email;
pub mod entity;
pub mod file_category;
pub mod org;

use crate::model::entity::EntityKind;
use crate::tenancy::ValidationError;

pub(crate) fn require_text(
    entity: EntityKind,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(entity, field, "must not be blank"));
    }
    Ok(())
}

pub(crate) fn require_max_chars(
    entity: EntityKind,
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() > max_chars {
        return Err(ValidationError::new(
            entity,
            field,
            format!("must be at most {max_chars} characters"),
        ));
    }
    Ok(())
}
