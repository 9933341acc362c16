//! Repository layer over the migrated SQLite schema.
//!
//! # Responsibility
//! - Persist every CRM record through one checked write path.
//! - Own tag get-or-create and bulk relation assignment.
//! - Isolate SQL details from the service facade.
//!
//! # Invariants
//! - Every tenant-scoped write resolves, validates and persists inside one
//!   `IMMEDIATE` transaction; a failed check leaves no partial rows.
//! - Repository APIs return semantic errors (`NotFound`, `Validation`) in
//!   addition to DB transport errors.

pub mod error;
pub mod org_repo;
pub mod polymorphic_repo;
pub mod records;
pub mod relation_repo;
pub mod store;
pub mod tag_repo;

mod row;

pub use error::{RepoError, RepoResult};
pub use relation_repo::{relation_spec, RelationSpec, TargetFilter, RELATIONS};
pub use store::{SqliteCrmStore, StoredRecord};
pub use tag_repo::normalize_tag_slug;
