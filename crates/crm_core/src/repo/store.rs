//! Checked record store.
//!
//! # Responsibility
//! - Run the tenancy pipeline (org resolution, org existence, record
//!   validation, polymorphic target, direct references) for every write.
//! - Delegate row mapping to `StoredRecord` implementations.
//!
//! # Invariants
//! - Checks and the row write share one `IMMEDIATE` transaction.
//! - A record's organization never changes after creation.
//! - Read paths reject invalid persisted state instead of masking it.

use super::error::{RepoError, RepoResult};
use crate::db::migrations::{current_user_version, latest_version};
use crate::model::entity::{EntityId, EntityKind, OrgId};
use crate::tenancy::reference::validate_reference;
use crate::tenancy::registry::EntityRegistry;
use crate::tenancy::resolver::{check_tenant_refs, ensure_org_exists, resolve_org};
use crate::tenancy::{TenantScoped, ValidationError};
use log::{info, warn};
use rusqlite::{Connection, TransactionBehavior};
use std::time::Instant;

/// Row mapping for one tenant-scoped record type.
///
/// Implementations only translate between the record and its table(s);
/// all tenancy checks happen in `SqliteCrmStore` before these are called.
pub trait StoredRecord: TenantScoped + Sized {
    const KIND: EntityKind;

    /// Inserts the record, including owned child rows.
    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()>;

    /// Rewrites mutable columns. Returns the number of changed rows.
    fn update_row(&self, conn: &Connection) -> RepoResult<usize>;

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>>;
}

/// SQLite-backed store for every CRM record.
pub struct SqliteCrmStore<'conn> {
    pub(crate) conn: &'conn mut Connection,
    pub(crate) registry: &'conn EntityRegistry,
}

impl<'conn> SqliteCrmStore<'conn> {
    /// Creates a store over a fully migrated connection using the standard
    /// entity registry.
    ///
    /// # Errors
    /// - `RepoError::UninitializedConnection` when the schema version does
    ///   not match the latest migration.
    pub fn new(conn: &'conn mut Connection) -> RepoResult<Self> {
        Self::with_registry(conn, EntityRegistry::standard())
    }

    pub fn with_registry(
        conn: &'conn mut Connection,
        registry: &'conn EntityRegistry,
    ) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn, registry })
    }

    pub fn registry(&self) -> &EntityRegistry {
        self.registry
    }

    pub fn connection(&self) -> &Connection {
        self.conn
    }

    /// Validates and inserts `record`, assigning its organization when it
    /// is derived from a parent.
    pub fn create<T: StoredRecord>(&mut self, record: &mut T) -> RepoResult<EntityId> {
        let started_at = Instant::now();
        let registry = self.registry;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let result = resolve_org(&tx, registry, record)
            .and_then(|org_id| run_checks(&tx, registry, record, org_id))
            .and_then(|org_id| record.insert_row(&tx, org_id));

        match result {
            Ok(()) => {
                tx.commit()?;
                info!(
                    "event=record_create module=repo status=ok kind={} duration_ms={}",
                    T::KIND,
                    started_at.elapsed().as_millis()
                );
                Ok(record.id())
            }
            Err(err) => {
                log_write_failure("record_create", T::KIND, &err);
                Err(err)
            }
        }
    }

    /// Re-validates and rewrites an existing record.
    ///
    /// A record without an organization inherits the persisted one; a
    /// different organization is rejected on `org`.
    pub fn update<T: StoredRecord>(&mut self, record: &mut T) -> RepoResult<()> {
        let started_at = Instant::now();
        let registry = self.registry;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let result = pin_persisted_org(&tx, registry, record)
            .and_then(|org_id| run_checks(&tx, registry, record, org_id))
            .and_then(|_| record.update_row(&tx))
            .and_then(|changed| {
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        kind: T::KIND,
                        id: record.id(),
                    });
                }
                Ok(())
            });

        match result {
            Ok(()) => {
                tx.commit()?;
                info!(
                    "event=record_update module=repo status=ok kind={} duration_ms={}",
                    T::KIND,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                log_write_failure("record_update", T::KIND, &err);
                Err(err)
            }
        }
    }

    /// Loads one record by id.
    pub fn get<T: StoredRecord>(&self, id: EntityId) -> RepoResult<Option<T>> {
        let Some(record) = T::load_row(self.conn, id)? else {
            return Ok(None);
        };
        record.validate().map_err(|err| {
            RepoError::InvalidData(format!("persisted {} {id} fails validation: {err}", T::KIND))
        })?;
        Ok(Some(record))
    }

    /// Like `get`, failing with `NotFound` when the row is absent.
    pub fn get_required<T: StoredRecord>(&self, id: EntityId) -> RepoResult<T> {
        self.get(id)?
            .ok_or(RepoError::NotFound { kind: T::KIND, id })
    }

    /// Fails with `NotFound` unless `(kind, id)` exists inside `org_id`.
    pub(crate) fn ensure_in_org(
        &self,
        kind: EntityKind,
        id: EntityId,
        org_id: OrgId,
    ) -> RepoResult<()> {
        match self.registry.resolve(self.conn, kind, id)? {
            Some(handle) if handle.org_id == Some(org_id) => Ok(()),
            _ => Err(RepoError::NotFound { kind, id }),
        }
    }
}

/// Post-resolution checks shared by create and update. Returns `org_id`.
fn run_checks<T: TenantScoped>(
    conn: &Connection,
    registry: &EntityRegistry,
    record: &T,
    org_id: OrgId,
) -> RepoResult<OrgId> {
    ensure_org_exists(conn, registry, record.kind(), org_id)?;
    record.validate()?;
    // A polymorphic mismatch reports on `org` even when a direct
    // reference would also conflict.
    if let Some((target, policy)) = record.polymorphic_target() {
        validate_reference(conn, registry, record.kind(), target, policy, org_id)?;
    }
    check_tenant_refs(conn, registry, record, org_id)?;
    Ok(org_id)
}

fn pin_persisted_org<T: TenantScoped>(
    conn: &Connection,
    registry: &EntityRegistry,
    record: &mut T,
) -> RepoResult<OrgId> {
    let persisted = registry
        .resolve(conn, record.kind(), record.id())?
        .ok_or(RepoError::NotFound {
            kind: record.kind(),
            id: record.id(),
        })?;
    let Some(persisted_org) = persisted.org_id else {
        return Err(RepoError::InvalidData(format!(
            "persisted {} {} has no organization",
            record.kind(),
            record.id()
        )));
    };

    match record.org_id() {
        Some(org_id) if org_id != persisted_org => Err(ValidationError::new(
            record.kind(),
            "org",
            "organization cannot be changed after creation",
        )
        .into()),
        Some(org_id) => Ok(org_id),
        None => {
            record.set_org_id(persisted_org);
            Ok(persisted_org)
        }
    }
}

fn log_write_failure(event: &str, kind: EntityKind, err: &RepoError) {
    match err {
        RepoError::Validation(validation) => warn!(
            "event={event} module=repo status=rejected kind={kind} field={}",
            validation.field
        ),
        RepoError::NotFound { .. } => {
            warn!("event={event} module=repo status=not_found kind={kind}")
        }
        other => warn!("event={event} module=repo status=error kind={kind} error={other}"),
    }
}
