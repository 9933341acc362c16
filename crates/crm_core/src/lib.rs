//! Multi-tenant CRM consistency core.
//!
//! Every tenant-scoped write goes through `SqliteCrmStore`, which resolves
//! the owning organization, rejects cross-tenant references and persists the
//! record inside a single transaction.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod tenancy;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, open_db_with_config, DbError, DbResult};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::entity::{EntityId, EntityKind, OrgId};
pub use repo::{RepoError, RepoResult, SqliteCrmStore, StoredRecord, TargetFilter};
pub use service::crm_service::CrmService;
pub use tenancy::input::ListInput;
pub use tenancy::registry::{EntityDescriptor, EntityRegistry, TargetHandle};
pub use tenancy::{PolymorphicRef, TargetPolicy, TenantScoped, ValidationError};

/// Minimal health-check API for embedding services.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
