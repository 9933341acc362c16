//! Tenant boundary and membership records.
//!
//! `Organization` and `User` sit outside tenancy; `Profile`, `Team` and `Tag`
//! belong to exactly one organization.

use super::entity::{EntityId, EntityKind, OrgId};
use super::require_text;
use crate::tenancy::{ParentLink, TenantScoped, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default currency assigned to new organizations.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Tenant boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrgId,
    pub name: Option<String>,
    /// Unique per organization, generated at creation.
    pub api_key: String,
    pub is_active: bool,
    pub default_currency: String,
    pub default_country: Option<String>,
}

impl Organization {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: Some(name.into()),
            api_key: Uuid::new_v4().to_string(),
            is_active: true,
            default_currency: DEFAULT_CURRENCY.to_string(),
            default_country: None,
        }
    }
}

/// Login identity. Shared across organizations through profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub email: String,
    pub is_active: bool,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    Admin,
    User,
}

impl ProfileRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

/// Membership of a user in one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub user_id: EntityId,
    pub role: ProfileRole,
    pub phone: Option<String>,
    pub is_active: bool,
    pub is_organization_admin: bool,
}

impl Profile {
    pub fn new(org_id: OrgId, user_id: EntityId) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: Some(org_id),
            user_id,
            role: ProfileRole::User,
            phone: None,
            is_active: true,
            is_organization_admin: false,
        }
    }
}

impl TenantScoped for Profile {
    fn kind(&self) -> EntityKind {
        EntityKind::Profile
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn org_id(&self) -> Option<OrgId> {
        self.org_id
    }

    fn set_org_id(&mut self, org_id: OrgId) {
        self.org_id = Some(org_id);
    }

    fn tenant_refs(&self) -> Vec<ParentLink> {
        vec![ParentLink::new("user", EntityKind::User, Some(self.user_id))]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub name: String,
    pub description: String,
}

impl Team {
    pub fn new(org_id: OrgId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: Some(org_id),
            name: name.into(),
            description: String::new(),
        }
    }
}

impl TenantScoped for Team {
    fn kind(&self) -> EntityKind {
        EntityKind::Team
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn org_id(&self) -> Option<OrgId> {
        self.org_id
    }

    fn set_org_id(&mut self, org_id: OrgId) {
        self.org_id = Some(org_id);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::Team, "name", &self.name)
    }
}

/// Free-form label, unique per `(org, slug)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: EntityId,
    pub org_id: OrgId,
    /// Display name, as first written.
    pub name: String,
    /// Normalized lookup key.
    pub slug: String,
    pub created_at: i64,
}
