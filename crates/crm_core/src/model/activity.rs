//! Audit trail entries and session tokens.
//!
//! Both inherit the organization of the acting profile when none is given.

use super::entity::{EntityId, EntityKind, OrgId};
use super::require_text;
use crate::tenancy::{ParentLink, PolymorphicRef, TargetPolicy, TenantScoped, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Create,
    Update,
    Delete,
    View,
    Comment,
    Assign,
}

impl ActivityAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::View => "view",
            Self::Comment => "comment",
            Self::Assign => "assign",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            "view" => Some(Self::View),
            "comment" => Some(Self::Comment),
            "assign" => Some(Self::Assign),
            _ => None,
        }
    }
}

/// One audit entry. The target may already be deleted when the entry is
/// written, so a missing target is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub profile_id: Option<EntityId>,
    pub action: ActivityAction,
    pub target: PolymorphicRef,
    /// Display name of the target, captured at write time.
    pub entity_name: String,
    pub description: String,
}

impl Activity {
    pub fn new(profile_id: EntityId, action: ActivityAction, target: PolymorphicRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: None,
            profile_id: Some(profile_id),
            action,
            target,
            entity_name: String::new(),
            description: String::new(),
        }
    }
}

impl TenantScoped for Activity {
    fn kind(&self) -> EntityKind {
        EntityKind::Activity
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

    fn org_parents(&self) -> Vec<ParentLink> {
        vec![ParentLink::new("profile", EntityKind::Profile, self.profile_id)]
    }

    fn tenant_refs(&self) -> Vec<ParentLink> {
        self.org_parents()
    }

    fn polymorphic_target(&self) -> Option<(PolymorphicRef, TargetPolicy)> {
        Some((self.target, TargetPolicy::IfExists))
    }
}

/// Issued JWT pair, tracked so it can be revoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub user_id: EntityId,
    pub profile_id: Option<EntityId>,
    pub token_jti: String,
    pub refresh_token_jti: Option<String>,
    /// Epoch milliseconds.
    pub expires_at: i64,
    pub is_active: bool,
    pub revoked_at: Option<i64>,
}

impl SessionToken {
    pub fn new(
        user_id: EntityId,
        profile_id: EntityId,
        token_jti: impl Into<String>,
        expires_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: None,
            user_id,
            profile_id: Some(profile_id),
            token_jti: token_jti.into(),
            refresh_token_jti: None,
            expires_at,
            is_active: true,
            revoked_at: None,
        }
    }

    /// Usable when active and not yet expired at `now_ms`.
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        self.is_active && self.revoked_at.is_none() && self.expires_at > now_ms
    }
}

impl TenantScoped for SessionToken {
    fn kind(&self) -> EntityKind {
        EntityKind::SessionToken
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

    fn org_parents(&self) -> Vec<ParentLink> {
        vec![ParentLink::new("profile", EntityKind::Profile, self.profile_id)]
    }

    fn tenant_refs(&self) -> Vec<ParentLink> {
        vec![
            ParentLink::new("user", EntityKind::User, Some(self.user_id)),
            ParentLink::new("profile", EntityKind::Profile, self.profile_id),
        ]
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::SessionToken, "token_jti", &self.token_jti)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionToken;
    use uuid::Uuid;

    #[test]
    fn token_expires_strictly_after_deadline() {
        let token = SessionToken::new(Uuid::new_v4(), Uuid::new_v4(), "jti-1", 1_000);
        assert!(token.is_valid_at(999));
        assert!(!token.is_valid_at(1_000));
    }
}
