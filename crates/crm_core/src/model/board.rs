//! Kanban boards.
//!
//! Members and columns inherit the board's organization; board tasks
//! inherit it from their column.

use super::entity::{EntityId, EntityKind, OrgId};
use super::require_text;
use crate::tenancy::{ParentLink, TenantScoped, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default column color.
pub const DEFAULT_COLUMN_COLOR: &str = "#6B7280";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub owner_id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub is_archived: bool,
}

impl Board {
    pub fn new(org_id: OrgId, owner_id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: Some(org_id),
            owner_id,
            name: name.into(),
            description: None,
            is_archived: false,
        }
    }
}

impl TenantScoped for Board {
    fn kind(&self) -> EntityKind {
        EntityKind::Board
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
        vec![ParentLink::new(
            "owner",
            EntityKind::Profile,
            Some(self.owner_id),
        )]
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::Board, "name", &self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardRole {
    Owner,
    Admin,
    Member,
}

impl BoardRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "owner" => Some(Self::Owner),
            "admin" => Some(Self::Admin),
            "member" => Some(Self::Member),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardMember {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub board_id: EntityId,
    pub profile_id: EntityId,
    pub role: BoardRole,
}

impl BoardMember {
    /// New member; organization is taken from the board on save.
    pub fn new(board_id: EntityId, profile_id: EntityId) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: None,
            board_id,
            profile_id,
            role: BoardRole::Member,
        }
    }
}

impl TenantScoped for BoardMember {
    fn kind(&self) -> EntityKind {
        EntityKind::BoardMember
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
        vec![ParentLink::new("board", EntityKind::Board, Some(self.board_id))]
    }

    fn tenant_refs(&self) -> Vec<ParentLink> {
        vec![
            ParentLink::new("board", EntityKind::Board, Some(self.board_id)),
            ParentLink::new("profile", EntityKind::Profile, Some(self.profile_id)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardColumn {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub board_id: EntityId,
    pub name: String,
    pub sort_order: i64,
    pub color: String,
    pub wip_limit: Option<i64>,
}

impl BoardColumn {
    pub fn new(board_id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: None,
            board_id,
            name: name.into(),
            sort_order: 0,
            color: DEFAULT_COLUMN_COLOR.to_string(),
            wip_limit: None,
        }
    }
}

impl TenantScoped for BoardColumn {
    fn kind(&self) -> EntityKind {
        EntityKind::BoardColumn
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
        vec![ParentLink::new("board", EntityKind::Board, Some(self.board_id))]
    }

    fn tenant_refs(&self) -> Vec<ParentLink> {
        self.org_parents()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::BoardColumn, "name", &self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

/// Card on a board column. May point at CRM records of the same org.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardTask {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub column_id: EntityId,
    pub title: String,
    pub priority: TaskPriority,
    pub sort_order: i64,
    pub account_id: Option<EntityId>,
    pub contact_id: Option<EntityId>,
    pub opportunity_id: Option<EntityId>,
    pub due_at: Option<i64>,
    pub completed_at: Option<i64>,
}

impl BoardTask {
    pub fn new(column_id: EntityId, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: None,
            column_id,
            title: title.into(),
            priority: TaskPriority::Medium,
            sort_order: 0,
            account_id: None,
            contact_id: None,
            opportunity_id: None,
            due_at: None,
            completed_at: None,
        }
    }
}

impl TenantScoped for BoardTask {
    fn kind(&self) -> EntityKind {
        EntityKind::BoardTask
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
        vec![ParentLink::new(
            "column",
            EntityKind::BoardColumn,
            Some(self.column_id),
        )]
    }

    fn tenant_refs(&self) -> Vec<ParentLink> {
        vec![
            ParentLink::new("column", EntityKind::BoardColumn, Some(self.column_id)),
            ParentLink::new("account", EntityKind::Account, self.account_id),
            ParentLink::new("contact", EntityKind::Contact, self.contact_id),
            ParentLink::new("opportunity", EntityKind::Opportunity, self.opportunity_id),
        ]
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::BoardTask, "title", &self.title)
    }
}
