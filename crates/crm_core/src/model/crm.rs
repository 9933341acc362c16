//! Sales records: accounts, contacts, leads, opportunities, cases, tasks.
//!
//! All of these carry an explicit organization; their direct references
//! (primary account, task parents) must share it.

use super::entity::{EntityId, EntityKind, OrgId};
use super::require_text;
use crate::tenancy::{ParentLink, TenantScoped, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub name: String,
    pub email: Option<String>,
    pub industry: Option<String>,
    pub is_active: bool,
}

impl Account {
    pub fn new(org_id: OrgId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: Some(org_id),
            name: name.into(),
            email: None,
            industry: None,
            is_active: true,
        }
    }
}

impl TenantScoped for Account {
    fn kind(&self) -> EntityKind {
        EntityKind::Account
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
        require_text(EntityKind::Account, "name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    /// Primary account; contacts may also stand alone.
    pub account_id: Option<EntityId>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub is_active: bool,
}

impl Contact {
    pub fn new(org_id: OrgId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: Some(org_id),
            account_id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            is_active: true,
        }
    }
}

impl TenantScoped for Contact {
    fn kind(&self) -> EntityKind {
        EntityKind::Contact
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
            "account",
            EntityKind::Account,
            self.account_id,
        )]
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::Contact, "first_name", &self.first_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
    pub is_active: bool,
}

impl Lead {
    pub fn new(org_id: OrgId, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: Some(org_id),
            title: Some(title.into()),
            first_name: None,
            last_name: None,
            email: None,
            status: None,
            is_active: true,
        }
    }
}

impl TenantScoped for Lead {
    fn kind(&self) -> EntityKind {
        EntityKind::Lead
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
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub account_id: Option<EntityId>,
    pub name: String,
    pub stage: String,
    pub probability: Option<i64>,
    pub is_active: bool,
}

impl Opportunity {
    pub fn new(org_id: OrgId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: Some(org_id),
            account_id: None,
            name: name.into(),
            stage: "PROSPECTING".to_string(),
            probability: None,
            is_active: true,
        }
    }
}

impl TenantScoped for Opportunity {
    fn kind(&self) -> EntityKind {
        EntityKind::Opportunity
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
            "account",
            EntityKind::Account,
            self.account_id,
        )]
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::Opportunity, "name", &self.name)
    }
}

/// Support case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub account_id: Option<EntityId>,
    pub name: String,
    pub status: String,
    pub priority: String,
    pub is_active: bool,
}

impl Case {
    pub fn new(org_id: OrgId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: Some(org_id),
            account_id: None,
            name: name.into(),
            status: "New".to_string(),
            priority: "Normal".to_string(),
            is_active: true,
        }
    }
}

impl TenantScoped for Case {
    fn kind(&self) -> EntityKind {
        EntityKind::Case
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
            "account",
            EntityKind::Account,
            self.account_id,
        )]
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::Case, "name", &self.name)
    }
}

/// Follow-up task linked to at most one sales record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub title: String,
    pub status: String,
    pub priority: String,
    pub account_id: Option<EntityId>,
    pub opportunity_id: Option<EntityId>,
    pub case_id: Option<EntityId>,
    pub lead_id: Option<EntityId>,
}

impl Task {
    pub fn new(org_id: OrgId, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: Some(org_id),
            title: title.into(),
            status: "New".to_string(),
            priority: "Medium".to_string(),
            account_id: None,
            opportunity_id: None,
            case_id: None,
            lead_id: None,
        }
    }

    fn parent_links(&self) -> [ParentLink; 4] {
        [
            ParentLink::new("account", EntityKind::Account, self.account_id),
            ParentLink::new("opportunity", EntityKind::Opportunity, self.opportunity_id),
            ParentLink::new("case", EntityKind::Case, self.case_id),
            ParentLink::new("lead", EntityKind::Lead, self.lead_id),
        ]
    }
}

impl TenantScoped for Task {
    fn kind(&self) -> EntityKind {
        EntityKind::Task
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
        self.parent_links().to_vec()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::Task, "title", &self.title)?;

        let linked: Vec<&str> = self
            .parent_links()
            .iter()
            .filter(|link| link.id.is_some())
            .map(|link| link.field)
            .collect();
        if linked.len() > 1 {
            return Err(ValidationError::new(
                EntityKind::Task,
                "account",
                format!(
                    "a task can only be linked to one parent entity; currently linked to: {}",
                    linked.join(", ")
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Task;
    use crate::tenancy::TenantScoped;
    use uuid::Uuid;

    #[test]
    fn task_with_two_parents_is_rejected_on_account() {
        let mut task = Task::new(Uuid::new_v4(), "call back");
        task.account_id = Some(Uuid::new_v4());
        task.lead_id = Some(Uuid::new_v4());

        let err = task.validate().unwrap_err();
        assert_eq!(err.field, "account");
        assert!(err.message.contains("account, lead"));
    }

    #[test]
    fn task_with_single_parent_is_valid() {
        let mut task = Task::new(Uuid::new_v4(), "renewal");
        task.case_id = Some(Uuid::new_v4());
        assert!(task.validate().is_ok());
    }
}
