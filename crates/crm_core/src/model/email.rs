//! Outbound account emails and their per-contact delivery log.

use super::entity::{EntityId, EntityKind, OrgId};
use super::require_text;
use crate::tenancy::{ParentLink, TenantScoped, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Email sent from an account to one or more contacts.
///
/// Without an explicit organization it inherits the sending account's,
/// then the first recipient's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEmail {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub from_account_id: Option<EntityId>,
    pub from_email: String,
    /// Recipient contacts, in send order.
    pub recipients: Vec<EntityId>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub scheduled_at: Option<i64>,
}

impl AccountEmail {
    pub fn new(from_email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: None,
            from_account_id: None,
            from_email: from_email.into(),
            recipients: Vec::new(),
            subject: None,
            body: None,
            scheduled_at: None,
        }
    }
}

impl TenantScoped for AccountEmail {
    fn kind(&self) -> EntityKind {
        EntityKind::AccountEmail
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
        vec![
            ParentLink::new("from_account", EntityKind::Account, self.from_account_id),
            ParentLink::new(
                "recipients",
                EntityKind::Contact,
                self.recipients.first().copied(),
            ),
        ]
    }

    fn tenant_refs(&self) -> Vec<ParentLink> {
        let mut refs = vec![ParentLink::new(
            "from_account",
            EntityKind::Account,
            self.from_account_id,
        )];
        refs.extend(
            self.recipients
                .iter()
                .map(|contact_id| ParentLink::new("recipients", EntityKind::Contact, Some(*contact_id))),
        );
        refs
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::AccountEmail, "from_email", &self.from_email)
    }
}

/// Delivery record of one email to one contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEmailLog {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub email_id: Option<EntityId>,
    pub contact_id: Option<EntityId>,
    pub is_sent: bool,
}

impl AccountEmailLog {
    pub fn new(email_id: EntityId, contact_id: EntityId) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: None,
            email_id: Some(email_id),
            contact_id: Some(contact_id),
            is_sent: false,
        }
    }
}

impl TenantScoped for AccountEmailLog {
    fn kind(&self) -> EntityKind {
        EntityKind::AccountEmailLog
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
        vec![
            ParentLink::new("email", EntityKind::AccountEmail, self.email_id),
            ParentLink::new("contact", EntityKind::Contact, self.contact_id),
        ]
    }

    fn tenant_refs(&self) -> Vec<ParentLink> {
        self.org_parents()
    }
}

#[cfg(test)]
mod tests {
    use super::AccountEmail;
    use crate::model::entity::EntityKind;
    use crate::tenancy::TenantScoped;
    use uuid::Uuid;

    #[test]
    fn parents_fall_back_to_first_recipient() {
        let first = Uuid::new_v4();
        let mut email = AccountEmail::new("sales@example.com");
        email.recipients = vec![first, Uuid::new_v4()];

        let parents = email.org_parents();
        assert_eq!(parents[0].kind, EntityKind::Account);
        assert_eq!(parents[0].id, None);
        assert_eq!(parents[1].id, Some(first));
    }

    #[test]
    fn every_recipient_is_a_tenant_ref() {
        let mut email = AccountEmail::new("sales@example.com");
        email.recipients = vec![Uuid::new_v4(), Uuid::new_v4()];
        let recipient_refs = email
            .tenant_refs()
            .into_iter()
            .filter(|link| link.field == "recipients")
            .count();
        assert_eq!(recipient_refs, 2);
    }
}
