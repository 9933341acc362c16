//! Attachments on arbitrary records, and standalone documents.

use super::entity::{EntityId, EntityKind, OrgId};
use super::file_category::FileCategory;
use super::{require_max_chars, require_text};
use crate::tenancy::{ParentLink, PolymorphicRef, TargetPolicy, TenantScoped, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum stored file name length, in characters.
pub const ATTACHMENT_FILE_NAME_MAX_CHARS: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub target: PolymorphicRef,
    pub file_name: String,
    pub file_path: String,
    /// Uploading user.
    pub created_by: Option<EntityId>,
}

impl Attachment {
    pub fn new(
        org_id: OrgId,
        target: PolymorphicRef,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: Some(org_id),
            target,
            file_name: file_name.into(),
            file_path: file_path.into(),
            created_by: None,
        }
    }

    pub fn file_category(&self) -> FileCategory {
        FileCategory::from_file_name(&self.file_path)
    }
}

impl TenantScoped for Attachment {
    fn kind(&self) -> EntityKind {
        EntityKind::Attachment
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
        vec![ParentLink::new("created_by", EntityKind::User, self.created_by)]
    }

    fn polymorphic_target(&self) -> Option<(PolymorphicRef, TargetPolicy)> {
        Some((self.target, TargetPolicy::MustExist))
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::Attachment, "file_name", &self.file_name)?;
        require_max_chars(
            EntityKind::Attachment,
            "file_name",
            &self.file_name,
            ATTACHMENT_FILE_NAME_MAX_CHARS,
        )?;
        require_text(EntityKind::Attachment, "file_path", &self.file_path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Active,
    Inactive,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Uploaded document, shared with profiles and teams through link tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub title: String,
    pub file_path: String,
    pub status: DocumentStatus,
}

impl Document {
    pub fn new(org_id: OrgId, title: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: Some(org_id),
            title: title.into(),
            file_path: file_path.into(),
            status: DocumentStatus::Active,
        }
    }

    pub fn file_category(&self) -> FileCategory {
        FileCategory::from_file_name(&self.file_path)
    }
}

impl TenantScoped for Document {
    fn kind(&self) -> EntityKind {
        EntityKind::Document
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
        require_text(EntityKind::Document, "title", &self.title)?;
        require_text(EntityKind::Document, "file_path", &self.file_path)
    }
}
