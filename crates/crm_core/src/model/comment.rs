//! Comments on arbitrary records and their file uploads.

use super::entity::{EntityId, EntityKind, OrgId};
use super::{require_max_chars, require_text};
use crate::tenancy::{ParentLink, PolymorphicRef, TargetPolicy, TenantScoped, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum comment body length, in characters.
pub const COMMENT_BODY_MAX_CHARS: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub target: PolymorphicRef,
    pub body: String,
    /// Authoring profile.
    pub commented_by: Option<EntityId>,
}

impl Comment {
    /// New comment whose organization is taken from its author on save.
    pub fn new(target: PolymorphicRef, commented_by: EntityId, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: None,
            target,
            body: body.into(),
            commented_by: Some(commented_by),
        }
    }
}

impl TenantScoped for Comment {
    fn kind(&self) -> EntityKind {
        EntityKind::Comment
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
            "commented_by",
            EntityKind::Profile,
            self.commented_by,
        )]
    }

    fn tenant_refs(&self) -> Vec<ParentLink> {
        self.org_parents()
    }

    fn polymorphic_target(&self) -> Option<(PolymorphicRef, TargetPolicy)> {
        Some((self.target, TargetPolicy::MustExist))
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::Comment, "body", &self.body)?;
        require_max_chars(EntityKind::Comment, "body", &self.body, COMMENT_BODY_MAX_CHARS)
    }
}

/// File uploaded alongside a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentFile {
    pub id: EntityId,
    pub org_id: Option<OrgId>,
    pub comment_id: EntityId,
    pub file_path: String,
}

impl CommentFile {
    pub fn new(comment_id: EntityId, file_path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id: None,
            comment_id,
            file_path: file_path.into(),
        }
    }
}

impl TenantScoped for CommentFile {
    fn kind(&self) -> EntityKind {
        EntityKind::CommentFile
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
            "comment",
            EntityKind::Comment,
            Some(self.comment_id),
        )]
    }

    fn tenant_refs(&self) -> Vec<ParentLink> {
        self.org_parents()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::CommentFile, "file_path", &self.file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::{Comment, COMMENT_BODY_MAX_CHARS};
    use crate::model::entity::EntityKind;
    use crate::tenancy::{PolymorphicRef, TenantScoped};
    use uuid::Uuid;

    fn comment(body: String) -> Comment {
        Comment::new(
            PolymorphicRef::new(EntityKind::Contact, Uuid::new_v4()),
            Uuid::new_v4(),
            body,
        )
    }

    #[test]
    fn body_length_is_counted_in_chars() {
        assert!(comment("é".repeat(COMMENT_BODY_MAX_CHARS)).validate().is_ok());

        let err = comment("x".repeat(COMMENT_BODY_MAX_CHARS + 1))
            .validate()
            .unwrap_err();
        assert_eq!(err.field, "body");
    }

    #[test]
    fn blank_body_is_rejected() {
        assert_eq!(comment("  ".to_string()).validate().unwrap_err().field, "body");
    }
}
