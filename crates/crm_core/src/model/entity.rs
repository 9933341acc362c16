//! Identity types and the entity-kind discriminator.
//!
//! # Invariants
//! - `EntityKind::as_str` is the persisted discriminator; values never change
//!   once released because polymorphic rows store them.
//! - `EntityKind::parse(kind.as_str()) == Some(kind)` for every kind.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every CRM record.
pub type EntityId = Uuid;

/// Identifier of the owning organization (tenant boundary).
pub type OrgId = Uuid;

/// Concrete record type, used as the discriminator of polymorphic references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Organization,
    User,
    Profile,
    Team,
    Tag,
    Account,
    Contact,
    Lead,
    Opportunity,
    Case,
    Task,
    Board,
    BoardMember,
    BoardColumn,
    BoardTask,
    AccountEmail,
    AccountEmailLog,
    Comment,
    CommentFile,
    Attachment,
    Document,
    Activity,
    SessionToken,
}

impl EntityKind {
    pub const ALL: [EntityKind; 23] = [
        Self::Organization,
        Self::User,
        Self::Profile,
        Self::Team,
        Self::Tag,
        Self::Account,
        Self::Contact,
        Self::Lead,
        Self::Opportunity,
        Self::Case,
        Self::Task,
        Self::Board,
        Self::BoardMember,
        Self::BoardColumn,
        Self::BoardTask,
        Self::AccountEmail,
        Self::AccountEmailLog,
        Self::Comment,
        Self::CommentFile,
        Self::Attachment,
        Self::Document,
        Self::Activity,
        Self::SessionToken,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::User => "user",
            Self::Profile => "profile",
            Self::Team => "team",
            Self::Tag => "tag",
            Self::Account => "account",
            Self::Contact => "contact",
            Self::Lead => "lead",
            Self::Opportunity => "opportunity",
            Self::Case => "case",
            Self::Task => "task",
            Self::Board => "board",
            Self::BoardMember => "board_member",
            Self::BoardColumn => "board_column",
            Self::BoardTask => "board_task",
            Self::AccountEmail => "account_email",
            Self::AccountEmailLog => "account_email_log",
            Self::Comment => "comment",
            Self::CommentFile => "comment_file",
            Self::Attachment => "attachment",
            Self::Document => "document",
            Self::Activity => "activity",
            Self::SessionToken => "session_token",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::EntityKind;

    #[test]
    fn discriminator_text_round_trips_for_every_kind() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn unknown_discriminator_is_rejected() {
        assert_eq!(EntityKind::parse("invoice"), None);
        assert_eq!(EntityKind::parse("Account"), None);
    }

    #[test]
    fn serde_uses_persisted_discriminator() {
        let json = serde_json::to_string(&EntityKind::BoardTask).unwrap();
        assert_eq!(json, "\"board_task\"");
    }
}
