//! `StoredRecord` row mappings for every tenant-scoped record.
//!
//! Mappers translate rows only. Tenancy checks run in the store before any
//! of these functions are reached.

use super::error::RepoResult;
use super::row::{
    bool_column, bool_to_int, enum_column, kind_column, opt_uuid_column, opt_uuid_text,
    uuid_column,
};
use super::store::StoredRecord;
use crate::model::activity::{Activity, ActivityAction, SessionToken};
use crate::model::attachment::{Attachment, Document, DocumentStatus};
use crate::model::board::{Board, BoardColumn, BoardMember, BoardRole, BoardTask, TaskPriority};
use crate::model::comment::{Comment, CommentFile};
use crate::model::crm::{Account, Case, Contact, Lead, Opportunity, Task};
use crate::model::email::{AccountEmail, AccountEmailLog};
use crate::model::entity::{EntityId, EntityKind, OrgId};
use crate::model::org::{Profile, ProfileRole, Team};
use crate::tenancy::PolymorphicRef;
use rusqlite::{params, Connection, Row};

pub(crate) const COMMENT_SELECT_SQL: &str = "SELECT
    id, org_id, target_kind, target_id, body, commented_by
FROM comments";

pub(crate) const ATTACHMENT_SELECT_SQL: &str = "SELECT
    id, org_id, target_kind, target_id, file_name, file_path, created_by
FROM attachments";

pub(crate) const ACTIVITY_SELECT_SQL: &str = "SELECT
    id, org_id, profile_id, action, target_kind, target_id, entity_name, description
FROM activities";

/// Runs a single-row query bound to `id`.
pub(crate) fn load_by_id<T>(
    conn: &Connection,
    sql: &str,
    id: EntityId,
    map: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(map(row)?));
    }
    Ok(None)
}

fn org_column(row: &Row<'_>) -> RepoResult<Option<OrgId>> {
    Ok(Some(uuid_column(row, "org_id")?))
}

fn target_columns(row: &Row<'_>) -> RepoResult<PolymorphicRef> {
    Ok(PolymorphicRef::new(
        kind_column(row, "target_kind")?,
        uuid_column(row, "target_id")?,
    ))
}

impl StoredRecord for Profile {
    const KIND: EntityKind = EntityKind::Profile;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO profiles (
                id, org_id, user_id, role, phone, is_active, is_organization_admin
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                self.user_id.to_string(),
                self.role.as_str(),
                self.phone.as_deref(),
                bool_to_int(self.is_active),
                bool_to_int(self.is_organization_admin),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE profiles
             SET
                user_id = ?2,
                role = ?3,
                phone = ?4,
                is_active = ?5,
                is_organization_admin = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                self.user_id.to_string(),
                self.role.as_str(),
                self.phone.as_deref(),
                bool_to_int(self.is_active),
                bool_to_int(self.is_organization_admin),
            ],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            "SELECT id, org_id, user_id, role, phone, is_active, is_organization_admin
             FROM profiles WHERE id = ?1;",
            id,
            |row| {
                Ok(Profile {
                    id: uuid_column(row, "id")?,
                    org_id: org_column(row)?,
                    user_id: uuid_column(row, "user_id")?,
                    role: enum_column(row, "role", ProfileRole::parse)?,
                    phone: row.get("phone")?,
                    is_active: bool_column(row, "is_active")?,
                    is_organization_admin: bool_column(row, "is_organization_admin")?,
                })
            },
        )
    }
}

impl StoredRecord for Team {
    const KIND: EntityKind = EntityKind::Team;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO teams (id, org_id, name, description) VALUES (?1, ?2, ?3, ?4);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                self.name.as_str(),
                self.description.as_str(),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE teams
             SET name = ?2, description = ?3, updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                self.name.as_str(),
                self.description.as_str()
            ],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            "SELECT id, org_id, name, description FROM teams WHERE id = ?1;",
            id,
            |row| {
                Ok(Team {
                    id: uuid_column(row, "id")?,
                    org_id: org_column(row)?,
                    name: row.get("name")?,
                    description: row.get("description")?,
                })
            },
        )
    }
}

impl StoredRecord for Account {
    const KIND: EntityKind = EntityKind::Account;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO accounts (id, org_id, name, email, industry, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                self.name.as_str(),
                self.email.as_deref(),
                self.industry.as_deref(),
                bool_to_int(self.is_active),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE accounts
             SET
                name = ?2,
                email = ?3,
                industry = ?4,
                is_active = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                self.name.as_str(),
                self.email.as_deref(),
                self.industry.as_deref(),
                bool_to_int(self.is_active),
            ],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            "SELECT id, org_id, name, email, industry, is_active FROM accounts WHERE id = ?1;",
            id,
            |row| {
                Ok(Account {
                    id: uuid_column(row, "id")?,
                    org_id: org_column(row)?,
                    name: row.get("name")?,
                    email: row.get("email")?,
                    industry: row.get("industry")?,
                    is_active: bool_column(row, "is_active")?,
                })
            },
        )
    }
}

impl StoredRecord for Contact {
    const KIND: EntityKind = EntityKind::Contact;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO contacts (
                id, org_id, account_id, first_name, last_name, email, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                opt_uuid_text(self.account_id),
                self.first_name.as_str(),
                self.last_name.as_str(),
                self.email.as_deref(),
                bool_to_int(self.is_active),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE contacts
             SET
                account_id = ?2,
                first_name = ?3,
                last_name = ?4,
                email = ?5,
                is_active = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                opt_uuid_text(self.account_id),
                self.first_name.as_str(),
                self.last_name.as_str(),
                self.email.as_deref(),
                bool_to_int(self.is_active),
            ],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            "SELECT id, org_id, account_id, first_name, last_name, email, is_active
             FROM contacts WHERE id = ?1;",
            id,
            |row| {
                Ok(Contact {
                    id: uuid_column(row, "id")?,
                    org_id: org_column(row)?,
                    account_id: opt_uuid_column(row, "account_id")?,
                    first_name: row.get("first_name")?,
                    last_name: row.get("last_name")?,
                    email: row.get("email")?,
                    is_active: bool_column(row, "is_active")?,
                })
            },
        )
    }
}

impl StoredRecord for Lead {
    const KIND: EntityKind = EntityKind::Lead;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO leads (
                id, org_id, title, first_name, last_name, email, status, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                self.title.as_deref(),
                self.first_name.as_deref(),
                self.last_name.as_deref(),
                self.email.as_deref(),
                self.status.as_deref(),
                bool_to_int(self.is_active),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE leads
             SET
                title = ?2,
                first_name = ?3,
                last_name = ?4,
                email = ?5,
                status = ?6,
                is_active = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                self.title.as_deref(),
                self.first_name.as_deref(),
                self.last_name.as_deref(),
                self.email.as_deref(),
                self.status.as_deref(),
                bool_to_int(self.is_active),
            ],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            "SELECT id, org_id, title, first_name, last_name, email, status, is_active
             FROM leads WHERE id = ?1;",
            id,
            |row| {
                Ok(Lead {
                    id: uuid_column(row, "id")?,
                    org_id: org_column(row)?,
                    title: row.get("title")?,
                    first_name: row.get("first_name")?,
                    last_name: row.get("last_name")?,
                    email: row.get("email")?,
                    status: row.get("status")?,
                    is_active: bool_column(row, "is_active")?,
                })
            },
        )
    }
}

impl StoredRecord for Opportunity {
    const KIND: EntityKind = EntityKind::Opportunity;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO opportunities (
                id, org_id, account_id, name, stage, probability, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                opt_uuid_text(self.account_id),
                self.name.as_str(),
                self.stage.as_str(),
                self.probability,
                bool_to_int(self.is_active),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE opportunities
             SET
                account_id = ?2,
                name = ?3,
                stage = ?4,
                probability = ?5,
                is_active = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                opt_uuid_text(self.account_id),
                self.name.as_str(),
                self.stage.as_str(),
                self.probability,
                bool_to_int(self.is_active),
            ],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            "SELECT id, org_id, account_id, name, stage, probability, is_active
             FROM opportunities WHERE id = ?1;",
            id,
            |row| {
                Ok(Opportunity {
                    id: uuid_column(row, "id")?,
                    org_id: org_column(row)?,
                    account_id: opt_uuid_column(row, "account_id")?,
                    name: row.get("name")?,
                    stage: row.get("stage")?,
                    probability: row.get("probability")?,
                    is_active: bool_column(row, "is_active")?,
                })
            },
        )
    }
}

impl StoredRecord for Case {
    const KIND: EntityKind = EntityKind::Case;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO cases (id, org_id, account_id, name, status, priority, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                opt_uuid_text(self.account_id),
                self.name.as_str(),
                self.status.as_str(),
                self.priority.as_str(),
                bool_to_int(self.is_active),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE cases
             SET
                account_id = ?2,
                name = ?3,
                status = ?4,
                priority = ?5,
                is_active = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                opt_uuid_text(self.account_id),
                self.name.as_str(),
                self.status.as_str(),
                self.priority.as_str(),
                bool_to_int(self.is_active),
            ],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            "SELECT id, org_id, account_id, name, status, priority, is_active
             FROM cases WHERE id = ?1;",
            id,
            |row| {
                Ok(Case {
                    id: uuid_column(row, "id")?,
                    org_id: org_column(row)?,
                    account_id: opt_uuid_column(row, "account_id")?,
                    name: row.get("name")?,
                    status: row.get("status")?,
                    priority: row.get("priority")?,
                    is_active: bool_column(row, "is_active")?,
                })
            },
        )
    }
}

impl StoredRecord for Task {
    const KIND: EntityKind = EntityKind::Task;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO tasks (
                id, org_id, title, status, priority,
                account_id, opportunity_id, case_id, lead_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                self.title.as_str(),
                self.status.as_str(),
                self.priority.as_str(),
                opt_uuid_text(self.account_id),
                opt_uuid_text(self.opportunity_id),
                opt_uuid_text(self.case_id),
                opt_uuid_text(self.lead_id),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE tasks
             SET
                title = ?2,
                status = ?3,
                priority = ?4,
                account_id = ?5,
                opportunity_id = ?6,
                case_id = ?7,
                lead_id = ?8,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                self.title.as_str(),
                self.status.as_str(),
                self.priority.as_str(),
                opt_uuid_text(self.account_id),
                opt_uuid_text(self.opportunity_id),
                opt_uuid_text(self.case_id),
                opt_uuid_text(self.lead_id),
            ],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            "SELECT id, org_id, title, status, priority,
                    account_id, opportunity_id, case_id, lead_id
             FROM tasks WHERE id = ?1;",
            id,
            |row| {
                Ok(Task {
                    id: uuid_column(row, "id")?,
                    org_id: org_column(row)?,
                    title: row.get("title")?,
                    status: row.get("status")?,
                    priority: row.get("priority")?,
                    account_id: opt_uuid_column(row, "account_id")?,
                    opportunity_id: opt_uuid_column(row, "opportunity_id")?,
                    case_id: opt_uuid_column(row, "case_id")?,
                    lead_id: opt_uuid_column(row, "lead_id")?,
                })
            },
        )
    }
}

impl StoredRecord for Board {
    const KIND: EntityKind = EntityKind::Board;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO boards (id, org_id, owner_id, name, description, is_archived)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                self.owner_id.to_string(),
                self.name.as_str(),
                self.description.as_deref(),
                bool_to_int(self.is_archived),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE boards
             SET
                owner_id = ?2,
                name = ?3,
                description = ?4,
                is_archived = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                self.owner_id.to_string(),
                self.name.as_str(),
                self.description.as_deref(),
                bool_to_int(self.is_archived),
            ],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            "SELECT id, org_id, owner_id, name, description, is_archived
             FROM boards WHERE id = ?1;",
            id,
            |row| {
                Ok(Board {
                    id: uuid_column(row, "id")?,
                    org_id: org_column(row)?,
                    owner_id: uuid_column(row, "owner_id")?,
                    name: row.get("name")?,
                    description: row.get("description")?,
                    is_archived: bool_column(row, "is_archived")?,
                })
            },
        )
    }
}

impl StoredRecord for BoardMember {
    const KIND: EntityKind = EntityKind::BoardMember;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO board_members (id, org_id, board_id, profile_id, role)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                self.board_id.to_string(),
                self.profile_id.to_string(),
                self.role.as_str(),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE board_members
             SET role = ?2, updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![self.id.to_string(), self.role.as_str()],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            "SELECT id, org_id, board_id, profile_id, role FROM board_members WHERE id = ?1;",
            id,
            |row| {
                Ok(BoardMember {
                    id: uuid_column(row, "id")?,
                    org_id: org_column(row)?,
                    board_id: uuid_column(row, "board_id")?,
                    profile_id: uuid_column(row, "profile_id")?,
                    role: enum_column(row, "role", BoardRole::parse)?,
                })
            },
        )
    }
}

impl StoredRecord for BoardColumn {
    const KIND: EntityKind = EntityKind::BoardColumn;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO board_columns (id, org_id, board_id, name, sort_order, color, wip_limit)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                self.board_id.to_string(),
                self.name.as_str(),
                self.sort_order,
                self.color.as_str(),
                self.wip_limit,
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE board_columns
             SET
                name = ?2,
                sort_order = ?3,
                color = ?4,
                wip_limit = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                self.name.as_str(),
                self.sort_order,
                self.color.as_str(),
                self.wip_limit,
            ],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            "SELECT id, org_id, board_id, name, sort_order, color, wip_limit
             FROM board_columns WHERE id = ?1;",
            id,
            |row| {
                Ok(BoardColumn {
                    id: uuid_column(row, "id")?,
                    org_id: org_column(row)?,
                    board_id: uuid_column(row, "board_id")?,
                    name: row.get("name")?,
                    sort_order: row.get("sort_order")?,
                    color: row.get("color")?,
                    wip_limit: row.get("wip_limit")?,
                })
            },
        )
    }
}

impl StoredRecord for BoardTask {
    const KIND: EntityKind = EntityKind::BoardTask;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO board_tasks (
                id, org_id, column_id, title, priority, sort_order,
                account_id, contact_id, opportunity_id, due_at, completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                self.column_id.to_string(),
                self.title.as_str(),
                self.priority.as_str(),
                self.sort_order,
                opt_uuid_text(self.account_id),
                opt_uuid_text(self.contact_id),
                opt_uuid_text(self.opportunity_id),
                self.due_at,
                self.completed_at,
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE board_tasks
             SET
                column_id = ?2,
                title = ?3,
                priority = ?4,
                sort_order = ?5,
                account_id = ?6,
                contact_id = ?7,
                opportunity_id = ?8,
                due_at = ?9,
                completed_at = ?10,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                self.column_id.to_string(),
                self.title.as_str(),
                self.priority.as_str(),
                self.sort_order,
                opt_uuid_text(self.account_id),
                opt_uuid_text(self.contact_id),
                opt_uuid_text(self.opportunity_id),
                self.due_at,
                self.completed_at,
            ],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            "SELECT id, org_id, column_id, title, priority, sort_order,
                    account_id, contact_id, opportunity_id, due_at, completed_at
             FROM board_tasks WHERE id = ?1;",
            id,
            |row| {
                Ok(BoardTask {
                    id: uuid_column(row, "id")?,
                    org_id: org_column(row)?,
                    column_id: uuid_column(row, "column_id")?,
                    title: row.get("title")?,
                    priority: enum_column(row, "priority", TaskPriority::parse)?,
                    sort_order: row.get("sort_order")?,
                    account_id: opt_uuid_column(row, "account_id")?,
                    contact_id: opt_uuid_column(row, "contact_id")?,
                    opportunity_id: opt_uuid_column(row, "opportunity_id")?,
                    due_at: row.get("due_at")?,
                    completed_at: row.get("completed_at")?,
                })
            },
        )
    }
}

impl StoredRecord for AccountEmail {
    const KIND: EntityKind = EntityKind::AccountEmail;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO account_emails (
                id, org_id, from_account_id, from_email, subject, body, scheduled_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                opt_uuid_text(self.from_account_id),
                self.from_email.as_str(),
                self.subject.as_deref(),
                self.body.as_deref(),
                self.scheduled_at,
            ],
        )?;
        write_recipients(conn, self)
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        let changed = conn.execute(
            "UPDATE account_emails
             SET
                from_account_id = ?2,
                from_email = ?3,
                subject = ?4,
                body = ?5,
                scheduled_at = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                opt_uuid_text(self.from_account_id),
                self.from_email.as_str(),
                self.subject.as_deref(),
                self.body.as_deref(),
                self.scheduled_at,
            ],
        )?;
        if changed > 0 {
            conn.execute(
                "DELETE FROM account_email_recipients WHERE email_id = ?1;",
                [self.id.to_string()],
            )?;
            write_recipients(conn, self)?;
        }
        Ok(changed)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        let Some(mut email) = load_by_id(
            conn,
            "SELECT id, org_id, from_account_id, from_email, subject, body, scheduled_at
             FROM account_emails WHERE id = ?1;",
            id,
            |row| {
                Ok(AccountEmail {
                    id: uuid_column(row, "id")?,
                    org_id: org_column(row)?,
                    from_account_id: opt_uuid_column(row, "from_account_id")?,
                    from_email: row.get("from_email")?,
                    recipients: Vec::new(),
                    subject: row.get("subject")?,
                    body: row.get("body")?,
                    scheduled_at: row.get("scheduled_at")?,
                })
            },
        )?
        else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT contact_id FROM account_email_recipients
             WHERE email_id = ?1
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        while let Some(row) = rows.next()? {
            email.recipients.push(uuid_column(row, "contact_id")?);
        }
        Ok(Some(email))
    }
}

fn write_recipients(conn: &Connection, email: &AccountEmail) -> RepoResult<()> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO account_email_recipients (email_id, contact_id, position)
         VALUES (?1, ?2, ?3);",
    )?;
    for (position, contact_id) in email.recipients.iter().enumerate() {
        stmt.execute(params![
            email.id.to_string(),
            contact_id.to_string(),
            position as i64,
        ])?;
    }
    Ok(())
}

impl StoredRecord for AccountEmailLog {
    const KIND: EntityKind = EntityKind::AccountEmailLog;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO account_email_logs (id, org_id, email_id, contact_id, is_sent)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                opt_uuid_text(self.email_id),
                opt_uuid_text(self.contact_id),
                bool_to_int(self.is_sent),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE account_email_logs
             SET
                email_id = ?2,
                contact_id = ?3,
                is_sent = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                opt_uuid_text(self.email_id),
                opt_uuid_text(self.contact_id),
                bool_to_int(self.is_sent),
            ],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            "SELECT id, org_id, email_id, contact_id, is_sent
             FROM account_email_logs WHERE id = ?1;",
            id,
            |row| {
                Ok(AccountEmailLog {
                    id: uuid_column(row, "id")?,
                    org_id: org_column(row)?,
                    email_id: opt_uuid_column(row, "email_id")?,
                    contact_id: opt_uuid_column(row, "contact_id")?,
                    is_sent: bool_column(row, "is_sent")?,
                })
            },
        )
    }
}

pub(crate) fn comment_from_row(row: &Row<'_>) -> RepoResult<Comment> {
    Ok(Comment {
        id: uuid_column(row, "id")?,
        org_id: org_column(row)?,
        target: target_columns(row)?,
        body: row.get("body")?,
        commented_by: opt_uuid_column(row, "commented_by")?,
    })
}

impl StoredRecord for Comment {
    const KIND: EntityKind = EntityKind::Comment;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO comments (id, org_id, target_kind, target_id, body, commented_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                self.target.kind.as_str(),
                self.target.id.to_string(),
                self.body.as_str(),
                opt_uuid_text(self.commented_by),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE comments
             SET
                target_kind = ?2,
                target_id = ?3,
                body = ?4,
                commented_by = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                self.target.kind.as_str(),
                self.target.id.to_string(),
                self.body.as_str(),
                opt_uuid_text(self.commented_by),
            ],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            &format!("{COMMENT_SELECT_SQL} WHERE id = ?1;"),
            id,
            comment_from_row,
        )
    }
}

impl StoredRecord for CommentFile {
    const KIND: EntityKind = EntityKind::CommentFile;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO comment_files (id, org_id, comment_id, file_path)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                self.comment_id.to_string(),
                self.file_path.as_str(),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE comment_files
             SET file_path = ?2, updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![self.id.to_string(), self.file_path.as_str()],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            "SELECT id, org_id, comment_id, file_path FROM comment_files WHERE id = ?1;",
            id,
            |row| {
                Ok(CommentFile {
                    id: uuid_column(row, "id")?,
                    org_id: org_column(row)?,
                    comment_id: uuid_column(row, "comment_id")?,
                    file_path: row.get("file_path")?,
                })
            },
        )
    }
}

pub(crate) fn attachment_from_row(row: &Row<'_>) -> RepoResult<Attachment> {
    Ok(Attachment {
        id: uuid_column(row, "id")?,
        org_id: org_column(row)?,
        target: target_columns(row)?,
        file_name: row.get("file_name")?,
        file_path: row.get("file_path")?,
        created_by: opt_uuid_column(row, "created_by")?,
    })
}

impl StoredRecord for Attachment {
    const KIND: EntityKind = EntityKind::Attachment;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO attachments (
                id, org_id, target_kind, target_id, file_name, file_path, created_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                self.target.kind.as_str(),
                self.target.id.to_string(),
                self.file_name.as_str(),
                self.file_path.as_str(),
                opt_uuid_text(self.created_by),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE attachments
             SET
                target_kind = ?2,
                target_id = ?3,
                file_name = ?4,
                file_path = ?5,
                created_by = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                self.target.kind.as_str(),
                self.target.id.to_string(),
                self.file_name.as_str(),
                self.file_path.as_str(),
                opt_uuid_text(self.created_by),
            ],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            &format!("{ATTACHMENT_SELECT_SQL} WHERE id = ?1;"),
            id,
            attachment_from_row,
        )
    }
}

impl StoredRecord for Document {
    const KIND: EntityKind = EntityKind::Document;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO documents (id, org_id, title, file_path, status)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                self.title.as_str(),
                self.file_path.as_str(),
                self.status.as_str(),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE documents
             SET
                title = ?2,
                file_path = ?3,
                status = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                self.title.as_str(),
                self.file_path.as_str(),
                self.status.as_str(),
            ],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            "SELECT id, org_id, title, file_path, status FROM documents WHERE id = ?1;",
            id,
            |row| {
                Ok(Document {
                    id: uuid_column(row, "id")?,
                    org_id: org_column(row)?,
                    title: row.get("title")?,
                    file_path: row.get("file_path")?,
                    status: enum_column(row, "status", DocumentStatus::parse)?,
                })
            },
        )
    }
}

pub(crate) fn activity_from_row(row: &Row<'_>) -> RepoResult<Activity> {
    Ok(Activity {
        id: uuid_column(row, "id")?,
        org_id: org_column(row)?,
        profile_id: opt_uuid_column(row, "profile_id")?,
        action: enum_column(row, "action", ActivityAction::parse)?,
        target: target_columns(row)?,
        entity_name: row.get("entity_name")?,
        description: row.get("description")?,
    })
}

impl StoredRecord for Activity {
    const KIND: EntityKind = EntityKind::Activity;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO activities (
                id, org_id, profile_id, action, target_kind, target_id,
                entity_name, description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                opt_uuid_text(self.profile_id),
                self.action.as_str(),
                self.target.kind.as_str(),
                self.target.id.to_string(),
                self.entity_name.as_str(),
                self.description.as_str(),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE activities
             SET
                profile_id = ?2,
                action = ?3,
                target_kind = ?4,
                target_id = ?5,
                entity_name = ?6,
                description = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                opt_uuid_text(self.profile_id),
                self.action.as_str(),
                self.target.kind.as_str(),
                self.target.id.to_string(),
                self.entity_name.as_str(),
                self.description.as_str(),
            ],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            &format!("{ACTIVITY_SELECT_SQL} WHERE id = ?1;"),
            id,
            activity_from_row,
        )
    }
}

impl StoredRecord for SessionToken {
    const KIND: EntityKind = EntityKind::SessionToken;

    fn insert_row(&self, conn: &Connection, org_id: OrgId) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO session_tokens (
                id, org_id, user_id, profile_id, token_jti, refresh_token_jti,
                expires_at, is_active, revoked_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                self.id.to_string(),
                org_id.to_string(),
                self.user_id.to_string(),
                opt_uuid_text(self.profile_id),
                self.token_jti.as_str(),
                self.refresh_token_jti.as_deref(),
                self.expires_at,
                bool_to_int(self.is_active),
                self.revoked_at,
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE session_tokens
             SET
                profile_id = ?2,
                refresh_token_jti = ?3,
                expires_at = ?4,
                is_active = ?5,
                revoked_at = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                self.id.to_string(),
                opt_uuid_text(self.profile_id),
                self.refresh_token_jti.as_deref(),
                self.expires_at,
                bool_to_int(self.is_active),
                self.revoked_at,
            ],
        )?)
    }

    fn load_row(conn: &Connection, id: EntityId) -> RepoResult<Option<Self>> {
        load_by_id(
            conn,
            "SELECT id, org_id, user_id, profile_id, token_jti, refresh_token_jti,
                    expires_at, is_active, revoked_at
             FROM session_tokens WHERE id = ?1;",
            id,
            |row| {
                Ok(SessionToken {
                    id: uuid_column(row, "id")?,
                    org_id: org_column(row)?,
                    user_id: uuid_column(row, "user_id")?,
                    profile_id: opt_uuid_column(row, "profile_id")?,
                    token_jti: row.get("token_jti")?,
                    refresh_token_jti: row.get("refresh_token_jti")?,
                    expires_at: row.get("expires_at")?,
                    is_active: bool_column(row, "is_active")?,
                    revoked_at: row.get("revoked_at")?,
                })
            },
        )
    }
}
