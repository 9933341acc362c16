mod common;

use common::{count_rows, seed_account, seed_contact, seed_tenant};
use crm_core::db::open_db_in_memory;
use crm_core::model::board::{Board, BoardColumn, BoardMember, BoardTask};
use crm_core::model::comment::{Comment, CommentFile};
use crm_core::model::crm::{Contact, Opportunity, Task};
use crm_core::model::email::{AccountEmail, AccountEmailLog};
use crm_core::model::org::Team;
use crm_core::{EntityKind, PolymorphicRef, RepoError, SqliteCrmStore, TenantScoped};
use uuid::Uuid;

fn validation_field(err: RepoError) -> &'static str {
    match err {
        RepoError::Validation(validation) => validation.field,
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn email_without_sender_inherits_first_recipient_org() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let tenant = seed_tenant(&mut store, "acme");
    let recipient = seed_contact(&mut store, tenant.org_id, "Rita");

    let mut email = AccountEmail::new("support@acme.test");
    email.recipients = vec![recipient.id];
    store.create(&mut email).unwrap();

    assert_eq!(email.org_id, Some(tenant.org_id));
    let loaded: AccountEmail = store.get(email.id).unwrap().unwrap();
    assert_eq!(loaded.org_id, Some(tenant.org_id));
    assert_eq!(loaded.recipients, vec![recipient.id]);
}

#[test]
fn email_sender_account_wins_over_recipient() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let tenant = seed_tenant(&mut store, "acme");
    let account = seed_account(&mut store, tenant.org_id, "Acme Corp");
    let first = seed_contact(&mut store, tenant.org_id, "Ann");
    let second = seed_contact(&mut store, tenant.org_id, "Ben");

    let mut email = AccountEmail::new("sales@acme.test");
    email.from_account_id = Some(account.id);
    email.recipients = vec![second.id, first.id];
    store.create(&mut email).unwrap();

    assert_eq!(email.org_id, Some(tenant.org_id));
    let loaded: AccountEmail = store.get(email.id).unwrap().unwrap();
    assert_eq!(loaded.recipients, vec![second.id, first.id]);
}

#[test]
fn email_with_cross_tenant_recipient_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let acme = seed_tenant(&mut store, "acme");
    let globex = seed_tenant(&mut store, "globex");
    let account = seed_account(&mut store, acme.org_id, "Acme Corp");
    let foreign = seed_contact(&mut store, globex.org_id, "Gina");

    let mut email = AccountEmail::new("sales@acme.test");
    email.from_account_id = Some(account.id);
    email.recipients = vec![foreign.id];

    let err = store.create(&mut email).unwrap_err();
    assert_eq!(validation_field(err), "recipients");
    assert_eq!(count_rows(&store, "account_emails"), 0);
    assert_eq!(count_rows(&store, "account_email_recipients"), 0);
}

#[test]
fn email_log_falls_back_from_email_to_contact() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let tenant = seed_tenant(&mut store, "acme");
    let contact = seed_contact(&mut store, tenant.org_id, "Carl");

    let mut log = AccountEmailLog::new(Uuid::new_v4(), contact.id);
    log.email_id = None;
    store.create(&mut log).unwrap();
    assert_eq!(log.org_id, Some(tenant.org_id));
}

#[test]
fn record_without_org_or_parent_fails_on_org() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();

    let mut email = AccountEmail::new("nobody@example.com");
    let err = store.create(&mut email).unwrap_err();
    match err {
        RepoError::Validation(validation) => {
            assert_eq!(validation.field, "org");
            assert_eq!(validation.entity, EntityKind::AccountEmail);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(email.org_id.is_none());
}

#[test]
fn missing_parents_are_skipped_not_trusted() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    seed_tenant(&mut store, "acme");

    let mut column = BoardColumn::new(Uuid::new_v4(), "Backlog");
    let err = store.create(&mut column).unwrap_err();
    assert_eq!(validation_field(err), "org");
}

#[test]
fn unknown_explicit_org_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();

    let mut team = Team::new(Uuid::new_v4(), "Ghosts");
    let err = store.create(&mut team).unwrap_err();
    assert_eq!(validation_field(err), "org");
}

#[test]
fn board_hierarchy_inherits_org_from_board() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let tenant = seed_tenant(&mut store, "acme");

    let mut board = Board::new(tenant.org_id, tenant.profile_id, "Pipeline");
    store.create(&mut board).unwrap();

    let mut member = BoardMember::new(board.id, tenant.profile_id);
    store.create(&mut member).unwrap();
    assert_eq!(member.org_id, Some(tenant.org_id));

    let mut column = BoardColumn::new(board.id, "Doing");
    store.create(&mut column).unwrap();
    assert_eq!(column.org_id, Some(tenant.org_id));

    let mut card = BoardTask::new(column.id, "Call Acme");
    store.create(&mut card).unwrap();
    assert_eq!(card.org_id, Some(tenant.org_id));
}

#[test]
fn board_member_from_other_org_is_rejected_on_profile() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let acme = seed_tenant(&mut store, "acme");
    let globex = seed_tenant(&mut store, "globex");

    let mut board = Board::new(acme.org_id, acme.profile_id, "Pipeline");
    store.create(&mut board).unwrap();

    let mut member = BoardMember::new(board.id, globex.profile_id);
    let err = store.create(&mut member).unwrap_err();
    assert_eq!(validation_field(err), "profile");
}

#[test]
fn comment_and_file_inherit_org_from_author() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let tenant = seed_tenant(&mut store, "acme");
    let contact = seed_contact(&mut store, tenant.org_id, "Dora");

    let mut comment = Comment::new(
        PolymorphicRef::new(EntityKind::Contact, contact.id),
        tenant.profile_id,
        "Followed up by phone",
    );
    store.create(&mut comment).unwrap();
    assert_eq!(comment.org_id, Some(tenant.org_id));

    let mut file = CommentFile::new(comment.id, "uploads/call-notes.txt");
    store.create(&mut file).unwrap();
    assert_eq!(file.org_id, Some(tenant.org_id));
}

#[test]
fn direct_reference_into_other_org_is_keyed_by_field() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let acme = seed_tenant(&mut store, "acme");
    let globex = seed_tenant(&mut store, "globex");
    let foreign_account = seed_account(&mut store, globex.org_id, "Globex");

    let mut opportunity = Opportunity::new(acme.org_id, "Renewal");
    opportunity.account_id = Some(foreign_account.id);
    let err = store.create(&mut opportunity).unwrap_err();
    match err {
        RepoError::Validation(validation) => {
            assert_eq!(validation.field, "account");
            assert!(validation.message.contains("organization must match"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(count_rows(&store, "opportunities"), 0);
}

#[test]
fn dangling_direct_reference_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let tenant = seed_tenant(&mut store, "acme");

    let mut contact = Contact::new(tenant.org_id, "Eve", "Doe");
    contact.account_id = Some(Uuid::new_v4());
    let err = store.create(&mut contact).unwrap_err();
    assert_eq!(validation_field(err), "account");
}

#[test]
fn task_linked_to_two_parents_is_rejected_on_account() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let tenant = seed_tenant(&mut store, "acme");
    let account = seed_account(&mut store, tenant.org_id, "Acme Corp");
    let mut opportunity = Opportunity::new(tenant.org_id, "Upsell");
    store.create(&mut opportunity).unwrap();

    let mut task = Task::new(tenant.org_id, "Prepare quote");
    task.account_id = Some(account.id);
    task.opportunity_id = Some(opportunity.id);
    let err = store.create(&mut task).unwrap_err();
    assert_eq!(validation_field(err), "account");
}

#[test]
fn update_keeps_org_and_rejects_a_different_one() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let acme = seed_tenant(&mut store, "acme");
    let globex = seed_tenant(&mut store, "globex");
    let mut account = seed_account(&mut store, acme.org_id, "Acme Corp");

    account.org_id = Some(globex.org_id);
    let err = store.update(&mut account).unwrap_err();
    assert_eq!(validation_field(err), "org");

    account.org_id = None;
    account.name = "Acme Corporation".to_string();
    store.update(&mut account).unwrap();
    assert_eq!(account.org_id, Some(acme.org_id));

    let loaded: crm_core::model::crm::Account = store.get(account.id).unwrap().unwrap();
    assert_eq!(loaded.name, "Acme Corporation");
    assert_eq!(loaded.org_id(), Some(acme.org_id));
}

#[test]
fn update_of_missing_record_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let tenant = seed_tenant(&mut store, "acme");

    let mut team = Team::new(tenant.org_id, "Never saved");
    match store.update(&mut team).unwrap_err() {
        RepoError::NotFound { kind, id } => {
            assert_eq!(kind, EntityKind::Team);
            assert_eq!(id, team.id);
        }
        other => panic!("unexpected error: {other}"),
    }
}
