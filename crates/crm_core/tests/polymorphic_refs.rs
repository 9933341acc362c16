mod common;

use common::{count_rows, seed_account, seed_contact, seed_tenant};
use crm_core::db::open_db_in_memory;
use crm_core::model::activity::{Activity, ActivityAction};
use crm_core::model::attachment::Attachment;
use crm_core::model::comment::Comment;
use crm_core::model::file_category::FileCategory;
use crm_core::tenancy::reference::{validate_reference, ORG_MISMATCH_MESSAGE};
use crm_core::{
    CrmService, EntityKind, EntityRegistry, PolymorphicRef, RepoError, SqliteCrmStore,
    TargetPolicy,
};
use uuid::Uuid;

#[test]
fn comment_with_org_different_from_target_fails_on_org() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let x = seed_tenant(&mut store, "org-x");
    let y = seed_tenant(&mut store, "org-y");
    let contact = seed_contact(&mut store, x.org_id, "Xena");

    let mut comment = Comment::new(
        PolymorphicRef::new(EntityKind::Contact, contact.id),
        y.profile_id,
        "Wrong tenant",
    );
    comment.org_id = Some(y.org_id);

    match store.create(&mut comment).unwrap_err() {
        RepoError::Validation(validation) => {
            assert_eq!(validation.field, "org");
            assert_eq!(validation.message, ORG_MISMATCH_MESSAGE);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(count_rows(&store, "comments"), 0);
}

#[test]
fn org_mismatch_on_target_wins_over_author_mismatch() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let x = seed_tenant(&mut store, "org-x");
    let y = seed_tenant(&mut store, "org-y");
    let contact = seed_contact(&mut store, x.org_id, "Xena");

    // Author and target share org X; only the explicit org differs.
    let mut comment = Comment::new(
        PolymorphicRef::new(EntityKind::Contact, contact.id),
        x.profile_id,
        "Filed under the wrong tenant",
    );
    comment.org_id = Some(y.org_id);

    let err = store.create(&mut comment).unwrap_err();
    let validation = err.as_validation().expect("validation error");
    assert_eq!(validation.field, "org");
    assert_eq!(validation.message, ORG_MISMATCH_MESSAGE);
    assert_eq!(count_rows(&store, "comments"), 0);
}

#[test]
fn comment_update_retargeting_into_other_org_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let x = seed_tenant(&mut store, "org-x");
    let y = seed_tenant(&mut store, "org-y");
    let own = seed_contact(&mut store, x.org_id, "Xavier");
    let foreign = seed_contact(&mut store, y.org_id, "Yusuf");

    let mut comment = Comment::new(
        PolymorphicRef::new(EntityKind::Contact, own.id),
        x.profile_id,
        "Initial note",
    );
    store.create(&mut comment).unwrap();

    comment.target = PolymorphicRef::new(EntityKind::Contact, foreign.id);
    let err = store.update(&mut comment).unwrap_err();
    assert_eq!(err.as_validation().map(|v| v.field), Some("org"));

    let stored: Comment = store.get(comment.id).unwrap().unwrap();
    assert_eq!(stored.target.id, own.id);
}

#[test]
fn target_without_org_is_compatible_with_every_org() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let x = seed_tenant(&mut store, "org-x");
    let y = seed_tenant(&mut store, "org-y");

    let mut comment = Comment::new(
        PolymorphicRef::new(EntityKind::User, y.user_id),
        x.profile_id,
        "Users are not tenant-scoped",
    );
    store.create(&mut comment).unwrap();
    assert_eq!(comment.org_id, Some(x.org_id));
}

#[test]
fn missing_comment_target_is_rejected_on_target_id() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let x = seed_tenant(&mut store, "org-x");

    let mut comment = Comment::new(
        PolymorphicRef::new(EntityKind::Account, Uuid::new_v4()),
        x.profile_id,
        "Dangling",
    );
    let err = store.create(&mut comment).unwrap_err();
    assert_eq!(err.as_validation().map(|v| v.field), Some("target_id"));
}

#[test]
fn unregistered_target_kind_is_rejected_on_target_kind() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let x = seed_tenant(&mut store, "org-x");
    let account = seed_account(&mut store, x.org_id, "Acme");

    let empty = EntityRegistry::new();
    let err = validate_reference(
        store.connection(),
        &empty,
        EntityKind::Comment,
        PolymorphicRef::new(EntityKind::Account, account.id),
        TargetPolicy::MustExist,
        x.org_id,
    )
    .unwrap_err();
    assert_eq!(err.as_validation().map(|v| v.field), Some("target_kind"));
}

#[test]
fn activity_accepts_missing_target_but_checks_existing_ones() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let x = seed_tenant(&mut store, "org-x");
    let y = seed_tenant(&mut store, "org-y");
    let foreign = seed_account(&mut store, y.org_id, "Globex");

    let mut deleted = Activity::new(
        x.profile_id,
        ActivityAction::Delete,
        PolymorphicRef::new(EntityKind::Account, Uuid::new_v4()),
    );
    store.create(&mut deleted).unwrap();
    assert_eq!(deleted.org_id, Some(x.org_id));

    let mut cross = Activity::new(
        x.profile_id,
        ActivityAction::View,
        PolymorphicRef::new(EntityKind::Account, foreign.id),
    );
    let err = store.create(&mut cross).unwrap_err();
    assert_eq!(err.as_validation().map(|v| v.field), Some("org"));
}

#[test]
fn attachment_service_uses_acting_profile_and_classifies_file() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let x = seed_tenant(&mut store, "org-x");
    let account = seed_account(&mut store, x.org_id, "Acme");
    let target = PolymorphicRef::new(EntityKind::Account, account.id);

    let mut service = CrmService::new(store);
    let attachment = service
        .create_attachment("Signed contract", "uploads/contract.PDF", target, x.profile_id)
        .unwrap();

    assert_eq!(attachment.org_id, Some(x.org_id));
    assert_eq!(attachment.created_by, Some(x.user_id));
    assert_eq!(attachment.file_category(), FileCategory::Pdf);

    let listed = service.store().list_attachments_for(target).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, attachment.id);
}

#[test]
fn attachment_on_foreign_target_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let x = seed_tenant(&mut store, "org-x");
    let y = seed_tenant(&mut store, "org-y");
    let foreign = seed_account(&mut store, y.org_id, "Globex");

    let mut attachment = Attachment::new(
        x.org_id,
        PolymorphicRef::new(EntityKind::Account, foreign.id),
        "leak.txt",
        "uploads/leak.txt",
    );
    let err = store.create(&mut attachment).unwrap_err();
    assert_eq!(err.as_validation().map(|v| v.field), Some("org"));
    assert_eq!(count_rows(&store, "attachments"), 0);
}

#[test]
fn comments_are_listed_newest_first() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let x = seed_tenant(&mut store, "org-x");
    let contact = seed_contact(&mut store, x.org_id, "Zoe");
    let target = PolymorphicRef::new(EntityKind::Contact, contact.id);

    let mut service = CrmService::new(store);
    let first = service.comment_on(target, x.profile_id, "first").unwrap();
    let second = service.comment_on(target, x.profile_id, "second").unwrap();

    let listed = service.store().list_comments_for(target).unwrap();
    let ids: Vec<_> = listed.iter().map(|comment| comment.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let recent = service.store().list_org_comments(x.org_id, Some(1)).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, second.id);
}
