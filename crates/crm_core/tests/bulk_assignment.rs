mod common;

use common::{count_rows, seed_account, seed_contact, seed_tenant};
use crm_core::db::open_db_in_memory;
use crm_core::model::org::Team;
use crm_core::{EntityKind, RepoError, SqliteCrmStore, TargetFilter};
use uuid::Uuid;

#[test]
fn only_in_tenant_targets_are_attached() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let acme = seed_tenant(&mut store, "acme");
    let globex = seed_tenant(&mut store, "globex");
    let account = seed_account(&mut store, acme.org_id, "Acme Corp");
    let own = seed_contact(&mut store, acme.org_id, "Alice");
    let foreign = seed_contact(&mut store, globex.org_id, "Bob");

    let attached = store
        .assign_related(
            EntityKind::Account,
            account.id,
            "contacts",
            vec![own.id.to_string(), foreign.id.to_string()],
            EntityKind::Contact,
            acme.org_id,
            TargetFilter::default(),
        )
        .unwrap();

    assert_eq!(attached, vec![own.id]);
    assert_eq!(
        store
            .list_related(EntityKind::Account, account.id, "contacts")
            .unwrap(),
        vec![own.id]
    );
}

#[test]
fn active_filter_drops_inactive_targets() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let acme = seed_tenant(&mut store, "acme");
    let account = seed_account(&mut store, acme.org_id, "Acme Corp");
    let active = seed_contact(&mut store, acme.org_id, "Active");
    let mut inactive = seed_contact(&mut store, acme.org_id, "Dormant");
    inactive.is_active = false;
    store.update(&mut inactive).unwrap();

    let ids = vec![active.id.to_string(), inactive.id.to_string()];
    let filtered = store
        .assign_related(
            EntityKind::Account,
            account.id,
            "contacts",
            ids.clone(),
            EntityKind::Contact,
            acme.org_id,
            TargetFilter::active_only(),
        )
        .unwrap();
    assert_eq!(filtered, vec![active.id]);

    let unfiltered = store
        .assign_related(
            EntityKind::Account,
            account.id,
            "contacts",
            ids,
            EntityKind::Contact,
            acme.org_id,
            TargetFilter::default(),
        )
        .unwrap();
    assert_eq!(unfiltered, vec![active.id, inactive.id]);
}

#[test]
fn active_filter_is_ignored_for_kinds_without_active_flag() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let acme = seed_tenant(&mut store, "acme");
    let account = seed_account(&mut store, acme.org_id, "Acme Corp");
    let mut team = Team::new(acme.org_id, "Sales");
    store.create(&mut team).unwrap();

    let attached = store
        .assign_related(
            EntityKind::Account,
            account.id,
            "teams",
            vec![team.id.to_string()],
            EntityKind::Team,
            acme.org_id,
            TargetFilter::active_only(),
        )
        .unwrap();
    assert_eq!(attached, vec![team.id]);
}

#[test]
fn malformed_unknown_and_duplicate_ids_are_dropped() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let acme = seed_tenant(&mut store, "acme");
    let account = seed_account(&mut store, acme.org_id, "Acme Corp");
    let contact = seed_contact(&mut store, acme.org_id, "Alice");

    let input = format!(
        r#"["not-a-uuid", "{}", "{}", "{}"]"#,
        contact.id,
        Uuid::new_v4(),
        contact.id
    );
    let attached = store
        .assign_related(
            EntityKind::Account,
            account.id,
            "contacts",
            input,
            EntityKind::Contact,
            acme.org_id,
            TargetFilter::default(),
        )
        .unwrap();

    assert_eq!(attached, vec![contact.id]);
    assert_eq!(count_rows(&store, "account_contacts"), 1);
}

#[test]
fn reassignment_is_idempotent() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let acme = seed_tenant(&mut store, "acme");
    let account = seed_account(&mut store, acme.org_id, "Acme Corp");

    for _ in 0..2 {
        let attached = store
            .assign_related(
                EntityKind::Account,
                account.id,
                "assigned_to",
                vec![acme.profile_id.to_string()],
                EntityKind::Profile,
                acme.org_id,
                TargetFilter::active_only(),
            )
            .unwrap();
        assert_eq!(attached, vec![acme.profile_id]);
    }
    assert_eq!(count_rows(&store, "account_assigned_to"), 1);
}

#[test]
fn empty_input_attaches_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let acme = seed_tenant(&mut store, "acme");
    let account = seed_account(&mut store, acme.org_id, "Acme Corp");

    let attached = store
        .assign_related(
            EntityKind::Account,
            account.id,
            "contacts",
            "",
            EntityKind::Contact,
            acme.org_id,
            TargetFilter::default(),
        )
        .unwrap();
    assert!(attached.is_empty());
}

#[test]
fn host_outside_org_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let acme = seed_tenant(&mut store, "acme");
    let globex = seed_tenant(&mut store, "globex");
    let foreign_account = seed_account(&mut store, globex.org_id, "Globex");
    let contact = seed_contact(&mut store, acme.org_id, "Alice");

    for host_id in [foreign_account.id, Uuid::new_v4()] {
        let err = store
            .assign_related(
                EntityKind::Account,
                host_id,
                "contacts",
                vec![contact.id.to_string()],
                EntityKind::Contact,
                acme.org_id,
                TargetFilter::default(),
            )
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound { kind: EntityKind::Account, .. }));
    }
    assert_eq!(count_rows(&store, "account_contacts"), 0);
}

#[test]
fn unknown_relation_or_target_kind_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let acme = seed_tenant(&mut store, "acme");
    let account = seed_account(&mut store, acme.org_id, "Acme Corp");

    let unknown = store
        .assign_related(
            EntityKind::Account,
            account.id,
            "followers",
            vec![acme.profile_id.to_string()],
            EntityKind::Profile,
            acme.org_id,
            TargetFilter::default(),
        )
        .unwrap_err();
    assert!(matches!(unknown, RepoError::UnknownRelation { .. }));

    let mismatched = store
        .assign_related(
            EntityKind::Account,
            account.id,
            "contacts",
            vec![acme.profile_id.to_string()],
            EntityKind::Profile,
            acme.org_id,
            TargetFilter::default(),
        )
        .unwrap_err();
    assert!(matches!(mismatched, RepoError::UnknownRelation { .. }));

    assert!(matches!(
        store.list_related(EntityKind::Account, account.id, "followers"),
        Err(RepoError::UnknownRelation { .. })
    ));
}

#[test]
fn team_members_are_profiles_of_the_same_org() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCrmStore::new(&mut conn).unwrap();
    let acme = seed_tenant(&mut store, "acme");
    let globex = seed_tenant(&mut store, "globex");
    let mut team = Team::new(acme.org_id, "Support");
    store.create(&mut team).unwrap();

    let attached = store
        .assign_related(
            EntityKind::Team,
            team.id,
            "users",
            vec![acme.profile_id.to_string(), globex.profile_id.to_string()],
            EntityKind::Profile,
            acme.org_id,
            TargetFilter::active_only(),
        )
        .unwrap();
    assert_eq!(attached, vec![acme.profile_id]);
}
