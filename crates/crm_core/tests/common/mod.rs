#![allow(dead_code)]

use crm_core::model::crm::{Account, Contact};
use crm_core::model::org::{Organization, Profile, User};
use crm_core::{EntityId, OrgId, SqliteCrmStore};
use uuid::Uuid;

/// One organization with a single member.
pub struct Tenant {
    pub org_id: OrgId,
    pub user_id: EntityId,
    pub profile_id: EntityId,
}

pub fn seed_tenant(store: &mut SqliteCrmStore<'_>, name: &str) -> Tenant {
    let org = Organization::new(name);
    let org_id = store.create_organization(&org).unwrap();

    let user = User::new(format!("{name}-{}@example.com", Uuid::new_v4()));
    let user_id = store.create_user(&user).unwrap();

    let mut profile = Profile::new(org_id, user_id);
    let profile_id = store.create(&mut profile).unwrap();

    Tenant {
        org_id,
        user_id,
        profile_id,
    }
}

pub fn seed_account(store: &mut SqliteCrmStore<'_>, org_id: OrgId, name: &str) -> Account {
    let mut account = Account::new(org_id, name);
    store.create(&mut account).unwrap();
    account
}

pub fn seed_contact(store: &mut SqliteCrmStore<'_>, org_id: OrgId, first_name: &str) -> Contact {
    let mut contact = Contact::new(org_id, first_name, "Doe");
    store.create(&mut contact).unwrap();
    contact
}

pub fn count_rows(store: &SqliteCrmStore<'_>, table: &str) -> i64 {
    store
        .connection()
        .query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
            row.get(0)
        })
        .unwrap()
}
