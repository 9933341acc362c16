//! CRM use-case service.
//!
//! # Responsibility
//! - Derive acting-profile context (organization, uploading user) for
//!   attachments and comments.
//! - Combine tag resolution with tag assignment.
//!
//! # Invariants
//! - Service APIs never bypass the store's checked write path.

use crate::model::attachment::Attachment;
use crate::model::comment::Comment;
use crate::model::entity::{EntityId, EntityKind, OrgId};
use crate::model::org::{Profile, Tag};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::relation_repo::TargetFilter;
use crate::repo::store::SqliteCrmStore;
use crate::tenancy::input::ListInput;
use crate::tenancy::PolymorphicRef;

/// Use-case facade over `SqliteCrmStore`.
pub struct CrmService<'conn> {
    store: SqliteCrmStore<'conn>,
}

impl<'conn> CrmService<'conn> {
    pub fn new(store: SqliteCrmStore<'conn>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SqliteCrmStore<'conn> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SqliteCrmStore<'conn> {
        &mut self.store
    }

    /// Uploads an attachment on behalf of `profile_id`.
    ///
    /// The attachment takes the profile's organization and records the
    /// profile's user as uploader.
    pub fn create_attachment(
        &mut self,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
        target: PolymorphicRef,
        profile_id: EntityId,
    ) -> RepoResult<Attachment> {
        let profile = self.acting_profile(profile_id)?;
        let org_id = profile_org(&profile)?;

        let mut attachment = Attachment::new(org_id, target, file_name, file_path);
        attachment.created_by = Some(profile.user_id);
        self.store.create(&mut attachment)?;
        Ok(attachment)
    }

    /// Resolves `input` into tags of `org_id` and links them to the host.
    ///
    /// Returns the tags attached, in input order.
    pub fn tag_record(
        &mut self,
        host_kind: EntityKind,
        host_id: EntityId,
        org_id: OrgId,
        input: impl Into<ListInput>,
    ) -> RepoResult<Vec<Tag>> {
        self.store.ensure_in_org(host_kind, host_id, org_id)?;

        let tags = self.store.resolve_tags(org_id, input)?;
        if tags.is_empty() {
            return Ok(tags);
        }
        let tag_ids: Vec<String> = tags.iter().map(|tag| tag.id.to_string()).collect();
        let attached = self.store.assign_related(
            host_kind,
            host_id,
            "tags",
            tag_ids,
            EntityKind::Tag,
            org_id,
            TargetFilter::default(),
        )?;

        Ok(tags
            .into_iter()
            .filter(|tag| attached.contains(&tag.id))
            .collect())
    }

    /// Comments on `target` as `profile_id`; the organization comes from
    /// the profile.
    pub fn comment_on(
        &mut self,
        target: PolymorphicRef,
        profile_id: EntityId,
        body: impl Into<String>,
    ) -> RepoResult<Comment> {
        let mut comment = Comment::new(target, profile_id, body);
        self.store.create(&mut comment)?;
        Ok(comment)
    }

    fn acting_profile(&self, profile_id: EntityId) -> RepoResult<Profile> {
        self.store.get_required::<Profile>(profile_id)
    }
}

fn profile_org(profile: &Profile) -> RepoResult<OrgId> {
    profile.org_id.ok_or_else(|| {
        RepoError::InvalidData(format!("profile {} has no organization", profile.id))
    })
}
