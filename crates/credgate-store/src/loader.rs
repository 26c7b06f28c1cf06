//! Relation loading shared by every store.
//!
//! Stores only know how to fetch single rows and child lists; walking the
//! credential → sharing → project → membership → actor path lives here so
//! that all backends return identically shaped trees.

use credgate_core::{
    ActorId, ActorRecord, Credential, CredentialId, Project, ProjectId, ProjectRelation,
    SharedCredential,
};

use crate::error::{Result, StoreError};
use crate::query::{RelationDepth, Relations};

/// Row-level reads a store provides for relation loading.
pub(crate) trait RelationReader {
    /// Grants of a credential, ordered by project id.
    fn shares_of(&self, id: &CredentialId) -> Result<Vec<SharedCredential>>;

    fn project(&self, id: &ProjectId) -> Result<Option<Project>>;

    /// Memberships of a project, ordered by actor id.
    fn memberships_of(&self, id: &ProjectId) -> Result<Vec<ProjectRelation>>;

    fn actor(&self, id: &ActorId) -> Result<Option<ActorRecord>>;
}

/// Load the relations requested by `relations` onto a matched credential.
pub(crate) fn load_relations<R: RelationReader + ?Sized>(
    reader: &R,
    mut credential: Credential,
    relations: Relations,
) -> Result<Credential> {
    if !relations.includes(RelationDepth::Sharing) {
        return Ok(credential);
    }

    let mut shared = reader.shares_of(&credential.id)?;
    if relations.includes(RelationDepth::Project) {
        for share in &mut shared {
            share.project = Some(load_project(reader, &share.project_id, relations)?);
        }
    }
    credential.shared = Some(shared);

    Ok(credential)
}

fn load_project<R: RelationReader + ?Sized>(
    reader: &R,
    id: &ProjectId,
    relations: Relations,
) -> Result<Project> {
    let mut project = reader
        .project(id)?
        .ok_or_else(|| dangling("project", id.as_str()))?;

    if relations.includes(RelationDepth::Membership) {
        let mut members = reader.memberships_of(id)?;
        if relations.includes(RelationDepth::Actor) {
            for member in &mut members {
                let actor = reader
                    .actor(&member.actor_id)?
                    .ok_or_else(|| dangling("actor", member.actor_id.as_str()))?;
                member.actor = Some(actor);
            }
        }
        project.relations = Some(members);
    }

    Ok(project)
}

fn dangling(kind: &str, id: &str) -> StoreError {
    StoreError::InvalidData(format!("dangling reference to {} {}", kind, id))
}
