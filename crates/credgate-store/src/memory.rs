//! In-memory implementation of the Store traits.
//!
//! Same semantics as SQLite, nothing persisted. Useful for tests and for
//! embedding the finder where the sharing data already lives in memory.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use credgate_core::{
    ActorId, ActorRecord, Credential, CredentialId, Project, ProjectId, ProjectRelation,
    SharedCredential,
};

use crate::error::{Result, StoreError};
use crate::loader::{load_relations, RelationReader};
use crate::query::{CredentialFilter, FindOptions, SharingFilter};
use crate::traits::{SeedStore, Store};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    actors: HashMap<ActorId, ActorRecord>,

    projects: HashMap<ProjectId, Project>,

    /// Keyed by (project, actor); one membership per pair.
    memberships: BTreeMap<(ProjectId, ActorId), ProjectRelation>,

    /// Ordered by id; iteration order is the store order.
    credentials: BTreeMap<CredentialId, Credential>,

    /// Keyed by (credential, project).
    shares: BTreeMap<(CredentialId, ProjectId), SharedCredential>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {}", e)))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStoreInner {
    fn matching<'a>(
        &'a self,
        filter: &'a CredentialFilter,
    ) -> impl Iterator<Item = &'a Credential> + 'a {
        self.credentials.values().filter(move |credential| {
            filter.matches_id(&credential.id)
                && filter
                    .shared
                    .as_ref()
                    .map_or(true, |shared| self.has_matching_grant(&credential.id, shared))
        })
    }

    fn has_matching_grant(&self, id: &CredentialId, filter: &SharingFilter) -> bool {
        self.shares
            .values()
            .filter(|grant| &grant.credential_id == id)
            .any(|grant| filter.matches_grant(grant) && self.project_matches(filter, grant))
    }

    fn project_matches(&self, filter: &SharingFilter, grant: &SharedCredential) -> bool {
        let Some(project) = &filter.project else {
            return true;
        };

        let key = (grant.project_id.clone(), project.relations.actor_id.clone());
        self.memberships
            .get(&key)
            .map_or(false, |relation| project.relations.matches(relation))
    }
}

impl RelationReader for MemoryStoreInner {
    fn shares_of(&self, id: &CredentialId) -> Result<Vec<SharedCredential>> {
        Ok(self
            .shares
            .values()
            .filter(|grant| &grant.credential_id == id)
            .cloned()
            .collect())
    }

    fn project(&self, id: &ProjectId) -> Result<Option<Project>> {
        Ok(self.projects.get(id).cloned())
    }

    fn memberships_of(&self, id: &ProjectId) -> Result<Vec<ProjectRelation>> {
        Ok(self
            .memberships
            .values()
            .filter(|relation| &relation.project_id == id)
            .cloned()
            .collect())
    }

    fn actor(&self, id: &ActorId) -> Result<Option<ActorRecord>> {
        Ok(self.actors.get(id).cloned())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_credential(&self, options: &FindOptions) -> Result<Option<Credential>> {
        let inner = self.read()?;
        let found = inner.matching(&options.filter).next().cloned();

        match found {
            Some(credential) => load_relations(&*inner, credential, options.relations).map(Some),
            None => Ok(None),
        }
    }

    async fn find_credentials(&self, options: &FindOptions) -> Result<Vec<Credential>> {
        let inner = self.read()?;

        inner
            .matching(&options.filter)
            .map(|credential| load_relations(&*inner, credential.clone(), options.relations))
            .collect()
    }
}

#[async_trait]
impl SeedStore for MemoryStore {
    async fn insert_actor(&self, actor: &ActorRecord) -> Result<()> {
        let mut inner = self.write()?;
        inner.actors.insert(actor.id.clone(), actor.clone());
        Ok(())
    }

    async fn insert_project(&self, project: &Project) -> Result<()> {
        let mut inner = self.write()?;
        let mut project = project.clone();
        project.relations = None;
        inner.projects.insert(project.id.clone(), project);
        Ok(())
    }

    async fn insert_membership(&self, relation: &ProjectRelation) -> Result<()> {
        let mut inner = self.write()?;

        if !inner.projects.contains_key(&relation.project_id) {
            return Err(missing_parent("project", relation.project_id.as_str()));
        }
        if !inner.actors.contains_key(&relation.actor_id) {
            return Err(missing_parent("actor", relation.actor_id.as_str()));
        }

        let mut relation = relation.clone();
        relation.actor = None;
        inner.memberships.insert(
            (relation.project_id.clone(), relation.actor_id.clone()),
            relation,
        );
        Ok(())
    }

    async fn insert_credential(&self, credential: &Credential) -> Result<()> {
        let mut inner = self.write()?;
        let mut credential = credential.clone();
        credential.shared = None;
        inner.credentials.insert(credential.id.clone(), credential);
        Ok(())
    }

    async fn insert_sharing(&self, grant: &SharedCredential) -> Result<()> {
        let mut inner = self.write()?;

        if !inner.credentials.contains_key(&grant.credential_id) {
            return Err(missing_parent("credential", grant.credential_id.as_str()));
        }
        if !inner.projects.contains_key(&grant.project_id) {
            return Err(missing_parent("project", grant.project_id.as_str()));
        }

        let grant = SharedCredential::new(
            grant.credential_id.clone(),
            grant.project_id.clone(),
            grant.role,
        );
        inner.shares.insert(
            (grant.credential_id.clone(), grant.project_id.clone()),
            grant,
        );
        Ok(())
    }
}

fn missing_parent(kind: &str, id: &str) -> StoreError {
    StoreError::InvalidData(format!("unknown {}: {}", kind, id))
}
