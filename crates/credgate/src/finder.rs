//! The credentials finder: decides what an actor is allowed to read.
//!
//! Access to a credential comes from one of two places. An actor whose
//! global scopes cover the requested capabilities can read any credential.
//! Everyone else needs a sharing grant on the credential into a project
//! where they hold a qualifying membership role. Either way the decision
//! is folded into a single store lookup.

use std::collections::BTreeSet;
use std::sync::Arc;

use credgate_core::{Actor, Credential, CredentialId, ProjectRole, Scope, SharingRole};
use credgate_store::{CredentialFilter, FindOptions, Relations, Store, StoreError};
use tracing::{debug, warn};

use crate::error::Result;

/// Configuration for the finder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderConfig {
    /// Grant roles through which a project's members may read a credential.
    pub sharing_roles: BTreeSet<SharingRole>,
    /// Membership roles that count as belonging to a project.
    pub project_roles: BTreeSet<ProjectRole>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            sharing_roles: SharingRole::ALL.into_iter().collect(),
            project_roles: ProjectRole::ALL.into_iter().collect(),
        }
    }
}

impl FinderConfig {
    pub fn with_sharing_roles(mut self, roles: impl IntoIterator<Item = SharingRole>) -> Self {
        self.sharing_roles = roles.into_iter().collect();
        self
    }

    pub fn with_project_roles(mut self, roles: impl IntoIterator<Item = ProjectRole>) -> Self {
        self.project_roles = roles.into_iter().collect();
        self
    }
}

/// Resolves credential access for actors.
///
/// Stateless apart from its configuration: every call is one fresh store
/// read, nothing is cached, and the finder can be shared across tasks.
pub struct CredentialsFinder<S: Store> {
    store: Arc<S>,
    config: FinderConfig,
}

impl<S: Store> CredentialsFinder<S> {
    /// Create a finder that owns its store.
    pub fn new(store: S, config: FinderConfig) -> Self {
        Self::with_shared_store(Arc::new(store), config)
    }

    /// Create a finder over a store that is also used elsewhere.
    pub fn with_shared_store(store: Arc<S>, config: FinderConfig) -> Self {
        Self { store, config }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Narrow `filter` to what `actor` may see.
    ///
    /// When the actor's global scopes satisfy `required` the filter is
    /// returned untouched. Otherwise a credential must carry a grant with an
    /// allowed sharing role into a project where the actor holds an allowed
    /// membership role.
    pub fn access_filter(
        &self,
        filter: CredentialFilter,
        actor: &Actor,
        required: &[Scope],
    ) -> CredentialFilter {
        if actor.has_global_scope(required) {
            debug!(actor = %actor.id, ?required, "access through global scope");
            return filter;
        }

        debug!(actor = %actor.id, ?required, "access through project sharing");
        filter
            .shared_as(self.config.sharing_roles.iter().copied())
            .with_member(actor.id.clone(), self.config.project_roles.iter().copied())
    }

    /// Find a credential the actor may access with `required`.
    ///
    /// Returns `Ok(None)` both when the credential does not exist and when
    /// the actor may not see it. The returned credential carries its full
    /// sharing tree, down to the actors behind each membership.
    pub async fn find_credential_for_actor(
        &self,
        credential_id: &CredentialId,
        actor: &Actor,
        required: &[Scope],
    ) -> Result<Option<Credential>> {
        let options = FindOptions::new(
            self.access_filter(CredentialFilter::by_id(credential_id.clone()), actor, required),
            Relations::CREDENTIAL_SHARING_TREE,
        );

        let credential = self
            .store
            .find_credential(&options)
            .await
            .map_err(|e| lookup_failed(e, actor))?;

        if credential.is_none() {
            debug!(credential = %credential_id, actor = %actor.id, "no accessible credential");
        }

        Ok(credential)
    }

    /// Find every credential the actor may access with `required`, ordered by id.
    pub async fn find_credentials_for_actor(
        &self,
        actor: &Actor,
        required: &[Scope],
    ) -> Result<Vec<Credential>> {
        let options = FindOptions::new(
            self.access_filter(CredentialFilter::any(), actor, required),
            Relations::CREDENTIAL_SHARING_TREE,
        );

        let credentials = self
            .store
            .find_credentials(&options)
            .await
            .map_err(|e| lookup_failed(e, actor))?;

        debug!(actor = %actor.id, count = credentials.len(), "listed accessible credentials");
        Ok(credentials)
    }

    /// Ids of every credential the actor may access with `required`.
    ///
    /// Same decision as [`find_credentials_for_actor`](Self::find_credentials_for_actor)
    /// without loading any relations.
    pub async fn find_credential_ids_for_actor(
        &self,
        actor: &Actor,
        required: &[Scope],
    ) -> Result<Vec<CredentialId>> {
        let options = FindOptions::new(
            self.access_filter(CredentialFilter::any(), actor, required),
            Relations::NONE,
        );

        let credentials = self
            .store
            .find_credentials(&options)
            .await
            .map_err(|e| lookup_failed(e, actor))?;

        Ok(credentials.into_iter().map(|c| c.id).collect())
    }
}

fn lookup_failed(err: StoreError, actor: &Actor) -> StoreError {
    warn!(actor = %actor.id, error = %err, "credential lookup failed");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use credgate_core::{
        ActorRecord, GlobalRole, Project, ProjectRelation, ProjectType, SharedCredential,
    };
    use credgate_store::{MemoryStore, SeedStore};

    const READ: &[Scope] = &[Scope::CredentialRead];

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_actor(&ActorRecord::new("test", "test@example.com", GlobalRole::Member))
            .await
            .unwrap();
        store
            .insert_project(&Project::new("p1", "Team", ProjectType::Team))
            .await
            .unwrap();
        store
            .insert_membership(&ProjectRelation::new("p1", "test", ProjectRole::Viewer))
            .await
            .unwrap();
        for (id, name) in [("cred_123", "GitHub"), ("cred_456", "Slack")] {
            store
                .insert_credential(&Credential::new(id, name, "api"))
                .await
                .unwrap();
        }
        store
            .insert_sharing(&SharedCredential::new("cred_123", "p1", SharingRole::User))
            .await
            .unwrap();
        store
    }

    fn finder(store: MemoryStore) -> CredentialsFinder<MemoryStore> {
        CredentialsFinder::new(store, FinderConfig::default())
    }

    #[test]
    fn test_default_config_allows_every_role() {
        let config = FinderConfig::default();
        assert_eq!(config.sharing_roles.len(), SharingRole::ALL.len());
        assert_eq!(config.project_roles.len(), ProjectRole::ALL.len());

        let narrowed = config.with_sharing_roles([SharingRole::Owner]);
        assert_eq!(narrowed.sharing_roles, BTreeSet::from([SharingRole::Owner]));
    }

    #[test]
    fn test_access_filter_branches() {
        let finder = finder(MemoryStore::new());

        let owner = Actor::new("admin", GlobalRole::Owner);
        let filter = finder.access_filter(CredentialFilter::by_id("cred_123"), &owner, READ);
        assert_eq!(filter, CredentialFilter::by_id("cred_123"));

        let member = Actor::new("test", GlobalRole::Member);
        let filter = finder.access_filter(CredentialFilter::by_id("cred_123"), &member, READ);
        let shared = filter.shared.unwrap();
        assert_eq!(shared.role, Some(finder.config().sharing_roles.clone()));
        let relations = shared.project.unwrap().relations;
        assert_eq!(relations.actor_id.as_str(), "test");
        assert_eq!(relations.role, finder.config().project_roles);
    }

    #[test]
    fn test_privileged_role_without_scope_is_ordinary() {
        let finder = finder(MemoryStore::new());
        let owner = Actor::with_scopes("admin", GlobalRole::Owner, [Scope::CredentialList]);

        let filter = finder.access_filter(CredentialFilter::any(), &owner, READ);
        assert!(filter.shared.is_some());
    }

    #[tokio::test]
    async fn test_member_reads_shared_credential() {
        let finder = finder(seeded().await);
        let member = Actor::new("test", GlobalRole::Member);

        let found = finder
            .find_credential_for_actor(&CredentialId::new("cred_123"), &member, READ)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "GitHub");
        assert!(found.shared.is_some());

        let hidden = finder
            .find_credential_for_actor(&CredentialId::new("cred_456"), &member, READ)
            .await
            .unwrap();
        assert!(hidden.is_none());
    }

    #[tokio::test]
    async fn test_owner_reads_unshared_credential() {
        let finder = finder(seeded().await);
        let owner = Actor::new("admin", GlobalRole::Owner);

        let found = finder
            .find_credential_for_actor(&CredentialId::new("cred_456"), &owner, READ)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.shared, Some(vec![]));
    }

    #[tokio::test]
    async fn test_narrowed_config_hides_user_grants() {
        let config = FinderConfig::default().with_sharing_roles([SharingRole::Owner]);
        let finder = CredentialsFinder::new(seeded().await, config);
        let member = Actor::new("test", GlobalRole::Member);

        let found = finder
            .find_credential_for_actor(&CredentialId::new("cred_123"), &member, READ)
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_listing_follows_branch() {
        let finder = finder(seeded().await);

        let member = Actor::new("test", GlobalRole::Member);
        let ids = finder
            .find_credential_ids_for_actor(&member, READ)
            .await
            .unwrap();
        assert_eq!(ids, vec![CredentialId::new("cred_123")]);

        let owner = Actor::new("admin", GlobalRole::Owner);
        let all = finder.find_credentials_for_actor(&owner, READ).await.unwrap();
        let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["GitHub", "Slack"]);
    }
}
