//! Test fixtures and helpers.
//!
//! A [`SharingWorld`] is a small, declarative set of actors, projects,
//! memberships, credentials and grants that can be seeded into any store.

use credgate_core::{
    Actor, ActorId, ActorRecord, Credential, GlobalRole, Project, ProjectRelation, ProjectRole,
    ProjectType, SharedCredential, SharingRole,
};
use credgate_store::{MemoryStore, Result as StoreResult, SeedStore, SqliteStore};

/// Rows to seed into a store, in dependency order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharingWorld {
    pub actors: Vec<ActorRecord>,
    pub projects: Vec<Project>,
    pub memberships: Vec<ProjectRelation>,
    pub credentials: Vec<Credential>,
    pub grants: Vec<SharedCredential>,
}

impl SharingWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an actor with an `{id}@example.com` email.
    pub fn actor(mut self, id: &str, global_role: GlobalRole) -> Self {
        self.actors.push(ActorRecord::new(
            id,
            format!("{}@example.com", id),
            global_role,
        ));
        self
    }

    pub fn project(mut self, id: &str, project_type: ProjectType) -> Self {
        self.projects.push(Project::new(id, id, project_type));
        self
    }

    pub fn member(mut self, project: &str, actor: &str, role: ProjectRole) -> Self {
        self.memberships.push(ProjectRelation::new(project, actor, role));
        self
    }

    pub fn credential(mut self, id: &str, name: &str, credential_type: &str) -> Self {
        self.credentials.push(Credential::new(id, name, credential_type));
        self
    }

    pub fn share(mut self, credential: &str, project: &str, role: SharingRole) -> Self {
        self.grants.push(SharedCredential::new(credential, project, role));
        self
    }

    /// The world the access cases are written against.
    ///
    /// - `owner` (global owner) owns `cred_456` through a personal project
    /// - `test` owns `cred_123` personally and shares it with `team`
    /// - `team` (test: editor, viewer: viewer) owns `cred_789`
    /// - `outsider` administers `other-team`, which holds no grants
    /// - `cred_orphan` has no grants at all
    pub fn standard() -> Self {
        Self::new()
            .actor("owner", GlobalRole::Owner)
            .actor("test", GlobalRole::Member)
            .actor("viewer", GlobalRole::Member)
            .actor("outsider", GlobalRole::Member)
            .project("owner-personal", ProjectType::Personal)
            .project("test-personal", ProjectType::Personal)
            .project("team", ProjectType::Team)
            .project("other-team", ProjectType::Team)
            .member("owner-personal", "owner", ProjectRole::PersonalOwner)
            .member("test-personal", "test", ProjectRole::PersonalOwner)
            .member("team", "test", ProjectRole::Editor)
            .member("team", "viewer", ProjectRole::Viewer)
            .member("other-team", "outsider", ProjectRole::Admin)
            .credential("cred_123", "GitHub", "githubApi")
            .credential("cred_456", "Slack", "slackApi")
            .credential("cred_789", "Postgres", "postgres")
            .credential("cred_orphan", "Legacy", "httpBasicAuth")
            .share("cred_123", "test-personal", SharingRole::Owner)
            .share("cred_123", "team", SharingRole::User)
            .share("cred_456", "owner-personal", SharingRole::Owner)
            .share("cred_789", "team", SharingRole::Owner)
    }

    /// Actor handle for a seeded actor, with scopes from its global role.
    pub fn actor_for(&self, id: &str) -> Option<Actor> {
        let id = ActorId::new(id);
        self.actors
            .iter()
            .find(|record| record.id == id)
            .map(|record| Actor::new(record.id.clone(), record.global_role))
    }

    pub async fn seed<S: SeedStore + ?Sized>(&self, store: &S) -> StoreResult<()> {
        for actor in &self.actors {
            store.insert_actor(actor).await?;
        }
        for project in &self.projects {
            store.insert_project(project).await?;
        }
        for membership in &self.memberships {
            store.insert_membership(membership).await?;
        }
        for credential in &self.credentials {
            store.insert_credential(credential).await?;
        }
        for grant in &self.grants {
            store.insert_sharing(grant).await?;
        }
        Ok(())
    }

    /// A fresh memory store holding this world.
    pub async fn memory_store(&self) -> StoreResult<MemoryStore> {
        let store = MemoryStore::new();
        self.seed(&store).await?;
        Ok(store)
    }

    /// A fresh in-memory SQLite store holding this world.
    pub async fn sqlite_store(&self) -> StoreResult<SqliteStore> {
        let store = SqliteStore::open_memory()?;
        self.seed(&store).await?;
        Ok(store)
    }
}

/// An instance owner, scopes from the owner role.
pub fn owner() -> Actor {
    Actor::new("owner", GlobalRole::Owner)
}

/// An ordinary member, scopes from the member role.
pub fn member(id: &str) -> Actor {
    Actor::new(id, GlobalRole::Member)
}

#[cfg(test)]
mod tests {
    use super::*;
    use credgate_store::{FindOptions, Store};

    #[tokio::test]
    async fn test_standard_world_seeds() {
        let store = SharingWorld::standard().memory_store().await.unwrap();

        let all = store.find_credentials(&FindOptions::default()).await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_dangling_membership_fails_to_seed() {
        let world = SharingWorld::new()
            .project("team", ProjectType::Team)
            .member("team", "ghost", ProjectRole::Viewer);

        assert!(world.memory_store().await.is_err());
        assert!(world.sqlite_store().await.is_err());
    }

    #[test]
    fn test_actor_for() {
        let world = SharingWorld::standard();
        assert_eq!(world.actor_for("owner"), Some(owner()));
        assert_eq!(world.actor_for("test"), Some(member("test")));
        assert!(world.actor_for("nobody").is_none());
    }
}
