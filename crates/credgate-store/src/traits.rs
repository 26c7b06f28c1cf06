//! Store traits: the abstract interface to credential sharing persistence.
//!
//! Access resolution is storage-agnostic. Implementations include SQLite
//! (primary) and in-memory (for tests and embedding).

use async_trait::async_trait;
use credgate_core::{ActorRecord, Credential, Project, ProjectRelation, SharedCredential};

use crate::error::Result;
use crate::query::FindOptions;

/// Read side of the store, as seen by access resolution.
///
/// # Design Notes
///
/// - **Absent is not an error**: a lookup that matches nothing returns
///   `Ok(None)` / an empty vec. `Err` always means the read itself failed.
/// - **Deterministic order**: matches are ordered by credential id, and
///   loaded grants by project id.
/// - **Relations**: the loaded subtree follows `options.relations` and is
///   never narrowed by the filter.
/// - **Cancellation**: dropping a lookup future only abandons the await. A
///   read already handed to a blocking worker (SQLite) runs to completion
///   and its result is discarded.
#[async_trait]
pub trait Store: Send + Sync {
    /// Find at most one credential matching `options.filter`.
    async fn find_credential(&self, options: &FindOptions) -> Result<Option<Credential>>;

    /// Find every credential matching `options.filter`.
    async fn find_credentials(&self, options: &FindOptions) -> Result<Vec<Credential>>;
}

/// Write side used to populate a store.
///
/// Inserts replace an existing row with the same key. Rows that reference a
/// missing parent (a grant for an unknown credential, a membership in an
/// unknown project) are rejected.
#[async_trait]
pub trait SeedStore: Store {
    async fn insert_actor(&self, actor: &ActorRecord) -> Result<()>;

    /// Insert a project. Any `relations` on it are ignored.
    async fn insert_project(&self, project: &Project) -> Result<()>;

    async fn insert_membership(&self, relation: &ProjectRelation) -> Result<()>;

    /// Insert a credential. Any `shared` on it is ignored.
    async fn insert_credential(&self, credential: &Credential) -> Result<()>;

    async fn insert_sharing(&self, grant: &SharedCredential) -> Result<()>;
}

#[async_trait]
impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    async fn find_credential(&self, options: &FindOptions) -> Result<Option<Credential>> {
        (**self).find_credential(options).await
    }

    async fn find_credentials(&self, options: &FindOptions) -> Result<Vec<Credential>> {
        (**self).find_credentials(options).await
    }
}
