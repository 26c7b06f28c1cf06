//! SQLite implementation of the Store traits.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use credgate_core::{
    ActorId, ActorRecord, Credential, CredentialId, Project, ProjectId, ProjectRelation,
    ProjectRole, SharedCredential, SharingRole,
};

use crate::error::{Result, StoreError};
use crate::loader::{load_relations, RelationReader};
use crate::migration;
use crate::query::{CredentialFilter, FindOptions};
use crate::traits::{SeedStore, Store};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "opening sqlite store");
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation on the connection off the async runtime.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Unavailable(format!("mutex poisoned: {}", e)))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("spawn_blocking failed: {}", e)))?
    }
}

type GrantColumns = (String, String, String);

fn grant_columns(row: &Row<'_>) -> rusqlite::Result<GrantColumns> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn grant_from_columns((credential_id, project_id, role): GrantColumns) -> Result<SharedCredential> {
    Ok(SharedCredential::new(
        credential_id,
        project_id,
        role.parse::<SharingRole>()?,
    ))
}

/// Build the WHERE clause and its positional parameters for a credential filter.
fn where_clause(filter: &CredentialFilter) -> (String, Vec<String>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    if let Some(id) = &filter.id {
        values.push(id.to_string());
        clauses.push(format!("c.id = ?{}", values.len()));
    }

    if let Some(shared) = &filter.shared {
        let mut grant = vec!["sc.credential_id = c.id".to_owned()];

        if let Some(roles) = &shared.role {
            grant.push(in_list("sc.role", roles.iter().map(SharingRole::as_str), &mut values));
        }

        if let Some(project) = &shared.project {
            let relation = &project.relations;
            values.push(relation.actor_id.to_string());
            let actor = values.len();
            let roles = in_list("pr.role", relation.role.iter().map(ProjectRole::as_str), &mut values);
            grant.push(format!(
                "EXISTS (SELECT 1 FROM project_relations pr \
                 WHERE pr.project_id = sc.project_id AND pr.actor_id = ?{} AND {})",
                actor, roles
            ));
        }

        clauses.push(format!(
            "EXISTS (SELECT 1 FROM shared_credentials sc WHERE {})",
            grant.join(" AND ")
        ));
    }

    if clauses.is_empty() {
        ("1".to_owned(), values)
    } else {
        (clauses.join(" AND "), values)
    }
}

/// `column IN (?n, ...)`, or an always-false clause for an empty set.
fn in_list<'a>(
    column: &str,
    items: impl Iterator<Item = &'a str>,
    values: &mut Vec<String>,
) -> String {
    let mut placeholders = Vec::new();
    for item in items {
        values.push(item.to_owned());
        placeholders.push(format!("?{}", values.len()));
    }

    if placeholders.is_empty() {
        "0".to_owned()
    } else {
        format!("{} IN ({})", column, placeholders.join(", "))
    }
}

fn select_credentials(
    conn: &Connection,
    filter: &CredentialFilter,
    limit: Option<usize>,
) -> Result<Vec<Credential>> {
    let (clause, values) = where_clause(filter);
    let mut sql = format!(
        "SELECT c.id, c.name, c.type FROM credentials c WHERE {} ORDER BY c.id",
        clause
    );
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    let mut stmt = conn.prepare(&sql)?;
    let credentials = stmt
        .query_map(params_from_iter(values.iter()), |row| {
            Ok(Credential::new(
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(credentials)
}

impl RelationReader for Connection {
    fn shares_of(&self, id: &CredentialId) -> Result<Vec<SharedCredential>> {
        let mut stmt = self.prepare(
            "SELECT credential_id, project_id, role FROM shared_credentials
             WHERE credential_id = ?1 ORDER BY project_id",
        )?;
        let rows = stmt
            .query_map(params![id.as_str()], grant_columns)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(grant_from_columns).collect()
    }

    fn project(&self, id: &ProjectId) -> Result<Option<Project>> {
        let row: Option<(String, String, String)> = self
            .query_row(
                "SELECT id, name, type FROM projects WHERE id = ?1",
                params![id.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        row.map(|(id, name, project_type)| -> Result<Project> {
            Ok(Project::new(id, name, project_type.parse()?))
        })
        .transpose()
    }

    fn memberships_of(&self, id: &ProjectId) -> Result<Vec<ProjectRelation>> {
        let mut stmt = self.prepare(
            "SELECT project_id, actor_id, role FROM project_relations
             WHERE project_id = ?1 ORDER BY actor_id",
        )?;
        let rows = stmt
            .query_map(params![id.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(project_id, actor_id, role)| -> Result<ProjectRelation> {
                Ok(ProjectRelation::new(project_id, actor_id, role.parse()?))
            })
            .collect()
    }

    fn actor(&self, id: &ActorId) -> Result<Option<ActorRecord>> {
        let row: Option<(String, String, String)> = self
            .query_row(
                "SELECT id, email, global_role FROM actors WHERE id = ?1",
                params![id.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        row.map(|(id, email, role)| -> Result<ActorRecord> {
            Ok(ActorRecord::new(id, email, role.parse()?))
        })
        .transpose()
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn find_credential(&self, options: &FindOptions) -> Result<Option<Credential>> {
        let options = options.clone();

        self.with_conn(move |conn| {
            select_credentials(conn, &options.filter, Some(1))?
                .into_iter()
                .next()
                .map(|credential| load_relations(conn, credential, options.relations))
                .transpose()
        })
        .await
    }

    async fn find_credentials(&self, options: &FindOptions) -> Result<Vec<Credential>> {
        let options = options.clone();

        self.with_conn(move |conn| {
            select_credentials(conn, &options.filter, None)?
                .into_iter()
                .map(|credential| load_relations(conn, credential, options.relations))
                .collect()
        })
        .await
    }
}

#[async_trait]
impl SeedStore for SqliteStore {
    async fn insert_actor(&self, actor: &ActorRecord) -> Result<()> {
        let actor = actor.clone();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO actors (id, email, global_role) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                    email = excluded.email,
                    global_role = excluded.global_role",
                params![actor.id.as_str(), &actor.email, actor.global_role.as_str()],
            )?;
            Ok(())
        })
        .await
    }

    async fn insert_project(&self, project: &Project) -> Result<()> {
        let project = project.clone();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO projects (id, name, type) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    type = excluded.type",
                params![project.id.as_str(), &project.name, project.project_type.as_str()],
            )?;
            Ok(())
        })
        .await
    }

    async fn insert_membership(&self, relation: &ProjectRelation) -> Result<()> {
        let relation = relation.clone();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO project_relations (project_id, actor_id, role) VALUES (?1, ?2, ?3)
                 ON CONFLICT(project_id, actor_id) DO UPDATE SET role = excluded.role",
                params![
                    relation.project_id.as_str(),
                    relation.actor_id.as_str(),
                    relation.role.as_str(),
                ],
            )
            .map_err(|e| constraint_to_invalid(e, "membership"))?;
            Ok(())
        })
        .await
    }

    async fn insert_credential(&self, credential: &Credential) -> Result<()> {
        let credential = credential.clone();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO credentials (id, name, type) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    type = excluded.type",
                params![
                    credential.id.as_str(),
                    &credential.name,
                    &credential.credential_type,
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn insert_sharing(&self, grant: &SharedCredential) -> Result<()> {
        let grant = SharedCredential::new(
            grant.credential_id.clone(),
            grant.project_id.clone(),
            grant.role,
        );

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO shared_credentials (credential_id, project_id, role) VALUES (?1, ?2, ?3)
                 ON CONFLICT(credential_id, project_id) DO UPDATE SET role = excluded.role",
                params![
                    grant.credential_id.as_str(),
                    grant.project_id.as_str(),
                    grant.role.as_str(),
                ],
            )
            .map_err(|e| constraint_to_invalid(e, "sharing grant"))?;
            Ok(())
        })
        .await
    }
}

/// Report foreign-key violations the same way the memory store does.
fn constraint_to_invalid(err: rusqlite::Error, what: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            StoreError::InvalidData(format!("{} references an unknown row: {}", what, err))
        }
        _ => StoreError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Relations;
    use credgate_core::{GlobalRole, ProjectType};

    async fn seeded() -> SqliteStore {
        let store = SqliteStore::open_memory().unwrap();
        store
            .insert_actor(&ActorRecord::new("test", "test@example.com", GlobalRole::Member))
            .await
            .unwrap();
        for id in ["p1", "p2"] {
            store
                .insert_project(&Project::new(id, id, ProjectType::Team))
                .await
                .unwrap();
        }
        store
            .insert_membership(&ProjectRelation::new("p2", "test", ProjectRole::Viewer))
            .await
            .unwrap();
        store
            .insert_credential(&Credential::new("cred_123", "Slack", "slackApi"))
            .await
            .unwrap();
        store
            .insert_sharing(&SharedCredential::new("cred_123", "p1", SharingRole::Owner))
            .await
            .unwrap();
        store
            .insert_sharing(&SharedCredential::new("cred_123", "p2", SharingRole::User))
            .await
            .unwrap();
        store
    }

    #[test]
    fn test_where_clause_shape() {
        let filter = CredentialFilter::by_id("cred_123")
            .shared_as([SharingRole::Owner, SharingRole::User])
            .with_member("test", [ProjectRole::Admin]);

        let (clause, values) = where_clause(&filter);
        assert_eq!(
            clause,
            "c.id = ?1 AND EXISTS (SELECT 1 FROM shared_credentials sc WHERE \
             sc.credential_id = c.id AND sc.role IN (?2, ?3) AND EXISTS (SELECT 1 FROM \
             project_relations pr WHERE pr.project_id = sc.project_id AND pr.actor_id = ?4 \
             AND pr.role IN (?5)))"
        );
        assert_eq!(
            values,
            vec!["cred_123", "credential:owner", "credential:user", "test", "project:admin"]
        );
    }

    #[test]
    fn test_where_clause_empty_sets() {
        let filter = CredentialFilter::any().shared_as(std::iter::empty());
        let (clause, values) = where_clause(&filter);
        assert_eq!(
            clause,
            "EXISTS (SELECT 1 FROM shared_credentials sc WHERE sc.credential_id = c.id AND 0)"
        );
        assert!(values.is_empty());

        let (clause, _) = where_clause(&CredentialFilter::any());
        assert_eq!(clause, "1");
    }

    #[tokio::test]
    async fn test_existential_match_across_grants() {
        let store = seeded().await;

        // Only the p2 grant qualifies; p1 has no membership for `test`.
        let options = FindOptions::new(
            CredentialFilter::by_id("cred_123")
                .shared_as(SharingRole::ALL)
                .with_member("test", ProjectRole::ALL),
            Relations::NONE,
        );
        assert!(store.find_credential(&options).await.unwrap().is_some());

        // Role and membership must hold on the same grant.
        let options = FindOptions::new(
            CredentialFilter::by_id("cred_123")
                .shared_as([SharingRole::Owner])
                .with_member("test", ProjectRole::ALL),
            Relations::NONE,
        );
        assert!(store.find_credential(&options).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_tree_is_not_narrowed_by_filter() {
        let store = seeded().await;
        let options = FindOptions::new(
            CredentialFilter::by_id("cred_123").with_member("test", ProjectRole::ALL),
            Relations::CREDENTIAL_SHARING_TREE,
        );

        let credential = store.find_credential(&options).await.unwrap().unwrap();
        let shared = credential.shared.unwrap();
        assert_eq!(shared.len(), 2);
        assert_eq!(shared[0].project.as_ref().unwrap().relations, Some(vec![]));
        let p2 = shared[1].project.as_ref().unwrap();
        let viewer = &p2.relations.as_ref().unwrap()[0];
        assert_eq!(viewer.actor.as_ref().unwrap().id.as_str(), "test");
    }

    #[tokio::test]
    async fn test_abandoned_lookup_leaves_store_usable() {
        let store = seeded().await;
        let options = FindOptions::new(
            CredentialFilter::by_id("cred_123"),
            Relations::CREDENTIAL_SHARING_TREE,
        );

        // Dropped before the blocking read can report back.
        let _ = tokio::time::timeout(
            std::time::Duration::ZERO,
            store.find_credential(&options),
        )
        .await;

        let credential = store.find_credential(&options).await.unwrap().unwrap();
        assert_eq!(credential.shared.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_parent_is_invalid_data() {
        let store = SqliteStore::open_memory().unwrap();
        let result = store
            .insert_sharing(&SharedCredential::new("nope", "p1", SharingRole::User))
            .await;
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_reopen_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credgate.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .insert_credential(&Credential::new("cred_1", "Postgres", "postgres"))
                .await
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let options = FindOptions::new(CredentialFilter::by_id("cred_1"), Relations::NONE);
        let credential = store.find_credential(&options).await.unwrap().unwrap();
        assert_eq!(credential.credential_type, "postgres");
    }
}
