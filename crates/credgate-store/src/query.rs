//! Query shape for credential lookups.
//!
//! A query is a structured filter over credentials, with an optional nested
//! predicate on the credential's sharing grants (and, below that, on the
//! memberships of each grant's project), plus a relation-inclusion
//! directive that says how much of the
//! credential → sharing → project → membership → actor tree to load.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use credgate_core::{
    ActorId, CredentialId, ProjectRelation, ProjectRole, SharedCredential, SharingRole,
};

/// How deep along the relation path a lookup loads.
///
/// The path is linear: a level implies every level before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RelationDepth {
    /// Only the credential row.
    None,
    /// Every sharing grant of the credential.
    Sharing,
    /// The project of each of those grants.
    Project,
    /// Each project's memberships.
    Membership,
    /// The actor record behind each membership.
    Actor,
}

/// Relation-inclusion directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relations {
    depth: RelationDepth,
}

impl Relations {
    /// Load nothing beyond the matched credentials.
    pub const NONE: Relations = Relations::through(RelationDepth::None);

    /// The full credential → sharing → project → membership → actor tree.
    ///
    /// Every access-resolution lookup uses this shape, whichever branch
    /// issued it, so callers always get the same result shape.
    pub const CREDENTIAL_SHARING_TREE: Relations = Relations::through(RelationDepth::Actor);

    pub const fn through(depth: RelationDepth) -> Self {
        Self { depth }
    }

    pub fn depth(&self) -> RelationDepth {
        self.depth
    }

    /// Whether `level` is loaded by this directive.
    pub fn includes(&self, level: RelationDepth) -> bool {
        level != RelationDepth::None && self.depth >= level
    }
}

impl Default for Relations {
    fn default() -> Self {
        Self::NONE
    }
}

/// Filter on credentials.
///
/// `None` fields impose no predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialFilter {
    pub id: Option<CredentialId>,
    /// Existential predicate: some grant of the credential must match.
    pub shared: Option<SharingFilter>,
}

/// Predicate on a single sharing grant.
///
/// A present but empty role set matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharingFilter {
    pub role: Option<BTreeSet<SharingRole>>,
    pub project: Option<ProjectFilter>,
}

/// Predicate on the project a grant points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFilter {
    pub relations: ProjectRelationFilter,
}

/// Existential predicate on a project's memberships: some membership must
/// belong to `actor_id` and carry one of `role`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRelationFilter {
    pub role: BTreeSet<ProjectRole>,
    pub actor_id: ActorId,
}

impl CredentialFilter {
    /// Match every credential.
    pub fn any() -> Self {
        Self::default()
    }

    /// Match one credential by id.
    pub fn by_id(id: impl Into<CredentialId>) -> Self {
        Self {
            id: Some(id.into()),
            shared: None,
        }
    }

    /// Require a grant whose role is one of `roles`.
    pub fn shared_as(mut self, roles: impl IntoIterator<Item = SharingRole>) -> Self {
        self.shared.get_or_insert_with(SharingFilter::default).role =
            Some(roles.into_iter().collect());
        self
    }

    /// Require a grant into a project where `actor_id` holds one of `roles`.
    ///
    /// Combines with [`shared_as`](Self::shared_as): both must hold for the
    /// same grant.
    pub fn with_member(
        mut self,
        actor_id: impl Into<ActorId>,
        roles: impl IntoIterator<Item = ProjectRole>,
    ) -> Self {
        self.shared.get_or_insert_with(SharingFilter::default).project = Some(ProjectFilter {
            relations: ProjectRelationFilter {
                role: roles.into_iter().collect(),
                actor_id: actor_id.into(),
            },
        });
        self
    }

    pub fn matches_id(&self, id: &CredentialId) -> bool {
        self.id.as_ref().map_or(true, |wanted| wanted == id)
    }
}

impl SharingFilter {
    /// Check the predicates that live on the grant row itself.
    pub fn matches_grant(&self, grant: &SharedCredential) -> bool {
        self.role
            .as_ref()
            .map_or(true, |roles| roles.contains(&grant.role))
    }
}

impl ProjectRelationFilter {
    pub fn matches(&self, relation: &ProjectRelation) -> bool {
        relation.actor_id == self.actor_id && self.role.contains(&relation.role)
    }
}

/// A complete lookup: what to match and what to load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindOptions {
    pub filter: CredentialFilter,
    pub relations: Relations,
}

impl FindOptions {
    pub fn new(filter: CredentialFilter, relations: Relations) -> Self {
        Self { filter, relations }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_depth_is_cumulative() {
        let tree = Relations::CREDENTIAL_SHARING_TREE;
        assert!(tree.includes(RelationDepth::Sharing));
        assert!(tree.includes(RelationDepth::Membership));
        assert!(tree.includes(RelationDepth::Actor));

        let shallow = Relations::through(RelationDepth::Project);
        assert!(shallow.includes(RelationDepth::Sharing));
        assert!(!shallow.includes(RelationDepth::Membership));

        assert!(!Relations::NONE.includes(RelationDepth::Sharing));
        assert!(!Relations::NONE.includes(RelationDepth::None));
    }

    #[test]
    fn test_builders_share_one_grant_predicate() {
        let filter = CredentialFilter::by_id("cred_123")
            .shared_as([SharingRole::Owner])
            .with_member("test", [ProjectRole::Viewer]);

        let shared = filter.shared.unwrap();
        assert_eq!(shared.role, Some(BTreeSet::from([SharingRole::Owner])));
        assert_eq!(shared.project.unwrap().relations.actor_id.as_str(), "test");
    }

    #[test]
    fn test_grant_predicates() {
        let grant = SharedCredential::new("cred_123", "p1", SharingRole::User);

        assert!(SharingFilter::default().matches_grant(&grant));
        let owner_only = CredentialFilter::any().shared_as([SharingRole::Owner]);
        assert!(!owner_only.shared.unwrap().matches_grant(&grant));
        let nothing = CredentialFilter::any().shared_as(std::iter::empty());
        assert!(!nothing.shared.unwrap().matches_grant(&grant));
    }

    #[test]
    fn test_id_predicate() {
        let id = CredentialId::new("cred_123");
        assert!(CredentialFilter::any().matches_id(&id));
        assert!(CredentialFilter::by_id("cred_123").matches_id(&id));
        assert!(!CredentialFilter::by_id("cred_999").matches_id(&id));
    }

    #[test]
    fn test_relation_filter() {
        let filter = CredentialFilter::any()
            .with_member("test", [ProjectRole::Editor, ProjectRole::Viewer])
            .shared
            .unwrap()
            .project
            .unwrap()
            .relations;

        assert!(filter.matches(&ProjectRelation::new("p1", "test", ProjectRole::Viewer)));
        assert!(!filter.matches(&ProjectRelation::new("p1", "other", ProjectRole::Viewer)));
        assert!(!filter.matches(&ProjectRelation::new("p1", "test", ProjectRole::Admin)));
    }
}
