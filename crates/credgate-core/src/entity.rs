//! Persisted entities and their relations.
//!
//! Relations are optional: a store fills them in only when the query asks
//! for them, so `None` means "not loaded" rather than "empty".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::{GlobalRole, ProjectRole, SharingRole};
use crate::types::{ActorId, CredentialId, ProjectId};

/// A stored credential. The payload itself never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub id: CredentialId,
    pub name: String,
    /// Integration type, e.g. `githubApi`.
    #[serde(rename = "type")]
    pub credential_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared: Option<Vec<SharedCredential>>,
}

/// A sharing grant: one credential shared into one project with a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedCredential {
    pub credential_id: CredentialId,
    pub project_id: ProjectId,
    pub role: SharingRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,
}

/// Kind of project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Exactly one actor's own project.
    Personal,
    Team,
}

/// An organizational container for credentials and members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relations: Option<Vec<ProjectRelation>>,
}

/// An actor's membership in a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRelation {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
    pub role: ProjectRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorRecord>,
}

/// The stored side of an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRecord {
    pub id: ActorId,
    pub email: String,
    pub global_role: GlobalRole,
}

impl Credential {
    /// A credential with no relations loaded.
    pub fn new(
        id: impl Into<CredentialId>,
        name: impl Into<String>,
        credential_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            credential_type: credential_type.into(),
            shared: None,
        }
    }
}

impl SharedCredential {
    /// A sharing grant with no relations loaded.
    pub fn new(
        credential_id: impl Into<CredentialId>,
        project_id: impl Into<ProjectId>,
        role: SharingRole,
    ) -> Self {
        Self {
            credential_id: credential_id.into(),
            project_id: project_id.into(),
            role,
            project: None,
        }
    }
}

impl Project {
    pub fn new(id: impl Into<ProjectId>, name: impl Into<String>, project_type: ProjectType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            project_type,
            relations: None,
        }
    }
}

impl ProjectRelation {
    pub fn new(
        project_id: impl Into<ProjectId>,
        actor_id: impl Into<ActorId>,
        role: ProjectRole,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            actor_id: actor_id.into(),
            role,
            actor: None,
        }
    }
}

impl ActorRecord {
    pub fn new(id: impl Into<ActorId>, email: impl Into<String>, global_role: GlobalRole) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            global_role,
        }
    }
}

impl ProjectType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Personal => "personal",
            ProjectType::Team => "team",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(ProjectType::Personal),
            "team" => Ok(ProjectType::Team),
            other => Err(CoreError::UnknownProjectType(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unloaded_relations_are_omitted() {
        let cred = Credential::new("cred_123", "GitHub", "githubApi");
        let json = serde_json::to_value(&cred).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "cred_123", "name": "GitHub", "type": "githubApi"})
        );
    }

    #[test]
    fn test_nested_shape_deserializes() {
        let json = serde_json::json!({
            "credential_id": "cred_123",
            "project_id": "p1",
            "role": "credential:owner",
            "project": {
                "id": "p1",
                "name": "Team",
                "type": "team",
                "relations": [
                    {"project_id": "p1", "actor_id": "test", "role": "project:editor"}
                ]
            }
        });
        let shared: SharedCredential = serde_json::from_value(json).unwrap();
        let relations = shared.project.unwrap().relations.unwrap();
        assert_eq!(relations[0].role, ProjectRole::Editor);
        assert!(relations[0].actor.is_none());
    }

    #[test]
    fn test_project_type_parse() {
        assert_eq!("team".parse::<ProjectType>(), Ok(ProjectType::Team));
        let err = "org".parse::<ProjectType>().unwrap_err();
        assert_eq!(err, CoreError::UnknownProjectType("org".into()));
        assert_eq!(err.to_string(), "unknown project type: org");
    }
}
