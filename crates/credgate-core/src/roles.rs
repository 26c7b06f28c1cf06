//! Closed role enumerations.
//!
//! Roles live in three namespaces: `global:` (instance-wide), `project:`
//! (membership in a project) and `credential:` (how a credential is shared
//! into a project). Unknown names are rejected when parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::scope::{Scope, ScopeSet};

/// Role of a sharing grant between a credential and a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SharingRole {
    /// The project owns the credential.
    #[serde(rename = "credential:owner")]
    Owner,
    /// The credential is shared into the project for use.
    #[serde(rename = "credential:user")]
    User,
}

/// Role of an actor's membership in a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProjectRole {
    #[serde(rename = "project:admin")]
    Admin,
    /// Owner of a personal project.
    #[serde(rename = "project:personalOwner")]
    PersonalOwner,
    #[serde(rename = "project:editor")]
    Editor,
    #[serde(rename = "project:viewer")]
    Viewer,
}

/// Instance-wide role of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GlobalRole {
    #[serde(rename = "global:owner")]
    Owner,
    #[serde(rename = "global:admin")]
    Admin,
    #[serde(rename = "global:member")]
    Member,
}

impl SharingRole {
    pub const ALL: [SharingRole; 2] = [SharingRole::Owner, SharingRole::User];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SharingRole::Owner => "credential:owner",
            SharingRole::User => "credential:user",
        }
    }
}

impl ProjectRole {
    pub const ALL: [ProjectRole; 4] = [
        ProjectRole::Admin,
        ProjectRole::PersonalOwner,
        ProjectRole::Editor,
        ProjectRole::Viewer,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ProjectRole::Admin => "project:admin",
            ProjectRole::PersonalOwner => "project:personalOwner",
            ProjectRole::Editor => "project:editor",
            ProjectRole::Viewer => "project:viewer",
        }
    }
}

impl GlobalRole {
    pub const ALL: [GlobalRole; 3] = [GlobalRole::Owner, GlobalRole::Admin, GlobalRole::Member];

    pub const fn as_str(&self) -> &'static str {
        match self {
            GlobalRole::Owner => "global:owner",
            GlobalRole::Admin => "global:admin",
            GlobalRole::Member => "global:member",
        }
    }

    /// The scopes this role grants instance-wide.
    ///
    /// Owners and admins hold every scope. Members can create and list
    /// credentials but must be granted access to any specific one through
    /// project sharing.
    pub fn scopes(&self) -> ScopeSet {
        match self {
            GlobalRole::Owner | GlobalRole::Admin => Scope::ALL.into_iter().collect(),
            GlobalRole::Member => [
                Scope::CredentialCreate,
                Scope::CredentialList,
                Scope::ProjectList,
            ]
            .into_iter()
            .collect(),
        }
    }
}

macro_rules! role_text {
    ($ty:ident, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::ALL
                    .into_iter()
                    .find(|role| role.as_str() == s)
                    .ok_or_else(|| CoreError::UnknownRole {
                        kind: $kind,
                        name: s.to_owned(),
                    })
            }
        }
    };
}

role_text!(SharingRole, "sharing");
role_text!(ProjectRole, "project");
role_text!(GlobalRole, "global");
