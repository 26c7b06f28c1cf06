//! Capability scopes and scope checks.
//!
//! A scope is a `resource:operation` token. Global roles map to a fixed set
//! of scopes; the finder only ever asks whether an actor's global set
//! satisfies the scopes a caller requires.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A capability token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "credential:create")]
    CredentialCreate,
    #[serde(rename = "credential:read")]
    CredentialRead,
    #[serde(rename = "credential:update")]
    CredentialUpdate,
    #[serde(rename = "credential:delete")]
    CredentialDelete,
    #[serde(rename = "credential:list")]
    CredentialList,
    #[serde(rename = "credential:share")]
    CredentialShare,
    #[serde(rename = "credential:move")]
    CredentialMove,
    #[serde(rename = "project:list")]
    ProjectList,
}

impl Scope {
    /// Every known scope.
    pub const ALL: [Scope; 8] = [
        Scope::CredentialCreate,
        Scope::CredentialRead,
        Scope::CredentialUpdate,
        Scope::CredentialDelete,
        Scope::CredentialList,
        Scope::CredentialShare,
        Scope::CredentialMove,
        Scope::ProjectList,
    ];

    /// The wire name of this scope.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Scope::CredentialCreate => "credential:create",
            Scope::CredentialRead => "credential:read",
            Scope::CredentialUpdate => "credential:update",
            Scope::CredentialDelete => "credential:delete",
            Scope::CredentialList => "credential:list",
            Scope::CredentialShare => "credential:share",
            Scope::CredentialMove => "credential:move",
            Scope::ProjectList => "project:list",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| CoreError::UnknownScope(s.to_owned()))
    }
}

/// A set of granted scopes.
pub type ScopeSet = BTreeSet<Scope>;

/// How a list of required scopes is matched against a granted set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScopeMode {
    /// Any one of the required scopes suffices.
    #[default]
    OneOf,
    /// Every required scope must be granted.
    AllOf,
}

/// Check required scopes against a granted set.
///
/// An empty requirement is never satisfied.
pub fn has_scope(required: &[Scope], granted: &ScopeSet, mode: ScopeMode) -> bool {
    if required.is_empty() {
        return false;
    }

    match mode {
        ScopeMode::OneOf => required.iter().any(|s| granted.contains(s)),
        ScopeMode::AllOf => required.iter().all(|s| granted.contains(s)),
    }
}
