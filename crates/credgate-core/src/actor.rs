//! The actor requesting access.

use serde::{Deserialize, Serialize};

use crate::roles::GlobalRole;
use crate::scope::{has_scope, Scope, ScopeMode, ScopeSet};
use crate::types::ActorId;

/// An identity attempting to access a credential.
///
/// There is one actor type for every class of user. What distinguishes an
/// instance owner from a member is only the global scope set it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub global_role: GlobalRole,
    pub global_scopes: ScopeSet,
}

impl Actor {
    /// Create an actor whose scopes come from its global role.
    pub fn new(id: impl Into<ActorId>, global_role: GlobalRole) -> Self {
        Self {
            id: id.into(),
            global_role,
            global_scopes: global_role.scopes(),
        }
    }

    /// Create an actor with an explicit global scope set.
    pub fn with_scopes(
        id: impl Into<ActorId>,
        global_role: GlobalRole,
        scopes: impl IntoIterator<Item = Scope>,
    ) -> Self {
        Self {
            id: id.into(),
            global_role,
            global_scopes: scopes.into_iter().collect(),
        }
    }

    /// Whether this actor belongs to the instance-wide elevated class
    /// (owner or admin).
    ///
    /// Informational only: access decisions go through
    /// [`Actor::has_global_scope`].
    pub fn is_privileged(&self) -> bool {
        matches!(self.global_role, GlobalRole::Owner | GlobalRole::Admin)
    }

    /// Whether the actor's global scopes satisfy any of `required`.
    pub fn has_global_scope(&self, required: &[Scope]) -> bool {
        self.has_global_scope_with(required, ScopeMode::OneOf)
    }

    /// Like [`Actor::has_global_scope`] with an explicit match mode.
    pub fn has_global_scope_with(&self, required: &[Scope], mode: ScopeMode) -> bool {
        has_scope(required, &self.global_scopes, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_has_global_read() {
        let owner = Actor::new("owner", GlobalRole::Owner);
        assert!(owner.is_privileged());
        assert!(owner.has_global_scope(&[Scope::CredentialRead]));
    }

    #[test]
    fn test_admin_is_privileged() {
        let admin = Actor::new("admin", GlobalRole::Admin);
        assert!(admin.is_privileged());
        assert!(admin.has_global_scope(&[Scope::CredentialRead]));
    }

    #[test]
    fn test_member_lacks_global_read() {
        let member = Actor::new("test", GlobalRole::Member);
        assert!(!member.is_privileged());
        assert!(!member.has_global_scope(&[Scope::CredentialRead]));
        assert!(member.has_global_scope(&[Scope::CredentialRead, Scope::CredentialList]));
        assert!(!member.has_global_scope_with(
            &[Scope::CredentialRead, Scope::CredentialList],
            ScopeMode::AllOf
        ));
    }

    #[test]
    fn test_scopes_decide_not_role() {
        // A member with an explicitly widened scope set passes the check,
        // an owner with an emptied set does not.
        let widened = Actor::with_scopes("svc", GlobalRole::Member, [Scope::CredentialRead]);
        assert!(widened.has_global_scope(&[Scope::CredentialRead]));

        let stripped = Actor::with_scopes("root", GlobalRole::Owner, std::iter::empty());
        assert!(stripped.is_privileged());
        assert!(!stripped.has_global_scope(&[Scope::CredentialRead]));
    }
}
