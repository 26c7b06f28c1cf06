//! Named access cases against
//! [`SharingWorld::standard`](crate::fixtures::SharingWorld::standard).
//!
//! Every store implementation, and the finder on top of it, must agree
//! with these outcomes.

use serde::{Deserialize, Serialize};

use credgate_core::{Actor, CredentialId, GlobalRole, Scope};

use crate::fixtures::member;

/// One lookup and its expected outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessCase {
    pub name: String,
    pub description: String,
    pub actor: Actor,
    pub credential_id: CredentialId,
    pub required: Vec<Scope>,
    /// Expected credential name, or `None` for absent.
    pub expected: Option<String>,
}

/// One listing and the ids it must return, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingCase {
    pub name: String,
    pub actor: Actor,
    pub required: Vec<Scope>,
    pub expected: Vec<CredentialId>,
}

fn case(
    name: &str,
    description: &str,
    actor: Actor,
    credential_id: &str,
    expected: Option<&str>,
) -> AccessCase {
    AccessCase {
        name: name.to_owned(),
        description: description.to_owned(),
        actor,
        credential_id: CredentialId::new(credential_id),
        required: vec![Scope::CredentialRead],
        expected: expected.map(str::to_owned),
    }
}

/// All single-credential cases.
pub fn all_cases() -> Vec<AccessCase> {
    vec![
        case(
            "owner_reads_foreign",
            "global scope reaches a credential owned by someone else",
            Actor::new("owner", GlobalRole::Owner),
            "cred_789",
            Some("Postgres"),
        ),
        case(
            "owner_reads_unshared",
            "global scope reaches a credential with no grants",
            Actor::new("owner", GlobalRole::Owner),
            "cred_orphan",
            Some("Legacy"),
        ),
        case(
            "admin_reads_without_membership",
            "global admin is privileged through scopes, not through projects",
            Actor::new("admin", GlobalRole::Admin),
            "cred_456",
            Some("Slack"),
        ),
        case(
            "owner_missing",
            "global scope does not invent credentials",
            Actor::new("owner", GlobalRole::Owner),
            "cred_missing",
            None,
        ),
        AccessCase {
            required: vec![Scope::CredentialCreate, Scope::CredentialRead],
            ..case(
                "any_required_scope",
                "one matching scope out of several is enough",
                Actor::with_scopes("scoped", GlobalRole::Member, [Scope::CredentialRead]),
                "cred_456",
                Some("Slack"),
            )
        },
        case(
            "owner_role_without_read_scope",
            "the global role alone does not bypass sharing",
            Actor::with_scopes("owner", GlobalRole::Owner, [Scope::CredentialList]),
            "cred_789",
            None,
        ),
        case(
            "owner_role_without_read_scope_own",
            "without the scope, sharing still applies to the owner's own credential",
            Actor::with_scopes("owner", GlobalRole::Owner, [Scope::CredentialList]),
            "cred_456",
            Some("Slack"),
        ),
        case(
            "member_personal_owner",
            "personal project owner reads through an owner grant",
            member("test"),
            "cred_123",
            Some("GitHub"),
        ),
        case(
            "member_team_user_grant",
            "team viewer reads through a user grant",
            member("viewer"),
            "cred_123",
            Some("GitHub"),
        ),
        case(
            "member_team_owner_grant",
            "team editor reads a team-owned credential",
            member("test"),
            "cred_789",
            Some("Postgres"),
        ),
        case(
            "member_unlinked_project",
            "admin of a project without a grant sees nothing",
            member("outsider"),
            "cred_123",
            None,
        ),
        case(
            "member_foreign_personal",
            "another actor's personal credential is absent",
            member("test"),
            "cred_456",
            None,
        ),
        case(
            "member_unshared",
            "a credential with no grants is absent to members",
            member("test"),
            "cred_orphan",
            None,
        ),
        case(
            "member_unknown_actor",
            "an actor with no memberships sees nothing",
            member("ghost"),
            "cred_123",
            None,
        ),
        case(
            "member_missing",
            "missing and forbidden look the same",
            member("test"),
            "cred_missing",
            None,
        ),
    ]
}

/// All listing cases.
pub fn listing_cases() -> Vec<ListingCase> {
    let ids = |ids: &[&str]| -> Vec<CredentialId> {
        ids.iter().map(|id| CredentialId::new(*id)).collect()
    };

    vec![
        ListingCase {
            name: "owner_lists_everything".to_owned(),
            actor: Actor::new("owner", GlobalRole::Owner),
            required: vec![Scope::CredentialRead],
            expected: ids(&["cred_123", "cred_456", "cred_789", "cred_orphan"]),
        },
        ListingCase {
            name: "member_lists_each_once".to_owned(),
            actor: member("test"),
            required: vec![Scope::CredentialRead],
            expected: ids(&["cred_123", "cred_789"]),
        },
        ListingCase {
            name: "viewer_lists_team".to_owned(),
            actor: member("viewer"),
            required: vec![Scope::CredentialRead],
            expected: ids(&["cred_123", "cred_789"]),
        },
        ListingCase {
            name: "outsider_lists_nothing".to_owned(),
            actor: member("outsider"),
            required: vec![Scope::CredentialRead],
            expected: ids(&[]),
        },
        ListingCase {
            name: "member_global_list_scope".to_owned(),
            actor: member("outsider"),
            required: vec![Scope::CredentialList],
            expected: ids(&["cred_123", "cred_456", "cred_789", "cred_orphan"]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_case_names_are_unique() {
        let names: HashSet<_> = all_cases().into_iter().map(|c| c.name).collect();
        assert_eq!(names.len(), all_cases().len());

        let listings: HashSet<_> = listing_cases().into_iter().map(|c| c.name).collect();
        assert_eq!(listings.len(), listing_cases().len());
    }

    #[test]
    fn test_cases_serialize() {
        let json = serde_json::to_string_pretty(&all_cases()).unwrap();
        let back: Vec<AccessCase> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), all_cases().len());
        assert_eq!(back[0].required, vec![Scope::CredentialRead]);
    }
}
