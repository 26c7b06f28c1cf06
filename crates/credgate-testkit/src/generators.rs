//! Proptest generators for property-based testing.

use std::collections::BTreeSet;

use proptest::prelude::*;

use credgate_core::{Actor, GlobalRole, ProjectRole, ProjectType, Scope, ScopeSet, SharingRole};

use crate::fixtures::SharingWorld;

/// Generate a SharingRole.
pub fn sharing_role() -> impl Strategy<Value = SharingRole> {
    prop::sample::select(SharingRole::ALL.to_vec())
}

/// Generate a ProjectRole.
pub fn project_role() -> impl Strategy<Value = ProjectRole> {
    prop::sample::select(ProjectRole::ALL.to_vec())
}

/// Generate a GlobalRole.
pub fn global_role() -> impl Strategy<Value = GlobalRole> {
    prop::sample::select(GlobalRole::ALL.to_vec())
}

/// Generate a Scope.
pub fn scope() -> impl Strategy<Value = Scope> {
    prop::sample::select(Scope::ALL.to_vec())
}

/// Generate a scope set, possibly empty.
pub fn scope_set() -> impl Strategy<Value = ScopeSet> {
    prop::collection::btree_set(scope(), 0..=Scope::ALL.len())
}

/// Generate a non-empty list of required scopes.
pub fn required_scopes() -> impl Strategy<Value = Vec<Scope>> {
    prop::collection::vec(scope(), 1..=3)
}

/// One actor, one credential with one grant, and at most one membership.
///
/// The allowed role sets are part of the scenario so that narrowed finder
/// configurations get exercised as well as the default one.
#[derive(Debug, Clone)]
pub struct AccessScenario {
    pub global_role: GlobalRole,
    pub global_scopes: ScopeSet,
    pub grant_role: SharingRole,
    pub membership: Option<ProjectRole>,
    /// Whether the membership is in the project holding the grant or in an
    /// unrelated one.
    pub linked: bool,
    pub sharing_roles: BTreeSet<SharingRole>,
    pub project_roles: BTreeSet<ProjectRole>,
}

/// Id of the single credential in a scenario world.
pub const SCENARIO_CREDENTIAL: &str = "cred_123";

/// Id of the scenario actor.
pub const SCENARIO_ACTOR: &str = "test";

impl Arbitrary for AccessScenario {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            global_role(),
            scope_set(),
            sharing_role(),
            prop::option::of(project_role()),
            any::<bool>(),
            prop::collection::btree_set(sharing_role(), 0..=SharingRole::ALL.len()),
            prop::collection::btree_set(project_role(), 0..=ProjectRole::ALL.len()),
        )
            .prop_map(
                |(global_role, global_scopes, grant_role, membership, linked, sharing, project)| {
                    AccessScenario {
                        global_role,
                        global_scopes,
                        grant_role,
                        membership,
                        linked,
                        sharing_roles: sharing,
                        project_roles: project,
                    }
                },
            )
            .boxed()
    }
}

impl AccessScenario {
    /// The stored side of the scenario.
    pub fn world(&self) -> SharingWorld {
        let mut world = SharingWorld::new()
            .actor(SCENARIO_ACTOR, self.global_role)
            .project("shared", ProjectType::Team)
            .project("elsewhere", ProjectType::Team)
            .credential(SCENARIO_CREDENTIAL, "GitHub", "githubApi")
            .share(SCENARIO_CREDENTIAL, "shared", self.grant_role);

        if let Some(role) = self.membership {
            let project = if self.linked { "shared" } else { "elsewhere" };
            world = world.member(project, SCENARIO_ACTOR, role);
        }

        world
    }

    /// The requesting actor, carrying the generated scope set.
    pub fn actor(&self) -> Actor {
        Actor::with_scopes(
            SCENARIO_ACTOR,
            self.global_role,
            self.global_scopes.iter().copied(),
        )
    }

    /// Whether the actor should be able to read the credential.
    pub fn expect_access(&self, required: &[Scope]) -> bool {
        let global = required
            .iter()
            .any(|scope| self.global_scopes.contains(scope));

        let shared = self.linked
            && self.sharing_roles.contains(&self.grant_role)
            && self
                .membership
                .map_or(false, |role| self.project_roles.contains(&role));

        global || shared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_world_matches_scenario(scenario: AccessScenario) {
            let world = scenario.world();

            prop_assert_eq!(world.grants.len(), 1);
            prop_assert_eq!(world.memberships.len(), usize::from(scenario.membership.is_some()));
            prop_assert_eq!(&scenario.actor().global_scopes, &scenario.global_scopes);
        }

        #[test]
        fn test_unlinked_needs_global_scope(
            scenario in any::<AccessScenario>(),
            required in required_scopes(),
        ) {
            prop_assume!(!scenario.linked);

            let global = required.iter().any(|s| scenario.global_scopes.contains(s));
            prop_assert_eq!(scenario.expect_access(&required), global);
        }
    }

    #[test]
    fn test_empty_requirement_is_never_global() {
        let scenario = AccessScenario {
            global_role: GlobalRole::Owner,
            global_scopes: Scope::ALL.into_iter().collect(),
            grant_role: SharingRole::Owner,
            membership: None,
            linked: false,
            sharing_roles: BTreeSet::new(),
            project_roles: BTreeSet::new(),
        };
        assert!(!scenario.expect_access(&[]));
        assert!(scenario.expect_access(&[Scope::CredentialRead]));
    }
}
