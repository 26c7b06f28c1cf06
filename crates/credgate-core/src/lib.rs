//! # credgate core
//!
//! Pure data model for credential access resolution: identifiers, closed role
//! enumerations, capability scopes, the requesting actor, and the persisted
//! entities a store hands back.
//!
//! This crate contains no I/O and no storage.
//!
//! ## Key Types
//!
//! - [`Actor`] - The identity asking for access, carrying its global scopes
//! - [`Scope`] - A `resource:operation` capability token
//! - [`SharingRole`] / [`ProjectRole`] / [`GlobalRole`] - Closed role sets
//! - [`Credential`], [`SharedCredential`], [`Project`], [`ProjectRelation`] -
//!   Entities with lazily loaded relations

pub mod actor;
pub mod entity;
pub mod error;
pub mod roles;
pub mod scope;
pub mod types;

pub use actor::Actor;
pub use entity::{ActorRecord, Credential, Project, ProjectRelation, ProjectType, SharedCredential};
pub use error::{CoreError, Result};
pub use roles::{GlobalRole, ProjectRole, SharingRole};
pub use scope::{has_scope, Scope, ScopeMode, ScopeSet};
pub use types::{ActorId, CredentialId, ProjectId};
