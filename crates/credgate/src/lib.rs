//! # credgate
//!
//! Credential access resolution: may this actor read this credential, and
//! if so, here it is.
//!
//! ## Overview
//!
//! Two independent signals can grant read access to a credential:
//!
//! - **Global scope**: the actor's instance-wide scope set covers the
//!   requested capabilities, so per-credential sharing is bypassed
//! - **Project sharing**: the credential is shared into a project with an
//!   allowed sharing role, and the actor holds an allowed membership role
//!   in that project
//!
//! [`CredentialsFinder`] picks the branch and turns it into one store lookup.
//! "Does not exist" and "not allowed" are the same answer (`Ok(None)`);
//! only a failed read is an error.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use credgate::{CredentialsFinder, FinderConfig};
//! use credgate::core::{Actor, CredentialId, GlobalRole, Scope};
//! use credgate::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("credgate.db").unwrap();
//!     let finder = CredentialsFinder::new(store, FinderConfig::default());
//!
//!     let actor = Actor::new("test", GlobalRole::Member);
//!     let credential = finder
//!         .find_credential_for_actor(
//!             &CredentialId::new("cred_123"),
//!             &actor,
//!             &[Scope::CredentialRead],
//!         )
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `credgate::core` - Ids, roles, scopes, actor and entities
//! - `credgate::store` - Store trait, query shape, SQLite and memory stores

pub mod error;
pub mod finder;

// Re-export component crates
pub use credgate_core as core;
pub use credgate_store as store;

// Re-export main types for convenience
pub use error::{FinderError, Result};
pub use finder::{CredentialsFinder, FinderConfig};

pub use credgate_core::{
    Actor, Credential, CredentialId, GlobalRole, ProjectRole, Scope, SharingRole,
};
