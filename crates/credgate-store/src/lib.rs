//! # credgate store
//!
//! Storage abstraction for credential sharing data. Provides a trait-based
//! interface for credential lookups with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! Access resolution never talks to a database directly. It describes what
//! it wants as a [`FindOptions`] (a [`CredentialFilter`] plus a
//! [`Relations`] inclusion directive) and hands it to a [`Store`].
//!
//! ## Key Types
//!
//! - [`Store`] - The async read trait used by access resolution
//! - [`SeedStore`] - Inserts used to populate a store
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use credgate_core::{ProjectRole, SharingRole};
//! use credgate_store::{CredentialFilter, FindOptions, Relations, SqliteStore, Store};
//!
//! async fn example() {
//!     let store = SqliteStore::open("credgate.db").unwrap();
//!
//!     let options = FindOptions::new(
//!         CredentialFilter::by_id("cred_123")
//!             .shared_as(SharingRole::ALL)
//!             .with_member("test", ProjectRole::ALL),
//!         Relations::CREDENTIAL_SHARING_TREE,
//!     );
//!     let credential = store.find_credential(&options).await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **No match is not an error**: lookups return `Ok(None)`; `Err` is
//!   reserved for failed reads
//! - **Existential sharing**: a sharing predicate matches when *some* grant
//!   of the credential satisfies it, including its membership predicate
//! - **Uniform relation trees**: every backend loads relations through the
//!   same loader

pub mod error;
mod loader;
pub mod memory;
pub mod migration;
pub mod query;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use query::{
    CredentialFilter, FindOptions, ProjectFilter, ProjectRelationFilter, RelationDepth, Relations,
    SharingFilter,
};
pub use sqlite::SqliteStore;
pub use traits::{SeedStore, Store};
