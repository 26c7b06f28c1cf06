//! # credgate testkit
//!
//! Testing utilities for credgate.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: [`SharingWorld`], a declarative set of rows that seeds any store
//! - **Stores**: [`RecordingStore`] to inspect the lookups the finder issues,
//!   [`FailingStore`] to simulate an unavailable backend
//! - **Access cases**: named lookups with expected outcomes over the standard world
//! - **Generators**: Proptest strategies for roles, scopes and whole scenarios
//!
//! ## Access Cases
//!
//! ```rust
//! use credgate_testkit::cases::all_cases;
//!
//! for case in all_cases() {
//!     println!("{}: {:?}", case.name, case.expected);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use credgate_testkit::generators::AccessScenario;
//!
//! proptest! {
//!     #[test]
//!     fn scenario_world_has_one_grant(scenario: AccessScenario) {
//!         prop_assert_eq!(scenario.world().grants.len(), 1);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use credgate_testkit::fixtures::SharingWorld;
//!
//! async fn example() {
//!     let store = SharingWorld::standard().memory_store().await.unwrap();
//! }
//! ```

pub mod cases;
pub mod fixtures;
pub mod generators;
pub mod stores;

pub use cases::{all_cases, listing_cases, AccessCase, ListingCase};
pub use fixtures::{member, owner, SharingWorld};
pub use generators::AccessScenario;
pub use stores::{FailingStore, RecordingStore};
