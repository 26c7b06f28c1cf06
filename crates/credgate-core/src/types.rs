//! Strong identifier types.
//!
//! Credentials, projects and actors are all keyed by opaque strings. Each
//! gets its own newtype so a project id can never be passed where an actor
//! id is expected.

use std::fmt;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Length of generated identifiers.
pub const GENERATED_ID_LEN: usize = 16;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier without validation.
            ///
            /// A malformed id is not an error here; it simply matches nothing.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Wrap a raw identifier, rejecting the empty string.
            pub fn try_new(id: impl Into<String>) -> Result<Self> {
                let id = id.into();
                if id.is_empty() {
                    return Err(CoreError::EmptyId);
                }
                Ok(Self(id))
            }

            /// Generate a random alphanumeric identifier.
            pub fn generate() -> Self {
                let id: String = rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(GENERATED_ID_LEN)
                    .map(char::from)
                    .collect();
                Self(id)
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the raw identifier.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id! {
    /// Identifier of a stored credential.
    CredentialId
}

string_id! {
    /// Identifier of a project (personal or team).
    ProjectId
}

string_id! {
    /// Identifier of an actor (end user or service identity).
    ActorId
}
