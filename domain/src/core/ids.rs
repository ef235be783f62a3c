//! Local identifiers
//!
//! Questions and results are keyed by random UUIDs generated on creation.
//! Remote identifiers (population ids, job ids) are opaque vendor strings
//! and live next to the entities that use them.

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| DomainError::InvalidIdentifier(s.to_string()))
            }
        }
    };
}

uuid_id!(
    /// Identifier of a stored [`Question`](crate::question::entities::Question)
    QuestionId
);

uuid_id!(
    /// Identifier of a stored [`SimulationResult`](crate::simulation::entities::SimulationResult)
    ResultId
);
