//! Typed identifiers
//!
//! Identifiers are opaque integers assigned by the persistence layer. Wrapping
//! them keeps a `UserId` from ever being passed where a `SolutionId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub fn get(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $prefix, self.0)
            }
        }
    };
}

typed_id!(
    /// Identity of a proposal
    ProposalId,
    "proposal"
);
typed_id!(
    /// Identity of a group member
    UserId,
    "user"
);
typed_id!(
    /// Identity of one competing solution inside a proposal
    SolutionId,
    "solution"
);
typed_id!(
    /// Identity of the group a proposal belongs to
    GroupId,
    "group"
);
