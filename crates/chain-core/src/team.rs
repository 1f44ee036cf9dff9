use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Team identifier as reported by the host.
///
/// Hosts number teams from 1; the wire value 0 means "nobody" and is modelled by
/// [`Owner::Unowned`](crate::Owner::Unowned) or
/// [`ProgressOwner::Stalemate`](crate::ProgressOwner::Stalemate) instead of a `TeamId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct TeamId(pub u32);

impl TeamId {
    /// Stable numeric id for seeding and logs.
    pub fn stable_id(self) -> u64 {
        self.0 as u64
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team{}", self.0)
    }
}
