//! Declaration identifiers.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier of a declaration inside a snapshot arena.
///
/// Supertype, interface, enclosing and override links are stored as
/// `DeclId`s rather than owning pointers, so a snapshot never contains
/// ownership cycles and can be shared freely between analysis calls.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeclId(u32);

impl DeclId {
    /// Creates an identifier from a raw index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this identifier.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Returns the identifier following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for DeclId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}
