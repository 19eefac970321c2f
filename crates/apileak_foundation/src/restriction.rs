//! Client restriction flags.
//!
//! Restrictions narrow how clients outside the component may use an
//! otherwise visible declaration. They are declared directly on a
//! declaration and are never inherited by subtypes.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single client restriction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RestrictionFlag {
    /// Clients may not subclass the type.
    NoExtend,
    /// Clients may not implement the interface.
    NoImplement,
    /// Clients may not instantiate the class.
    NoInstantiate,
    /// Clients may not reference the member.
    NoReference,
    /// Clients may not override the method.
    NoOverride,
}

impl RestrictionFlag {
    /// All flags, in bit order.
    pub const ALL: [RestrictionFlag; 5] = [
        RestrictionFlag::NoExtend,
        RestrictionFlag::NoImplement,
        RestrictionFlag::NoInstantiate,
        RestrictionFlag::NoReference,
        RestrictionFlag::NoOverride,
    ];

    /// Returns the bit used for this flag in encoded restriction masks.
    #[must_use]
    pub const fn bit(self) -> u32 {
        match self {
            Self::NoExtend => 1,
            Self::NoImplement => 1 << 1,
            Self::NoInstantiate => 1 << 2,
            Self::NoReference => 1 << 3,
            Self::NoOverride => 1 << 4,
        }
    }

    /// Returns the javadoc tag that declares this flag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::NoExtend => "@noextend",
            Self::NoImplement => "@noimplement",
            Self::NoInstantiate => "@noinstantiate",
            Self::NoReference => "@noreference",
            Self::NoOverride => "@nooverride",
        }
    }

    /// Parses a javadoc tag. The leading `@` is optional and case is ignored.
    ///
    /// Returns `None` for anything that is not a restriction tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let trimmed = tag.trim();
        let bare = trimmed.strip_prefix('@').unwrap_or(trimmed);
        Self::ALL
            .into_iter()
            .find(|flag| flag.tag()[1..].eq_ignore_ascii_case(bare))
    }
}

impl fmt::Display for RestrictionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A set of restriction flags stored as a bitset.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RestrictionSet(u32);

impl RestrictionSet {
    /// No restrictions.
    pub const EMPTY: RestrictionSet = RestrictionSet(0);

    /// Mask of every bit that encodes a known flag.
    pub const KNOWN_BITS: u32 = 0b1_1111;

    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Decodes an encoded mask.
    ///
    /// Returns `None` if any bit outside [`Self::KNOWN_BITS`] is set.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Option<Self> {
        if bits & !Self::KNOWN_BITS == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// Returns the encoded mask.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns a copy of this set with `flag` added.
    #[must_use]
    pub const fn with(self, flag: RestrictionFlag) -> Self {
        Self(self.0 | flag.bit())
    }

    /// Returns a copy of this set with `flag` removed.
    #[must_use]
    pub const fn without(self, flag: RestrictionFlag) -> Self {
        Self(self.0 & !flag.bit())
    }

    /// Adds a flag in place.
    pub fn insert(&mut self, flag: RestrictionFlag) {
        self.0 |= flag.bit();
    }

    /// Returns true if the set contains `flag`.
    #[must_use]
    pub const fn contains(self, flag: RestrictionFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the union of two sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns the intersection of two sets.
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Iterates the flags in the set.
    pub fn iter(self) -> impl Iterator<Item = RestrictionFlag> {
        RestrictionFlag::ALL
            .into_iter()
            .filter(move |flag| self.contains(*flag))
    }
}

impl FromIterator<RestrictionFlag> for RestrictionSet {
    fn from_iter<I: IntoIterator<Item = RestrictionFlag>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

impl From<RestrictionFlag> for RestrictionSet {
    fn from(flag: RestrictionFlag) -> Self {
        Self::new().with(flag)
    }
}

impl fmt::Debug for RestrictionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for RestrictionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for flag in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{flag}")?;
            first = false;
        }
        Ok(())
    }
}
