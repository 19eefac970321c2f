//! Declared visibility, nesting, and modifiers.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Declared access level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Visibility {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// Default (package-private) access.
    Package,
    /// `private`
    Private,
}

impl Visibility {
    /// Returns true for `public` and `protected`, the only levels a client
    /// outside the package can ever see.
    #[must_use]
    pub const fn is_exposed(self) -> bool {
        matches!(self, Self::Public | Self::Protected)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Package => "package",
            Self::Private => "private",
        })
    }
}

/// Lexical position of a declaration relative to its enclosing type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Nesting {
    /// Declared directly in a package.
    TopLevel,
    /// A static member (nested type, field, or method) of a type.
    MemberStatic,
    /// An instance member of a type.
    MemberInstance,
    /// A type declared inside a method body.
    Local,
    /// An anonymous type.
    Anonymous,
}

impl Nesting {
    /// Returns true for static and instance members.
    #[must_use]
    pub const fn is_member(self) -> bool {
        matches!(self, Self::MemberStatic | Self::MemberInstance)
    }

    /// Returns true for local and anonymous types.
    #[must_use]
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Local | Self::Anonymous)
    }
}

/// A single declaration modifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Modifier {
    /// `final`
    Final,
    /// `static`
    Static,
    /// `abstract`
    Abstract,
}

impl Modifier {
    /// All modifiers, in bit order.
    pub const ALL: [Modifier; 3] = [Modifier::Final, Modifier::Static, Modifier::Abstract];

    const fn bit(self) -> u8 {
        match self {
            Self::Final => 1,
            Self::Static => 1 << 1,
            Self::Abstract => 1 << 2,
        }
    }
}

/// A set of modifiers stored as a bitset.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Modifiers(u8);

impl Modifiers {
    /// The empty set.
    pub const NONE: Modifiers = Modifiers(0);

    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Returns a copy of this set with `modifier` added.
    #[must_use]
    pub const fn with(self, modifier: Modifier) -> Self {
        Self(self.0 | modifier.bit())
    }

    /// Adds a modifier in place.
    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    /// Returns true if the set contains `modifier`.
    #[must_use]
    pub const fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    /// Returns true if the set contains `final`.
    #[must_use]
    pub const fn is_final(self) -> bool {
        self.contains(Modifier::Final)
    }

    /// Returns true if the set contains `static`.
    #[must_use]
    pub const fn is_static(self) -> bool {
        self.contains(Modifier::Static)
    }

    /// Returns true if the set contains `abstract`.
    #[must_use]
    pub const fn is_abstract(self) -> bool {
        self.contains(Modifier::Abstract)
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the modifiers in the set.
    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        Modifier::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

impl From<Modifier> for Modifiers {
    fn from(modifier: Modifier) -> Self {
        Self::new().with(modifier)
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
