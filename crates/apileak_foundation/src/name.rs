//! Qualified identifiers.
//!
//! Names are shared (`Arc<str>`) so cloning a declaration or a diagnosis
//! never copies string data.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A dot-separated qualified identifier such as `x.y.z.internal` or
/// `x.y.z.test1.inner`.
///
/// Binary-style nested names (`Outer$Inner`) are accepted as well; both `.`
/// and `$` separate the simple name from its qualifier.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QualifiedName(Arc<str>);

impl QualifiedName {
    /// Creates a qualified name.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Returns the full name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last segment of the name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        match self.0.rfind(['.', '$']) {
            Some(pos) => &self.0[pos + 1..],
            None => &self.0,
        }
    }

    /// Returns everything before the last `.`, or `None` for an unqualified name.
    ///
    /// For a top-level type this is its package.
    #[must_use]
    pub fn qualifier(&self) -> Option<&str> {
        self.0.rfind('.').map(|pos| &self.0[..pos])
    }

    /// Returns a new name with `segment` appended after a `.`.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        Self(format!("{}.{segment}", self.0).into())
    }

    /// Returns the shared string backing this name.
    #[must_use]
    pub fn to_shared(&self) -> Arc<str> {
        Arc::clone(&self.0)
    }
}

impl fmt::Debug for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QualifiedName({})", self.0)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QualifiedName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for QualifiedName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl Borrow<str> for QualifiedName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for QualifiedName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
