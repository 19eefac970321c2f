//! Raw restriction metadata as delivered by the metadata extractor.
//!
//! The model stores metadata verbatim; decoding and applicability checks
//! belong to the engine's restriction resolver.

use std::sync::Arc;

use apileak_foundation::RestrictionSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Restriction metadata attached to a single declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RestrictionMetadata {
    /// Already-decoded flags.
    Flags(RestrictionSet),
    /// Javadoc-style tags (`@noextend`, `@noreference`, ...). May contain
    /// tags that are not restrictions at all.
    Tags(Vec<Arc<str>>),
    /// An encoded restriction mask from a binary API description.
    Encoded(u32),
}

impl RestrictionMetadata {
    /// Creates tag metadata from string slices.
    #[must_use]
    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Tags(tags.into_iter().map(|t| Arc::from(t.as_ref())).collect())
    }
}

impl From<RestrictionSet> for RestrictionMetadata {
    fn from(flags: RestrictionSet) -> Self {
        Self::Flags(flags)
    }
}
