//! Restriction metadata resolution.
//!
//! Decodes the raw side table of a snapshot into [`RestrictionSet`]s and
//! drops flags that cannot apply to the declaration they are attached to.
//! Resolution is a pure lookup: no inheritance, and anything malformed
//! reads as "no restriction".

use std::collections::HashMap;

use apileak_foundation::{DeclId, RestrictionFlag, RestrictionSet};
use apileak_model::{DeclKind, Declaration, RestrictionMetadata, Snapshot};

// =============================================================================
// Resolver Trait
// =============================================================================

/// Looks up the restriction flags declared on a declaration.
pub trait RestrictionResolver {
    /// Returns the flags declared on `id`; empty when there are none.
    fn restrictions_of(&self, id: DeclId) -> RestrictionSet;

    /// Returns true if `id` carries `flag`.
    fn has(&self, id: DeclId, flag: RestrictionFlag) -> bool {
        self.restrictions_of(id).contains(flag)
    }
}

impl<R: RestrictionResolver + ?Sized> RestrictionResolver for &R {
    fn restrictions_of(&self, id: DeclId) -> RestrictionSet {
        (**self).restrictions_of(id)
    }
}

/// Fixed flag table, handy for swapping out snapshot metadata in tests.
impl RestrictionResolver for HashMap<DeclId, RestrictionSet> {
    fn restrictions_of(&self, id: DeclId) -> RestrictionSet {
        self.get(&id).copied().unwrap_or_default()
    }
}

// =============================================================================
// Snapshot-backed Resolver
// =============================================================================

/// Resolves restrictions from a snapshot's metadata side table.
#[derive(Clone, Copy, Debug)]
pub struct MetadataRestrictions<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> MetadataRestrictions<'a> {
    /// Creates a resolver over `snapshot`.
    #[must_use]
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    /// Returns the snapshot this resolver reads.
    #[must_use]
    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }
}

impl RestrictionResolver for MetadataRestrictions<'_> {
    fn restrictions_of(&self, id: DeclId) -> RestrictionSet {
        let (Some(decl), Some(metadata)) = (
            self.snapshot.get(id),
            self.snapshot.restriction_metadata(id),
        ) else {
            return RestrictionSet::EMPTY;
        };
        let declared = decode(metadata);
        let effective = declared.intersection(applicable_flags(decl));
        if effective != declared {
            tracing::trace!(
                %id,
                declared = %declared,
                effective = %effective,
                "dropped inapplicable restriction flags"
            );
        }
        effective
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decodes raw metadata, ignoring anything it does not understand.
///
/// Unknown tags are skipped one by one. An encoded mask with a bit outside
/// the known flags cannot be trusted at all and decodes to the empty set.
#[must_use]
pub fn decode(metadata: &RestrictionMetadata) -> RestrictionSet {
    match metadata {
        RestrictionMetadata::Flags(flags) => *flags,
        RestrictionMetadata::Tags(tags) => tags
            .iter()
            .filter_map(|tag| RestrictionFlag::from_tag(tag))
            .collect(),
        RestrictionMetadata::Encoded(bits) => RestrictionSet::from_bits(*bits).unwrap_or_else(|| {
            tracing::trace!(bits, "ignoring malformed restriction mask");
            RestrictionSet::EMPTY
        }),
    }
}

/// Returns the flags that are meaningful on `decl`.
#[must_use]
pub fn applicable_flags(decl: &Declaration) -> RestrictionSet {
    let mut flags = RestrictionSet::EMPTY;
    match &decl.kind {
        DeclKind::Class { .. } => {
            flags.insert(RestrictionFlag::NoExtend);
            if !decl.modifiers.is_abstract() {
                flags.insert(RestrictionFlag::NoInstantiate);
            }
        }
        DeclKind::Interface { .. } => {
            flags.insert(RestrictionFlag::NoExtend);
            flags.insert(RestrictionFlag::NoImplement);
        }
        DeclKind::Field { .. } | DeclKind::Constructor { .. } => {
            flags.insert(RestrictionFlag::NoReference);
        }
        DeclKind::Method { .. } => {
            flags.insert(RestrictionFlag::NoReference);
            if !decl.modifiers.is_static() && !decl.modifiers.is_final() {
                flags.insert(RestrictionFlag::NoOverride);
            }
        }
    }
    flags
}
