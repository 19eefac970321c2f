//! Mutable construction of a snapshot, validated once at the end.
//!
//! Types may refer to each other in any order, so links are only checked
//! when [`SnapshotBuilder::build`] is called.

use apileak_foundation::{DeclId, Error, QualifiedName, Result, RestrictionSet};

use crate::declaration::Declaration;
use crate::metadata::RestrictionMetadata;
use crate::snapshot::{Snapshot, UnitName};

/// Builds a [`Snapshot`] from front-end output.
#[derive(Clone, Debug, Default)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing snapshot. New ids continue after its highest id.
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Adds a declaration under the next free id.
    pub fn declare(&mut self, declaration: Declaration) -> DeclId {
        let id = self.snapshot.next_id;
        self.snapshot.put(id, declaration);
        id
    }

    /// Adds a declaration under a caller-chosen id.
    pub fn declare_with_id(&mut self, id: DeclId, declaration: Declaration) -> Result<()> {
        if self.snapshot.contains(id) {
            return Err(Error::duplicate_declaration(id));
        }
        self.snapshot.put(id, declaration);
        Ok(())
    }

    /// Attaches decoded restriction flags to a declaration.
    pub fn restrict(&mut self, id: DeclId, flags: RestrictionSet) -> &mut Self {
        self.snapshot
            .restrictions
            .insert(id, RestrictionMetadata::Flags(flags));
        self
    }

    /// Attaches raw restriction metadata to a declaration.
    pub fn metadata(&mut self, id: DeclId, metadata: RestrictionMetadata) -> &mut Self {
        self.snapshot.restrictions.insert(id, metadata);
        self
    }

    /// Marks a package as part of the component's API.
    pub fn export_package(&mut self, package: impl Into<QualifiedName>) -> &mut Self {
        self.snapshot.exported.insert(package.into());
        self
    }

    /// Assigns a top-level type to a compilation unit.
    pub fn assign_unit(&mut self, id: DeclId, unit: impl Into<UnitName>) -> &mut Self {
        self.snapshot.units.insert(id, unit.into());
        self
    }

    /// Returns the snapshot built so far without validating it.
    #[must_use]
    pub fn peek(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Validates and returns the snapshot.
    pub fn build(self) -> Result<Snapshot> {
        self.snapshot.validate()?;
        tracing::debug!(
            declarations = self.snapshot.len(),
            exported = self.snapshot.exported.len(),
            "built snapshot"
        );
        Ok(self.snapshot)
    }
}
