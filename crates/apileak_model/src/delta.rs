//! Incremental updates to a snapshot.
//!
//! An incremental build describes what changed since the previous snapshot
//! as a `SnapshotDelta`. Applying it yields a new, validated snapshot; the
//! previous snapshot is never modified.

use apileak_foundation::{DeclId, Error, ErrorContext, QualifiedName, Result};

use crate::declaration::Declaration;
use crate::metadata::RestrictionMetadata;
use crate::snapshot::{Snapshot, UnitName};

/// A single incremental change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeltaOp {
    /// Inserts or replaces a declaration.
    Upsert {
        /// Id of the declaration.
        id: DeclId,
        /// New contents.
        declaration: Declaration,
    },
    /// Removes a declaration and everything nested inside it.
    Remove(DeclId),
    /// Replaces the restriction metadata of a declaration.
    SetRestrictions {
        /// Id of the declaration.
        id: DeclId,
        /// New metadata.
        metadata: RestrictionMetadata,
    },
    /// Removes the restriction metadata of a declaration.
    ClearRestrictions(DeclId),
    /// Adds a package to the export table.
    ExportPackage(QualifiedName),
    /// Removes a package from the export table.
    UnexportPackage(QualifiedName),
    /// Assigns a top-level type to a compilation unit.
    AssignUnit {
        /// Id of the top-level type.
        id: DeclId,
        /// Unit name.
        unit: UnitName,
    },
}

/// An ordered batch of changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnapshotDelta {
    ops: Vec<DeltaOp>,
}

impl SnapshotDelta {
    /// Creates an empty delta.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if there are no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Returns the operations in order.
    #[must_use]
    pub fn ops(&self) -> &[DeltaOp] {
        &self.ops
    }

    /// Appends an operation.
    #[must_use]
    pub fn with(mut self, op: DeltaOp) -> Self {
        self.ops.push(op);
        self
    }

    /// Appends an upsert.
    #[must_use]
    pub fn upsert(self, id: DeclId, declaration: Declaration) -> Self {
        self.with(DeltaOp::Upsert { id, declaration })
    }

    /// Appends a removal.
    #[must_use]
    pub fn remove(self, id: DeclId) -> Self {
        self.with(DeltaOp::Remove(id))
    }

    /// Appends a restriction update.
    #[must_use]
    pub fn set_restrictions(self, id: DeclId, metadata: impl Into<RestrictionMetadata>) -> Self {
        self.with(DeltaOp::SetRestrictions {
            id,
            metadata: metadata.into(),
        })
    }

    /// Appends a restriction removal.
    #[must_use]
    pub fn clear_restrictions(self, id: DeclId) -> Self {
        self.with(DeltaOp::ClearRestrictions(id))
    }

    /// Appends a package export.
    #[must_use]
    pub fn export_package(self, package: impl Into<QualifiedName>) -> Self {
        self.with(DeltaOp::ExportPackage(package.into()))
    }

    /// Appends a package un-export.
    #[must_use]
    pub fn unexport_package(self, package: impl Into<QualifiedName>) -> Self {
        self.with(DeltaOp::UnexportPackage(package.into()))
    }

    /// Appends a unit assignment.
    #[must_use]
    pub fn assign_unit(self, id: DeclId, unit: impl Into<UnitName>) -> Self {
        self.with(DeltaOp::AssignUnit {
            id,
            unit: unit.into(),
        })
    }
}

impl Extend<DeltaOp> for SnapshotDelta {
    fn extend<I: IntoIterator<Item = DeltaOp>>(&mut self, iter: I) {
        self.ops.extend(iter);
    }
}

impl FromIterator<DeltaOp> for SnapshotDelta {
    fn from_iter<I: IntoIterator<Item = DeltaOp>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl Snapshot {
    /// Applies a delta, returning the updated snapshot.
    ///
    /// Operations apply in order; the result is validated as a whole, so an
    /// intermediate state may be inconsistent as long as the final one is not.
    pub fn apply(&self, delta: &SnapshotDelta) -> Result<Snapshot> {
        let mut next = self.clone();
        for (index, op) in delta.ops().iter().enumerate() {
            next.apply_op(op).map_err(|err| {
                let frame = format!("applying delta op {index}");
                err.with_context(ErrorContext::new().with_frame(frame))
            })?;
        }
        next.validate()?;
        tracing::debug!(
            ops = delta.len(),
            declarations = next.len(),
            "applied snapshot delta"
        );
        Ok(next)
    }

    fn apply_op(&mut self, op: &DeltaOp) -> Result<()> {
        match op {
            DeltaOp::Upsert { id, declaration } => self.put(*id, declaration.clone()),
            DeltaOp::Remove(id) => {
                if !self.contains(*id) {
                    return Err(Error::unknown_declaration(*id));
                }
                let mut stack = vec![*id];
                while let Some(current) = stack.pop() {
                    stack.extend(self.members_of(current).collect::<Vec<_>>());
                    self.take(current);
                }
            }
            DeltaOp::SetRestrictions { id, metadata } => {
                if !self.contains(*id) {
                    return Err(Error::unknown_declaration(*id));
                }
                self.restrictions.insert(*id, metadata.clone());
            }
            DeltaOp::ClearRestrictions(id) => {
                self.restrictions.remove(id);
            }
            DeltaOp::ExportPackage(package) => {
                self.exported.insert(package.clone());
            }
            DeltaOp::UnexportPackage(package) => {
                self.exported.remove(package);
            }
            DeltaOp::AssignUnit { id, unit } => {
                if !self.contains(*id) {
                    return Err(Error::unknown_declaration(*id));
                }
                self.units.insert(*id, unit.clone());
            }
        }
        Ok(())
    }
}
