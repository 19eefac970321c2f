//! Immutable symbol model for apileak.
//!
//! This crate provides:
//! - [`Declaration`] - Closed tagged union of classes, interfaces, fields, methods and constructors
//! - [`Snapshot`] - Persistent declaration arena with restriction, export and unit side tables
//! - [`SnapshotBuilder`] - Validated construction from front-end output
//! - [`SnapshotDelta`] - Incremental updates producing new snapshots

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builder;
pub mod declaration;
pub mod delta;
pub mod metadata;
pub mod snapshot;

pub use builder::SnapshotBuilder;
pub use declaration::{DeclKind, Declaration};
pub use delta::{DeltaOp, SnapshotDelta};
pub use metadata::RestrictionMetadata;
pub use snapshot::{Snapshot, UnitName};
