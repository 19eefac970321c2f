//! API leak classification engine for apileak.
//!
//! This crate provides:
//! - [`RestrictionResolver`] - Restriction flag lookup, backed by snapshot metadata
//! - [`VisibilityResolver`] - API surface membership and member reachability
//! - [`LeakClassifier`] - Per-declaration leak detection
//! - [`DiagnosisEmitter`] - Naming of findings as [`Diagnosis`] records
//! - [`LeakAnalyzer`] - Whole-snapshot and per-unit analysis entry points
//!
//! ```
//! use apileak_engine::{analyze, LeakKind};
//! use apileak_foundation::TypeRef;
//! use apileak_model::{Declaration, SnapshotBuilder};
//!
//! let mut builder = SnapshotBuilder::new();
//! let internal = builder.declare(Declaration::class("x.y.z.internal.internal"));
//! builder.declare(Declaration::class("x.y.z.test1").extending(TypeRef::Declared(internal)));
//! builder.export_package("x.y.z");
//! let snapshot = builder.build().unwrap();
//!
//! let diagnoses = analyze(&snapshot);
//! assert_eq!(diagnoses.of_kind(LeakKind::ExtendsLeak).count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod diagnosis;
pub mod emitter;
pub mod restriction;
pub mod visibility;

pub use analyzer::{LeakAnalyzer, analyze};
pub use classifier::{Finding, LeakClassifier};
pub use config::{AnalysisConfig, Severity, SeverityKey, SeverityTable};
pub use diagnosis::{
    Diagnosis, DiagnosisSet, ElementKind, LeakKind, ProblemCategory, ProblemCode, ProblemKind,
};
pub use emitter::DiagnosisEmitter;
pub use restriction::{MetadataRestrictions, RestrictionResolver};
pub use visibility::VisibilityResolver;
