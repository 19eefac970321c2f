//! apileak - API leak classification
//!
//! This crate re-exports all layers of the apileak system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: apileak_engine     - Restrictions, visibility, leak classifier, diagnoses
//! Layer 1: apileak_model      - Declarations, immutable snapshots, deltas
//! Layer 0: apileak_foundation - Core types (DeclId, TypeRef, RestrictionSet, Error)
//! ```

pub use apileak_engine as engine;
pub use apileak_foundation as foundation;
pub use apileak_model as model;
