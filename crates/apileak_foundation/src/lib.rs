//! Core identifiers, names, type references, and errors for apileak.
//!
//! This crate provides:
//! - [`DeclId`] - Stable arena identifiers for declarations
//! - [`QualifiedName`] - Shared qualified identifiers with simple-name access
//! - [`TypeRef`] - References from signatures and supertypes to types
//! - [`Visibility`], [`Nesting`], [`Modifiers`] - Declared shape of a declaration
//! - [`RestrictionFlag`], [`RestrictionSet`] - Client restriction flags
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod id;
pub mod modifiers;
pub mod name;
pub mod restriction;
pub mod types;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use id::DeclId;
pub use modifiers::{Modifier, Modifiers, Nesting, Visibility};
pub use name::QualifiedName;
pub use restriction::{RestrictionFlag, RestrictionSet};
pub use types::{Primitive, TypeRef};
