//! Error types for apileak.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Errors only arise at the boundary: building or updating a snapshot from
//! malformed front-end input, and parsing configuration. A validated
//! snapshot never makes the analysis fail.

use std::fmt;

use thiserror::Error;

use crate::id::DeclId;

/// Result type used throughout apileak.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for apileak operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an unknown declaration error.
    #[must_use]
    pub fn unknown_declaration(id: DeclId) -> Self {
        Self::new(ErrorKind::UnknownDeclaration(id))
    }

    /// Creates a dangling reference error.
    #[must_use]
    pub fn dangling_reference(from: DeclId, to: DeclId, link: &'static str) -> Self {
        Self::new(ErrorKind::DanglingReference { from, to, link })
    }

    /// Creates a kind mismatch error.
    #[must_use]
    pub fn kind_mismatch(id: DeclId, expected: &'static str, actual: &'static str) -> Self {
        Self::new(ErrorKind::KindMismatch {
            id,
            expected,
            actual,
        })
    }

    /// Creates an invalid nesting error.
    #[must_use]
    pub fn invalid_nesting(id: DeclId, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidNesting {
            id,
            reason: reason.into(),
        })
    }

    /// Creates an enclosing cycle error.
    #[must_use]
    pub fn enclosing_cycle(id: DeclId) -> Self {
        Self::new(ErrorKind::EnclosingCycle(id))
    }

    /// Creates a duplicate declaration error.
    #[must_use]
    pub fn duplicate_declaration(id: DeclId) -> Self {
        Self::new(ErrorKind::DuplicateDeclaration(id))
    }

    /// Creates an invalid configuration value error.
    #[must_use]
    pub fn invalid_config(setting: &'static str, value: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfig {
            setting,
            value: value.into(),
        })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// An operation named a declaration that is not in the snapshot.
    #[error("unknown declaration: {0}")]
    UnknownDeclaration(DeclId),

    /// A link from one declaration points at an id that is not in the snapshot.
    #[error("dangling {link} link from {from} to {to}")]
    DanglingReference {
        /// The declaration holding the link.
        from: DeclId,
        /// The missing target.
        to: DeclId,
        /// Which link dangles (`enclosing`, `overrides`, ...).
        link: &'static str,
    },

    /// A link points at a declaration of the wrong variant.
    #[error("declaration {id} is a {actual}, expected a {expected}")]
    KindMismatch {
        /// The offending target.
        id: DeclId,
        /// The variant the link requires.
        expected: &'static str,
        /// The variant found.
        actual: &'static str,
    },

    /// Nesting and enclosing link disagree.
    #[error("invalid nesting for {id}: {reason}")]
    InvalidNesting {
        /// The offending declaration.
        id: DeclId,
        /// Description of the violation.
        reason: String,
    },

    /// Following enclosing links from a declaration leads back to it.
    #[error("enclosing cycle through {0}")]
    EnclosingCycle(DeclId),

    /// An insert used an id that is already taken.
    #[error("duplicate declaration: {0}")]
    DuplicateDeclaration(DeclId),

    /// A configuration value could not be parsed.
    #[error("invalid value for {setting}: {value:?}")]
    InvalidConfig {
        /// The setting being parsed.
        setting: &'static str,
        /// The rejected input.
        value: String,
    },
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Compilation unit being processed.
    pub unit: Option<String>,
    /// Qualified name of the declaration being processed.
    pub declaration: Option<String>,
    /// Stack of operations that led to the error.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compilation unit.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Sets the declaration name.
    #[must_use]
    pub fn with_declaration(mut self, declaration: impl Into<String>) -> Self {
        self.declaration = Some(declaration.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(declaration) = &self.declaration {
            write!(f, "in {declaration}")?;
        }
        if let Some(unit) = &self.unit {
            write!(f, " ({unit})")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  while {frame}")?;
            }
        }
        Ok(())
    }
}
