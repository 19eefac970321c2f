//! Type references used in supertypes and member signatures.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::id::DeclId;
use crate::name::QualifiedName;

/// Primitive types, including `void` for method returns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primitive {
    /// `boolean`
    Boolean,
    /// `byte`
    Byte,
    /// `char`
    Char,
    /// `short`
    Short,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `void`
    Void,
}

impl Primitive {
    /// Returns the source keyword for this primitive.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Void => "void",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A reference to a type from a supertype list, field or signature.
///
/// The front end resolves every reference into one of these shapes; the
/// engine never resolves names itself.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeRef {
    /// A primitive type. Never leaks.
    Primitive(Primitive),
    /// A type declared in the analyzed snapshot.
    Declared(DeclId),
    /// A type resolved against another component's API (e.g. `java.lang.Object`).
    External(QualifiedName),
    /// A reference the front end could not resolve.
    Unresolved(QualifiedName),
    /// An array of the element type.
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// Creates a reference to a declared type.
    #[must_use]
    pub const fn declared(id: DeclId) -> Self {
        Self::Declared(id)
    }

    /// Creates a reference to another component's API type.
    #[must_use]
    pub fn external(name: impl Into<QualifiedName>) -> Self {
        Self::External(name.into())
    }

    /// Creates an unresolved reference.
    #[must_use]
    pub fn unresolved(name: impl Into<QualifiedName>) -> Self {
        Self::Unresolved(name.into())
    }

    /// Creates an array type with the given element type.
    #[must_use]
    pub fn array(element: TypeRef) -> Self {
        Self::Array(Box::new(element))
    }

    /// Returns the `void` type.
    #[must_use]
    pub const fn void() -> Self {
        Self::Primitive(Primitive::Void)
    }

    /// Returns the innermost element type, stripping any array dimensions.
    #[must_use]
    pub fn element(&self) -> &TypeRef {
        match self {
            Self::Array(inner) => inner.element(),
            other => other,
        }
    }

    /// Returns the number of array dimensions.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        match self {
            Self::Array(inner) => 1 + inner.dimensions(),
            _ => 0,
        }
    }

    /// Returns the declaration this reference points at, if any.
    #[must_use]
    pub fn declared_id(&self) -> Option<DeclId> {
        match self.element() {
            Self::Declared(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns true if this is `void`.
    #[must_use]
    pub const fn is_void(&self) -> bool {
        matches!(self, Self::Primitive(Primitive::Void))
    }
}

impl From<Primitive> for TypeRef {
    fn from(primitive: Primitive) -> Self {
        Self::Primitive(primitive)
    }
}

impl From<DeclId> for TypeRef {
    fn from(id: DeclId) -> Self {
        Self::Declared(id)
    }
}
