//! Declarations: the closed set of variants the analysis understands.

use apileak_foundation::{DeclId, Modifier, Modifiers, Nesting, QualifiedName, TypeRef, Visibility};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Variant-specific payload of a declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeclKind {
    /// A class.
    Class {
        /// Declared superclass; `None` for the implicit root class.
        superclass: Option<TypeRef>,
        /// Implemented interfaces, in declaration order.
        interfaces: Vec<TypeRef>,
    },
    /// An interface.
    Interface {
        /// Extended interfaces, in declaration order.
        extended: Vec<TypeRef>,
    },
    /// A field.
    Field {
        /// Declared type.
        ty: TypeRef,
    },
    /// A method.
    Method {
        /// Parameter types, in order.
        parameters: Vec<TypeRef>,
        /// Return type (`void` for none).
        return_type: TypeRef,
        /// The supertype method this one overrides, if any.
        overrides: Option<DeclId>,
    },
    /// A constructor.
    Constructor {
        /// Parameter types, in order.
        parameters: Vec<TypeRef>,
    },
}

impl DeclKind {
    /// Returns a short label for messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Class { .. } => "class",
            Self::Interface { .. } => "interface",
            Self::Field { .. } => "field",
            Self::Method { .. } => "method",
            Self::Constructor { .. } => "constructor",
        }
    }

    /// Returns true for classes and interfaces.
    #[must_use]
    pub const fn is_type(&self) -> bool {
        matches!(self, Self::Class { .. } | Self::Interface { .. })
    }

    /// Returns true for fields, methods and constructors.
    #[must_use]
    pub const fn is_member(&self) -> bool {
        !self.is_type()
    }
}

/// A declared type or member.
///
/// Links to other declarations are [`DeclId`]s into the owning snapshot;
/// the snapshot owns every declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Declaration {
    /// Qualified name (`x.y.z.test1`, `x.y.z.test1.inner`, `x.y.z.test1.m1`).
    pub name: QualifiedName,
    /// Lexically enclosing declaration.
    pub enclosing: Option<DeclId>,
    /// Position relative to the enclosing declaration.
    pub nesting: Nesting,
    /// Declared access level.
    pub visibility: Visibility,
    /// Declared modifiers.
    pub modifiers: Modifiers,
    /// Variant payload.
    pub kind: DeclKind,
}

impl Declaration {
    fn new(name: impl Into<QualifiedName>, kind: DeclKind) -> Self {
        Self {
            name: name.into(),
            enclosing: None,
            nesting: Nesting::TopLevel,
            visibility: Visibility::Public,
            modifiers: Modifiers::NONE,
            kind,
        }
    }

    /// Creates a public top-level class with no supertypes.
    #[must_use]
    pub fn class(name: impl Into<QualifiedName>) -> Self {
        Self::new(
            name,
            DeclKind::Class {
                superclass: None,
                interfaces: Vec::new(),
            },
        )
    }

    /// Creates a public top-level interface.
    #[must_use]
    pub fn interface(name: impl Into<QualifiedName>) -> Self {
        Self::new(
            name,
            DeclKind::Interface {
                extended: Vec::new(),
            },
        )
    }

    /// Creates a public field. Attach it with [`Declaration::member_of`].
    #[must_use]
    pub fn field(name: impl Into<QualifiedName>, ty: TypeRef) -> Self {
        Self::new(name, DeclKind::Field { ty })
    }

    /// Creates a public method. Attach it with [`Declaration::member_of`].
    #[must_use]
    pub fn method(
        name: impl Into<QualifiedName>,
        parameters: Vec<TypeRef>,
        return_type: TypeRef,
    ) -> Self {
        Self::new(
            name,
            DeclKind::Method {
                parameters,
                return_type,
                overrides: None,
            },
        )
    }

    /// Creates a public constructor. Attach it with [`Declaration::member_of`].
    #[must_use]
    pub fn constructor(name: impl Into<QualifiedName>, parameters: Vec<TypeRef>) -> Self {
        Self::new(name, DeclKind::Constructor { parameters })
    }

    /// Makes this an instance member of `owner`.
    #[must_use]
    pub fn member_of(mut self, owner: DeclId) -> Self {
        self.enclosing = Some(owner);
        self.nesting = Nesting::MemberInstance;
        self
    }

    /// Makes this a static member of `owner`.
    #[must_use]
    pub fn static_member_of(mut self, owner: DeclId) -> Self {
        self.enclosing = Some(owner);
        self.nesting = Nesting::MemberStatic;
        self.modifiers.insert(Modifier::Static);
        self
    }

    /// Makes this a local type declared inside `owner`.
    #[must_use]
    pub fn local_in(mut self, owner: DeclId) -> Self {
        self.enclosing = Some(owner);
        self.nesting = Nesting::Local;
        self
    }

    /// Makes this an anonymous type declared inside `owner`.
    #[must_use]
    pub fn anonymous_in(mut self, owner: DeclId) -> Self {
        self.enclosing = Some(owner);
        self.nesting = Nesting::Anonymous;
        self
    }

    /// Sets the declared visibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Adds a modifier.
    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    /// Sets the superclass of a class. No effect on other variants.
    #[must_use]
    pub fn extending(mut self, supertype: TypeRef) -> Self {
        if let DeclKind::Class { superclass, .. } = &mut self.kind {
            *superclass = Some(supertype);
        }
        self
    }

    /// Adds an implemented (class) or extended (interface) interface.
    /// No effect on members.
    #[must_use]
    pub fn implementing(mut self, interface: TypeRef) -> Self {
        match &mut self.kind {
            DeclKind::Class { interfaces, .. } => interfaces.push(interface),
            DeclKind::Interface { extended } => extended.push(interface),
            _ => {}
        }
        self
    }

    /// Records the method this one overrides. No effect on other variants.
    #[must_use]
    pub fn overriding(mut self, target: DeclId) -> Self {
        if let DeclKind::Method { overrides, .. } = &mut self.kind {
            *overrides = Some(target);
        }
        self
    }

    /// Returns the last segment of the name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.simple_name()
    }

    /// Returns true for classes and interfaces.
    #[must_use]
    pub const fn is_type(&self) -> bool {
        self.kind.is_type()
    }

    /// Returns true for classes.
    #[must_use]
    pub const fn is_class(&self) -> bool {
        matches!(self.kind, DeclKind::Class { .. })
    }

    /// Returns true for interfaces.
    #[must_use]
    pub const fn is_interface(&self) -> bool {
        matches!(self.kind, DeclKind::Interface { .. })
    }

    /// Returns the parameter types of a method or constructor.
    #[must_use]
    pub fn parameters(&self) -> &[TypeRef] {
        match &self.kind {
            DeclKind::Method { parameters, .. } | DeclKind::Constructor { parameters } => {
                parameters
            }
            _ => &[],
        }
    }

    /// Iterates every type this declaration refers to: supertypes,
    /// interfaces, field type, parameter and return types.
    pub fn referenced_types(&self) -> Box<dyn Iterator<Item = &TypeRef> + '_> {
        match &self.kind {
            DeclKind::Class {
                superclass,
                interfaces,
            } => Box::new(superclass.iter().chain(interfaces.iter())),
            DeclKind::Interface { extended } => Box::new(extended.iter()),
            DeclKind::Field { ty } => Box::new(std::iter::once(ty)),
            DeclKind::Method {
                parameters,
                return_type,
                ..
            } => Box::new(parameters.iter().chain(std::iter::once(return_type))),
            DeclKind::Constructor { parameters } => Box::new(parameters.iter()),
        }
    }
}
