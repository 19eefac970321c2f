//! Leak diagnoses: the engine's only output.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Leak Kind
// =============================================================================

/// The closed set of leaks the classifier reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LeakKind {
    /// A type extends a non-API type.
    ExtendsLeak,
    /// A class implements a non-API interface.
    ImplementsLeak,
    /// A type extends an API type that clients must not extend.
    ExtendingNoExtendType,
    /// A type implements an API interface that clients must not implement.
    ImplementingNoImplementType,
    /// A field has a non-API type.
    FieldTypeLeak,
    /// A constructor has a non-API parameter type.
    ConstructorParameterLeak,
    /// A method has a non-API parameter type.
    MethodParameterLeak,
    /// A method has a non-API return type.
    MethodReturnTypeLeak,
}

impl LeakKind {
    /// Every kind, in declaration order.
    pub const ALL: [LeakKind; 8] = [
        LeakKind::ExtendsLeak,
        LeakKind::ImplementsLeak,
        LeakKind::ExtendingNoExtendType,
        LeakKind::ImplementingNoImplementType,
        LeakKind::FieldTypeLeak,
        LeakKind::ConstructorParameterLeak,
        LeakKind::MethodParameterLeak,
        LeakKind::MethodReturnTypeLeak,
    ];

    /// Returns true for kinds reported against a type rather than a member.
    #[must_use]
    pub const fn is_type_level(self) -> bool {
        matches!(
            self,
            Self::ExtendsLeak
                | Self::ImplementsLeak
                | Self::ExtendingNoExtendType
                | Self::ImplementingNoImplementType
        )
    }

    /// Returns true for kinds driven by a restriction flag instead of visibility.
    #[must_use]
    pub const fn is_restriction_driven(self) -> bool {
        matches!(
            self,
            Self::ExtendingNoExtendType | Self::ImplementingNoImplementType
        )
    }

    /// Returns the element kind the diagnosis is attached to.
    #[must_use]
    pub const fn element(self) -> ElementKind {
        match self {
            Self::FieldTypeLeak => ElementKind::Field,
            Self::ConstructorParameterLeak
            | Self::MethodParameterLeak
            | Self::MethodReturnTypeLeak => ElementKind::Method,
            _ => ElementKind::Type,
        }
    }

    const fn subkind(self) -> u32 {
        match self {
            Self::ExtendsLeak => 1,
            Self::ImplementsLeak => 2,
            Self::FieldTypeLeak => 3,
            Self::MethodReturnTypeLeak => 4,
            Self::MethodParameterLeak => 5,
            Self::ConstructorParameterLeak => 6,
            Self::ExtendingNoExtendType => 7,
            Self::ImplementingNoImplementType => 8,
        }
    }
}

impl fmt::Display for LeakKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// =============================================================================
// Problem Codes
// =============================================================================

/// Problem category. Leaks are always usage problems.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProblemCategory {
    /// How the component's API is used or exposed.
    Usage,
}

/// The kind of element a problem is attached to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ElementKind {
    /// A class or interface.
    Type,
    /// A field.
    Field,
    /// A method or constructor.
    Method,
}

/// Problem kind within a category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProblemKind {
    /// API leak.
    ApiLeak,
}

/// Stable problem identifier consumers map diagnoses onto.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProblemCode {
    /// Problem category.
    pub category: ProblemCategory,
    /// Element the problem is attached to.
    pub element: ElementKind,
    /// Problem kind.
    pub kind: ProblemKind,
    /// Leak-specific discriminator.
    pub subkind: u32,
}

impl ProblemCode {
    const OFFSET_CATEGORY: u32 = 28;
    const OFFSET_ELEMENT: u32 = 20;
    const OFFSET_KIND: u32 = 12;

    /// Packs the code into a single integer.
    ///
    /// Layout: category in bits 28..32, element in 20..28, kind in 12..20,
    /// subkind in 0..12.
    #[must_use]
    pub const fn id(self) -> u32 {
        let category = match self.category {
            ProblemCategory::Usage => 2,
        };
        let element = match self.element {
            ElementKind::Type => 1,
            ElementKind::Field => 2,
            ElementKind::Method => 3,
        };
        let kind = match self.kind {
            ProblemKind::ApiLeak => 1,
        };
        (category << Self::OFFSET_CATEGORY)
            | (element << Self::OFFSET_ELEMENT)
            | (kind << Self::OFFSET_KIND)
            | (self.subkind & 0xfff)
    }
}

impl From<LeakKind> for ProblemCode {
    fn from(kind: LeakKind) -> Self {
        Self {
            category: ProblemCategory::Usage,
            element: kind.element(),
            kind: ProblemKind::ApiLeak,
            subkind: kind.subkind(),
        }
    }
}

// =============================================================================
// Diagnosis
// =============================================================================

/// One reported leak.
///
/// Identity is the full tuple, location included, so equal findings from
/// different runs (or different build modes) compare equal while leaks on
/// same-named types in different places stay distinct.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnosis {
    /// What leaked.
    pub kind: LeakKind,
    /// Simple name of the offending type.
    pub offending_type: Arc<str>,
    /// Simple name of the type the leak is reported against.
    pub subject: Arc<str>,
    /// Field name or member signature, for member-level kinds.
    pub member_signature: Option<Arc<str>>,
    /// Qualified name of the type the leak is reported against.
    pub location: Arc<str>,
}

impl Diagnosis {
    /// Creates a type-level diagnosis located at `subject`.
    ///
    /// Use [`Diagnosis::at`] to set the qualified location.
    #[must_use]
    pub fn new(
        kind: LeakKind,
        offending_type: impl Into<Arc<str>>,
        subject: impl Into<Arc<str>>,
    ) -> Self {
        let subject = subject.into();
        Self {
            kind,
            offending_type: offending_type.into(),
            location: Arc::clone(&subject),
            subject,
            member_signature: None,
        }
    }

    /// Attaches a member signature.
    #[must_use]
    pub fn with_member(mut self, signature: impl Into<Arc<str>>) -> Self {
        self.member_signature = Some(signature.into());
        self
    }

    /// Sets the qualified name of the subject type.
    #[must_use]
    pub fn at(mut self, location: impl Into<Arc<str>>) -> Self {
        self.location = location.into();
        self
    }

    /// Returns the problem code for this diagnosis.
    #[must_use]
    pub fn code(&self) -> ProblemCode {
        self.kind.into()
    }

    /// Returns the message arguments in reporting order.
    ///
    /// Type and constructor kinds take `[offending, subject]`; field and
    /// method kinds add the member as a third argument.
    #[must_use]
    pub fn message_args(&self) -> Vec<&str> {
        let mut args = vec![&*self.offending_type, &*self.subject];
        match self.kind {
            LeakKind::FieldTypeLeak
            | LeakKind::MethodParameterLeak
            | LeakKind::MethodReturnTypeLeak => {
                if let Some(member) = &self.member_signature {
                    args.push(member);
                }
            }
            _ => {}
        }
        args
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let offending = &self.offending_type;
        let subject = &self.subject;
        let member = self.member_signature.as_deref().unwrap_or_default();
        match self.kind {
            LeakKind::ExtendsLeak => write!(f, "{subject} extends non-API type {offending}"),
            LeakKind::ImplementsLeak => {
                write!(f, "{subject} implements non-API interface {offending}")
            }
            LeakKind::ExtendingNoExtendType => write!(
                f,
                "{subject} extends {offending}, which clients are not allowed to extend"
            ),
            LeakKind::ImplementingNoImplementType => write!(
                f,
                "{subject} implements {offending}, which clients are not allowed to implement"
            ),
            LeakKind::FieldTypeLeak => {
                write!(f, "Field {subject}.{member} has non-API type {offending}")
            }
            LeakKind::ConstructorParameterLeak => write!(
                f,
                "Constructor {member} has non-API parameter type {offending}"
            ),
            LeakKind::MethodParameterLeak => write!(
                f,
                "Method {subject}.{member} has non-API parameter type {offending}"
            ),
            LeakKind::MethodReturnTypeLeak => write!(
                f,
                "Method {subject}.{member} has non-API return type {offending}"
            ),
        }
    }
}

// =============================================================================
// Diagnosis Set
// =============================================================================

/// An ordered, duplicate-free collection of diagnoses.
///
/// Iteration order is the `Ord` of [`Diagnosis`], never discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiagnosisSet {
    diagnoses: BTreeSet<Diagnosis>,
}

impl DiagnosisSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a diagnosis. Returns false if it was already present.
    pub fn insert(&mut self, diagnosis: Diagnosis) -> bool {
        self.diagnoses.insert(diagnosis)
    }

    /// Returns the number of diagnoses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnoses.len()
    }

    /// Returns true if there are no diagnoses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnoses.is_empty()
    }

    /// Returns true if `diagnosis` is present.
    #[must_use]
    pub fn contains(&self, diagnosis: &Diagnosis) -> bool {
        self.diagnoses.contains(diagnosis)
    }

    /// Iterates in order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnosis> {
        self.diagnoses.iter()
    }

    /// Iterates diagnoses of one kind.
    pub fn of_kind(&self, kind: LeakKind) -> impl Iterator<Item = &Diagnosis> {
        self.diagnoses.iter().filter(move |d| d.kind == kind)
    }

    /// Iterates diagnoses reported against types with the simple name
    /// `subject`, wherever they are declared.
    pub fn for_subject<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a Diagnosis> {
        self.diagnoses.iter().filter(move |d| &*d.subject == subject)
    }

    /// Iterates diagnoses reported against the type named `location`.
    pub fn for_location<'a>(&'a self, location: &'a str) -> impl Iterator<Item = &'a Diagnosis> {
        self.diagnoses.iter().filter(move |d| &*d.location == location)
    }

    /// Adds every diagnosis from `other`.
    pub fn merge(&mut self, other: DiagnosisSet) {
        self.diagnoses.extend(other.diagnoses);
    }

    /// Returns true if every diagnosis in `self` is also in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &DiagnosisSet) -> bool {
        self.diagnoses.is_subset(&other.diagnoses)
    }
}

impl FromIterator<Diagnosis> for DiagnosisSet {
    fn from_iter<I: IntoIterator<Item = Diagnosis>>(iter: I) -> Self {
        Self {
            diagnoses: iter.into_iter().collect(),
        }
    }
}

impl Extend<Diagnosis> for DiagnosisSet {
    fn extend<I: IntoIterator<Item = Diagnosis>>(&mut self, iter: I) {
        self.diagnoses.extend(iter);
    }
}

impl IntoIterator for DiagnosisSet {
    type Item = Diagnosis;
    type IntoIter = std::collections::btree_set::IntoIter<Diagnosis>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnoses.into_iter()
    }
}

impl<'a> IntoIterator for &'a DiagnosisSet {
    type Item = &'a Diagnosis;
    type IntoIter = std::collections::btree_set::Iter<'a, Diagnosis>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnoses.iter()
    }
}
