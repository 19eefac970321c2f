//! The leak classifier.
//!
//! For every API declaration the classifier walks supertypes, interfaces,
//! field types and member signatures and produces one [`Finding`] per
//! offending reference. Findings still carry ids and type references; the
//! emitter turns them into named diagnoses.

use apileak_foundation::{DeclId, RestrictionFlag, TypeRef};
use apileak_model::{DeclKind, Snapshot};

use crate::diagnosis::LeakKind;
use crate::restriction::RestrictionResolver;
use crate::visibility::VisibilityResolver;

// =============================================================================
// Finding
// =============================================================================

/// A leak found on one declaration, before naming.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finding {
    /// What leaked.
    pub kind: LeakKind,
    /// The declaration the leak was found on.
    pub source: DeclId,
    /// The offending type, array dimensions stripped.
    pub offending: TypeRef,
}

impl Finding {
    fn new(kind: LeakKind, source: DeclId, offending: &TypeRef) -> Self {
        Self {
            kind,
            source,
            offending: offending.element().clone(),
        }
    }
}

// =============================================================================
// Classifier
// =============================================================================

/// Classifies single declarations.
#[derive(Debug)]
pub struct LeakClassifier<'a, R> {
    snapshot: &'a Snapshot,
    restrictions: &'a R,
    visibility: VisibilityResolver<'a, R>,
    suppress_unreachable: bool,
}

impl<'a, R: RestrictionResolver> LeakClassifier<'a, R> {
    /// Creates a classifier that skips unreachable members.
    #[must_use]
    pub fn new(snapshot: &'a Snapshot, restrictions: &'a R) -> Self {
        Self {
            snapshot,
            restrictions,
            visibility: VisibilityResolver::new(snapshot, restrictions),
            suppress_unreachable: true,
        }
    }

    /// Builder method to enable/disable unreachable member suppression.
    #[must_use]
    pub fn with_suppress_unreachable(mut self, suppress: bool) -> Self {
        self.suppress_unreachable = suppress;
        self
    }

    /// Returns the visibility resolver used by this classifier.
    #[must_use]
    pub fn visibility(&self) -> &VisibilityResolver<'a, R> {
        &self.visibility
    }

    /// Returns every leak declared on `id`.
    ///
    /// Declarations outside the API surface yield nothing. Members are only
    /// checked where they are declared; a subtype does not re-report what it
    /// inherits.
    #[must_use]
    pub fn classify(&self, id: DeclId) -> Vec<Finding> {
        let mut findings = Vec::new();
        let Some(decl) = self.snapshot.get(id) else {
            return findings;
        };
        if !self.visibility.is_api_surface(id) {
            return findings;
        }

        match &decl.kind {
            DeclKind::Class {
                superclass,
                interfaces,
            } => {
                if let Some(superclass) = superclass {
                    self.check_superclass(id, superclass, &mut findings);
                }
                for interface in interfaces {
                    self.check_implemented(id, interface, &mut findings);
                }
            }
            DeclKind::Interface { extended } => {
                for interface in extended {
                    self.check_extended_interface(id, interface, &mut findings);
                }
            }
            DeclKind::Field { ty } => {
                if !self.visibility.is_api_type(ty) {
                    findings.push(Finding::new(LeakKind::FieldTypeLeak, id, ty));
                }
            }
            DeclKind::Method {
                parameters,
                return_type,
                ..
            } => {
                if self.skip_unreachable(id) {
                    return findings;
                }
                self.check_parameters(id, parameters, LeakKind::MethodParameterLeak, &mut findings);
                if !self.visibility.is_api_type(return_type) {
                    findings.push(Finding::new(LeakKind::MethodReturnTypeLeak, id, return_type));
                }
            }
            DeclKind::Constructor { parameters } => {
                if self.skip_unreachable(id) {
                    return findings;
                }
                self.check_parameters(
                    id,
                    parameters,
                    LeakKind::ConstructorParameterLeak,
                    &mut findings,
                );
            }
        }

        for finding in &findings {
            tracing::trace!(kind = %finding.kind, source = %id, "leak found");
        }
        findings
    }

    fn check_superclass(&self, id: DeclId, superclass: &TypeRef, findings: &mut Vec<Finding>) {
        if !self.visibility.is_api_type(superclass) {
            findings.push(Finding::new(LeakKind::ExtendsLeak, id, superclass));
            return;
        }
        let Some(target) = superclass.declared_id() else {
            return;
        };
        if !self.restrictions.has(target, RestrictionFlag::NoExtend) {
            return;
        }
        if self.visibility.is_extensible(id) {
            findings.push(Finding::new(LeakKind::ExtendingNoExtendType, id, superclass));
        } else {
            tracing::trace!(source = %id, %target, "closed hierarchy, no-extend supertype allowed");
        }
    }

    fn check_implemented(&self, id: DeclId, interface: &TypeRef, findings: &mut Vec<Finding>) {
        if !self.visibility.is_api_type(interface) {
            findings.push(Finding::new(LeakKind::ImplementsLeak, id, interface));
            return;
        }
        if let Some(target) = interface.declared_id() {
            if self.restrictions.has(target, RestrictionFlag::NoImplement) {
                findings.push(Finding::new(LeakKind::ImplementingNoImplementType, id, interface));
            }
        }
    }

    fn check_extended_interface(
        &self,
        id: DeclId,
        interface: &TypeRef,
        findings: &mut Vec<Finding>,
    ) {
        if !self.visibility.is_api_type(interface) {
            findings.push(Finding::new(LeakKind::ExtendsLeak, id, interface));
            return;
        }
        let Some(target) = interface.declared_id() else {
            return;
        };
        let inherited = self.restrictions.restrictions_of(target);
        let own = self.restrictions.restrictions_of(id);
        for (flag, kind) in [
            (RestrictionFlag::NoExtend, LeakKind::ExtendingNoExtendType),
            (RestrictionFlag::NoImplement, LeakKind::ImplementingNoImplementType),
        ] {
            if !inherited.contains(flag) {
                continue;
            }
            if own.contains(flag) {
                tracing::trace!(source = %id, %target, %flag, "restricted sub-interface, allowed");
            } else {
                findings.push(Finding::new(kind, id, interface));
            }
        }
    }

    /// One finding per distinct offending type.
    fn check_parameters(
        &self,
        id: DeclId,
        parameters: &[TypeRef],
        kind: LeakKind,
        findings: &mut Vec<Finding>,
    ) {
        let mut seen: Vec<&TypeRef> = Vec::new();
        for parameter in parameters {
            let element = parameter.element();
            if seen.contains(&element) || self.visibility.is_api_type(element) {
                continue;
            }
            seen.push(element);
            findings.push(Finding::new(kind, id, element));
        }
    }

    fn skip_unreachable(&self, id: DeclId) -> bool {
        if self.suppress_unreachable && !self.visibility.is_reachable(id) {
            tracing::trace!(source = %id, "member unreachable by clients, signature not checked");
            return true;
        }
        false
    }
}
