//! API surface membership and member reachability.

use apileak_foundation::{DeclId, Nesting, RestrictionFlag, TypeRef, Visibility};
use apileak_model::{DeclKind, Declaration, Snapshot};

use crate::restriction::RestrictionResolver;

/// Decides which declarations belong to the component's API surface.
///
/// Membership is derived on every query and never cached, so the answer
/// depends on nothing but the snapshot and the restriction resolver.
#[derive(Debug)]
pub struct VisibilityResolver<'a, R> {
    snapshot: &'a Snapshot,
    restrictions: &'a R,
}

impl<R> Clone for VisibilityResolver<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for VisibilityResolver<'_, R> {}

impl<'a, R: RestrictionResolver> VisibilityResolver<'a, R> {
    /// Creates a resolver.
    #[must_use]
    pub fn new(snapshot: &'a Snapshot, restrictions: &'a R) -> Self {
        Self {
            snapshot,
            restrictions,
        }
    }

    /// Returns true if `id` is part of the API surface.
    ///
    /// Unknown ids are never API surface.
    #[must_use]
    pub fn is_api_surface(&self, id: DeclId) -> bool {
        let Some(decl) = self.snapshot.get(id) else {
            return false;
        };
        if matches!(decl.nesting, Nesting::Local | Nesting::Anonymous) {
            return false;
        }
        if !decl.visibility.is_exposed() {
            return false;
        }
        match decl.enclosing {
            None => decl.is_type() && self.is_exported_package(decl),
            Some(owner) => {
                if !self.is_api_surface(owner) {
                    return false;
                }
                decl.visibility != Visibility::Protected || self.is_extensible(owner)
            }
        }
    }

    /// Returns true if a reference to `ty` stays within the API surface.
    ///
    /// Primitives and other components' API types are always safe; arrays
    /// are as safe as their element type; unresolved references cannot be
    /// proven safe and count as internal.
    #[must_use]
    pub fn is_api_type(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Primitive(_) | TypeRef::External(_) => true,
            TypeRef::Unresolved(_) => false,
            TypeRef::Declared(id) => self.is_api_surface(*id),
            TypeRef::Array(element) => self.is_api_type(element),
        }
    }

    /// Returns true if clients outside the component can subclass `id`.
    ///
    /// Final classes and `NoExtend` types are closed.
    #[must_use]
    pub fn is_extensible(&self, id: DeclId) -> bool {
        self.snapshot
            .get(id)
            .is_some_and(|decl| !decl.modifiers.is_final())
            && !self.restrictions.has(id, RestrictionFlag::NoExtend)
    }

    /// Returns true if a client can reach the member at all, either by
    /// referencing it or by overriding it.
    ///
    /// Fields and types are always reachable.
    #[must_use]
    pub fn is_reachable(&self, id: DeclId) -> bool {
        let Some(decl) = self.snapshot.get(id) else {
            return false;
        };
        let referenceable = !self.restrictions.has(id, RestrictionFlag::NoReference);
        match decl.kind {
            DeclKind::Method { .. } => referenceable || self.is_overridable(id, decl),
            DeclKind::Constructor { .. } => referenceable,
            _ => true,
        }
    }

    fn is_overridable(&self, id: DeclId, method: &Declaration) -> bool {
        if method.modifiers.is_static() || method.modifiers.is_final() {
            return false;
        }
        if self.restrictions.has(id, RestrictionFlag::NoOverride) {
            return false;
        }
        let Some(owner) = self.snapshot.declaring_type(id) else {
            return false;
        };
        match self.snapshot.get(owner) {
            Some(decl) if decl.is_interface() => {
                !self.restrictions.has(owner, RestrictionFlag::NoImplement)
            }
            Some(_) => self.is_extensible(owner),
            None => false,
        }
    }

    fn is_exported_package(&self, decl: &Declaration) -> bool {
        self.snapshot
            .is_exported(decl.name.qualifier().unwrap_or_default())
    }
}
