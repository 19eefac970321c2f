//! Immutable symbol model snapshots.
//!
//! A `Snapshot` is everything one analysis run may look at: the declaration
//! arena, the restriction metadata side table, the package export table and
//! the compilation-unit index. It uses persistent maps, so cloning is O(1)
//! and every update produces a new snapshot that shares structure with the
//! old one.

use std::collections::BTreeSet;
use std::sync::Arc;

use apileak_foundation::{DeclId, Error, ErrorContext, Nesting, QualifiedName, Result, TypeRef};
use im::{OrdMap, OrdSet};

use crate::declaration::{DeclKind, Declaration};
use crate::metadata::RestrictionMetadata;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name of a compilation unit (typically a source path).
pub type UnitName = Arc<str>;

/// Immutable snapshot of declared types and members.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    /// Declaration arena keyed by stable id.
    pub(crate) declarations: OrdMap<DeclId, Declaration>,
    /// Enclosing declaration -> directly enclosed declarations.
    pub(crate) members: OrdMap<DeclId, OrdSet<DeclId>>,
    /// Raw restriction metadata side table.
    pub(crate) restrictions: OrdMap<DeclId, RestrictionMetadata>,
    /// Packages that are part of the component's API.
    pub(crate) exported: OrdSet<QualifiedName>,
    /// Top-level type -> compilation unit.
    pub(crate) units: OrdMap<DeclId, UnitName>,
    /// Next id handed out by [`crate::SnapshotBuilder::declare`].
    pub(crate) next_id: DeclId,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns true if the snapshot has no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Returns true if `id` names a declaration.
    #[must_use]
    pub fn contains(&self, id: DeclId) -> bool {
        self.declarations.contains_key(&id)
    }

    /// Gets a declaration by id.
    #[must_use]
    pub fn get(&self, id: DeclId) -> Option<&Declaration> {
        self.declarations.get(&id)
    }

    /// Iterates all declarations in id order.
    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.declarations.iter().map(|(id, decl)| (*id, decl))
    }

    /// Iterates all declaration ids in order.
    pub fn ids(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.declarations.keys().copied()
    }

    /// Iterates the declarations directly enclosed by `id`, in id order.
    pub fn members_of(&self, id: DeclId) -> impl Iterator<Item = DeclId> + '_ {
        self.members
            .get(&id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Returns the raw restriction metadata of a declaration.
    #[must_use]
    pub fn restriction_metadata(&self, id: DeclId) -> Option<&RestrictionMetadata> {
        self.restrictions.get(&id)
    }

    /// Returns true if `package` is exported.
    #[must_use]
    pub fn is_exported(&self, package: &str) -> bool {
        self.exported.contains(package)
    }

    /// Iterates exported packages in name order.
    pub fn exported_packages(&self) -> impl Iterator<Item = &QualifiedName> {
        self.exported.iter()
    }

    /// Walks enclosing links up to the top-level declaration.
    ///
    /// Returns `None` if the id is unknown.
    #[must_use]
    pub fn top_level_of(&self, id: DeclId) -> Option<DeclId> {
        let mut current = id;
        // A validated snapshot has no cycles; the bound guards unvalidated
        // intermediate states.
        for _ in 0..=self.declarations.len() {
            let decl = self.declarations.get(&current)?;
            match decl.enclosing {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
        None
    }

    /// Returns the package of the top-level type containing `id`.
    #[must_use]
    pub fn package_of(&self, id: DeclId) -> Option<&str> {
        let top = self.top_level_of(id)?;
        self.declarations.get(&top)?.name.qualifier()
    }

    /// Returns the nearest enclosing declaration of `id` that is a type.
    #[must_use]
    pub fn declaring_type(&self, id: DeclId) -> Option<DeclId> {
        let mut current = self.declarations.get(&id)?.enclosing?;
        for _ in 0..=self.declarations.len() {
            let decl = self.declarations.get(&current)?;
            if decl.is_type() {
                return Some(current);
            }
            current = decl.enclosing?;
        }
        None
    }

    /// Returns the compilation unit containing `id`.
    #[must_use]
    pub fn unit_of(&self, id: DeclId) -> Option<&UnitName> {
        let top = self.top_level_of(id)?;
        self.units.get(&top)
    }

    /// Iterates the distinct compilation units, in name order.
    pub fn units(&self) -> impl Iterator<Item = &UnitName> {
        self.units.values().collect::<BTreeSet<_>>().into_iter()
    }

    /// Returns every declaration in `unit`, nested ones included, in id order.
    #[must_use]
    pub fn declarations_in_unit(&self, unit: &str) -> Vec<DeclId> {
        let mut found = OrdSet::new();
        let mut stack: Vec<DeclId> = self
            .units
            .iter()
            .filter(|(_, name)| &***name == unit)
            .map(|(id, _)| *id)
            .collect();
        while let Some(id) = stack.pop() {
            if found.insert(id).is_none() {
                stack.extend(self.members_of(id));
            }
        }
        found.into_iter().collect()
    }

    /// Checks every structural invariant of the snapshot.
    ///
    /// Front ends are responsible for well-formed input; this turns a
    /// contract violation into an error at the boundary instead of a wrong
    /// analysis result later.
    pub fn validate(&self) -> Result<()> {
        for (id, decl) in self.iter() {
            self.validate_declaration(id, decl)
                .map_err(|err| err.with_context(self.context_for(id, decl)))?;
        }
        for id in self.restrictions.keys() {
            if !self.contains(*id) {
                return Err(Error::unknown_declaration(*id));
            }
        }
        for id in self.units.keys() {
            let decl = self.get(*id).ok_or_else(|| Error::unknown_declaration(*id))?;
            if decl.enclosing.is_some() {
                return Err(Error::invalid_nesting(
                    *id,
                    "only top-level types can be assigned to a unit",
                )
                .with_context(self.context_for(*id, decl)));
            }
        }
        Ok(())
    }

    fn context_for(&self, id: DeclId, decl: &Declaration) -> ErrorContext {
        let mut context = ErrorContext::new().with_declaration(decl.name.as_str());
        if let Some(unit) = self.unit_of(id) {
            context = context.with_unit(&**unit);
        }
        context
    }

    fn validate_declaration(&self, id: DeclId, decl: &Declaration) -> Result<()> {
        self.validate_nesting(id, decl)?;
        self.validate_acyclic(id)?;

        match &decl.kind {
            DeclKind::Class {
                superclass,
                interfaces,
            } => {
                if let Some(superclass) = superclass {
                    self.validate_type_ref(id, superclass, Some(true))?;
                }
                for interface in interfaces {
                    self.validate_type_ref(id, interface, Some(false))?;
                }
            }
            DeclKind::Interface { extended } => {
                for interface in extended {
                    self.validate_type_ref(id, interface, Some(false))?;
                }
            }
            DeclKind::Field { ty } => self.validate_type_ref(id, ty, None)?,
            DeclKind::Method {
                parameters,
                return_type,
                overrides,
            } => {
                for parameter in parameters {
                    self.validate_type_ref(id, parameter, None)?;
                }
                self.validate_type_ref(id, return_type, None)?;
                if let Some(target) = overrides {
                    let overridden = self
                        .get(*target)
                        .ok_or_else(|| Error::dangling_reference(id, *target, "overrides"))?;
                    if !matches!(overridden.kind, DeclKind::Method { .. }) {
                        return Err(Error::kind_mismatch(
                            *target,
                            "method",
                            overridden.kind.label(),
                        ));
                    }
                }
            }
            DeclKind::Constructor { parameters } => {
                for parameter in parameters {
                    self.validate_type_ref(id, parameter, None)?;
                }
            }
        }
        Ok(())
    }

    fn validate_nesting(&self, id: DeclId, decl: &Declaration) -> Result<()> {
        match (decl.nesting, decl.enclosing) {
            (Nesting::TopLevel, Some(_)) => Err(Error::invalid_nesting(
                id,
                "top-level declaration has an enclosing link",
            )),
            (Nesting::TopLevel, None) if !decl.is_type() => Err(Error::invalid_nesting(
                id,
                "member declaration without an enclosing type",
            )),
            (Nesting::TopLevel, None) => Ok(()),
            (_, None) => Err(Error::invalid_nesting(
                id,
                "nested declaration without an enclosing link",
            )),
            (nesting, Some(parent)) => {
                let enclosing = self
                    .get(parent)
                    .ok_or_else(|| Error::dangling_reference(id, parent, "enclosing"))?;
                if nesting.is_hidden() && !decl.is_type() {
                    return Err(Error::invalid_nesting(
                        id,
                        "only types can be local or anonymous",
                    ));
                }
                if nesting.is_member() && !enclosing.is_type() {
                    return Err(Error::kind_mismatch(parent, "type", enclosing.kind.label()));
                }
                Ok(())
            }
        }
    }

    fn validate_acyclic(&self, id: DeclId) -> Result<()> {
        let mut current = id;
        for _ in 0..=self.declarations.len() {
            match self.get(current).and_then(|decl| decl.enclosing) {
                Some(parent) if parent == id => return Err(Error::enclosing_cycle(id)),
                Some(parent) => current = parent,
                None => return Ok(()),
            }
        }
        Err(Error::enclosing_cycle(id))
    }

    /// `want_class`: `Some(true)` requires a class, `Some(false)` an
    /// interface, `None` any type.
    fn validate_type_ref(
        &self,
        from: DeclId,
        ty: &TypeRef,
        want_class: Option<bool>,
    ) -> Result<()> {
        let Some(target) = ty.declared_id() else {
            return Ok(());
        };
        let decl = self
            .get(target)
            .ok_or_else(|| Error::dangling_reference(from, target, "type"))?;
        let ok = match want_class {
            Some(true) => decl.is_class() && ty.dimensions() == 0,
            Some(false) => decl.is_interface() && ty.dimensions() == 0,
            None => decl.is_type(),
        };
        if ok {
            Ok(())
        } else {
            let expected = match want_class {
                Some(true) => "class",
                Some(false) => "interface",
                None => "type",
            };
            Err(Error::kind_mismatch(target, expected, decl.kind.label()))
        }
    }

    // --- Index maintenance shared by the builder and delta application ---

    pub(crate) fn put(&mut self, id: DeclId, decl: Declaration) {
        let old_parent = self.declarations.get(&id).and_then(|old| old.enclosing);
        if let Some(parent) = old_parent {
            self.unlink_member(parent, id);
        }
        if let Some(parent) = decl.enclosing {
            let mut set = self.members.get(&parent).cloned().unwrap_or_default();
            set.insert(id);
            self.members.insert(parent, set);
        }
        self.declarations.insert(id, decl);
        if id >= self.next_id {
            self.next_id = id.next();
        }
    }

    pub(crate) fn take(&mut self, id: DeclId) -> Option<Declaration> {
        let decl = self.declarations.remove(&id)?;
        if let Some(parent) = decl.enclosing {
            self.unlink_member(parent, id);
        }
        self.restrictions.remove(&id);
        self.units.remove(&id);
        Some(decl)
    }

    fn unlink_member(&mut self, parent: DeclId, id: DeclId) {
        let Some(mut set) = self.members.get(&parent).cloned() else {
            return;
        };
        set.remove(&id);
        if set.is_empty() {
            self.members.remove(&parent);
        } else {
            self.members.insert(parent, set);
        }
    }
}
