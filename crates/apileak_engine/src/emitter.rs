//! Turns classifier findings into named diagnoses.

use std::sync::Arc;

use apileak_foundation::{DeclId, TypeRef};
use apileak_model::Snapshot;

use crate::classifier::Finding;
use crate::diagnosis::{Diagnosis, LeakKind};

/// Names findings against one snapshot.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosisEmitter<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> DiagnosisEmitter<'a> {
    /// Creates an emitter.
    #[must_use]
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    /// Builds the diagnosis for `finding`.
    ///
    /// Returns `None` if the finding's source is not in the snapshot.
    #[must_use]
    pub fn emit(&self, finding: &Finding) -> Option<Diagnosis> {
        let source = self.snapshot.get(finding.source)?;
        let offending = self.type_name(&finding.offending);

        if finding.kind.is_type_level() {
            return Some(
                Diagnosis::new(finding.kind, offending, source.simple_name())
                    .at(source.name.to_shared()),
            );
        }

        let owner = self.snapshot.get(self.snapshot.declaring_type(finding.source)?)?;
        let subject = owner.simple_name();
        let member = match finding.kind {
            LeakKind::FieldTypeLeak => source.simple_name().to_owned(),
            LeakKind::ConstructorParameterLeak => self.signature(subject, source.parameters()),
            _ => self.signature(source.simple_name(), source.parameters()),
        };
        Some(
            Diagnosis::new(finding.kind, offending, subject)
                .with_member(member)
                .at(owner.name.to_shared()),
        )
    }

    /// Returns the simple name used for `ty` in diagnoses.
    ///
    /// Arrays are named by their element type.
    #[must_use]
    pub fn type_name(&self, ty: &TypeRef) -> Arc<str> {
        match ty {
            TypeRef::Primitive(primitive) => Arc::from(primitive.keyword()),
            TypeRef::Declared(id) => self.declared_name(*id),
            TypeRef::External(name) | TypeRef::Unresolved(name) => Arc::from(name.simple_name()),
            TypeRef::Array(element) => self.type_name(element),
        }
    }

    /// Renders `name(T1, T2[])` with simple type names.
    fn signature(&self, name: &str, parameters: &[TypeRef]) -> String {
        let mut out = String::with_capacity(name.len() + 2 + parameters.len() * 8);
        out.push_str(name);
        out.push('(');
        for (i, parameter) in parameters.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&self.type_name(parameter));
            for _ in 0..parameter.dimensions() {
                out.push_str("[]");
            }
        }
        out.push(')');
        out
    }

    fn declared_name(&self, id: DeclId) -> Arc<str> {
        match self.snapshot.get(id) {
            Some(decl) if decl.is_type() => Arc::from(decl.simple_name()),
            // Validated snapshots only point type refs at types.
            _ => Arc::from(id.to_string()),
        }
    }
}
