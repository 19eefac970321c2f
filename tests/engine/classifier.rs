//! Integration tests for the leak classifier through the analyzer

use apileak_engine::{Diagnosis, LeakAnalyzer, LeakKind, analyze};
use apileak_foundation::{
    DeclId, Modifier, RestrictionFlag, RestrictionSet, TypeRef, Visibility,
};
use apileak_model::{Declaration, SnapshotBuilder};

struct Component {
    builder: SnapshotBuilder,
    internal: TypeRef,
    iinternal: TypeRef,
}

impl Component {
    fn new() -> Self {
        let mut builder = SnapshotBuilder::new();
        let internal = builder.declare(Declaration::class("x.y.z.internal.internal"));
        let iinternal = builder.declare(Declaration::interface("x.y.z.internal.Iinternal"));
        builder.export_package("x.y.z");
        Self {
            builder,
            internal: TypeRef::Declared(internal),
            iinternal: TypeRef::Declared(iinternal),
        }
    }

    fn class(&mut self, name: &str) -> DeclId {
        self.builder.declare(Declaration::class(format!("x.y.z.{name}")))
    }
}

// =============================================================================
// Type-level Checks
// =============================================================================

#[test]
fn interface_extending_internal_interface() {
    let mut c = Component::new();
    let iface = c
        .builder
        .declare(Declaration::interface("x.y.z.Itest").implementing(c.iinternal.clone()));
    let snapshot = c.builder.build().unwrap();

    let found = LeakAnalyzer::new().classify(&snapshot, iface);
    let expected = Diagnosis::new(LeakKind::ExtendsLeak, "Iinternal", "Itest")
        .at("x.y.z.Itest");
    assert_eq!(found, vec![expected]);
}

#[test]
fn nested_type_leaks_report_nested_subject() {
    let mut c = Component::new();
    let outer = c.class("test7");
    c.builder.declare(
        Declaration::class("x.y.z.test7.inner")
            .static_member_of(outer)
            .extending(c.internal.clone()),
    );
    let snapshot = c.builder.build().unwrap();

    let result = analyze(&snapshot);
    assert_eq!(result.len(), 1);
    let expected = Diagnosis::new(LeakKind::ExtendsLeak, "internal", "inner")
        .at("x.y.z.test7.inner");
    assert!(result.contains(&expected));
}

#[test]
fn implementing_no_implement_interface() {
    let mut c = Component::new();
    let iface = c.builder.declare(Declaration::interface("x.y.z.INoImpl"));
    let class = c.builder.declare(
        Declaration::class("x.y.z.testI1").implementing(TypeRef::Declared(iface)),
    );
    c.builder.restrict(iface, RestrictionFlag::NoImplement.into());
    let snapshot = c.builder.build().unwrap();

    let found = LeakAnalyzer::new().classify(&snapshot, class);
    let expected = Diagnosis::new(LeakKind::ImplementingNoImplementType, "INoImpl", "testI1")
        .at("x.y.z.testI1");
    assert_eq!(found, vec![expected]);
}

// =============================================================================
// Member Checks
// =============================================================================

#[test]
fn static_final_field_leaks() {
    let mut c = Component::new();
    let class = c.class("testFTL1");
    c.builder.declare(
        Declaration::field("x.y.z.testFTL1.f2", c.internal.clone())
            .static_member_of(class)
            .with_modifier(Modifier::Final),
    );
    let snapshot = c.builder.build().unwrap();

    let result = analyze(&snapshot);
    let d = result.iter().next().expect("one diagnosis");
    assert_eq!(d.kind, LeakKind::FieldTypeLeak);
    assert_eq!(d.member_signature.as_deref(), Some("f2"));
}

#[test]
fn protected_members_of_final_class_are_silent() {
    let mut c = Component::new();
    let class = c.builder.declare(
        Declaration::class("x.y.z.testMPL9").with_modifier(Modifier::Final),
    );
    c.builder.declare(
        Declaration::method("x.y.z.testMPL9.m1", vec![c.internal.clone()], TypeRef::void())
            .member_of(class)
            .with_visibility(Visibility::Protected),
    );
    let snapshot = c.builder.build().unwrap();

    assert!(analyze(&snapshot).is_empty());
}

#[test]
fn single_restriction_on_overridable_method_does_not_suppress() {
    let mut c = Component::new();
    let class = c.class("testMPL13");
    let no_ref = c.builder.declare(
        Declaration::method("x.y.z.testMPL13.m1", vec![c.internal.clone()], TypeRef::void())
            .member_of(class),
    );
    let no_override = c.builder.declare(
        Declaration::method("x.y.z.testMPL13.m2", vec![c.internal.clone()], TypeRef::void())
            .member_of(class),
    );
    let both = c.builder.declare(
        Declaration::method("x.y.z.testMPL13.m3", vec![c.internal.clone()], TypeRef::void())
            .member_of(class),
    );
    c.builder
        .restrict(no_ref, RestrictionFlag::NoReference.into())
        .restrict(no_override, RestrictionFlag::NoOverride.into())
        .restrict(
            both,
            RestrictionSet::from(RestrictionFlag::NoReference).with(RestrictionFlag::NoOverride),
        );
    let snapshot = c.builder.build().unwrap();

    let result = analyze(&snapshot);
    let members: Vec<_> = result
        .of_kind(LeakKind::MethodParameterLeak)
        .filter_map(|d| d.member_signature.as_deref())
        .collect();
    assert_eq!(members, vec!["m1(internal)", "m2(internal)"]);
}

#[test]
fn return_type_leak_once_per_method() {
    let mut c = Component::new();
    let class = c.class("testMRL1");
    c.builder.declare(
        Declaration::method(
            "x.y.z.testMRL1.m1",
            vec![c.internal.clone()],
            TypeRef::array(c.internal.clone()),
        )
        .member_of(class),
    );
    let snapshot = c.builder.build().unwrap();

    let result = analyze(&snapshot);
    assert_eq!(result.of_kind(LeakKind::MethodReturnTypeLeak).count(), 1);
    assert_eq!(result.of_kind(LeakKind::MethodParameterLeak).count(), 1);
}

#[test]
fn inherited_members_are_reported_once() {
    let mut c = Component::new();
    let base = c.class("Base");
    c.builder.declare(
        Declaration::method("x.y.z.Base.m1", vec![c.internal.clone()], TypeRef::void())
            .member_of(base),
    );
    c.builder
        .declare(Declaration::class("x.y.z.Sub").extending(TypeRef::Declared(base)));
    let snapshot = c.builder.build().unwrap();

    let result = analyze(&snapshot);
    assert_eq!(result.len(), 1);
    assert_eq!(result.for_subject("Base").count(), 1);
    assert_eq!(result.for_subject("Sub").count(), 0);
}

#[test]
fn overriding_member_is_reported_at_its_own_type() {
    let mut c = Component::new();
    let base = c.class("Base");
    let base_m = c.builder.declare(
        Declaration::method("x.y.z.Base.m1", vec![c.internal.clone()], TypeRef::void())
            .member_of(base),
    );
    let sub = c
        .builder
        .declare(Declaration::class("x.y.z.Sub").extending(TypeRef::Declared(base)));
    c.builder.declare(
        Declaration::method(
            "x.y.z.Sub.m1",
            vec![TypeRef::external("java.lang.Object")],
            TypeRef::void(),
        )
        .member_of(sub)
        .overriding(base_m),
    );
    let snapshot = c.builder.build().unwrap();

    let result = analyze(&snapshot);
    assert_eq!(result.for_subject("Sub").count(), 0);
    assert_eq!(result.for_subject("Base").count(), 1);
}
