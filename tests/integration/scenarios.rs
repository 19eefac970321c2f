//! End-to-end leak scenarios

use apileak::engine::{Diagnosis, DiagnosisSet, LeakKind, analyze};
use apileak::foundation::{DeclId, Primitive, RestrictionFlag, TypeRef, Visibility};
use apileak::model::{Declaration, SnapshotBuilder};

/// A component with the exported package `x.y.z` and the internal types
/// `internal` and `Iinternal` in a package that is not exported.
struct Fixture {
    builder: SnapshotBuilder,
    internal: TypeRef,
    iinternal: TypeRef,
}

impl Fixture {
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

    fn declare(&mut self, declaration: Declaration) -> DeclId {
        self.builder.declare(declaration)
    }

    fn analyze(self) -> DiagnosisSet {
        analyze(&self.builder.build().expect("fixture is well-formed"))
    }
}

#[test]
fn extends_internal_class() {
    let mut fx = Fixture::new();
    let internal = fx.internal.clone();
    fx.declare(Declaration::class("x.y.z.test1").extending(internal));

    let result = fx.analyze();
    assert_eq!(result.len(), 1);
    let expected = Diagnosis::new(LeakKind::ExtendsLeak, "internal", "test1")
        .at("x.y.z.test1");
    assert!(result.contains(&expected));
}

#[test]
fn exposed_nested_supertype_and_hidden_subtype_are_silent() {
    let mut fx = Fixture::new();
    let test3 = fx.declare(Declaration::class("x.y.z.test3"));
    let nested = fx.declare(Declaration::class("x.y.z.test3.internal").static_member_of(test3));
    fx.declare(
        Declaration::class("x.y.z.test3.inner")
            .static_member_of(test3)
            .extending(TypeRef::Declared(nested)),
    );

    let test2 = fx.declare(Declaration::class("x.y.z.test2").with_visibility(Visibility::Package));
    let internal = fx.internal.clone();
    fx.declare(
        Declaration::class("x.y.z.test2.inner")
            .member_of(test2)
            .extending(internal),
    );

    assert!(fx.analyze().is_empty());
}

#[test]
fn six_methods_six_parameter_leaks() {
    let mut fx = Fixture::new();
    let class = fx.declare(Declaration::class("x.y.z.testMPL1"));
    let internal = fx.internal.clone();
    let signatures = [
        vec![internal.clone()],
        vec![internal.clone(), Primitive::Int.into()],
        vec![Primitive::Double.into(), internal.clone()],
        vec![TypeRef::external("java.lang.Object"), internal.clone()],
        vec![TypeRef::array(internal.clone())],
        vec![internal.clone(), Primitive::Long.into(), Primitive::Char.into()],
    ];
    for (i, params) in signatures.into_iter().enumerate() {
        fx.declare(
            Declaration::method(format!("x.y.z.testMPL1.m{}", i + 1), params, TypeRef::void())
                .member_of(class),
        );
    }

    let result = fx.analyze();
    assert_eq!(result.len(), 6);
    assert!(result.iter().all(|d| d.kind == LeakKind::MethodParameterLeak));
    assert!(result.iter().all(|d| &*d.subject == "testMPL1"));
    let members: Vec<_> = result
        .iter()
        .filter_map(|d| d.member_signature.as_deref())
        .collect();
    assert_eq!(
        members,
        vec![
            "m1(internal)",
            "m2(internal, int)",
            "m3(double, internal)",
            "m4(Object, internal)",
            "m5(internal[])",
            "m6(internal, long, char)",
        ]
    );
}

#[test]
fn mixed_parameters_yield_one_leak_per_type() {
    let mut fx = Fixture::new();
    let class = fx.declare(Declaration::class("x.y.z.testMPL5"));
    let params = vec![
        fx.iinternal.clone(),
        TypeRef::external("java.lang.Object"),
        Primitive::Double.into(),
        fx.internal.clone(),
    ];
    fx.declare(Declaration::method("x.y.z.testMPL5.m1", params, TypeRef::void()).member_of(class));

    let result = fx.analyze();
    let offending: Vec<_> = result.iter().map(|d| &*d.offending_type).collect();
    assert_eq!(offending, vec!["Iinternal", "internal"]);
    assert!(result.iter().all(|d| {
        d.member_signature.as_deref() == Some("m1(Iinternal, Object, double, internal)")
    }));
}

#[test]
fn extending_no_extend_class() {
    let mut fx = Fixture::new();
    let sealed = fx.declare(Declaration::class("x.y.z.classNoExtend"));
    fx.declare(Declaration::class("x.y.z.test34").extending(TypeRef::Declared(sealed)));
    fx.builder.restrict(sealed, RestrictionFlag::NoExtend.into());

    let result = fx.analyze();
    assert_eq!(result.len(), 1);
    let d = result.iter().next().unwrap();
    assert_eq!(
        d,
        &Diagnosis::new(LeakKind::ExtendingNoExtendType, "classNoExtend", "test34")
            .at("x.y.z.test34")
    );
    assert_ne!(d.kind, LeakKind::ExtendsLeak);
}

#[test]
fn closed_hierarchy_may_extend_no_extend_class() {
    let mut fx = Fixture::new();
    let sealed = fx.declare(Declaration::class("x.y.z.classNoExtend"));
    let test35 =
        fx.declare(Declaration::class("x.y.z.test35").extending(TypeRef::Declared(sealed)));
    fx.builder
        .restrict(sealed, RestrictionFlag::NoExtend.into())
        .restrict(test35, RestrictionFlag::NoExtend.into());

    assert!(fx.analyze().is_empty());
}

#[test]
fn constructor_parameter_of_non_public_top_level_type() {
    let mut fx = Fixture::new();
    let outer = fx.declare(
        Declaration::class("x.y.z.outercpl14").with_visibility(Visibility::Package),
    );
    let class = fx.declare(Declaration::class("x.y.z.testCPL14"));
    fx.declare(
        Declaration::constructor("x.y.z.testCPL14.testCPL14", vec![TypeRef::Declared(outer)])
            .member_of(class),
    );

    let result = fx.analyze();
    assert_eq!(result.len(), 1);
    let d = result.iter().next().unwrap();
    assert_eq!(d.kind, LeakKind::ConstructorParameterLeak);
    assert_eq!(&*d.offending_type, "outercpl14");
    assert_eq!(&*d.subject, "testCPL14");
    assert_eq!(d.message_args(), vec!["outercpl14", "testCPL14"]);
}

#[test]
fn field_leak_survives_no_reference() {
    let mut fx = Fixture::new();
    let class = fx.declare(Declaration::class("x.y.z.testFTL3"));
    let internal = fx.internal.clone();
    let field = fx.declare(Declaration::field("x.y.z.testFTL3.f1", internal).member_of(class));
    fx.builder.restrict(field, RestrictionFlag::NoReference.into());

    let result = fx.analyze();
    assert_eq!(result.len(), 1);
    let expected = Diagnosis::new(LeakKind::FieldTypeLeak, "internal", "testFTL3")
        .with_member("f1")
        .at("x.y.z.testFTL3");
    assert!(result.contains(&expected));
}

#[test]
fn private_members_never_leak() {
    let mut fx = Fixture::new();
    let class = fx.declare(Declaration::class("x.y.z.testPriv"));
    let internal = fx.internal.clone();
    fx.declare(
        Declaration::field("x.y.z.testPriv.f", internal.clone())
            .member_of(class)
            .with_visibility(Visibility::Private),
    );
    fx.declare(
        Declaration::method("x.y.z.testPriv.m", vec![internal.clone()], internal.clone())
            .member_of(class)
            .with_visibility(Visibility::Private),
    );
    fx.declare(
        Declaration::constructor("x.y.z.testPriv.testPriv", vec![internal])
            .member_of(class)
            .with_visibility(Visibility::Private),
    );

    assert!(fx.analyze().is_empty());
}

#[test]
fn same_named_declarations_are_reported_separately() {
    let mut fx = Fixture::new();
    let internal = fx.internal.clone();
    for outer in ["test7", "test8"] {
        let owner = fx.declare(Declaration::class(format!("x.y.z.{outer}")));
        fx.declare(
            Declaration::class(format!("x.y.z.{outer}.inner"))
                .static_member_of(owner)
                .extending(internal.clone()),
        );
    }
    for package in ["x.y.z.a", "x.y.z.b"] {
        let class = fx.declare(Declaration::class(format!("{package}.C")));
        fx.declare(
            Declaration::field(format!("{package}.C.f"), internal.clone()).member_of(class),
        );
        fx.builder.export_package(package);
    }

    let result = fx.analyze();
    assert_eq!(result.len(), 4);
    assert_eq!(result.for_subject("inner").count(), 2);
    assert_eq!(result.for_subject("C").count(), 2);
    for location in ["x.y.z.test7.inner", "x.y.z.test8.inner", "x.y.z.a.C", "x.y.z.b.C"] {
        assert_eq!(result.for_location(location).count(), 1, "{location}");
    }
    let expected = Diagnosis::new(LeakKind::FieldTypeLeak, "internal", "C")
        .with_member("f")
        .at("x.y.z.b.C");
    assert!(result.contains(&expected));
}
