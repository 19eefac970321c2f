//! Property tests over randomly generated components

use apileak::engine::{DiagnosisSet, LeakAnalyzer, analyze};
use apileak::foundation::{
    DeclId, Modifier, Primitive, RestrictionFlag, RestrictionSet, TypeRef, Visibility,
};
use apileak::model::{Declaration, Snapshot, SnapshotBuilder, SnapshotDelta};
use proptest::prelude::*;

// =============================================================================
// Generators
// =============================================================================

#[derive(Clone, Debug)]
enum TypeChoice {
    Class(usize),
    Primitive,
    External,
    Unresolved,
}

#[derive(Clone, Debug)]
struct ClassSpec {
    exported: bool,
    visibility: Visibility,
    is_final: bool,
    restrictions: RestrictionSet,
    superclass: Option<TypeChoice>,
    member_visibility: Visibility,
    field: TypeChoice,
    parameters: Vec<TypeChoice>,
    return_type: TypeChoice,
    method_restrictions: RestrictionSet,
}

fn type_choice() -> impl Strategy<Value = TypeChoice> {
    prop_oneof![
        3 => any::<usize>().prop_map(TypeChoice::Class),
        1 => Just(TypeChoice::Primitive),
        1 => Just(TypeChoice::External),
        1 => Just(TypeChoice::Unresolved),
    ]
}

fn supertype_choice() -> impl Strategy<Value = Option<TypeChoice>> {
    prop_oneof![
        Just(None),
        any::<usize>().prop_map(|i| Some(TypeChoice::Class(i))),
        Just(Some(TypeChoice::External)),
    ]
}

fn visibility() -> impl Strategy<Value = Visibility> {
    prop::sample::select(vec![
        Visibility::Public,
        Visibility::Protected,
        Visibility::Package,
        Visibility::Private,
    ])
}

fn restriction_set() -> impl Strategy<Value = RestrictionSet> {
    prop::collection::vec(prop::sample::select(RestrictionFlag::ALL.to_vec()), 0..3)
        .prop_map(|flags| flags.into_iter().collect())
}

fn class_spec() -> impl Strategy<Value = ClassSpec> {
    (
        (
            any::<bool>(),
            prop::sample::select(vec![Visibility::Public, Visibility::Package]),
            any::<bool>(),
            restriction_set(),
            supertype_choice(),
        ),
        (
            visibility(),
            type_choice(),
            prop::collection::vec(type_choice(), 0..4),
            type_choice(),
            restriction_set(),
        ),
    )
        .prop_map(
            |(
                (exported, visibility, is_final, restrictions, superclass),
                (member_visibility, field, parameters, return_type, method_restrictions),
            )| ClassSpec {
                exported,
                visibility,
                is_final,
                restrictions,
                superclass,
                member_visibility,
                field,
                parameters,
                return_type,
                method_restrictions,
            },
        )
}

fn component() -> impl Strategy<Value = Vec<ClassSpec>> {
    prop::collection::vec(class_spec(), 1..8)
}

// =============================================================================
// Construction
// =============================================================================

/// Declarations and restrictions for `specs`, with ids fixed up front so
/// both build paths produce the same snapshot.
struct Parts {
    declarations: Vec<(DeclId, Declaration)>,
    restrictions: Vec<(DeclId, RestrictionSet)>,
}

fn class_id(i: usize) -> DeclId {
    DeclId::new(u32::try_from(i).unwrap())
}

fn resolve(choice: &TypeChoice, count: usize) -> TypeRef {
    match choice {
        TypeChoice::Class(i) => TypeRef::Declared(class_id(i % count)),
        TypeChoice::Primitive => Primitive::Int.into(),
        TypeChoice::External => TypeRef::external("java.lang.Object"),
        TypeChoice::Unresolved => TypeRef::unresolved("missing.Type"),
    }
}

fn parts(specs: &[ClassSpec]) -> Parts {
    let count = specs.len();
    let mut declarations = Vec::new();
    let mut restrictions = Vec::new();

    for (i, spec) in specs.iter().enumerate() {
        let package = if spec.exported { "api" } else { "hidden" };
        let name = format!("{package}.C{i}");
        let mut class = Declaration::class(name.as_str()).with_visibility(spec.visibility);
        if spec.is_final {
            class = class.with_modifier(Modifier::Final);
        }
        if let Some(superclass) = &spec.superclass {
            class = class.extending(resolve(superclass, count));
        }
        let id = class_id(i);
        declarations.push((id, class));
        restrictions.push((id, spec.restrictions));

        let base = u32::try_from(count + 3 * i).unwrap();
        let owner = id;
        declarations.push((
            DeclId::new(base),
            Declaration::field(format!("{name}.f"), resolve(&spec.field, count))
                .member_of(owner)
                .with_visibility(spec.member_visibility),
        ));
        let parameters: Vec<_> = spec.parameters.iter().map(|p| resolve(p, count)).collect();
        declarations.push((
            DeclId::new(base + 1),
            Declaration::method(
                format!("{name}.m"),
                parameters.clone(),
                resolve(&spec.return_type, count),
            )
            .member_of(owner)
            .with_visibility(spec.member_visibility),
        ));
        restrictions.push((DeclId::new(base + 1), spec.method_restrictions));
        declarations.push((
            DeclId::new(base + 2),
            Declaration::constructor(format!("{name}.C{i}"), parameters)
                .member_of(owner)
                .with_visibility(spec.member_visibility),
        ));
    }

    Parts {
        declarations,
        restrictions,
    }
}

fn build(specs: &[ClassSpec]) -> Snapshot {
    let parts = parts(specs);
    let mut builder = SnapshotBuilder::new();
    for (id, declaration) in parts.declarations {
        builder.declare_with_id(id, declaration).unwrap();
    }
    for (id, flags) in parts.restrictions {
        builder.restrict(id, flags);
    }
    builder.export_package("api");
    builder.build().unwrap()
}

fn build_incrementally(specs: &[ClassSpec]) -> Snapshot {
    let parts = parts(specs);
    let mut delta = SnapshotDelta::new().export_package("api");
    // Members first: the snapshot only has to be consistent once the
    // whole delta is applied.
    for (id, declaration) in parts.declarations.into_iter().rev() {
        delta = delta.upsert(id, declaration);
    }
    for (id, flags) in parts.restrictions {
        delta = delta.set_restrictions(id, flags);
    }
    Snapshot::new().apply(&delta).unwrap()
}

fn member_level(set: &DiagnosisSet) -> usize {
    set.iter().filter(|d| !d.kind.is_type_level()).count()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn analysis_is_deterministic(specs in component()) {
        let snapshot = build(&specs);
        prop_assert_eq!(analyze(&snapshot), analyze(&snapshot.clone()));
    }

    #[test]
    fn build_mode_does_not_change_results(specs in component()) {
        let fresh = build(&specs);
        let incremental = build_incrementally(&specs);
        prop_assert_eq!(analyze(&fresh), analyze(&incremental));
    }

    #[test]
    fn hiding_a_type_silences_its_own_members(specs in component(), pick in any::<usize>()) {
        let before = analyze(&build(&specs));

        let mut hidden = specs.clone();
        let k = pick % hidden.len();
        hidden[k].visibility = Visibility::Package;
        let after = analyze(&build(&hidden));

        let subject = format!("C{k}");
        for diagnosis in after.for_subject(&subject) {
            prop_assert!(before.contains(diagnosis), "new diagnosis {}", diagnosis);
        }
        prop_assert_eq!(after.for_subject(&subject).count(), 0);
    }

    #[test]
    fn private_members_are_never_reported(specs in component()) {
        let mut private = specs;
        for spec in &mut private {
            spec.member_visibility = Visibility::Private;
        }
        prop_assert_eq!(member_level(&analyze(&build(&private))), 0);
    }

    #[test]
    fn units_cover_the_whole(specs in component()) {
        let mut snapshot = build(&specs);
        let mut delta = SnapshotDelta::new();
        for i in 0..specs.len() {
            delta = delta.assign_unit(class_id(i), format!("C{i}.java"));
        }
        snapshot = snapshot.apply(&delta).unwrap();

        let analyzer = LeakAnalyzer::new();
        let whole = analyzer.analyze(&snapshot);
        let units: Vec<String> = (0..specs.len()).map(|i| format!("C{i}.java")).collect();
        prop_assert_eq!(
            analyzer.analyze_units(&snapshot, units.iter().map(String::as_str)),
            whole
        );
    }
}
