//! Integration tests for analysis configuration

use apileak_engine::{AnalysisConfig, LeakAnalyzer, LeakKind, Severity, SeverityKey, SeverityTable};
use apileak_foundation::{ErrorKind, RestrictionFlag, TypeRef};
use apileak_model::{Declaration, Snapshot, SnapshotBuilder};

fn component() -> Snapshot {
    let mut builder = SnapshotBuilder::new();
    let internal = builder.declare(Declaration::class("x.y.z.internal.internal"));
    let sealed = builder.declare(Declaration::class("x.y.z.classNoExtend"));
    let class =
        builder.declare(Declaration::class("x.y.z.test1").extending(TypeRef::Declared(internal)));
    builder.declare(Declaration::class("x.y.z.test34").extending(TypeRef::Declared(sealed)));
    builder.declare(
        Declaration::field("x.y.z.test1.f", TypeRef::Declared(internal)).member_of(class),
    );
    let ctor = builder.declare(
        Declaration::constructor("x.y.z.test1.test1", vec![TypeRef::Declared(internal)])
            .member_of(class),
    );
    builder
        .restrict(sealed, RestrictionFlag::NoExtend.into())
        .restrict(ctor, RestrictionFlag::NoReference.into())
        .export_package("x.y.z");
    builder.build().unwrap()
}

#[test]
fn default_reports_everything_reachable() {
    let result = LeakAnalyzer::new().analyze(&component());
    let kinds: Vec<_> = result.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LeakKind::ExtendsLeak,
            LeakKind::ExtendingNoExtendType,
            LeakKind::FieldTypeLeak
        ]
    );
}

#[test]
fn unreachable_constructor_reported_when_suppression_off() {
    let config = AnalysisConfig::default().with_suppress_unreachable_members(false);
    let result = LeakAnalyzer::with_config(config).analyze(&component());
    assert_eq!(result.of_kind(LeakKind::ConstructorParameterLeak).count(), 1);
}

#[test]
fn severity_table_from_preferences() {
    let table = SeverityTable::parse("LEAK_FIELD_DECL=ignore, ILLEGAL_EXTEND=ignore").unwrap();
    let analyzer = LeakAnalyzer::with_config(AnalysisConfig::default().with_severities(table));
    let result = analyzer.analyze(&component());
    assert_eq!(result.len(), 1);
    assert_eq!(result.of_kind(LeakKind::ExtendsLeak).count(), 1);
    assert_eq!(analyzer.config().severities.get(SeverityKey::LeakFieldDecl), Severity::Ignore);
}

#[test]
fn bad_preferences_are_rejected() {
    let err = SeverityTable::parse("LEAK_FIELD_DECL=sometimes").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidConfig { setting: "severity", .. }));

    let err = SeverityTable::parse("LEAK_EVERYWHERE=error").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidConfig { setting: "severity key", .. }));
}

#[test]
fn strict_preset_keeps_results() {
    let strict = LeakAnalyzer::with_config(AnalysisConfig::strict()).analyze(&component());
    let default = LeakAnalyzer::new().analyze(&component());
    assert_eq!(strict, default);
}
