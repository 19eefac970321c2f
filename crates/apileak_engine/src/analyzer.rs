//! Analysis entry points.
//!
//! An analysis is a pure function of the snapshot it is handed: nothing is
//! cached between calls, so the same snapshot always yields the same set
//! whether it was built in one go or reached through a series of deltas.

use apileak_foundation::DeclId;
use apileak_model::Snapshot;

use crate::classifier::LeakClassifier;
use crate::config::AnalysisConfig;
use crate::diagnosis::{Diagnosis, DiagnosisSet};
use crate::emitter::DiagnosisEmitter;
use crate::restriction::{MetadataRestrictions, RestrictionResolver};

/// Analyzes a whole snapshot with the default configuration.
#[must_use]
pub fn analyze(snapshot: &Snapshot) -> DiagnosisSet {
    LeakAnalyzer::new().analyze(snapshot)
}

/// Runs leak analysis over snapshots.
#[derive(Clone, Debug, Default)]
pub struct LeakAnalyzer {
    config: AnalysisConfig,
}

impl LeakAnalyzer {
    /// Creates an analyzer with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an analyzer with the given configuration.
    #[must_use]
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyzes every declaration in the snapshot.
    #[must_use]
    pub fn analyze(&self, snapshot: &Snapshot) -> DiagnosisSet {
        self.analyze_with(snapshot, &MetadataRestrictions::new(snapshot))
    }

    /// Analyzes every declaration, reading restrictions from `restrictions`
    /// instead of the snapshot's metadata.
    #[must_use]
    pub fn analyze_with<R: RestrictionResolver>(
        &self,
        snapshot: &Snapshot,
        restrictions: &R,
    ) -> DiagnosisSet {
        self.run(snapshot, restrictions, snapshot.ids())
    }

    /// Analyzes the declarations of one compilation unit.
    ///
    /// The result equals the whole-snapshot result restricted to the unit.
    #[must_use]
    pub fn analyze_unit(&self, snapshot: &Snapshot, unit: &str) -> DiagnosisSet {
        let restrictions = MetadataRestrictions::new(snapshot);
        self.run(
            snapshot,
            &restrictions,
            snapshot.declarations_in_unit(unit).into_iter(),
        )
    }

    /// Analyzes several compilation units and unions the results.
    #[must_use]
    pub fn analyze_units<'u, I>(&self, snapshot: &Snapshot, units: I) -> DiagnosisSet
    where
        I: IntoIterator<Item = &'u str>,
    {
        let mut all = DiagnosisSet::new();
        for unit in units {
            all.merge(self.analyze_unit(snapshot, unit));
        }
        all
    }

    /// Analyzes several compilation units on the rayon thread pool.
    #[cfg(feature = "parallel")]
    #[must_use]
    pub fn analyze_units_par(&self, snapshot: &Snapshot, units: &[&str]) -> DiagnosisSet {
        use rayon::prelude::*;

        units
            .par_iter()
            .map(|unit| self.analyze_unit(snapshot, unit))
            .reduce(DiagnosisSet::new, |mut acc, part| {
                acc.merge(part);
                acc
            })
    }

    /// Returns the diagnoses for a single declaration, in discovery order.
    ///
    /// Empty if the declaration is not API surface.
    #[must_use]
    pub fn classify(&self, snapshot: &Snapshot, id: DeclId) -> Vec<Diagnosis> {
        let restrictions = MetadataRestrictions::new(snapshot);
        let classifier = self.classifier(snapshot, &restrictions);
        let emitter = DiagnosisEmitter::new(snapshot);
        classifier
            .classify(id)
            .iter()
            .filter(|finding| self.config.reports(finding.kind))
            .filter_map(|finding| emitter.emit(finding))
            .collect()
    }

    fn classifier<'a, R: RestrictionResolver>(
        &self,
        snapshot: &'a Snapshot,
        restrictions: &'a R,
    ) -> LeakClassifier<'a, R> {
        LeakClassifier::new(snapshot, restrictions)
            .with_suppress_unreachable(self.config.suppress_unreachable_members)
    }

    fn run<R, I>(&self, snapshot: &Snapshot, restrictions: &R, ids: I) -> DiagnosisSet
    where
        R: RestrictionResolver,
        I: Iterator<Item = DeclId>,
    {
        let mut diagnoses = DiagnosisSet::new();
        if self.config.severities.all_ignored() {
            tracing::debug!("every leak severity is ignore, skipping analysis");
            return diagnoses;
        }

        let classifier = self.classifier(snapshot, restrictions);
        let emitter = DiagnosisEmitter::new(snapshot);
        let mut examined = 0_usize;
        for id in ids {
            examined += 1;
            for finding in classifier.classify(id) {
                if !self.config.reports(finding.kind) {
                    tracing::trace!(kind = %finding.kind, source = %id, "severity ignore, dropped");
                    continue;
                }
                if let Some(diagnosis) = emitter.emit(&finding) {
                    diagnoses.insert(diagnosis);
                }
            }
        }

        tracing::debug!(
            examined,
            diagnoses = diagnoses.len(),
            "leak analysis finished"
        );
        diagnoses
    }
}
