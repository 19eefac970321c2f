//! Analysis configuration.
//!
//! Severities mirror the problem preferences of an API tooling setup: one
//! key per leak family, each mapped to ignore, warning or error. Ignored
//! families are not reported at all.

use std::fmt;
use std::str::FromStr;

use apileak_foundation::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::diagnosis::LeakKind;

// =============================================================================
// Severity
// =============================================================================

/// How a reported leak should be surfaced.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Severity {
    /// Not reported.
    Ignore,
    /// Reported as a warning.
    #[default]
    Warning,
    /// Reported as an error.
    Error,
}

impl Severity {
    /// Returns the preference string for this severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Returns true unless this is [`Severity::Ignore`].
    #[must_use]
    pub const fn is_reported(self) -> bool {
        !matches!(self, Self::Ignore)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(Error::invalid_config("severity", s)),
        }
    }
}

// =============================================================================
// Severity Keys
// =============================================================================

/// A leak family with its own severity preference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SeverityKey {
    /// Extending a non-API type.
    LeakExtend,
    /// Implementing a non-API interface.
    LeakImplement,
    /// Field of a non-API type.
    LeakFieldDecl,
    /// Method or constructor parameter of a non-API type.
    LeakMethodParam,
    /// Method return type that is not API.
    LeakMethodReturnType,
    /// Extending a type clients must not extend.
    IllegalExtend,
    /// Implementing an interface clients must not implement.
    IllegalImplement,
}

impl SeverityKey {
    /// Every key, in declaration order.
    pub const ALL: [SeverityKey; 7] = [
        SeverityKey::LeakExtend,
        SeverityKey::LeakImplement,
        SeverityKey::LeakFieldDecl,
        SeverityKey::LeakMethodParam,
        SeverityKey::LeakMethodReturnType,
        SeverityKey::IllegalExtend,
        SeverityKey::IllegalImplement,
    ];

    /// Returns the preference key string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LeakExtend => "LEAK_EXTEND",
            Self::LeakImplement => "LEAK_IMPLEMENT",
            Self::LeakFieldDecl => "LEAK_FIELD_DECL",
            Self::LeakMethodParam => "LEAK_METHOD_PARAM",
            Self::LeakMethodReturnType => "LEAK_METHOD_RETURN_TYPE",
            Self::IllegalExtend => "ILLEGAL_EXTEND",
            Self::IllegalImplement => "ILLEGAL_IMPLEMENT",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SeverityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::invalid_config("severity key", s))
    }
}

impl From<LeakKind> for SeverityKey {
    fn from(kind: LeakKind) -> Self {
        match kind {
            LeakKind::ExtendsLeak => Self::LeakExtend,
            LeakKind::ImplementsLeak => Self::LeakImplement,
            LeakKind::FieldTypeLeak => Self::LeakFieldDecl,
            LeakKind::ConstructorParameterLeak | LeakKind::MethodParameterLeak => {
                Self::LeakMethodParam
            }
            LeakKind::MethodReturnTypeLeak => Self::LeakMethodReturnType,
            LeakKind::ExtendingNoExtendType => Self::IllegalExtend,
            LeakKind::ImplementingNoImplementType => Self::IllegalImplement,
        }
    }
}

// =============================================================================
// Severity Table
// =============================================================================

/// Severity per [`SeverityKey`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeverityTable {
    levels: [Severity; 7],
}

impl Default for SeverityTable {
    fn default() -> Self {
        Self::uniform(Severity::Warning)
    }
}

impl SeverityTable {
    /// Creates a table with every key set to `severity`.
    #[must_use]
    pub const fn uniform(severity: Severity) -> Self {
        Self {
            levels: [severity; 7],
        }
    }

    /// Returns the severity of `key`.
    #[must_use]
    pub const fn get(&self, key: SeverityKey) -> Severity {
        self.levels[key.index()]
    }

    /// Sets the severity of `key`.
    pub fn set(&mut self, key: SeverityKey, severity: Severity) {
        self.levels[key.index()] = severity;
    }

    /// Returns the severity a diagnosis of `kind` is reported with.
    #[must_use]
    pub fn for_kind(&self, kind: LeakKind) -> Severity {
        self.get(kind.into())
    }

    /// Returns true if every key is ignored.
    #[must_use]
    pub fn all_ignored(&self) -> bool {
        self.levels.iter().all(|level| !level.is_reported())
    }

    /// Parses `KEY=severity` pairs separated by commas or newlines.
    ///
    /// Keys not mentioned keep their default.
    pub fn parse(input: &str) -> Result<Self> {
        let mut table = Self::default();
        for entry in input.split([',', '\n']).map(str::trim).filter(|e| !e.is_empty()) {
            let (key, value) = entry
                .split_once('=')
                .ok_or_else(|| Error::invalid_config("severity entry", entry))?;
            table.set(key.parse()?, value.parse()?);
        }
        Ok(table)
    }

    /// Iterates `(key, severity)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (SeverityKey, Severity)> + '_ {
        SeverityKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }
}

// =============================================================================
// Analysis Config
// =============================================================================

/// Configuration for one analysis run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnalysisConfig {
    /// Severity per leak family.
    pub severities: SeverityTable,

    /// Skip parameter and return checks on members no client can reach
    /// (neither referenceable nor overridable).
    pub suppress_unreachable_members: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            severities: SeverityTable::default(),
            suppress_unreachable_members: true,
        }
    }
}

impl AnalysisConfig {
    /// Creates a configuration reporting every leak as an error.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            severities: SeverityTable::uniform(Severity::Error),
            ..Self::default()
        }
    }

    /// Creates a configuration that only reports visibility leaks, ignoring
    /// restriction-driven ones.
    #[must_use]
    pub fn leaks_only() -> Self {
        Self::default()
            .with_severity(SeverityKey::IllegalExtend, Severity::Ignore)
            .with_severity(SeverityKey::IllegalImplement, Severity::Ignore)
    }

    /// Builder method to replace the severity table.
    #[must_use]
    pub fn with_severities(mut self, severities: SeverityTable) -> Self {
        self.severities = severities;
        self
    }

    /// Builder method to set one severity.
    #[must_use]
    pub fn with_severity(mut self, key: SeverityKey, severity: Severity) -> Self {
        self.severities.set(key, severity);
        self
    }

    /// Builder method to enable/disable unreachable member suppression.
    #[must_use]
    pub fn with_suppress_unreachable_members(mut self, suppress: bool) -> Self {
        self.suppress_unreachable_members = suppress;
        self
    }

    /// Returns true if diagnoses of `kind` are reported.
    #[must_use]
    pub fn reports(&self, kind: LeakKind) -> bool {
        self.severities.for_kind(kind).is_reported()
    }
}
