/// Diagnostics — attributable records for recoverable data problems.
///
/// Story content is hand-authored and must never crash a live session, so
/// components report problems into an explicit sink instead of failing.
/// Each record is also mirrored to the `log` facade for ambient logging.
use std::fmt;

/// A single recoverable problem found in story data or during play.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A predicate string matched none of the known surface forms.
    /// The variant it guards becomes permanently inactive.
    UnparsablePredicate { raw: String },
    /// A choice's attribute delta was missing or non-numeric; 0 was used.
    MalformedDelta { choice: String },
    /// An optional field was absent and its documented default was used.
    MissingField { table: String, field: String },
    /// Required substructure was absent; the surrounding item was dropped
    /// or the session will degrade to recovery when it is reached.
    StructuralFault { location: String, detail: String },
    /// A snapshot read or write failed; the session continues without it.
    PersistenceFailed { detail: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnparsablePredicate { raw } => {
                write!(f, "unparsable predicate '{}' (variant disabled)", raw)
            }
            Diagnostic::MalformedDelta { choice } => {
                write!(f, "missing or non-numeric pad_change on choice '{}' (using 0)", choice)
            }
            Diagnostic::MissingField { table, field } => {
                write!(f, "missing '{}' in [{}] (using default)", field, table)
            }
            Diagnostic::StructuralFault { location, detail } => {
                write!(f, "structural fault at {}: {}", location, detail)
            }
            Diagnostic::PersistenceFailed { detail } => {
                write!(f, "save file unavailable: {}", detail)
            }
        }
    }
}

/// Collects diagnostics for later inspection and mirrors them to `log`.
#[derive(Debug, Default)]
pub struct DiagnosticsSink {
    records: Vec<Diagnostic>,
}

impl DiagnosticsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.records.push(diagnostic);
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
