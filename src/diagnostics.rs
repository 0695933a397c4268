//! Channel for the recoverable problems found while reading or writing.
//!
//! The reader and writer never swallow a recoverable condition: each one
//! is handed to the `DiagnosticSink` they were built with. The default
//! sink, `Diagnostics`, logs through `tracing` and keeps a copy.
use indexmap::IndexMap;
use std::fmt;
use tracing::{error, warn};

use crate::error::CimError;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    /// Severity used for each recoverable error kind.
    pub fn of(err: &CimError) -> Severity {
        match err {
            CimError::UnknownClass { .. }
            | CimError::MissingIdentifier { .. }
            | CimError::DanglingReference { .. }
            | CimError::RetypeRefused { .. }
            | CimError::Provisional { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

pub trait DiagnosticSink {
    fn report(&mut self, err: CimError);
}

#[derive(Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub error: CimError,
}

/// Logs every report and remembers it for later inspection.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of reports of one kind, see `CimError::kind`.
    pub fn count(&self, kind: &str) -> usize {
        self.entries.iter().filter(|d| d.error.kind() == kind).count()
    }

    pub fn errors_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a CimError> + 'a {
        self.entries
            .iter()
            .filter(move |d| d.error.kind() == kind)
            .map(|d| &d.error)
    }

    /// Identical messages folded together, in order of first appearance.
    pub fn grouped(&self) -> IndexMap<String, usize> {
        let mut grouped: IndexMap<String, usize> = IndexMap::new();
        for d in &self.entries {
            *grouped.entry(d.error.to_string()).or_insert(0) += 1;
        }
        grouped
    }

    pub fn clear(&mut self) {
        self.entries.clear()
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, err: CimError) {
        let severity = Severity::of(&err);
        match severity {
            Severity::Warning => warn!(kind = err.kind(), "{}", err),
            Severity::Error => error!(kind = err.kind(), "{}", err),
        }
        self.entries.push(Diagnostic {
            severity,
            error: err,
        });
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, err: CimError) {
        (**self).report(err)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{DiagnosticSink, Diagnostics, Severity};
    use crate::error::CimError;

    fn unknown(class: &str) -> CimError {
        CimError::UnknownClass {
            class: class.to_string(),
            id: "_1".to_string(),
        }
    }

    #[test]
    fn records_and_groups() {
        let mut d = Diagnostics::new();
        d.report(unknown("Foo"));
        d.report(unknown("Foo"));
        d.report(unknown("Bar"));

        assert_eq!(d.len(), 3);
        assert_eq!(d.count("unknown_class"), 3);
        assert_eq!(d.count("dangling_reference"), 0);

        let grouped = d.grouped();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["unknown CIM class Foo (rdf:ID: _1)"], 2);
        assert_eq!(d.entries()[0].severity, Severity::Warning);
    }

    #[test]
    fn severities() {
        let refused = CimError::RetypeRefused {
            id: "_1".into(),
            existing: "Terminal".into(),
            declared: "BaseVoltage".into(),
        };
        assert_eq!(Severity::of(&refused), Severity::Warning);

        let unknown_attr = CimError::UnknownAttribute {
            class: "Terminal".into(),
            attribute: "colour".into(),
        };
        assert_eq!(Severity::of(&unknown_attr), Severity::Error);
    }

    fn feed<S: DiagnosticSink>(mut sink: S) {
        sink.report(unknown("Foo"));
    }

    #[test]
    fn borrowed_sink_reports_into_owner() {
        let mut d = Diagnostics::new();
        feed(&mut d);
        assert_eq!(d.len(), 1);
        d.clear();
        assert!(d.is_empty());
    }
}
