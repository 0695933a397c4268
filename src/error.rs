use std::{fmt::Display, io, path::PathBuf, sync::Arc};
use thiserror::Error;

use crate::schema::AttributeKind;

/// Everything that can go wrong while reading or writing CIM RDF/XML.
///
/// `Xml`, `NotRdf`, `UnexpectedEof`, `Io` and `Write` abort the operation
/// that raised them. The other variants are recoverable: the reader and
/// writer hand them to their `DiagnosticSink` and carry on.
#[derive(Debug, Error)]
pub enum CimError {
    #[error("malformed RDF/XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("no RDF data: root element is {0}")]
    NotRdf(String),

    #[error("unexpected end of document inside {0}")]
    UnexpectedEof(String),

    #[error("unknown CIM class {class} (rdf:ID: {id})")]
    UnknownClass { class: String, id: String },

    #[error("possible CIM class {class} without rdf:ID or rdf:about")]
    MissingIdentifier { class: String },

    #[error("unknown attribute {attribute} for class {class}")]
    UnknownAttribute { class: String, attribute: String },

    #[error("attribute {class}.{attribute} is {kind} and cannot hold {given}")]
    AttributeKindMismatch {
        class: String,
        attribute: String,
        kind: AttributeKind,
        given: &'static str,
    },

    #[error("attribute {class}.{attribute} expects {expected}, found {found} with rdf:ID {target}")]
    IncompatibleTarget {
        class: String,
        attribute: String,
        expected: String,
        found: String,
        target: String,
    },

    #[error("cannot find object with rdf:ID {target} (referenced by {source_id}.{attribute})")]
    DanglingReference {
        source_id: String,
        attribute: String,
        target: String,
    },

    #[error("found {existing} (instead of {declared}) with rdf:ID {id}")]
    RetypeRefused {
        id: String,
        existing: String,
        declared: String,
    },

    #[error("object with rdf:ID {id} was only declared as {class}")]
    Provisional { id: String, class: String },

    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write RDF/XML: {0}")]
    Write(#[from] io::Error),
}

impl CimError {
    /// Abort-worthy errors are returned, never reported to a sink.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CimError::Xml(_)
                | CimError::NotRdf(_)
                | CimError::UnexpectedEof(_)
                | CimError::Io { .. }
                | CimError::Write(_)
        )
    }

    /// Stable short name of the variant, used to group diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            CimError::Xml(_) => "xml",
            CimError::NotRdf(_) => "not_rdf",
            CimError::UnexpectedEof(_) => "unexpected_eof",
            CimError::UnknownClass { .. } => "unknown_class",
            CimError::MissingIdentifier { .. } => "missing_identifier",
            CimError::UnknownAttribute { .. } => "unknown_attribute",
            CimError::AttributeKindMismatch { .. } => "attribute_kind_mismatch",
            CimError::IncompatibleTarget { .. } => "incompatible_target",
            CimError::DanglingReference { .. } => "dangling_reference",
            CimError::RetypeRefused { .. } => "retype_refused",
            CimError::Provisional { .. } => "provisional",
            CimError::Io { .. } => "io",
            CimError::Write(_) => "write",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CimError::Io {
            path: path.into(),
            source,
        }
    }

    /// Pin an I/O failure met by the XML reader on the source it came from.
    pub(crate) fn in_source(self, label: impl Display) -> Self {
        match self {
            CimError::Xml(quick_xml::Error::Io(e)) => CimError::io(label.to_string(), unshare(e)),
            other => other,
        }
    }
}

/// quick-xml shares its I/O errors; take ours back out.
pub(crate) fn unshare(error: Arc<io::Error>) -> io::Error {
    Arc::try_unwrap(error).unwrap_or_else(|shared| io::Error::new(shared.kind(), shared.to_string()))
}

pub type Result<T> = std::result::Result<T, CimError>;
