//! Error types for TEI to tess conversion.

use thiserror::Error;

/// Errors that can occur while preparing or converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// A path query found nothing where at least one match is required.
    #[error("Lookup failed while resolving {step}: no {target} found")]
    Lookup { step: &'static str, target: String },

    /// An element lacks an attribute its structural role requires.
    #[error("Shape mismatch: <{element}> at {location} has no `{attribute}` attribute")]
    ShapeMismatch {
        element: String,
        attribute: &'static str,
        location: String,
    },

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Invalid citation structure: {0}")]
    InvalidStructure(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fetch error: {0}")]
    Fetch(String),
}

impl Error {
    pub(crate) fn lookup(step: &'static str, target: impl Into<String>) -> Self {
        Error::Lookup {
            step,
            target: target.into(),
        }
    }

    /// True for failures caused by the document's content rather than by the
    /// parser or the environment.
    pub fn is_document_shape(&self) -> bool {
        matches!(
            self,
            Error::Lookup { .. } | Error::ShapeMismatch { .. } | Error::InvalidStructure(_)
        )
    }

    /// True when the tree parser rejected the input.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::Xml(_) | Error::Malformed(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
