pub mod configs;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod preprocess;
pub mod runtime;
pub mod service;
pub mod tei;
pub mod text;
pub mod types;
pub mod xml_path;

pub use error::{Error, Result};
pub use pipeline::{convert, prepare, Conversion, LabelOverrides, PreparedDocument};
