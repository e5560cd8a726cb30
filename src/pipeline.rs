//! End-to-end conversion: raw TEI text in, tess text out.
//!
//! Conversion happens in two steps so a caller can review the suggested
//! labels and structure before committing: [`prepare`] resolves everything
//! that comes from the header, [`PreparedDocument::convert`] walks the body.

use crate::configs::ConvertConfig;
use crate::document::Document;
use crate::error::Result;
use crate::preprocess::preprocess;
use crate::runtime::trace::{TraceEvent, TraceSink};
use crate::tei::inferred::{infer_matchers, inferred_levels};
use crate::tei::metadata::{author_abbreviation, clean_label, tess_filename, title_abbreviation};
use crate::tei::structure::cts_structure;
use crate::tei::{inferred, walker};
use crate::types::{
    render_lines, CitationStructure, ResolvedStructure, StructureStrategy, TagLabels, Unit,
};
use serde::{Deserialize, Serialize};

/// A parsed document with its header-derived suggestions.
#[derive(Debug)]
pub struct PreparedDocument {
    document: Document,
    labels: TagLabels,
    structure: ResolvedStructure,
}

/// Replacements for the suggested labels or structure. `None` keeps the
/// suggestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelOverrides {
    pub author: Option<String>,
    pub title: Option<String>,
    /// Dotted level names, e.g. `book.poem.line`.
    pub structure: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub labels: TagLabels,
    pub structure: CitationStructure,
    pub tess: String,
    pub filename: String,
    pub unit_count: usize,
}

pub fn prepare(raw: &str, config: &ConvertConfig, trace: &dyn TraceSink) -> Result<PreparedDocument> {
    let cleaned = preprocess(raw);
    trace.record(TraceEvent::Preprocessed {
        input_len: raw.len(),
        output_len: cleaned.len(),
    });

    let document = Document::parse(&cleaned)?;
    trace.record(TraceEvent::Parsed {
        node_count: document.node_count(),
    });

    let root = document.root();
    let mut author = author_abbreviation(root)?;
    let mut title = title_abbreviation(root)?;
    if config.normalize_labels {
        author = clean_label(&author);
        title = clean_label(&title);
    }
    trace.record(TraceEvent::AuthorResolved(author.clone()));
    trace.record(TraceEvent::TitleResolved(title.clone()));

    let structure = resolve_structure(&document, config, None)?;
    trace.record(TraceEvent::StructureResolved(
        structure.structure().levels().to_vec(),
    ));
    tracing::info!(
        "[Tess] Prepared {} {} with structure {} ({:?})",
        author,
        title,
        structure.structure(),
        structure.strategy()
    );

    Ok(PreparedDocument {
        document,
        labels: TagLabels::new(author, title),
        structure,
    })
}

fn resolve_structure(
    document: &Document,
    config: &ConvertConfig,
    levels: Option<&CitationStructure>,
) -> Result<ResolvedStructure> {
    let root = document.root();
    let levels = levels.or(config.levels.as_ref());
    match config.strategy {
        StructureStrategy::Exact => {
            let structure = match levels {
                Some(levels) => levels.clone(),
                None => cts_structure(root, &config.scheme)?,
            };
            Ok(ResolvedStructure::Exact { structure })
        }
        StructureStrategy::Inferred => {
            let structure = inferred_levels(root, &config.scheme, levels)?;
            Ok(ResolvedStructure::Inferred(infer_matchers(root, &structure)?))
        }
    }
}

impl PreparedDocument {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn labels(&self) -> &TagLabels {
        &self.labels
    }

    pub fn structure(&self) -> &ResolvedStructure {
        &self.structure
    }

    /// File name the suggested labels would produce.
    pub fn suggested_filename(&self, config: &ConvertConfig) -> String {
        tess_filename(
            &self.labels.author,
            &self.labels.title,
            &config.output_extension,
        )
    }

    /// Walks the body with the suggestions, as amended by `overrides`.
    pub fn convert(
        &self,
        overrides: &LabelOverrides,
        config: &ConvertConfig,
        trace: &dyn TraceSink,
    ) -> Result<Conversion> {
        let labels = TagLabels::new(
            overrides
                .author
                .clone()
                .unwrap_or_else(|| self.labels.author.clone()),
            overrides
                .title
                .clone()
                .unwrap_or_else(|| self.labels.title.clone()),
        );

        let structure = match overrides.structure.as_deref() {
            Some(dotted) => {
                let levels = CitationStructure::parse_dotted(dotted)?;
                resolve_structure(&self.document, config, Some(&levels))?
            }
            None => self.structure.clone(),
        };

        let units = self.units(&structure, config, trace)?;
        trace.record(TraceEvent::Finished { units: units.len() });
        tracing::info!(
            "[Tess] Converted {} units for {}",
            units.len(),
            labels.prefix()
        );

        Ok(Conversion {
            tess: render_lines(&units, &labels),
            filename: tess_filename(&labels.author, &labels.title, &config.output_extension),
            structure: structure.structure().clone(),
            unit_count: units.len(),
            labels,
        })
    }

    fn units(
        &self,
        structure: &ResolvedStructure,
        config: &ConvertConfig,
        trace: &dyn TraceSink,
    ) -> Result<Vec<Unit>> {
        let root = self.document.root();
        let options = config.walk_options();
        match structure {
            ResolvedStructure::Exact { structure } => {
                walker::collect_units(root, structure, &options, trace)
            }
            ResolvedStructure::Inferred(matched) => {
                inferred::collect_units(root, matched, &options, trace)
            }
        }
    }
}

/// [`prepare`] followed by a conversion with the suggestions unchanged.
pub fn convert(raw: &str, config: &ConvertConfig, trace: &dyn TraceSink) -> Result<Conversion> {
    prepare(raw, config, trace)?.convert(&LabelOverrides::default(), config, trace)
}
