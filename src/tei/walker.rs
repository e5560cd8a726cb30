use super::{CHUNK_PATH, DEFAULT_UNIT_ELEMENTS};
use crate::document::Node;
use crate::error::{Error, Result};
use crate::runtime::trace::{TraceEvent, TraceSink};
use crate::text::extract_node_text;
use crate::types::{render_lines, CitationStructure, CounterReset, NumberingPolicy, TagLabels, Unit};
use crate::xml_path::{element_children, path_query};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Element names the exact walk descends into below a chunk.
    pub unit_elements: Vec<String>,
    pub default_numbering: NumberingPolicy,
    pub numbering: HashMap<String, NumberingPolicy>,
    pub counter_reset: CounterReset,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            unit_elements: DEFAULT_UNIT_ELEMENTS.iter().map(|s| s.to_string()).collect(),
            default_numbering: NumberingPolicy::default(),
            numbering: HashMap::new(),
            counter_reset: CounterReset::default(),
        }
    }
}

impl WalkOptions {
    pub fn numbering_for(&self, level: &str) -> NumberingPolicy {
        self.numbering
            .get(level)
            .copied()
            .unwrap_or(self.default_numbering)
    }

    pub fn with_numbering(mut self, level: &str, policy: NumberingPolicy) -> Self {
        self.numbering.insert(level.to_string(), policy);
        self
    }

    fn accepts(&self, node: Node<'_>) -> bool {
        node.value()
            .name()
            .is_some_and(|name| self.unit_elements.iter().any(|u| u == name))
    }
}

/// Walks every edition chunk and returns its units in document order.
pub fn collect_units(
    root: Node<'_>,
    structure: &CitationStructure,
    options: &WalkOptions,
    trace: &dyn TraceSink,
) -> Result<Vec<Unit>> {
    let chunks = path_query(root, CHUNK_PATH);
    if chunks.is_empty() {
        return Err(Error::lookup("edition text", CHUNK_PATH.join("/")));
    }
    trace.record(TraceEvent::ChunksFound {
        count: chunks.len(),
    });

    let walker = ExactWalker {
        structure,
        options,
        trace,
    };
    let mut units = Vec::new();
    let mut reference = Vec::with_capacity(structure.len());
    for (index, chunk) in chunks.into_iter().enumerate() {
        walker.descend(chunk, 0, index + 1, &mut reference, &mut units)?;
    }
    Ok(units)
}

/// Converts the document body into tess lines, newline-joined.
pub fn make_tess(
    root: Node<'_>,
    labels: &TagLabels,
    structure: &CitationStructure,
    options: &WalkOptions,
    trace: &dyn TraceSink,
) -> Result<String> {
    let units = collect_units(root, structure, options, trace)?;
    Ok(render_lines(&units, labels))
}

struct ExactWalker<'w> {
    structure: &'w CitationStructure,
    options: &'w WalkOptions,
    trace: &'w dyn TraceSink,
}

impl ExactWalker<'_> {
    fn descend(
        &self,
        node: Node<'_>,
        depth: usize,
        position: usize,
        reference: &mut Vec<String>,
        units: &mut Vec<Unit>,
    ) -> Result<()> {
        if depth + 1 == self.structure.len() {
            let label = self.label(node, depth, position, reference)?;
            reference.push(label);
            let unit = Unit {
                reference: reference.clone(),
                text: extract_node_text(node),
            };
            reference.pop();

            self.trace.record(TraceEvent::UnitBuilt {
                reference: unit.reference_path(),
            });
            units.push(unit);
            return Ok(());
        }

        let children = element_children(node)
            .filter(|child| self.options.accepts(*child))
            .collect::<Vec<_>>();
        if children.is_empty() {
            return Ok(());
        }

        let label = self.label(node, depth, position, reference)?;
        reference.push(label);
        for (index, child) in children.into_iter().enumerate() {
            self.descend(child, depth + 1, index + 1, reference, units)?;
        }
        reference.pop();
        Ok(())
    }

    fn label(
        &self,
        node: Node<'_>,
        depth: usize,
        position: usize,
        reference: &[String],
    ) -> Result<String> {
        let level = self.structure.level(depth).unwrap_or_default();
        match self.options.numbering_for(level) {
            NumberingPolicy::SequentialCounter => Ok(position.to_string()),
            NumberingPolicy::ExplicitLabel => node
                .value()
                .attr("n")
                .map(str::to_string)
                .ok_or_else(|| Error::ShapeMismatch {
                    element: node.value().name().unwrap_or("?").to_string(),
                    attribute: "n",
                    location: describe_position(level, position, reference),
                }),
        }
    }
}

pub(crate) fn describe_position(level: &str, position: usize, reference: &[String]) -> String {
    if reference.is_empty() {
        format!("{level} #{position} of the edition")
    } else {
        format!("{level} #{position} under {}", reference.join("."))
    }
}
