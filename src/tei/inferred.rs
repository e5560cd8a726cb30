//! Heuristic structure matching for documents without usable reference
//! patterns.
//!
//! Each level name is matched to the first body element (breadth-first) that
//! names it in an attribute value, e.g. `<div subtype="book">`, or to `l` for
//! a `line`/`verse` level. The walk then keeps one counter per level.

use super::structure::{ref_state_levels, reference_patterns, structure_from_patterns};
use super::walker::{describe_position, WalkOptions};
use super::BODY_PATH;
use crate::document::{Element, Node};
use crate::error::{Error, Result};
use crate::runtime::trace::{TraceEvent, TraceSink};
use crate::text::extract_node_text;
use crate::types::{
    CitationStructure, CounterReset, InferredStructure, LevelMatcher, NumberingPolicy, Unit,
};
use crate::xml_path::{element_children, path_query};
use std::collections::VecDeque;

const LINE_LEVELS: &[&str] = &["line", "verse"];
const LINE_ELEMENT: &str = "l";

/// Level names for inference: an explicit override, then the `scheme`
/// patterns, then the first `refState` list.
pub fn inferred_levels(
    root: Node<'_>,
    scheme: &str,
    levels: Option<&CitationStructure>,
) -> Result<CitationStructure> {
    if let Some(levels) = levels {
        return Ok(levels.clone());
    }
    if let Some(patterns) = reference_patterns(root, scheme)? {
        if !patterns.is_empty() {
            return structure_from_patterns(patterns);
        }
    }
    match ref_state_levels(root) {
        Some(units) => CitationStructure::new(units),
        None => Err(Error::lookup(
            "inferred structure",
            "refsDecl level declarations (cRefPattern or refState)",
        )),
    }
}

/// Matches every level of `structure` to an element/attribute pair.
pub fn infer_matchers(root: Node<'_>, structure: &CitationStructure) -> Result<InferredStructure> {
    let bodies = path_query(root, BODY_PATH);
    if bodies.is_empty() {
        return Err(Error::lookup("inferred structure", BODY_PATH.join("/")));
    }

    let mut matchers = Vec::with_capacity(structure.len());
    for level in structure.levels() {
        let matcher = find_matcher(&bodies, level).ok_or_else(|| {
            Error::lookup("inferred structure", format!("body element marked as `{level}`"))
        })?;
        tracing::debug!(
            "[Tess] level {} matched <{}> {:?}",
            level,
            matcher.element,
            matcher.attribute
        );
        matchers.push(matcher);
    }

    Ok(InferredStructure {
        structure: structure.clone(),
        matchers,
    })
}

fn find_matcher(bodies: &[Node<'_>], level: &str) -> Option<LevelMatcher> {
    let line_level = LINE_LEVELS.contains(&level);
    let mut queue = bodies
        .iter()
        .flat_map(|body| element_children(*body))
        .collect::<VecDeque<_>>();

    while let Some(node) = queue.pop_front() {
        if let Some(element) = node.value().as_element() {
            if line_level && element.name == LINE_ELEMENT {
                return Some(LevelMatcher {
                    level: level.to_string(),
                    element: LINE_ELEMENT.to_string(),
                    attribute: None,
                });
            }

            let mut keys = element.attributes.keys().collect::<Vec<_>>();
            keys.sort();
            if let Some(key) = keys.into_iter().find(|key| element.attributes[*key] == level) {
                return Some(LevelMatcher {
                    level: level.to_string(),
                    element: element.name.clone(),
                    attribute: Some((key.clone(), level.to_string())),
                });
            }
        }
        queue.extend(element_children(node));
    }
    None
}

fn matches(matcher: &LevelMatcher, element: &Element) -> bool {
    if matcher.element != element.name {
        return false;
    }
    match &matcher.attribute {
        Some((key, value)) => element.attributes.get(key) == Some(value),
        None => true,
    }
}

/// Walks the body depth-first, numbering units with the per-level counters.
///
/// A level with `SequentialCounter` numbering that was reset and not entered
/// again before a unit reports `0` for that segment.
pub fn collect_units(
    root: Node<'_>,
    inferred: &InferredStructure,
    options: &WalkOptions,
    trace: &dyn TraceSink,
) -> Result<Vec<Unit>> {
    let bodies = path_query(root, BODY_PATH);
    if bodies.is_empty() {
        return Err(Error::lookup("edition text", BODY_PATH.join("/")));
    }
    trace.record(TraceEvent::ChunksFound {
        count: bodies.len(),
    });

    let depth = inferred.structure.len();
    let mut walk = CounterWalk {
        inferred,
        options,
        trace,
        counters: vec![0; depth],
        labels: vec![None; depth],
        units: Vec::new(),
    };
    for body in bodies {
        walk.visit(body)?;
    }
    Ok(walk.units)
}

struct CounterWalk<'w> {
    inferred: &'w InferredStructure,
    options: &'w WalkOptions,
    trace: &'w dyn TraceSink,
    counters: Vec<usize>,
    labels: Vec<Option<String>>,
    units: Vec<Unit>,
}

impl CounterWalk<'_> {
    fn visit(&mut self, node: Node<'_>) -> Result<()> {
        for child in element_children(node) {
            let Some(element) = child.value().as_element() else {
                continue;
            };
            match self.level_of(element) {
                Some(index) => {
                    self.enter(index, element)?;
                    if index + 1 == self.counters.len() {
                        self.emit(child)?;
                    } else {
                        self.visit(child)?;
                    }
                }
                None => self.visit(child)?,
            }
        }
        Ok(())
    }

    fn level_of(&self, element: &Element) -> Option<usize> {
        self.inferred
            .matchers
            .iter()
            .position(|matcher| matches(matcher, element))
    }

    fn level_name(&self, index: usize) -> &str {
        self.inferred.structure.level(index).unwrap_or_default()
    }

    fn enter(&mut self, index: usize, element: &Element) -> Result<()> {
        self.counters[index] += 1;

        let depth = self.counters.len();
        let reset_end = match self.options.counter_reset {
            CounterReset::ImmediateChild => (index + 2).min(depth),
            CounterReset::AllDeeper => depth,
        };
        for deeper in index + 1..reset_end {
            self.counters[deeper] = 0;
            self.labels[deeper] = None;
        }

        let level = self.level_name(index).to_string();
        if self.options.numbering_for(&level) == NumberingPolicy::ExplicitLabel {
            let label = element.attributes.get("n").cloned().ok_or_else(|| {
                let outer = self.current_reference(index);
                Error::ShapeMismatch {
                    element: element.name.clone(),
                    attribute: "n",
                    location: describe_position(&level, self.counters[index], &outer),
                }
            })?;
            self.labels[index] = Some(label);
        }
        Ok(())
    }

    fn current_reference(&self, upto: usize) -> Vec<String> {
        (0..upto)
            .map(|i| {
                self.labels[i]
                    .clone()
                    .unwrap_or_else(|| self.counters[i].to_string())
            })
            .collect()
    }

    fn emit(&mut self, node: Node<'_>) -> Result<()> {
        let mut reference = Vec::with_capacity(self.counters.len());
        for index in 0..self.counters.len() {
            let level = self.level_name(index);
            let segment = match self.options.numbering_for(level) {
                NumberingPolicy::SequentialCounter => self.counters[index].to_string(),
                NumberingPolicy::ExplicitLabel => {
                    self.labels[index].clone().ok_or_else(|| {
                        Error::lookup(
                            "inferred walk",
                            format!(
                                "enclosing `{level}` for the unit after {}",
                                self.units
                                    .last()
                                    .map(Unit::reference_path)
                                    .unwrap_or_else(|| "the start of the body".to_string())
                            ),
                        )
                    })?
                }
            };
            reference.push(segment);
        }

        let unit = Unit {
            reference,
            text: extract_node_text(node),
        };
        self.trace.record(TraceEvent::UnitBuilt {
            reference: unit.reference_path(),
        });
        self.units.push(unit);
        Ok(())
    }
}
