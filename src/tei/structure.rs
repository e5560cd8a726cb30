use super::REFS_DECL_PATH;
use crate::document::Node;
use crate::error::{Error, Result};
use crate::types::{CitationStructure, ReferencePattern};
use crate::xml_path::{element_children, path_query};

/// Reference patterns of the first `refsDecl` declared under `scheme`.
///
/// `Ok(None)` when no block carries that scheme identifier.
pub fn reference_patterns(root: Node<'_>, scheme: &str) -> Result<Option<Vec<ReferencePattern>>> {
    let Some(block) = path_query(root, REFS_DECL_PATH)
        .into_iter()
        .find(|decl| decl.value().attr("n") == Some(scheme))
    else {
        return Ok(None);
    };

    let mut patterns = Vec::new();
    for child in element_children(block).filter(|c| c.value().is_element_named("cRefPattern")) {
        let level_name = required_attr(child, "n", scheme)?;
        let match_pattern = required_attr(child, "matchPattern", scheme)?;
        patterns.push(ReferencePattern::new(level_name, match_pattern));
    }
    Ok(Some(patterns))
}

/// Orders patterns outermost first: ascending pattern length, stable on ties.
pub fn order_patterns(mut patterns: Vec<ReferencePattern>) -> Vec<ReferencePattern> {
    patterns.sort_by_key(ReferencePattern::order_key);
    patterns
}

pub fn structure_from_patterns(patterns: Vec<ReferencePattern>) -> Result<CitationStructure> {
    let levels = order_patterns(patterns)
        .into_iter()
        .map(|p| p.level_name)
        .collect::<Vec<_>>();
    CitationStructure::new(levels)
}

/// The citation structure declared by the `scheme` reference block.
///
/// A missing block is a lookup failure: no default structure is guessed.
pub fn cts_structure(root: Node<'_>, scheme: &str) -> Result<CitationStructure> {
    let patterns = reference_patterns(root, scheme)?.ok_or_else(|| {
        Error::lookup(
            "citation structure",
            format!("refsDecl[@n='{scheme}'] block"),
        )
    })?;
    if patterns.is_empty() {
        return Err(Error::lookup(
            "citation structure",
            format!("cRefPattern inside refsDecl[@n='{scheme}']"),
        ));
    }
    structure_from_patterns(patterns)
}

/// Level names from the first `refsDecl` listing `refState` entries.
pub fn ref_state_levels(root: Node<'_>) -> Option<Vec<String>> {
    path_query(root, REFS_DECL_PATH).into_iter().find_map(|decl| {
        let units = element_children(decl)
            .filter(|c| c.value().is_element_named("refState"))
            .filter_map(|c| c.value().attr("unit").map(str::to_string))
            .collect::<Vec<_>>();
        (!units.is_empty()).then_some(units)
    })
}

fn required_attr(node: Node<'_>, attribute: &'static str, scheme: &str) -> Result<String> {
    node.value()
        .attr(attribute)
        .map(str::to_string)
        .ok_or_else(|| Error::ShapeMismatch {
            element: "cRefPattern".to_string(),
            attribute,
            location: format!("refsDecl[@n='{scheme}']"),
        })
}
