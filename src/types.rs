use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered level names of a citation hierarchy, outermost first. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct CitationStructure {
    levels: Vec<String>,
}

impl CitationStructure {
    pub fn new(levels: Vec<String>) -> Result<Self> {
        if levels.is_empty() {
            return Err(Error::InvalidStructure(
                "a citation structure needs at least one level".to_string(),
            ));
        }
        if let Some(blank) = levels.iter().position(|l| l.trim().is_empty()) {
            return Err(Error::InvalidStructure(format!(
                "level {} has an empty name",
                blank + 1
            )));
        }
        Ok(Self { levels })
    }

    /// Parses the dotted form, e.g. `book.poem.line`.
    pub fn parse_dotted(value: &str) -> Result<Self> {
        let levels = value
            .split('.')
            .map(|part| part.trim().to_string())
            .collect::<Vec<_>>();
        Self::new(levels)
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level(&self, depth: usize) -> Option<&str> {
        self.levels.get(depth).map(String::as_str)
    }

    pub fn innermost(&self) -> &str {
        self.levels.last().map(String::as_str).unwrap_or_default()
    }
}

impl TryFrom<Vec<String>> for CitationStructure {
    type Error = Error;

    fn try_from(levels: Vec<String>) -> Result<Self> {
        Self::new(levels)
    }
}

impl From<CitationStructure> for Vec<String> {
    fn from(structure: CitationStructure) -> Self {
        structure.levels
    }
}

impl fmt::Display for CitationStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.levels.join("."))
    }
}

/// One `cRefPattern` declaration. Only the length of `match_pattern` is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePattern {
    pub level_name: String,
    pub match_pattern: String,
}

impl ReferencePattern {
    pub fn new(level_name: impl Into<String>, match_pattern: impl Into<String>) -> Self {
        Self {
            level_name: level_name.into(),
            match_pattern: match_pattern.into(),
        }
    }

    pub fn order_key(&self) -> usize {
        self.match_pattern.chars().count()
    }
}

/// How the reference segment of one structural level is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberingPolicy {
    /// Read the element's `n` attribute; a missing `n` is a shape mismatch.
    #[default]
    ExplicitLabel,
    /// Count matched siblings from 1, restarting under each new parent.
    SequentialCounter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureStrategy {
    /// Levels from the declared reference patterns, walked over `l`/`div`.
    #[default]
    Exact,
    /// Levels matched heuristically against body elements.
    Inferred,
}

/// Which deeper counters the inferred walk resets when it enters a level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterReset {
    /// Only the level directly below the one entered.
    #[default]
    ImmediateChild,
    /// Every level below the one entered.
    AllDeeper,
}

/// How one level name was matched to body elements by the inferred strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMatcher {
    pub level: String,
    pub element: String,
    pub attribute: Option<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferredStructure {
    pub structure: CitationStructure,
    pub matchers: Vec<LevelMatcher>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ResolvedStructure {
    Exact { structure: CitationStructure },
    Inferred(InferredStructure),
}

impl ResolvedStructure {
    pub fn structure(&self) -> &CitationStructure {
        match self {
            ResolvedStructure::Exact { structure } => structure,
            ResolvedStructure::Inferred(inferred) => &inferred.structure,
        }
    }

    pub fn strategy(&self) -> StructureStrategy {
        match self {
            ResolvedStructure::Exact { .. } => StructureStrategy::Exact,
            ResolvedStructure::Inferred(_) => StructureStrategy::Inferred,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagLabels {
    pub author: String,
    pub title: String,
}

impl TagLabels {
    pub fn new(author: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            title: title.into(),
        }
    }

    pub fn prefix(&self) -> String {
        format!("{} {}", self.author, self.title)
    }
}

/// A leaf-level addressable unit with its reference path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub reference: Vec<String>,
    pub text: String,
}

impl Unit {
    pub fn reference_path(&self) -> String {
        self.reference.join(".")
    }

    pub fn to_line(&self, labels: &TagLabels) -> String {
        format!(
            "<{} {}>\t{}",
            labels.prefix(),
            self.reference_path(),
            self.text
        )
    }
}

pub fn render_lines(units: &[Unit], labels: &TagLabels) -> String {
    units
        .iter()
        .map(|unit| unit.to_line(labels))
        .collect::<Vec<_>>()
        .join("\n")
}
