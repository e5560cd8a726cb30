#![allow(dead_code)]
use std::path::Path;
use tessprep::document::Document;
use tessprep::preprocess::preprocess;

pub fn fixtures_dir() -> String {
    format!("{}/tests/fixtures", env!("CARGO_MANIFEST_DIR"))
}

pub fn load_fixture(filename: &str) -> String {
    let path = Path::new(&fixtures_dir()).join(filename);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Preprocesses and parses a fixture the way the pipeline does.
pub fn parse_fixture(filename: &str) -> Document {
    parse_markup(&load_fixture(filename))
}

pub fn parse_markup(raw: &str) -> Document {
    Document::parse(&preprocess(raw)).expect("fixture should parse")
}

/// Wraps body content in a minimal TEI document with a CTS block for
/// `levels` (outermost first).
pub fn tei_document(levels: &[&str], body: &str) -> String {
    let patterns = levels
        .iter()
        .enumerate()
        .rev()
        .map(|(depth, level)| {
            let pattern = vec!["(\\w+)"; depth + 1].join(".");
            format!(r#"<cRefPattern n="{level}" matchPattern="{pattern}"><p>{level}</p></cRefPattern>"#)
        })
        .collect::<String>();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <teiHeader>
    <fileDesc>
      <titleStmt>
        <title type="work" n="Test.">Test Work</title>
        <author n="Auct.">Auctor</author>
      </titleStmt>
    </fileDesc>
    <encodingDesc>
      <refsDecl n="CTS">{patterns}</refsDecl>
    </encodingDesc>
  </teiHeader>
  <text>
    <body>
      <div type="edition" n="urn:cts:test">
{body}
      </div>
    </body>
  </text>
</TEI>
"#
    )
}
