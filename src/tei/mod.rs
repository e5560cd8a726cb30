pub mod inferred;
pub mod metadata;
pub mod structure;
pub mod walker;

pub const TITLE_PATH: &[&str] = &["TEI", "teiHeader", "fileDesc", "titleStmt", "title"];
pub const AUTHOR_PATH: &[&str] = &["TEI", "teiHeader", "fileDesc", "titleStmt", "author"];
pub const REFS_DECL_PATH: &[&str] = &["TEI", "teiHeader", "encodingDesc", "refsDecl"];

/// Outermost citable chunks: the children of the edition `div`.
/// One edition per document is assumed.
pub const CHUNK_PATH: &[&str] = &["TEI", "text", "body", "div", "div"];
pub const BODY_PATH: &[&str] = &["TEI", "text", "body"];

pub const DEFAULT_SCHEME: &str = "CTS";
pub const DEFAULT_UNIT_ELEMENTS: &[&str] = &["l", "div"];
