use regex::Regex;
use std::sync::LazyLock;

static BETWEEN_TAGS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">\s+<").unwrap());
static NEWLINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());
static SELF_CLOSING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*?/>").unwrap());
static DELETION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<del\b[^>]*>.*?</del\s*>").unwrap());
static ADDITION_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?add\b[^>]*>").unwrap());
static MULTISPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static BEGIN_QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<q\b[^>]*>\s*").unwrap());
static END_QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*</q\s*>").unwrap());

pub const OPEN_QUOTE: &str = "\u{201C}";
pub const CLOSE_QUOTE: &str = "\u{201D}";

/// Normalizes raw TEI markup before tree construction.
///
/// Inter-tag whitespace would otherwise surface as text nodes, milestones and
/// other empty elements carry nothing the conversion reads, and `<q>` spans
/// become literal quotation marks so they survive text extraction.
pub fn preprocess(raw: &str) -> String {
    let text = BETWEEN_TAGS_RE.replace_all(raw, "><");
    let text = NEWLINES_RE.replace_all(&text, " ");
    let text = SELF_CLOSING_RE.replace_all(&text, "");
    let text = strip_editorial_markup(&text);
    let text = MULTISPACE_RE.replace_all(&text, " ");
    let text = BEGIN_QUOTE_RE.replace_all(&text, OPEN_QUOTE);
    END_QUOTE_RE.replace_all(&text, CLOSE_QUOTE).into_owned()
}

/// Drops `<del>` spans with their content and unwraps `<add>` so added
/// letters rejoin the surrounding word.
fn strip_editorial_markup(text: &str) -> String {
    let text = DELETION_RE.replace_all(text, "");
    ADDITION_TAG_RE.replace_all(&text, "").into_owned()
}
