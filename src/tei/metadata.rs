use super::{AUTHOR_PATH, TITLE_PATH};
use crate::document::Node;
use crate::error::{Error, Result};
use crate::text::extract_node_text;
use crate::xml_path::{first_match, path_query};

/// Title abbreviation from `titleStmt`.
///
/// A `title[@type="work"]` wins over other titles, and its `n` attribute wins
/// over its text. Without a work title the first title's text is used.
pub fn title_abbreviation(root: Node<'_>) -> Result<String> {
    let titles = path_query(root, TITLE_PATH);
    let Some(first) = titles.first() else {
        return Err(Error::lookup("title abbreviation", TITLE_PATH.join("/")));
    };

    if let Some(work) = titles
        .iter()
        .find(|title| title.value().attr("type") == Some("work"))
    {
        if let Some(abbreviation) = work.value().attr("n") {
            return Ok(abbreviation.to_string());
        }
        return Ok(extract_node_text(*work));
    }

    Ok(extract_node_text(*first))
}

/// Author abbreviation: the first author's `n` attribute, else its text.
pub fn author_abbreviation(root: Node<'_>) -> Result<String> {
    let author = first_match(root, AUTHOR_PATH)
        .ok_or_else(|| Error::lookup("author abbreviation", AUTHOR_PATH.join("/")))?;

    match author.value().attr("n") {
        Some(abbreviation) => Ok(abbreviation.to_string()),
        None => Ok(extract_node_text(author)),
    }
}

/// Lower-cases a label and makes sure it ends with a period.
pub fn clean_label(name: &str) -> String {
    let mut result = name.to_lowercase();
    if !name.ends_with('.') {
        result.push('.');
    }
    result
}

/// File name for the converted text, e.g. `prop.eleg.tess`.
pub fn tess_filename(author: &str, title: &str, extension: &str) -> String {
    format!(
        "{}{}{}",
        clean_label(author),
        clean_label(title),
        extension.trim_start_matches('.')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_label_lowercases_and_terminates() {
        assert_eq!(clean_label("Prop."), "prop.");
        assert_eq!(clean_label("Eleg"), "eleg.");
        assert_eq!(clean_label("Curtius Rufus, Quintus"), "curtius rufus, quintus.");
    }

    #[test]
    fn filename_joins_cleaned_labels() {
        assert_eq!(tess_filename("Prop.", "Eleg.", "tess"), "prop.eleg.tess");
        assert_eq!(tess_filename("aus", "ecl", ".tess"), "aus.ecl.tess");
    }
}
