//! Markup noise removal for extracted values
//!
//! These helpers work on one small fragment at a time (a table cell, a
//! heading), never on a whole page.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->").expect("valid comment pattern");
    static ref SCRIPT: Regex =
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid script pattern");
    static ref STYLE: Regex =
        Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("valid style pattern");
    static ref TAG: Regex = Regex::new(r"(?s)<[^>]*>").expect("valid tag pattern");
    static ref DOUBLE_ESCAPED: Regex =
        Regex::new(r"&amp;(?:amp|nbsp|quot);").expect("valid entity pattern");
    static ref ENTITY_ARTIFACT: Regex =
        Regex::new(r"&?(?:amp|nbsp|quot);").expect("valid artifact pattern");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid whitespace pattern");
}

/// Strips comments, script/style blocks, tags and entities from an HTML fragment
///
/// Whitespace runs (including newlines) collapse to a single space and the
/// result is trimmed.
///
/// # Examples
///
/// ```
/// use cinecrawl::extract::strip_markup;
///
/// let cell = r#"<td><!-- x --><a href="/p/1">Ang Lee</a>&nbsp;</td>"#;
/// assert_eq!(strip_markup(cell), "Ang Lee");
/// ```
pub fn strip_markup(fragment: &str) -> String {
    let text = COMMENT.replace_all(fragment, "");
    let text = SCRIPT.replace_all(&text, "");
    let text = STYLE.replace_all(&text, "");
    let text = TAG.replace_all(&text, "");
    let text = DOUBLE_ESCAPED.replace_all(&text, " ");
    let text = decode_entities(&text);
    collapse_whitespace(&text)
}

/// Cleans already-decoded text, dropping leftover entity artifacts
pub fn clean_text(text: &str) -> String {
    let text = ENTITY_ARTIFACT.replace_all(text, " ");
    collapse_whitespace(&text)
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace('\u{a0}', " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}
