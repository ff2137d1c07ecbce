use regex::Regex;
use std::sync::OnceLock;

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"))
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Imported from .+\.xml$").expect("placeholder pattern is valid"))
}

/// Collapse an HTML fragment to its visible text: tags become spaces,
/// whitespace is squashed, ends are trimmed.
pub fn strip_html(html: &str) -> String {
    let text = tag_re().replace_all(html, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercased, extension-stripped, separator-collapsed form used to
/// compare attachment filenames. "Final_Draft-v2.pdf" and
/// "final draft v2.PDF" normalize to the same string.
pub fn normalize_filename(name: &str) -> String {
    let stem = match name.rsplit_once('.') {
        Some((s, _)) if !s.is_empty() => s,
        _ => name,
    };
    stem.trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when the text is exactly a legacy-import placeholder and
/// nothing else.
pub fn is_import_placeholder(text: &str) -> bool {
    placeholder_re().is_match(text)
}

/// True when the text mentions an XML import somewhere; used to flag
/// near-placeholders for human review.
pub fn mentions_xml_import(text: &str) -> bool {
    text.contains("Imported from ") && text.contains(".xml")
}
