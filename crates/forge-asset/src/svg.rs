//! SVG text cleanup
//!
//! Strips comments, metadata blocks and viewBox attributes, and collapses
//! whitespace between tags. `id` attributes are kept.

use regex::Regex;

/// Clean one SVG document
pub fn cleanup(source: &str) -> String {
    let comments = Regex::new(r"(?s)<!--.*?-->").unwrap();
    let metadata = Regex::new(r"(?s)<metadata[^>]*>.*?</metadata>").unwrap();
    let view_box = Regex::new(r#"\s+viewBox\s*=\s*("[^"]*"|'[^']*')"#).unwrap();
    let between_tags = Regex::new(r">\s+<").unwrap();

    let out = comments.replace_all(source, "");
    let out = metadata.replace_all(&out, "");
    let out = view_box.replace_all(&out, "");
    let out = between_tags.replace_all(&out, "><");

    out.trim().to_string()
}
