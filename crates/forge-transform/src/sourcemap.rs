//! Source map emitter for concatenated script output
//!
//! Emits standard source map v3 JSON with line-granular mappings: every
//! generated line points at the source file and line it was copied from.

use base64::Engine;
use serde_json::json;

const BASE64_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Encode a source map for an inline `sourceMappingURL` comment
pub fn to_data_uri(map_json: &str) -> String {
    format!(
        "data:application/json;charset=utf-8;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(map_json)
    )
}

/// Append one base64 VLQ value
fn encode_vlq(value: i64, out: &mut String) {
    let mut vlq: u64 = if value < 0 {
        (((-value) as u64) << 1) | 1
    } else {
        (value as u64) << 1
    };

    loop {
        let mut digit = (vlq & 0b11111) as usize;
        vlq >>= 5;
        if vlq > 0 {
            digit |= 0b100000;
        }
        out.push(BASE64_CHARS[digit] as char);
        if vlq == 0 {
            break;
        }
    }
}

/// Builder for a line-granular source map
pub struct SourceMapBuilder {
    file: String,
    sources: Vec<String>,
    sources_content: Vec<String>,
    /// One entry per generated line: (source index, original line), both zero-based
    lines: Vec<Option<(usize, usize)>>,
}

impl SourceMapBuilder {
    /// Create a builder for the named output file
    pub fn new(file: &str) -> Self {
        Self {
            file: file.to_string(),
            sources: Vec::new(),
            sources_content: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Register a source file and its content, returning its index
    pub fn add_source(&mut self, name: &str, content: &str) -> usize {
        self.sources.push(name.to_string());
        self.sources_content.push(content.to_string());
        self.sources.len() - 1
    }

    /// Map the next generated line to `original_line` of `source`
    pub fn push_line(&mut self, source: usize, original_line: usize) {
        self.lines.push(Some((source, original_line)));
    }

    /// Emit the next generated line with no mapping
    pub fn push_unmapped_line(&mut self) {
        self.lines.push(None);
    }

    /// Serialize to source map v3 JSON
    pub fn build(&self) -> String {
        let mut mappings = String::new();
        let mut prev_source: i64 = 0;
        let mut prev_line: i64 = 0;

        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                mappings.push(';');
            }
            if let Some((source, original_line)) = line {
                // Segment fields: generated column, source delta, original
                // line delta, original column. Columns are always zero.
                encode_vlq(0, &mut mappings);
                encode_vlq(*source as i64 - prev_source, &mut mappings);
                encode_vlq(*original_line as i64 - prev_line, &mut mappings);
                encode_vlq(0, &mut mappings);
                prev_source = *source as i64;
                prev_line = *original_line as i64;
            }
        }

        json!({
            "version": 3,
            "file": self.file,
            "sources": self.sources,
            "sourcesContent": self.sources_content,
            "names": [],
            "mappings": mappings,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vlq(value: i64) -> String {
        let mut out = String::new();
        encode_vlq(value, &mut out);
        out
    }

    #[test]
    fn test_data_uri_roundtrip() {
        let uri = to_data_uri("{\"version\":3}");
        assert!(uri.starts_with("data:application/json;charset=utf-8;base64,"));
        let encoded = uri.rsplit(',').next().unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        assert_eq!(decoded, b"{\"version\":3}");
    }

    #[test]
    fn test_vlq_known_values() {
        assert_eq!(vlq(0), "A");
        assert_eq!(vlq(1), "C");
        assert_eq!(vlq(-1), "D");
        assert_eq!(vlq(16), "gB");
    }

    #[test]
    fn test_single_source_map() {
        let mut builder = SourceMapBuilder::new("app.js");
        let src = builder.add_source("src/js/a.js", "line0\nline1\n");
        builder.push_line(src, 0);
        builder.push_line(src, 1);

        let map: serde_json::Value = serde_json::from_str(&builder.build()).unwrap();
        assert_eq!(map["version"], 3);
        assert_eq!(map["file"], "app.js");
        assert_eq!(map["sources"][0], "src/js/a.js");
        // Line 0 -> (0, 0), line 1 -> line delta 1
        assert_eq!(map["mappings"], "AAAA;AACA");
    }

    #[test]
    fn test_two_sources_with_separator() {
        let mut builder = SourceMapBuilder::new("app.js");
        let a = builder.add_source("a.js", "first\n");
        let b = builder.add_source("b.js", "second\n");
        builder.push_line(a, 0);
        builder.push_unmapped_line();
        builder.push_line(b, 0);

        let map: serde_json::Value = serde_json::from_str(&builder.build()).unwrap();
        // Second mapped line switches source (+1) and rewinds the line (0 delta)
        assert_eq!(map["mappings"], "AAAA;;ACAA");
        assert_eq!(map["sourcesContent"][1], "second\n");
    }
}
