//! Script pipeline: legacy-baseline transpile and token-level minifier
//!
//! Both passes rewrite tree-sitter parse trees rather than working on raw
//! text, so strings, template literals and regex literals are never touched.

use std::path::Path;

use tree_sitter::{Node, Parser};

use forge_common::{ForgeError, Result};

fn parse(source: &str) -> Result<tree_sitter::Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .map_err(|e| ForgeError::ScriptTransform(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ForgeError::ScriptTransform("failed to parse JavaScript".to_string()))?;

    if tree.root_node().has_error() {
        return Err(ForgeError::ScriptTransform(
            "JavaScript syntax error".to_string(),
        ));
    }

    Ok(tree)
}

/// Transpile a script to the legacy baseline: `const`/`let` become `var`,
/// arrow functions become `function` expressions. Everything else passes
/// through unchanged.
pub fn transpile_script(source: &str, filename: &Path) -> Result<String> {
    tracing::debug!("Transpiling script: {}", filename.display());

    let tree = parse(source).map_err(|e| match e {
        ForgeError::ScriptTransform(msg) => {
            ForgeError::ScriptTransform(format!("{}: {}", filename.display(), msg))
        }
        other => other,
    })?;
    let mut out = String::with_capacity(source.len());
    rewrite_node(source, tree.root_node(), &mut out)?;
    Ok(out)
}

/// Rebuild a node's source text, rewriting the downlevel constructs
fn rewrite_node(source: &str, node: Node, out: &mut String) -> Result<()> {
    if node.child_count() == 0 {
        out.push_str(&source[node.byte_range()]);
        return Ok(());
    }

    let mut cursor = node.walk();
    let mut last_pos = node.start_byte();

    for child in node.children(&mut cursor) {
        // Preserve whitespace before this child
        if child.start_byte() > last_pos {
            out.push_str(&source[last_pos..child.start_byte()]);
        }

        match child.kind() {
            "arrow_function" => rewrite_arrow(source, child, out)?,
            // `for (const x of xs)` puts the declaration keyword directly
            // under the for_in_statement node
            "const" | "let"
                if matches!(node.kind(), "lexical_declaration" | "for_in_statement") =>
            {
                out.push_str("var")
            }
            _ => rewrite_node(source, child, out)?,
        }

        last_pos = child.end_byte();
    }

    if last_pos < node.end_byte() {
        out.push_str(&source[last_pos..node.end_byte()]);
    }

    Ok(())
}

/// Rewrite one arrow function as a `function` expression.
///
/// Expression bodies become a block with a single `return`. Lexical `this`
/// is not rebound; the fixed source tree does not rely on it.
fn rewrite_arrow(source: &str, node: Node, out: &mut String) -> Result<()> {
    let is_async = node
        .child(0)
        .map(|c| c.kind() == "async")
        .unwrap_or(false);
    if is_async {
        out.push_str("async ");
    }
    out.push_str("function ");

    if let Some(params) = node.child_by_field_name("parameters") {
        rewrite_node(source, params, out)?;
    } else if let Some(param) = node.child_by_field_name("parameter") {
        // Single bare identifier, no parentheses in the source
        out.push('(');
        out.push_str(&source[param.byte_range()]);
        out.push(')');
    } else {
        out.push_str("()");
    }

    out.push(' ');

    let body = node
        .child_by_field_name("body")
        .ok_or_else(|| ForgeError::ScriptTransform("arrow function without body".to_string()))?;

    if body.kind() == "statement_block" {
        rewrite_node(source, body, out)?;
    } else {
        out.push_str("{ return ");
        rewrite_node(source, body, out)?;
        out.push_str("; }");
    }

    Ok(())
}

/// Keywords after which a line break carries automatic-semicolon meaning
const ASI_KEYWORDS: &[&str] = &["return", "break", "continue", "throw", "yield"];

/// Minify a script: drop comments, collapse inter-token whitespace.
///
/// Line breaks after ASI-sensitive keywords are kept so statement
/// boundaries survive the collapse.
pub fn minify_script(source: &str) -> Result<String> {
    let tree = parse(source)?;

    let mut ranges = Vec::new();
    collect_tokens(tree.root_node(), &mut ranges);

    let mut out = String::with_capacity(source.len());
    let mut prev: Option<std::ops::Range<usize>> = None;

    for range in ranges {
        let token = &source[range.clone()];
        if let Some(prev_range) = prev {
            let prev_token = &source[prev_range.clone()];
            let gap = &source[prev_range.end..range.start];

            if gap.contains('\n') && ASI_KEYWORDS.contains(&prev_token) {
                out.push('\n');
            } else if needs_space(prev_token, token) {
                out.push(' ');
            }
        }
        out.push_str(token);
        prev = Some(range);
    }

    Ok(out)
}

/// Collect token byte ranges in source order, skipping comments.
/// String, template and regex literals are kept atomic.
fn collect_tokens(node: Node, out: &mut Vec<std::ops::Range<usize>>) {
    match node.kind() {
        "comment" => return,
        "string" | "template_string" | "regex" => {
            out.push(node.byte_range());
            return;
        }
        _ => {}
    }

    if node.child_count() == 0 {
        out.push(node.byte_range());
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_tokens(child, out);
    }
}

/// Whether two adjacent tokens would merge into one without a separator
fn needs_space(prev: &str, next: &str) -> bool {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$';

    let a = match prev.chars().last() {
        Some(c) => c,
        None => return false,
    };
    let b = match next.chars().next() {
        Some(c) => c,
        None => return false,
    };

    (is_ident(a) && is_ident(b))
        || (a == '+' && b == '+')
        || (a == '-' && b == '-')
        || (a == '/' && (b == '/' || b == '*'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transpile(source: &str) -> String {
        transpile_script(source, Path::new("test.js")).unwrap()
    }

    #[test]
    fn test_const_let_become_var() {
        let out = transpile("const x = 1;\nlet y = 2;\n");
        assert!(out.contains("var x = 1;"));
        assert!(out.contains("var y = 2;"));
        assert!(!out.contains("const "));
        assert!(!out.contains("let "));
    }

    #[test]
    fn test_const_in_for_of() {
        let out = transpile("for (const item of items) { use(item); }");
        assert!(out.contains("for (var item of items)"));
    }

    #[test]
    fn test_arrow_with_params() {
        let out = transpile("const add = (a, b) => a + b;");
        assert!(out.contains("var add = function (a, b) { return a + b; };"));
    }

    #[test]
    fn test_arrow_single_param() {
        let out = transpile("items.map(x => x * 2);");
        assert!(out.contains("function (x) { return x * 2; }"));
    }

    #[test]
    fn test_arrow_block_body() {
        let out = transpile("const f = () => { run(); };");
        assert!(out.contains("var f = function () { run(); };"));
    }

    #[test]
    fn test_nested_arrows() {
        let out = transpile("const f = a => b => a + b;");
        assert!(out.contains("function (a) { return function (b) { return a + b; }; }"));
    }

    #[test]
    fn test_strings_untouched() {
        let out = transpile("var s = \"const x = () => 1\";");
        assert!(out.contains("\"const x = () => 1\""));
    }

    #[test]
    fn test_minify_strips_comments_and_whitespace() {
        let source = "// header\nfunction add(a, b) {\n  /* sum */\n  return a + b;\n}\n";
        let out = minify_script(source).unwrap();
        assert!(!out.contains("header"));
        assert!(!out.contains("sum"));
        assert!(out.contains("function add(a,b)"));
        assert!(out.len() < source.len());
    }

    #[test]
    fn test_minify_keeps_keyword_separation() {
        let out = minify_script("var x = typeof value;").unwrap();
        assert!(out.contains("typeof value"));
    }

    #[test]
    fn test_minify_preserves_asi_after_return() {
        let out = minify_script("function f() {\n  return\n  1;\n}\n").unwrap();
        assert!(out.contains("return\n"));
    }

    #[test]
    fn test_minify_keeps_string_spacing() {
        let out = minify_script("var s = \"a  b\";").unwrap();
        assert!(out.contains("\"a  b\""));
    }
}
