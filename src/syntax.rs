//! Syntax validation via a non-executing parse.
//!
//! Parses the submitted text with the tree-sitter JavaScript grammar and
//! reports ERROR/MISSING regions as line-numbered syntax error records.
//! Nothing in the submitted text is ever evaluated.

use std::collections::HashSet;

use tree_sitter::{Node, Parser};

use crate::report::SyntaxErrorRecord;

/// Longest source snippet quoted in an error message.
const SNIPPET_LIMIT: usize = 40;

/// Validates source text syntax without executing it.
#[derive(Debug, Default)]
pub struct SyntaxValidator;

impl SyntaxValidator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self
    }

    /// Parse `text` and return one record per syntax error found.
    ///
    /// Never fails: grammar or parser problems are logged and produce an
    /// empty result. At most one record is reported per line, first wins.
    pub fn validate(&self, text: &str) -> Vec<SyntaxErrorRecord> {
        let mut parser = Parser::new();
        if let Err(err) = parser.set_language(&tree_sitter_javascript::LANGUAGE.into()) {
            tracing::error!("failed to load JavaScript grammar: {err}");
            return Vec::new();
        }

        let Some(tree) = parser.parse(text, None) else {
            tracing::error!("tree-sitter returned no parse tree");
            return Vec::new();
        };

        if !tree.root_node().has_error() {
            return Vec::new();
        }

        let mut records = Vec::new();
        let mut seen_lines = HashSet::new();
        collect_errors(tree.root_node(), text, &mut records, &mut seen_lines);
        records
    }
}

/// Walk the parse tree and record ERROR/MISSING nodes.
///
/// Stops descending once an error node is recorded so a single malformed
/// region yields a single record.
fn collect_errors(
    node: Node,
    source: &str,
    out: &mut Vec<SyntaxErrorRecord>,
    seen_lines: &mut HashSet<usize>,
) {
    if node.is_error() || node.is_missing() {
        let line = node.start_position().row + 1;
        if seen_lines.insert(line) {
            out.push(SyntaxErrorRecord {
                line,
                message: describe_error(node, source),
            });
        }
        return;
    }

    if !node.has_error() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_errors(child, source, out, seen_lines);
    }
}

/// Build a human-readable message for an error node.
fn describe_error(node: Node, source: &str) -> String {
    if node.is_missing() {
        return format!("Syntax error: missing '{}'", node.kind());
    }

    let snippet = source
        .get(node.byte_range())
        .unwrap_or("")
        .lines()
        .next()
        .unwrap_or("")
        .trim();

    if snippet.is_empty() {
        "Syntax error: unexpected token".to_string()
    } else {
        let truncated: String = snippet.chars().take(SNIPPET_LIMIT).collect();
        format!("Syntax error: unexpected token near '{truncated}'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_code_produces_no_records() {
        let validator = SyntaxValidator::new();
        let records = validator.validate("function hello() { return 'world'; }");
        assert!(records.is_empty());
    }

    #[test]
    fn empty_input_produces_no_records() {
        let validator = SyntaxValidator::new();
        assert!(validator.validate("").is_empty());
    }

    #[test]
    fn missing_initializer_reported_on_line_one() {
        let validator = SyntaxValidator::new();
        let records = validator.validate("const x = ;");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line, 1);
        assert!(records[0].message.starts_with("Syntax error:"));
    }

    #[test]
    fn error_line_matches_broken_statement() {
        let validator = SyntaxValidator::new();
        let code = "const a = 1;\nconst b = 2;\nconst c = = 3;\n";
        let records = validator.validate(code);
        assert!(!records.is_empty());
        assert!(records.iter().any(|r| r.line == 3));
    }

    #[test]
    fn at_most_one_record_per_line() {
        let validator = SyntaxValidator::new();
        let records = validator.validate("const x = ; const y = ;");
        let mut lines: Vec<_> = records.iter().map(|r| r.line).collect();
        let before = lines.len();
        lines.dedup();
        assert_eq!(before, lines.len());
    }

    #[test]
    fn repeated_calls_are_identical() {
        let validator = SyntaxValidator::new();
        let code = "function f( { return 1; }";
        assert_eq!(validator.validate(code), validator.validate(code));
    }
}
