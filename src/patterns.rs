//! Pattern scanner for heuristic, line-scoped diagnostics.
//!
//! Each rule is a deterministic regex or text heuristic over the raw source.
//! The rules are intentionally approximate: the missing-semicolon and
//! nesting-depth checks over- and under-fire on edge cases by design, and
//! their thresholds and tie-break behavior (first occurrence wins) are part
//! of the contract.

use regex::Regex;

use crate::report::{rules, Diagnostic, Severity};
use crate::source::SourceDocument;

/// Leading-whitespace column count beyond which nesting is flagged.
const NESTING_THRESHOLD: usize = 8;

/// Loop counters exempt from the short-identifier rule.
const ALLOWED_SHORT_NAMES: [&str; 3] = ["i", "j", "k"];

/// Scans source text with heuristic pattern rules.
pub struct PatternScanner {
    /// Matches `var`/`let`/`const` declarations and captures the identifier.
    decl_pattern: Regex,

    /// Matches block-introducing keywords at the start of a trimmed line.
    block_keyword: Regex,
}

impl PatternScanner {
    /// Create a new scanner with all rules compiled.
    pub fn new() -> Self {
        Self {
            decl_pattern: Regex::new(r"\b(?:var|let|const)\s+([A-Za-z0-9_]+)\b").unwrap(),
            block_keyword: Regex::new(
                r"^(?:if|for|while|switch|function|class|import|export)\b",
            )
            .unwrap(),
        }
    }

    /// Run every rule against `text` and collect the diagnostics.
    pub fn scan(&self, text: &str) -> Vec<Diagnostic> {
        let doc = SourceDocument::new(text);
        let mut diagnostics = Vec::new();

        self.check_nesting_depth(&doc, &mut diagnostics);
        self.check_debug_statements(&doc, &mut diagnostics);
        self.check_error_handling(&doc, &mut diagnostics);
        self.check_identifier_names(&doc, &mut diagnostics);
        self.check_statement_terminators(&doc, &mut diagnostics);
        self.check_bracket_balance(&doc, &mut diagnostics);

        diagnostics
    }

    /// Flag the first line reaching the maximum indentation when it exceeds
    /// the nesting threshold.
    fn check_nesting_depth(&self, doc: &SourceDocument, out: &mut Vec<Diagnostic>) {
        let mut max_indent = 0;
        let mut max_line = 0;

        for (idx, line) in doc.lines().enumerate() {
            let indent = line.len() - line.trim_start().len();
            if indent > max_indent {
                max_indent = indent;
                max_line = idx + 1;
            }
        }

        if max_indent > NESTING_THRESHOLD {
            out.push(Diagnostic {
                line: max_line,
                message: "Deep nesting detected. Consider using promises or async/await."
                    .to_string(),
                severity: Severity::Warning,
                rule_id: rules::EXCESSIVE_NESTING.to_string(),
            });
        }
    }

    /// Flag every line containing a `console.log` call.
    fn check_debug_statements(&self, doc: &SourceDocument, out: &mut Vec<Diagnostic>) {
        for (idx, line) in doc.lines().enumerate() {
            if line.contains("console.log") {
                out.push(Diagnostic {
                    line: idx + 1,
                    message:
                        "Console statement found. Remember to remove debug logs in production."
                            .to_string(),
                    severity: Severity::Info,
                    rule_id: rules::NO_CONSOLE.to_string(),
                });
            }
        }
    }

    /// Flag callback-style code that never mentions error handling.
    fn check_error_handling(&self, doc: &SourceDocument, out: &mut Vec<Diagnostic>) {
        let text = doc.text();
        let has_callbacks = text.contains("callback") || text.contains("=>");
        let handles_errors =
            text.contains("catch") || text.contains("error") || text.contains("err");

        if has_callbacks && !handles_errors {
            out.push(Diagnostic {
                line: 1,
                message: "No error handling detected in asynchronous code. Consider adding \
                          try/catch or error parameters."
                    .to_string(),
                severity: Severity::Warning,
                rule_id: rules::MISSING_ERROR_HANDLING.to_string(),
            });
        }
    }

    /// Flag single-character identifiers other than the loop counters.
    fn check_identifier_names(&self, doc: &SourceDocument, out: &mut Vec<Diagnostic>) {
        for caps in self.decl_pattern.captures_iter(doc.text()) {
            let whole = caps.get(0).expect("capture 0 always present");
            let name = caps.get(1).map_or("", |m| m.as_str());

            if name.len() == 1 && !ALLOWED_SHORT_NAMES.contains(&name) {
                out.push(Diagnostic {
                    line: doc.line_of_offset(whole.start()),
                    message: format!(
                        "Short variable name '{name}' detected. Consider using more \
                         descriptive names."
                    ),
                    severity: Severity::Info,
                    rule_id: rules::DESCRIPTIVE_NAMES.to_string(),
                });
            }
        }
    }

    /// Flag statements that look like they are missing a terminating `;`.
    ///
    /// Heuristic, not grammar-accurate: comment lines, block keywords, arrow
    /// functions, and lines followed by a chain continuation are skipped.
    fn check_statement_terminators(&self, doc: &SourceDocument, out: &mut Vec<Diagnostic>) {
        let lines: Vec<&str> = doc.lines().collect();

        for (idx, line) in lines.iter().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.ends_with(';')
                || trimmed.ends_with('{')
                || trimmed.ends_with('}')
                || trimmed.ends_with(':')
                || trimmed.ends_with("*/")
            {
                continue;
            }
            if trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*') {
                continue;
            }
            if self.block_keyword.is_match(trimmed) || line.contains("=>") {
                continue;
            }

            let next = lines.get(idx + 1).map_or("", |l| l.trim());
            if next.starts_with('.') || next.starts_with('?') || next.starts_with('[') {
                continue;
            }

            out.push(Diagnostic {
                line: idx + 1,
                message: "Possible missing semicolon at end of statement.".to_string(),
                severity: Severity::Warning,
                rule_id: rules::MISSING_SEMICOLON.to_string(),
            });
        }
    }

    /// Track bracket pairs with a stack, reporting mismatched closers and
    /// openers left unclosed at end of scan.
    fn check_bracket_balance(&self, doc: &SourceDocument, out: &mut Vec<Diagnostic>) {
        let mut stack: Vec<(char, usize)> = Vec::new();

        for (offset, ch) in doc.text().char_indices() {
            match ch {
                '{' | '[' | '(' => stack.push((ch, offset)),
                '}' | ']' | ')' => {
                    let matched = stack
                        .pop()
                        .is_some_and(|(open, _)| closing_for(open) == ch);
                    if !matched {
                        out.push(Diagnostic {
                            line: doc.line_of_offset(offset),
                            message: format!("Unbalanced bracket: unexpected '{ch}'"),
                            severity: Severity::Error,
                            rule_id: rules::UNBALANCED_BRACKETS.to_string(),
                        });
                    }
                }
                _ => {}
            }
        }

        for (open, offset) in stack {
            out.push(Diagnostic {
                line: doc.line_of_offset(offset),
                message: format!("Unclosed bracket: '{open}' is not closed"),
                severity: Severity::Error,
                rule_id: rules::UNCLOSED_BRACKETS.to_string(),
            });
        }
    }
}

impl Default for PatternScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// The closing character matching an opener.
fn closing_for(open: char) -> char {
    match open {
        '{' => '}',
        '[' => ']',
        _ => ')',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<Diagnostic> {
        PatternScanner::new().scan(text)
    }

    fn by_rule<'a>(diags: &'a [Diagnostic], rule: &str) -> Vec<&'a Diagnostic> {
        diags.iter().filter(|d| d.rule_id == rule).collect()
    }

    #[test]
    fn scan_is_idempotent() {
        let code = "const x = 1;\nconsole.log(x);\n";
        assert_eq!(scan(code), scan(code));
    }

    #[test]
    fn detects_console_on_second_line() {
        let code = "const total = 1;\nconsole.log(total);\nreturn total;";
        let diags = scan(code);
        let console = by_rule(&diags, rules::NO_CONSOLE);
        assert_eq!(console.len(), 1);
        assert_eq!(console[0].line, 2);
        assert_eq!(console[0].severity, Severity::Info);
    }

    #[test]
    fn flags_deep_nesting_at_first_maximum() {
        let deep = " ".repeat(10);
        let code = format!("f(() => {{\n{deep}g();\n{deep}h();\n}});\n");
        let diags = scan(&code);
        let nesting = by_rule(&diags, rules::EXCESSIVE_NESTING);
        assert_eq!(nesting.len(), 1);
        assert_eq!(nesting[0].line, 2); // first line reaching the max
        assert_eq!(nesting[0].severity, Severity::Warning);
    }

    #[test]
    fn nesting_at_threshold_is_not_flagged() {
        let code = format!("{}x();\n", " ".repeat(NESTING_THRESHOLD));
        assert!(by_rule(&scan(&code), rules::EXCESSIVE_NESTING).is_empty());
    }

    #[test]
    fn flags_callbacks_without_error_handling_once() {
        let code = "doWork(() => {\n  more(() => {\n    done();\n  });\n});";
        let diags = scan(code);
        let handling = by_rule(&diags, rules::MISSING_ERROR_HANDLING);
        assert_eq!(handling.len(), 1);
        assert_eq!(handling[0].line, 1);
    }

    #[test]
    fn arrow_code_mentioning_err_is_not_flagged() {
        let code = "run((err) => {\n  if (err) throw err;\n});";
        assert!(by_rule(&scan(code), rules::MISSING_ERROR_HANDLING).is_empty());
    }

    #[test]
    fn flags_short_identifiers_but_not_loop_counters() {
        let code = "const q = 1;\nlet i = 0;\nvar j = 0;\nconst total = 2;";
        let diags = scan(code);
        let names = by_rule(&diags, rules::DESCRIPTIVE_NAMES);
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].line, 1);
        assert!(names[0].message.contains("'q'"));
    }

    #[test]
    fn short_identifier_line_comes_from_offset_index() {
        let code = "// header\n// more\nconst z = 1;";
        let diags = scan(code);
        let names = by_rule(&diags, rules::DESCRIPTIVE_NAMES);
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].line, 3);
    }

    #[test]
    fn missing_semicolon_skips_chain_continuations() {
        let code = "const value = builder\n  .build();";
        assert!(by_rule(&scan(code), rules::MISSING_SEMICOLON).is_empty());
    }

    #[test]
    fn missing_semicolon_flags_bare_statement() {
        let code = "doSomething()\nnext();";
        let diags = scan(code);
        let semis = by_rule(&diags, rules::MISSING_SEMICOLON);
        assert_eq!(semis.len(), 1);
        assert_eq!(semis[0].line, 1);
    }

    #[test]
    fn missing_semicolon_skips_keywords_and_comments() {
        let code = "if (ready)\n// trailing comment\nfunction go()\n";
        assert!(by_rule(&scan(code), rules::MISSING_SEMICOLON).is_empty());
    }

    #[test]
    fn balanced_brackets_produce_no_diagnostics() {
        let diags = scan("({[()]})");
        assert!(by_rule(&diags, rules::UNBALANCED_BRACKETS).is_empty());
        assert!(by_rule(&diags, rules::UNCLOSED_BRACKETS).is_empty());
    }

    #[test]
    fn mismatched_closer_and_leftover_opener_are_both_reported() {
        let diags = scan("function f() { [ }");
        let unbalanced = by_rule(&diags, rules::UNBALANCED_BRACKETS);
        let unclosed = by_rule(&diags, rules::UNCLOSED_BRACKETS);
        assert_eq!(unbalanced.len(), 1);
        assert_eq!(unbalanced[0].line, 1);
        assert_eq!(unbalanced[0].severity, Severity::Error);
        assert_eq!(unclosed.len(), 1);
        assert_eq!(unclosed[0].severity, Severity::Error);
    }

    #[test]
    fn unclosed_opener_reports_its_own_line() {
        let code = "const a = 1;\nfunction f() {\nreturn a;\n";
        let diags = scan(code);
        let unclosed = by_rule(&diags, rules::UNCLOSED_BRACKETS);
        assert_eq!(unclosed.len(), 1);
        assert_eq!(unclosed[0].line, 2);
    }

    #[test]
    fn empty_input_produces_no_diagnostics() {
        assert!(scan("").is_empty());
    }
}
