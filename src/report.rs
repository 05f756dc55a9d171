//! Report data model for code analysis results.
//!
//! Defines the diagnostic and report types shared by the static scanners,
//! the AI normalizer, and the orchestrator, plus the canonical default
//! strings every fallback path references.

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Info - informational guidance.
    Info,
    /// Warning - code may have issues.
    Warning,
    /// Error - code is broken or violates a hard constraint.
    Error,
}

/// A line-scoped diagnostic produced by analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Line number (1-indexed).
    pub line: usize,

    /// The diagnostic message.
    pub message: String,

    /// Severity of the diagnostic.
    pub severity: Severity,

    /// Stable tag identifying the rule that produced this diagnostic.
    #[serde(rename = "ruleId")]
    pub rule_id: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {:?} [{}] {}",
            self.line, self.severity, self.rule_id, self.message
        )
    }
}

/// A syntax error located by the validator or reported by the AI service.
///
/// Promoted into a [`Diagnostic`] with severity `error` and rule id
/// [`rules::SYNTAX_ERROR`] when merged into the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxErrorRecord {
    /// Line number (1-indexed).
    pub line: usize,

    /// The error message.
    pub message: String,
}

impl SyntaxErrorRecord {
    /// Promote this record into a full diagnostic.
    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic {
            line: self.line,
            message: self.message,
            severity: Severity::Error,
            rule_id: rules::SYNTAX_ERROR.to_string(),
        }
    }
}

/// A suggested time-complexity improvement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeComplexityImprovement {
    /// How to improve the time complexity.
    pub suggestion: String,

    /// Code snippet showing the improved implementation.
    #[serde(rename = "improvedCode")]
    pub improved_code: String,

    /// The complexity achieved by the improvement.
    #[serde(rename = "improvedComplexity")]
    pub improved_complexity: String,
}

impl Default for TimeComplexityImprovement {
    fn default() -> Self {
        Self {
            suggestion: defaults::NO_IMPROVEMENT.to_string(),
            improved_code: defaults::NO_CODE.to_string(),
            improved_complexity: defaults::UNKNOWN_COMPLEXITY.to_string(),
        }
    }
}

/// Time-complexity assessment for the analyzed code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeComplexityReport {
    /// The current time complexity.
    pub current: String,

    /// Suggested improvement.
    pub improvement: TimeComplexityImprovement,
}

/// The full analysis report returned by the orchestrator.
///
/// Always fully populated: every field has defined fallback content even
/// when every upstream source fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Line-scoped diagnostics from pattern rules and syntax validation.
    pub suggestions: Vec<Diagnostic>,

    /// Free-text improvement suggestions.
    pub optimizations: Vec<String>,

    /// Free-text issue descriptions.
    pub issues: Vec<String>,

    /// Time-complexity assessment.
    #[serde(rename = "timeComplexity")]
    pub time_complexity: TimeComplexityReport,
}

impl AnalysisReport {
    /// Drop diagnostics below the given severity.
    pub fn retain_min_severity(&mut self, min: Severity) {
        self.suggestions.retain(|d| d.severity >= min);
    }
}

/// Stable rule identifiers.
pub mod rules {
    pub const EXCESSIVE_NESTING: &str = "excessive-nesting";
    pub const NO_CONSOLE: &str = "no-console";
    pub const MISSING_ERROR_HANDLING: &str = "missing-error-handling";
    pub const DESCRIPTIVE_NAMES: &str = "descriptive-names";
    pub const MISSING_SEMICOLON: &str = "missing-semicolon";
    pub const UNBALANCED_BRACKETS: &str = "unbalanced-brackets";
    pub const UNCLOSED_BRACKETS: &str = "unclosed-brackets";
    pub const SYNTAX_ERROR: &str = "syntax-error";
    pub const GENERAL_REVIEW: &str = "general-review";
}

/// Canonical default strings used across the fallback paths.
///
/// Every degraded path references these constants so the defaults cannot
/// drift between the normalizer, the static fallback, and the floor report.
pub mod defaults {
    pub const COMPLEXITY_UNAVAILABLE: &str = "Time complexity analysis unavailable";
    pub const NO_IMPROVEMENT: &str = "No specific improvements identified";
    pub const NO_CODE: &str = "// No code provided";
    pub const UNKNOWN_COMPLEXITY: &str = "Unknown";

    /// Backfill entry when the AI prose mentions no syntax errors.
    pub const AI_NO_SYNTAX_ERRORS: &str = "No syntax errors detected by AI analysis";
    /// Backfill entry when the AI prose yields no issues.
    pub const AI_NO_ISSUES: &str = "Code review could not identify specific issues";
    /// Backfill entries when the AI prose yields no optimizations.
    pub const AI_NO_OPTIMIZATIONS: [&str; 2] = [
        "Consider refactoring for better maintainability",
        "Review error handling patterns",
    ];

    /// Complexity text when the AI service is unavailable.
    pub const COMPLEXITY_REQUIRES_AI: &str = "Time complexity analysis requires AI assistance";
    /// Improvement suggestion for the static fallback.
    pub const STATIC_SUGGESTION: &str =
        "Consider algorithmic improvements appropriate for your use case";
    /// Improved-complexity text for the static fallback.
    pub const STATIC_IMPROVED_COMPLEXITY: &str = "Depends on specific optimizations applied";
    /// Example improved code for the static fallback.
    pub const STATIC_IMPROVED_CODE: &str = "// Static analysis cannot generate improved code\n\
// Consider refactoring callbacks to async/await\n\n\
async function improvedFunction() {\n  try {\n    const result = await asyncOperation();\n    \
return processResult(result);\n  } catch (error) {\n    handleError(error);\n  }\n}";
    /// Optimizations for the static fallback.
    pub const STATIC_OPTIMIZATIONS: [&str; 2] = [
        "Consider refactoring for better maintainability",
        "Add more comprehensive error handling",
    ];

    /// Message of the generic diagnostic in the floor report.
    pub const FLOOR_DIAGNOSTIC: &str = "Simple code analysis detected potential issues.";
    /// Complexity text in the floor report.
    pub const FLOOR_COMPLEXITY: &str = "Could not analyze due to an error";
    /// Improvement suggestion in the floor report.
    pub const FLOOR_SUGGESTION: &str = "Use async/await pattern for better readability";
    /// Improved-complexity text in the floor report.
    pub const FLOOR_IMPROVED_COMPLEXITY: &str =
        "Similar time complexity but improved error handling";
    /// Example improved code in the floor report.
    pub const FLOOR_IMPROVED_CODE: &str = "// Example of improvement:\n\n\
async function getData() {\n  try {\n    const response = await fetch(url);\n    \
const data = await response.json();\n    return processData(data);\n  } catch (error) {\n    \
console.error('Failed to fetch data:', error);\n    throw new Error('Data retrieval failed');\n  }\n}";
    /// Optimizations in the floor report.
    pub const FLOOR_OPTIMIZATIONS: [&str; 3] = [
        "Consider using modern JavaScript features.",
        "Add proper error handling to your code.",
        "Review your code for readability and maintainability.",
    ];
    /// Leading issue in the floor report.
    pub const FLOOR_ISSUE: &str =
        "Static analysis was used due to an error in the analysis process.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering_puts_error_highest() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
        assert_eq!(serde_json::to_string(&Severity::Error).unwrap(), "\"error\"");
    }

    #[test]
    fn diagnostic_uses_camel_case_rule_id() {
        let diag = Diagnostic {
            line: 3,
            message: "test".to_string(),
            severity: Severity::Info,
            rule_id: rules::NO_CONSOLE.to_string(),
        };
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["ruleId"], "no-console");
        assert_eq!(json["line"], 3);
    }

    #[test]
    fn syntax_error_promotes_to_error_diagnostic() {
        let record = SyntaxErrorRecord {
            line: 7,
            message: "Syntax error: unexpected token".to_string(),
        };
        let diag = record.into_diagnostic();
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.rule_id, rules::SYNTAX_ERROR);
        assert_eq!(diag.line, 7);
    }

    #[test]
    fn retain_min_severity_filters_lower_diagnostics() {
        let diag = |severity| Diagnostic {
            line: 1,
            message: "test".to_string(),
            severity,
            rule_id: rules::GENERAL_REVIEW.to_string(),
        };
        let mut report = AnalysisReport {
            suggestions: vec![
                diag(Severity::Info),
                diag(Severity::Warning),
                diag(Severity::Error),
            ],
            optimizations: vec![],
            issues: vec![],
            time_complexity: TimeComplexityReport {
                current: "O(n)".to_string(),
                improvement: TimeComplexityImprovement::default(),
            },
        };

        report.retain_min_severity(Severity::Warning);

        assert_eq!(report.suggestions.len(), 2);
        assert!(report.suggestions.iter().all(|d| d.severity >= Severity::Warning));
    }

    #[test]
    fn report_round_trips_through_wire_schema() {
        let report = AnalysisReport {
            suggestions: vec![],
            optimizations: vec!["opt".to_string()],
            issues: vec!["issue".to_string()],
            time_complexity: TimeComplexityReport {
                current: "O(n)".to_string(),
                improvement: TimeComplexityImprovement::default(),
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("timeComplexity").is_some());
        assert_eq!(
            json["timeComplexity"]["improvement"]["improvedCode"],
            defaults::NO_CODE
        );
        let back: AnalysisReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }
}
