//! Analysis orchestration.
//!
//! Runs the static scanners, attempts AI enrichment, merges and
//! deduplicates diagnostics from both branches, and assembles the final
//! report. The public [`Analyzer::analyze`] never fails: AI failures
//! degrade to static-only enrichment, and anything escaping the assembly
//! path degrades to the guaranteed floor report.

use std::collections::HashSet;

use crate::ai::{AiClient, AiConfig};
use crate::normalize::{AiAnalysis, ResponseNormalizer};
use crate::patterns::PatternScanner;
use crate::report::{
    defaults, rules, AnalysisReport, Diagnostic, Severity, SyntaxErrorRecord,
    TimeComplexityImprovement, TimeComplexityReport,
};
use crate::suggest::StaticSuggestionGenerator;
use crate::syntax::SyntaxValidator;

/// Configuration for the analyzer.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    /// AI enrichment configuration. `None` disables enrichment and every
    /// report is built from static analysis alone.
    pub ai: Option<AiConfig>,
}

impl AnalyzerConfig {
    /// Build a configuration from environment variables; AI enrichment is
    /// enabled only when a credential is configured.
    pub fn from_env() -> Self {
        Self {
            ai: AiConfig::from_env().ok(),
        }
    }
}

/// The top-level analysis entry point.
pub struct Analyzer {
    scanner: PatternScanner,
    validator: SyntaxValidator,
    suggester: StaticSuggestionGenerator,
    normalizer: ResponseNormalizer,
    ai: Option<AiClient>,
}

impl Analyzer {
    /// Create a new analyzer with the given configuration.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            scanner: PatternScanner::new(),
            validator: SyntaxValidator::new(),
            suggester: StaticSuggestionGenerator::new(),
            normalizer: ResponseNormalizer::new(),
            ai: config.ai.map(AiClient::new),
        }
    }

    /// Analyze `code` and produce a fully-populated report.
    ///
    /// Never fails: any error escaping the assembly path is logged and
    /// converted into the floor report built from syntax validation alone.
    pub async fn analyze(&self, code: &str) -> AnalysisReport {
        let syntax_errors = self.validator.validate(code);

        match self.assemble_report(code, &syntax_errors).await {
            Ok(report) => report,
            Err(err) => {
                tracing::error!("analysis failed, returning floor report: {err:#}");
                floor_report(syntax_errors)
            }
        }
    }

    /// Run both analysis branches and merge them into the report.
    async fn assemble_report(
        &self,
        code: &str,
        syntax_errors: &[SyntaxErrorRecord],
    ) -> anyhow::Result<AnalysisReport> {
        let pattern_diagnostics = self.scanner.scan(code);
        let ai = self.enrich(code).await;

        let merged = merge_syntax_errors(syntax_errors, ai.syntax_errors);

        tracing::debug!(
            patterns = pattern_diagnostics.len(),
            syntax_errors = merged.len(),
            "analysis complete"
        );

        let mut suggestions = pattern_diagnostics;
        suggestions.extend(merged.iter().cloned().map(SyntaxErrorRecord::into_diagnostic));

        let mut issues = ai.issues;
        issues.extend(
            merged
                .iter()
                .map(|e| format!("Syntax error at line {}: {}", e.line, e.message)),
        );

        Ok(AnalysisReport {
            suggestions,
            optimizations: ai.optimizations,
            issues,
            time_complexity: TimeComplexityReport {
                current: ai.time_complexity,
                improvement: ai.improvement,
            },
        })
    }

    /// Attempt AI enrichment, degrading to the static fallback on any
    /// service failure or when enrichment is disabled.
    async fn enrich(&self, code: &str) -> AiAnalysis {
        let Some(client) = &self.ai else {
            tracing::debug!("AI enrichment disabled, using static analysis");
            return self.static_enrichment(code);
        };

        match client.request_analysis(code).await {
            Ok(raw) => self.normalizer.normalize(&raw),
            Err(err) => {
                tracing::warn!("AI analysis unavailable, falling back to static: {err}");
                self.static_enrichment(code)
            }
        }
    }

    /// Enrichment content derived from static heuristics alone.
    fn static_enrichment(&self, code: &str) -> AiAnalysis {
        AiAnalysis {
            // The validator's records are merged by the caller; repeating
            // them here would be deduplicated away anyway.
            syntax_errors: Vec::new(),
            issues: self.suggester.suggest(code),
            optimizations: defaults::STATIC_OPTIMIZATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            time_complexity: defaults::COMPLEXITY_REQUIRES_AI.to_string(),
            improvement: TimeComplexityImprovement {
                suggestion: defaults::STATIC_SUGGESTION.to_string(),
                improved_code: defaults::STATIC_IMPROVED_CODE.to_string(),
                improved_complexity: defaults::STATIC_IMPROVED_COMPLEXITY.to_string(),
            },
        }
    }
}

/// Combine syntax errors from both detection branches, first occurrence
/// wins on identical (line, message) pairs.
fn merge_syntax_errors(
    detected: &[SyntaxErrorRecord],
    reported: Vec<SyntaxErrorRecord>,
) -> Vec<SyntaxErrorRecord> {
    let mut merged = Vec::new();
    let mut seen: HashSet<(usize, String)> = HashSet::new();
    for record in detected.iter().cloned().chain(reported) {
        if seen.insert((record.line, record.message.clone())) {
            merged.push(record);
        }
    }
    merged
}

/// The guaranteed floor report: syntax validation output plus fixed generic
/// content. Every field is populated.
fn floor_report(syntax_errors: Vec<SyntaxErrorRecord>) -> AnalysisReport {
    let mut suggestions = vec![Diagnostic {
        line: 1,
        message: defaults::FLOOR_DIAGNOSTIC.to_string(),
        severity: Severity::Info,
        rule_id: rules::GENERAL_REVIEW.to_string(),
    }];
    suggestions.extend(
        syntax_errors
            .iter()
            .cloned()
            .map(SyntaxErrorRecord::into_diagnostic),
    );

    let mut issues = vec![defaults::FLOOR_ISSUE.to_string()];
    issues.extend(
        syntax_errors
            .iter()
            .map(|e| format!("Syntax error at line {}: {}", e.line, e.message)),
    );

    AnalysisReport {
        suggestions,
        optimizations: defaults::FLOOR_OPTIMIZATIONS
            .iter()
            .map(|s| s.to_string())
            .collect(),
        issues,
        time_complexity: TimeComplexityReport {
            current: defaults::FLOOR_COMPLEXITY.to_string(),
            improvement: TimeComplexityImprovement {
                suggestion: defaults::FLOOR_SUGGESTION.to_string(),
                improved_code: defaults::FLOOR_IMPROVED_CODE.to_string(),
                improved_complexity: defaults::FLOOR_IMPROVED_COMPLEXITY.to_string(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn static_analyzer() -> Analyzer {
        Analyzer::new(AnalyzerConfig { ai: None })
    }

    const NESTED_CALLBACKS: &str = "getUser(id, (user) => {\n    getOrders(user, (orders) => {\n        getTotals(orders, (totals) => {\n            console.log(totals);\n        });\n    });\n});\n";

    #[tokio::test]
    async fn nested_callback_scenario_produces_expected_findings() {
        let report = static_analyzer().analyze(NESTED_CALLBACKS).await;

        let rule_ids: Vec<&str> = report
            .suggestions
            .iter()
            .map(|d| d.rule_id.as_str())
            .collect();
        assert!(rule_ids.contains(&rules::EXCESSIVE_NESTING));
        assert!(rule_ids.contains(&rules::NO_CONSOLE));
        assert!(report
            .issues
            .iter()
            .any(|i| i.to_lowercase().contains("callback")));
        assert!(!report.time_complexity.current.is_empty());
    }

    #[tokio::test]
    async fn empty_input_still_yields_populated_report() {
        let report = static_analyzer().analyze("").await;

        assert!(!report.optimizations.is_empty());
        assert!(!report.issues.is_empty());
        assert!(!report.time_complexity.current.is_empty());
        assert!(!report.time_complexity.improvement.improved_code.is_empty());
    }

    #[tokio::test]
    async fn syntax_errors_are_promoted_and_surfaced_as_issues() {
        let report = static_analyzer().analyze("const x = ;").await;

        let syntax: Vec<&Diagnostic> = report
            .suggestions
            .iter()
            .filter(|d| d.rule_id == rules::SYNTAX_ERROR)
            .collect();
        assert!(!syntax.is_empty());
        assert_eq!(syntax[0].line, 1);
        assert_eq!(syntax[0].severity, Severity::Error);
        assert!(report
            .issues
            .iter()
            .any(|i| i.starts_with("Syntax error at line 1:")));
    }

    #[test]
    fn merge_keeps_first_occurrence_of_repeated_pairs() {
        let detected = vec![
            SyntaxErrorRecord {
                line: 1,
                message: "Syntax error: missing ';'".to_string(),
            },
            SyntaxErrorRecord {
                line: 3,
                message: "Syntax error: unexpected token".to_string(),
            },
        ];
        // The AI repeats the line-3 finding and adds a new one on the
        // same line with a different message.
        let reported = vec![
            SyntaxErrorRecord {
                line: 3,
                message: "Syntax error: unexpected token".to_string(),
            },
            SyntaxErrorRecord {
                line: 3,
                message: "Missing closing brace".to_string(),
            },
        ];

        let merged = merge_syntax_errors(&detected, reported);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].line, 1);
        assert_eq!(merged[1].line, 3);
        assert_eq!(merged[1].message, "Syntax error: unexpected token");
        assert_eq!(merged[2].message, "Missing closing brace");
    }

    #[tokio::test]
    async fn analysis_is_idempotent() {
        let analyzer = static_analyzer();
        let first = analyzer.analyze(NESTED_CALLBACKS).await;
        let second = analyzer.analyze(NESTED_CALLBACKS).await;
        assert_eq!(first, second);
    }

    #[test]
    fn floor_report_is_fully_populated() {
        let report = floor_report(vec![SyntaxErrorRecord {
            line: 2,
            message: "Syntax error: unexpected token".to_string(),
        }]);

        assert_eq!(report.suggestions[0].rule_id, rules::GENERAL_REVIEW);
        assert_eq!(report.suggestions[0].line, 1);
        assert!(report
            .suggestions
            .iter()
            .any(|d| d.rule_id == rules::SYNTAX_ERROR && d.line == 2));
        assert_eq!(report.optimizations.len(), 3);
        assert!(report.issues.len() >= 2);
        assert!(!report.time_complexity.improvement.improved_code.is_empty());
    }
}
