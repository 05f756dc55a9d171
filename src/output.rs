//! Output formatters for analysis reports.
//!
//! Provides human-readable, JSON, and compact renderings of an
//! [`AnalysisReport`] for the CLI.

use colored::Colorize;

use crate::report::{AnalysisReport, Severity};

/// Output format for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable colored output.
    Pretty,
    /// JSON output for tooling integration (the wire schema).
    Json,
    /// Compact one-line-per-diagnostic.
    Compact,
}

/// Format a report according to the specified output format.
pub fn format_report(report: &AnalysisReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => format_pretty(report),
        OutputFormat::Json => format_json(report),
        OutputFormat::Compact => format_compact(report),
    }
}

/// Format a report in human-readable colored output.
fn format_pretty(report: &AnalysisReport) -> String {
    let mut output = String::new();

    if !report.suggestions.is_empty() {
        output.push_str(&format!("{}\n", "Diagnostics".bold().underline()));
        for diag in &report.suggestions {
            let (marker, severity_str) = match diag.severity {
                Severity::Error => ("✖".red().to_string(), "error".red().bold().to_string()),
                Severity::Warning => (
                    "⚠".yellow().to_string(),
                    "warning".yellow().bold().to_string(),
                ),
                Severity::Info => ("ℹ".blue().to_string(), "info".blue().bold().to_string()),
            };
            output.push_str(&format!(
                "  {} {} {} [{}] {}\n",
                marker,
                format!("line {}", diag.line).dimmed(),
                severity_str,
                diag.rule_id.cyan(),
                diag.message
            ));
        }
        output.push('\n');
    }

    if !report.issues.is_empty() {
        output.push_str(&format!("{}\n", "Issues".bold().underline()));
        for issue in &report.issues {
            output.push_str(&format!("  {} {}\n", "→".dimmed(), issue));
        }
        output.push('\n');
    }

    if !report.optimizations.is_empty() {
        output.push_str(&format!("{}\n", "Optimizations".bold().underline()));
        for opt in &report.optimizations {
            output.push_str(&format!("  {} {}\n", "→".dimmed(), opt));
        }
        output.push('\n');
    }

    output.push_str(&format!("{}\n", "Time Complexity".bold().underline()));
    output.push_str(&format!(
        "  {} {}\n",
        "Current:".bold(),
        report.time_complexity.current
    ));
    output.push_str(&format!(
        "  {} {}\n",
        "Suggestion:".bold(),
        report.time_complexity.improvement.suggestion
    ));
    output.push_str(&format!(
        "  {} {}\n",
        "Improved:".bold(),
        report.time_complexity.improvement.improved_complexity
    ));
    output.push_str(&format!("\n{}\n", "Improved code:".green().bold()));
    for line in report.time_complexity.improvement.improved_code.lines() {
        output.push_str(&format!("    {}\n", line.green()));
    }

    output
}

/// Format a report as the JSON wire schema.
fn format_json(report: &AnalysisReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_default()
}

/// Format the diagnostics in compact one-line format.
fn format_compact(report: &AnalysisReport) -> String {
    let mut output = String::new();

    for diag in &report.suggestions {
        let severity = match diag.severity {
            Severity::Error => "E",
            Severity::Warning => "W",
            Severity::Info => "I",
        };
        output.push_str(&format!(
            "{}: {} [{}] {}\n",
            diag.line, severity, diag.rule_id, diag.message
        ));
    }

    output
}

/// Summary statistics for a report's diagnostics.
#[derive(Debug, Default)]
pub struct ReportSummary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

impl ReportSummary {
    /// Count diagnostics by severity.
    pub fn from_report(report: &AnalysisReport) -> Self {
        let mut summary = Self {
            total: report.suggestions.len(),
            ..Self::default()
        };

        for diag in &report.suggestions {
            match diag.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.info += 1,
            }
        }

        summary
    }

    /// Format the summary as a human-readable string.
    pub fn format_pretty(&self) -> String {
        format!(
            "{} ({} {}, {} {}, {} info)",
            format!("{} diagnostics", self.total).bold(),
            self.errors.to_string().red().bold(),
            if self.errors == 1 { "error" } else { "errors" },
            self.warnings.to_string().yellow().bold(),
            if self.warnings == 1 {
                "warning"
            } else {
                "warnings"
            },
            self.info
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{
        rules, Diagnostic, TimeComplexityImprovement, TimeComplexityReport,
    };

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            suggestions: vec![
                Diagnostic {
                    line: 2,
                    message: "Console statement found.".to_string(),
                    severity: Severity::Info,
                    rule_id: rules::NO_CONSOLE.to_string(),
                },
                Diagnostic {
                    line: 5,
                    message: "Syntax error: unexpected token".to_string(),
                    severity: Severity::Error,
                    rule_id: rules::SYNTAX_ERROR.to_string(),
                },
            ],
            optimizations: vec!["Use a map".to_string()],
            issues: vec!["Deeply nested callbacks".to_string()],
            time_complexity: TimeComplexityReport {
                current: "O(n^2)".to_string(),
                improvement: TimeComplexityImprovement::default(),
            },
        }
    }

    #[test]
    fn compact_format_lists_each_diagnostic() {
        let output = format_compact(&sample_report());
        assert!(output.contains("2: I [no-console]"));
        assert!(output.contains("5: E [syntax-error]"));
    }

    #[test]
    fn json_format_emits_wire_schema() {
        let output = format_json(&sample_report());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["suggestions"][0]["ruleId"], "no-console");
        assert!(value["timeComplexity"]["improvement"]["improvedCode"].is_string());
    }

    #[test]
    fn summary_counts_by_severity() {
        let summary = ReportSummary::from_report(&sample_report());
        assert_eq!(summary.total, 2);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.info, 1);
        assert_eq!(summary.warnings, 0);
    }
}
