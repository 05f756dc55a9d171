//! Revu - a heuristic code review engine with AI-assisted enrichment.
//!
//! This crate analyzes a source-code text blob and produces a structured
//! report: syntax diagnostics, style/pattern issues, optimization
//! suggestions, and a time-complexity assessment. Static heuristics and an
//! optional Gemini-backed enrichment pass feed one merged report that is
//! always fully populated, even when the AI service is unreachable.
//!
//! # Usage
//!
//! ```rust,no_run
//! use revu::{Analyzer, AnalyzerConfig};
//!
//! # async fn run() {
//! let analyzer = Analyzer::new(AnalyzerConfig::from_env());
//! let report = analyzer.analyze("const x = 1;\nconsole.log(x);\n").await;
//!
//! for diag in &report.suggestions {
//!     println!("{}", diag);
//! }
//! # }
//! ```

pub mod ai;
pub mod analyzer;
pub mod normalize;
pub mod output;
pub mod patterns;
pub mod report;
pub mod source;
pub mod suggest;
pub mod syntax;

pub use ai::{AiClient, AiConfig, AiServiceError};
pub use analyzer::{Analyzer, AnalyzerConfig};
pub use normalize::{AiAnalysis, ResponseNormalizer};
pub use patterns::PatternScanner;
pub use report::{
    AnalysisReport, Diagnostic, Severity, SyntaxErrorRecord, TimeComplexityImprovement,
    TimeComplexityReport,
};
pub use suggest::StaticSuggestionGenerator;
pub use syntax::SyntaxValidator;
