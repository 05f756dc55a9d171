//! Revu CLI - analyze a source file (or stdin) and print the report.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use colored::Colorize;

use revu::output::{format_report, OutputFormat, ReportSummary};
use revu::report::Severity;
use revu::{Analyzer, AnalyzerConfig};

/// Revu - heuristic code review with AI-assisted enrichment
#[derive(Parser, Debug)]
#[command(name = "revu")]
#[command(version)]
#[command(about = "Analyze source code and print a structured review report", long_about = None)]
struct Args {
    /// File to analyze (reads stdin when omitted)
    file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    format: OutputFormatArg,

    /// Skip AI enrichment even when a credential is configured
    #[arg(long)]
    no_ai: bool,

    /// Minimum severity to include in the output
    #[arg(short = 's', long, value_enum, default_value = "info")]
    min_severity: SeverityArg,

    /// Suppress the summary line
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    /// Human-readable colored output
    Pretty,
    /// JSON output for tooling integration
    Json,
    /// Compact one-line-per-diagnostic
    Compact,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Pretty => OutputFormat::Pretty,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Compact => OutputFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SeverityArg {
    Info,
    Warning,
    Error,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Info => Severity::Info,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
        }
    }
}

/// Read the analysis input from the given file or stdin.
fn read_input(file: Option<&PathBuf>) -> std::io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let code = match read_input(args.file.as_ref()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}: {}", "Error".red().bold(), err);
            return ExitCode::from(2);
        }
    };

    let config = if args.no_ai {
        AnalyzerConfig { ai: None }
    } else {
        AnalyzerConfig::from_env()
    };

    let analyzer = Analyzer::new(config);
    let mut report = analyzer.analyze(&code).await;
    report.retain_min_severity(args.min_severity.into());

    let format: OutputFormat = args.format.into();
    print!("{}", format_report(&report, format));

    let summary = ReportSummary::from_report(&report);
    if !args.quiet && format != OutputFormat::Json {
        println!();
        if summary.total > 0 {
            println!("{} {}", "Found".bold(), summary.format_pretty());
        } else {
            println!("{}", "✓ No diagnostics!".green().bold());
        }
    }

    // Error-severity diagnostics fail the run, mirroring linter conventions.
    let has_errors = report
        .suggestions
        .iter()
        .any(|d| d.severity == Severity::Error);
    if has_errors {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
