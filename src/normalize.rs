//! Normalization of raw AI responses into the canonical analysis shape.
//!
//! The AI service returns untrusted free text: well-formed JSON, JSON inside
//! a fenced block, or markdown prose. Normalization is a pipeline of
//! independent extractors tried in order, with explicit fall-through:
//! fenced-JSON parse, whole-text JSON parse, heading/bullet prose
//! extraction, and finally the canonical defaults. The result is always
//! fully populated.

use regex::Regex;
use serde::Deserialize;

use crate::report::{defaults, SyntaxErrorRecord, TimeComplexityImprovement};

/// The canonical AI-analysis shape every response is normalized into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiAnalysis {
    /// Syntax errors reported by the AI.
    pub syntax_errors: Vec<SyntaxErrorRecord>,

    /// Bugs, security risks, and code smells.
    pub issues: Vec<String>,

    /// Free-text improvement suggestions.
    pub optimizations: Vec<String>,

    /// Current time complexity.
    pub time_complexity: String,

    /// Suggested time-complexity improvement.
    pub improvement: TimeComplexityImprovement,
}

impl AiAnalysis {
    /// A fully-defaulted analysis with empty lists.
    fn empty() -> Self {
        Self {
            syntax_errors: Vec::new(),
            issues: Vec::new(),
            optimizations: Vec::new(),
            time_complexity: defaults::COMPLEXITY_UNAVAILABLE.to_string(),
            improvement: TimeComplexityImprovement::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw JSON shape
// ---------------------------------------------------------------------------

/// Loose deserialization target for the structured path: every field is
/// optional so a partial response still parses.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default, rename = "syntaxErrors")]
    syntax_errors: Vec<RawSyntaxError>,

    #[serde(default)]
    issues: Vec<String>,

    #[serde(default)]
    optimizations: Vec<String>,

    #[serde(default, rename = "timeComplexity")]
    time_complexity: Option<String>,

    #[serde(default, rename = "timeComplexityImprovements")]
    improvements: Option<RawImprovement>,
}

#[derive(Debug, Deserialize)]
struct RawSyntaxError {
    #[serde(default = "default_line")]
    line: usize,
    #[serde(default)]
    message: String,
}

fn default_line() -> usize {
    1
}

#[derive(Debug, Deserialize)]
struct RawImprovement {
    #[serde(default)]
    suggestion: Option<String>,
    #[serde(default, rename = "improvedCode")]
    improved_code: Option<String>,
    #[serde(default, rename = "improvedComplexity")]
    improved_complexity: Option<String>,
}

// ---------------------------------------------------------------------------
// Extraction stages
// ---------------------------------------------------------------------------

/// Outcome of the structured-JSON stage.
enum JsonExtraction {
    Structured(AiAnalysis),
    Unparseable,
}

/// Outcome of the improved-code extraction stage.
enum CodeExtraction {
    Fenced(String),
    Heuristic(String),
    Absent,
}

/// Line prefixes/tokens that open a code region in the heuristic extractor.
const CODE_OPEN_MARKERS: [&str; 6] = ["function", "=>", "const ", "let ", "class ", "import "];

/// Tokens whose presence keeps a line inside an open code region.
const CODE_HINTS: [&str; 9] = [
    "function", "=>", "const ", "let ", "var ", "import ", "return ", "{", "}",
];

/// Lines longer than this without any code hint close the code region.
const EXPLANATION_LINE_LEN: usize = 30;

/// Normalizes raw AI response text into an [`AiAnalysis`].
pub struct ResponseNormalizer {
    /// Fenced block tagged `json` (or untagged) holding the JSON candidate.
    json_fence: Regex,

    /// Fenced code block for improved-code extraction.
    code_fence: Regex,

    /// Markdown heading markers splitting the prose into sections.
    heading: Regex,

    /// Bullet markers splitting a section into list items.
    bullet: Regex,

    /// `line N` references inside prose syntax-error bullets.
    line_number: Regex,
}

impl ResponseNormalizer {
    /// Create a normalizer with all extraction patterns compiled.
    pub fn new() -> Self {
        Self {
            json_fence: Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap(),
            code_fence: Regex::new(r"(?s)```(?:javascript|js)?\s*(.*?)\s*```").unwrap(),
            heading: Regex::new(r"#{1,3}\s+").unwrap(),
            bullet: Regex::new(r"\n\s*[-*]\s+").unwrap(),
            line_number: Regex::new(r"(?i)line\s+(\d+)").unwrap(),
        }
    }

    /// Normalize `raw` into the canonical shape. Never fails.
    pub fn normalize(&self, raw: &str) -> AiAnalysis {
        let mut analysis = match self.try_structured(raw) {
            JsonExtraction::Structured(analysis) => analysis,
            JsonExtraction::Unparseable => {
                tracing::debug!("AI response is not JSON, extracting from prose");
                self.extract_from_prose(raw)
            }
        };

        // Issues and optimizations always carry at least one entry. An
        // empty syntax-error list from a structured reply is meaningful
        // (clean code) and stays empty.
        if analysis.issues.is_empty() {
            analysis.issues.push(defaults::AI_NO_ISSUES.to_string());
        }
        if analysis.optimizations.is_empty() {
            analysis
                .optimizations
                .extend(defaults::AI_NO_OPTIMIZATIONS.iter().map(|s| s.to_string()));
        }

        analysis
    }

    /// Stage 1–2: fenced-block candidate, then strict JSON parse.
    fn try_structured(&self, raw: &str) -> JsonExtraction {
        let candidate = self
            .json_fence
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map_or(raw, |m| m.as_str());

        match serde_json::from_str::<RawAnalysis>(candidate) {
            Ok(parsed) => JsonExtraction::Structured(self.from_raw(parsed)),
            Err(_) => JsonExtraction::Unparseable,
        }
    }

    /// Fill the canonical shape from a parsed JSON object, substituting the
    /// defined defaults for missing fields.
    fn from_raw(&self, raw: RawAnalysis) -> AiAnalysis {
        let improvements = raw.improvements.unwrap_or(RawImprovement {
            suggestion: None,
            improved_code: None,
            improved_complexity: None,
        });

        AiAnalysis {
            syntax_errors: raw
                .syntax_errors
                .into_iter()
                .map(|e| SyntaxErrorRecord {
                    line: e.line.max(1),
                    message: e.message,
                })
                .collect(),
            issues: raw.issues,
            optimizations: raw.optimizations,
            time_complexity: raw
                .time_complexity
                .unwrap_or_else(|| defaults::COMPLEXITY_UNAVAILABLE.to_string()),
            improvement: TimeComplexityImprovement {
                suggestion: improvements
                    .suggestion
                    .unwrap_or_else(|| defaults::NO_IMPROVEMENT.to_string()),
                improved_code: improvements
                    .improved_code
                    .unwrap_or_else(|| defaults::NO_CODE.to_string()),
                improved_complexity: improvements
                    .improved_complexity
                    .unwrap_or_else(|| defaults::UNKNOWN_COMPLEXITY.to_string()),
            },
        }
    }

    /// Stage 3–4: heading/bullet prose extraction plus improved-code
    /// recovery.
    fn extract_from_prose(&self, raw: &str) -> AiAnalysis {
        let mut analysis = AiAnalysis::empty();

        analysis.improvement.improved_code = match self.extract_code_block(raw) {
            CodeExtraction::Fenced(code) | CodeExtraction::Heuristic(code) => code,
            CodeExtraction::Absent => defaults::NO_CODE.to_string(),
        };

        for section in self.heading.split(raw) {
            let lower = section.to_lowercase();

            if lower.contains("syntax") || lower.contains("error") {
                for point in self.bullet_points(section) {
                    let line = self
                        .line_number
                        .captures(&point)
                        .and_then(|caps| caps.get(1))
                        .and_then(|m| m.as_str().parse().ok())
                        .unwrap_or(1);
                    analysis
                        .syntax_errors
                        .push(SyntaxErrorRecord { line, message: point });
                }
            } else if lower.contains("issue")
                || lower.contains("bug")
                || lower.contains("problem")
            {
                analysis.issues.extend(self.bullet_points(section));
            } else if lower.contains("optim") || lower.contains("improve") {
                analysis.optimizations.extend(self.bullet_points(section));
            } else if lower.contains("time complex") || lower.contains("complexity") {
                self.extract_complexity(section, &mut analysis);
            }
        }

        // Prose never states "no syntax errors" machine-readably, so an
        // empty extraction gets an explanatory placeholder.
        if analysis.syntax_errors.is_empty() {
            analysis.syntax_errors.push(SyntaxErrorRecord {
                line: 1,
                message: defaults::AI_NO_SYNTAX_ERRORS.to_string(),
            });
        }

        analysis
    }

    /// Recover list items from a markdown section.
    fn bullet_points(&self, section: &str) -> Vec<String> {
        self.bullet
            .split(section)
            .skip(1)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Pull the current/suggested/improved complexity strings out of a
    /// complexity section.
    fn extract_complexity(&self, section: &str, analysis: &mut AiAnalysis) {
        let lines: Vec<&str> = section.lines().collect();

        if let Some(first) = lines.first() {
            let trimmed = first.trim();
            if !trimmed.is_empty() {
                analysis.time_complexity = trimmed.to_string();
            }
        }

        if let Some(line) = lines.iter().find(|l| {
            let lower = l.to_lowercase();
            lower.contains("suggest") || lower.contains("improve")
        }) {
            analysis.improvement.suggestion = line.trim().to_string();
        }

        if let Some(line) = lines.iter().find(|l| {
            let lower = l.to_lowercase();
            lower.contains("improved") || lower.contains("better")
        }) {
            analysis.improvement.improved_complexity = line.trim().to_string();
        }
    }

    /// Extract an improved-code block: fenced block first, then the
    /// code-marker line-scan heuristic.
    fn extract_code_block(&self, text: &str) -> CodeExtraction {
        if let Some(code) = self
            .code_fence
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
        {
            if !code.trim().is_empty() {
                return CodeExtraction::Fenced(code.to_string());
            }
        }

        let mut code_lines: Vec<&str> = Vec::new();
        let mut in_code = false;

        for line in text.lines() {
            if !in_code && opens_code_region(line) {
                in_code = true;
            }

            if in_code {
                // Long lines without any code marker are likely explanations.
                let trimmed = line.trim();
                if !trimmed.is_empty()
                    && line.len() > EXPLANATION_LINE_LEN
                    && !stays_in_code_region(line)
                {
                    in_code = false;
                } else {
                    code_lines.push(line);
                }
            }
        }

        if code_lines.len() > 2 {
            CodeExtraction::Heuristic(code_lines.join("\n"))
        } else {
            CodeExtraction::Absent
        }
    }
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a line looks like the start of a code section.
fn opens_code_region(line: &str) -> bool {
    CODE_OPEN_MARKERS.iter().any(|m| line.contains(m)) || line.trim().starts_with("//")
}

/// Whether a line inside an open code region still looks like code.
fn stays_in_code_region(line: &str) -> bool {
    let trimmed = line.trim();
    CODE_HINTS.iter().any(|m| line.contains(m))
        || trimmed.starts_with("//")
        || trimmed.starts_with("/*")
        || trimmed.starts_with('*')
        || trimmed.starts_with("if")
        || trimmed.starts_with("else")
        || trimmed.starts_with("for")
        || trimmed.starts_with("while")
}
