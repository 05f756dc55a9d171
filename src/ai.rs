//! Gemini API client for AI-assisted code analysis.
//!
//! Sends the submitted source text to the Gemini `generateContent` endpoint
//! with a fixed instruction template and returns the raw response text.
//! Exactly one outbound call per analysis request, no internal retry; the
//! orchestrator owns the degradation path when the call fails.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default request timeout. A hung AI call must not stall the report.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default Gemini API endpoint.
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default model used for analysis requests.
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Errors from the AI service boundary.
#[derive(Debug, Error)]
pub enum AiServiceError {
    /// No API key configured.
    #[error("GEMINI_API_KEY environment variable not set")]
    MissingCredential,

    /// The HTTP request failed (connect error, timeout, bad payload).
    #[error("request to Gemini API failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Gemini API error ({status}): {body}")]
    Remote {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response carried no candidate text.
    #[error("Gemini response contained no candidates")]
    EmptyResponse,
}

/// Configuration for the AI client.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Gemini API key.
    pub api_key: String,

    /// API endpoint base URL.
    pub endpoint: String,

    /// Model name.
    pub model: String,

    /// Bound on the outbound request duration.
    pub timeout: Duration,
}

impl AiConfig {
    /// Build a configuration from environment variables.
    ///
    /// `GEMINI_API_KEY` is required; `REVU_AI_ENDPOINT` and `REVU_AI_MODEL`
    /// override the defaults.
    pub fn from_env() -> Result<Self, AiServiceError> {
        let api_key =
            std::env::var("GEMINI_API_KEY").map_err(|_| AiServiceError::MissingCredential)?;

        Ok(Self {
            api_key,
            endpoint: std::env::var("REVU_AI_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            model: std::env::var("REVU_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            timeout: DEFAULT_TIMEOUT,
        })
    }
}

// ---------------------------------------------------------------------------
// Gemini wire types
// ---------------------------------------------------------------------------

/// Gemini API request structure.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

/// Content block for a Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

/// Text part within a Gemini content block.
#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

/// Generation configuration for Gemini API requests.
#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "topK")]
    top_k: i32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: i32,
}

/// Response from the Gemini API.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

/// Candidate response from Gemini.
#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

/// Content within a Gemini response candidate.
#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

/// Text part within a Gemini response.
#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the Gemini analysis endpoint.
#[derive(Debug)]
pub struct AiClient {
    config: AiConfig,
    client: reqwest::Client,
}

impl AiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: AiConfig) -> Self {
        let client = reqwest::Client::new();
        Self { config, client }
    }

    /// Send `code` for analysis and return the raw response text.
    pub async fn request_analysis(&self, code: &str) -> Result<String, AiServiceError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.config.endpoint, self.config.model, self.config.api_key
        );

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: build_prompt(code),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: 0.2,
                top_k: 40,
                top_p: 0.95,
                max_output_tokens: 8192,
            },
        };

        tracing::debug!(model = %self.config.model, "requesting AI analysis");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AiServiceError::Remote { status, body });
        }

        let gemini_response: GeminiResponse = response.json().await?;

        gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(AiServiceError::EmptyResponse)
    }
}

/// Build the fixed instruction template wrapping the submitted code.
fn build_prompt(code: &str) -> String {
    format!(
        "Review this code and respond with a valid JSON object containing these sections:\n\
        1. \"syntaxErrors\": An array of objects with {{line, message}} describing any syntax errors\n\
        2. \"issues\": An array of strings describing bugs, security risks, and code smells\n\
        3. \"optimizations\": An array of strings with code improvement suggestions\n\
        4. \"timeComplexity\": A string describing the current time complexity\n\
        5. \"timeComplexityImprovements\": An object with:\n\
           - \"suggestion\": A string describing how to improve time complexity\n\
           - \"improvedCode\": A code snippet (please provide complete, runnable code) showing the implementation\n\
           - \"improvedComplexity\": A string describing the improved time complexity\n\n\
        IMPORTANT:\n\
        - Put the code in the improvedCode section without any markdown formatting.\n\
        - Pay special attention to identifying syntax errors in the code.\n\
        - For syntax errors, include the line number and a clear error message.\n\n\
        Here's the code to analyze:\n\n{code}\n"
    )
}
