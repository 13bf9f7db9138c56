//! Remote text-analysis sentiment scorer.
//!
//! Asks a generative text-analysis service to rate a news snippet between
//! -1 (very negative) and 1 (very positive) and extracts the first numeric
//! token from the reply. This path is explicitly non-deterministic; failures
//! are absorbed per item by falling back to the local lexicon score, so the
//! worst case is a neutral 0.0 — never an error.

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::warn;

use super::{LexiconScorer, SentimentScorer};
use crate::error::ScoreError;

const ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: String,
}

/// Remote scorer with per-item lexicon fallback.
pub struct RemoteScorer {
    client: reqwest::blocking::Client,
    api_key: String,
    fallback: LexiconScorer,
}

impl RemoteScorer {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            api_key,
            fallback: LexiconScorer::new(),
        }
    }

    fn request_score(&self, text: &str) -> Result<f64, ScoreError> {
        let prompt = format!(
            "Rate the overall sentiment of this financial news text as a single \
             number between -1 (very negative) and 1 (very positive). \
             Reply with only the number.\n\nText: {text}"
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let resp = self
            .client
            .post(format!("{ENDPOINT}?key={}", self.api_key))
            .json(&body)
            .send()
            .map_err(|e| ScoreError::ServiceUnreachable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ScoreError::ServiceUnreachable(format!(
                "HTTP {}",
                resp.status()
            )));
        }

        let parsed: GenerateResponse = resp
            .json()
            .map_err(|e| ScoreError::NoScoreInResponse(e.to_string()))?;

        let reply = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| ScoreError::NoScoreInResponse("empty candidates".into()))?;

        extract_score(reply).ok_or_else(|| ScoreError::NoScoreInResponse(reply.to_string()))
    }
}

/// Pull the first numeric token out of a free-text reply and clamp it to
/// [-1, 1]. Returns None when no token parses as a number.
pub fn extract_score(reply: &str) -> Option<f64> {
    reply
        .split_whitespace()
        .map(|tok| tok.trim_matches(|c: char| !c.is_ascii_digit() && c != '-' && c != '.'))
        .find_map(|tok| tok.parse::<f64>().ok())
        .map(|v| v.clamp(-1.0, 1.0))
}

impl SentimentScorer for RemoteScorer {
    fn name(&self) -> &str {
        "remote"
    }

    fn score(&self, text: &str) -> f64 {
        if text.trim().len() < 10 {
            // Too short to carry any signal worth a request
            return 0.0;
        }
        match self.request_score(text) {
            Ok(score) => score,
            Err(e) => {
                warn!(error = %e, "remote sentiment scoring failed — using lexicon fallback");
                self.fallback.score(text)
            }
        }
    }
}
