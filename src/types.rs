use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SNIPPET_MAX_CHARS: usize = 200;
pub const TOPIC_MAX_CHARS: usize = 200;

/// A retrieved source. `url` is the identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl Evidence {
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: &str) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.chars().take(SNIPPET_MAX_CHARS).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Misinformation,
    Verified,
    Uncertain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredibilityTier {
    High,
    Medium,
    Low,
}

/// One claim as reported by the fact verifier, before explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactCheck {
    pub claim: String,
    pub verdict: Verdict,
    pub confidence: Option<f64>,
    pub reasoning: String,
}

impl FactCheck {
    pub const DEFAULT_CONFIDENCE: f64 = 0.8;

    pub fn misinformation(claim: impl Into<String>, confidence: Option<f64>, reasoning: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            verdict: Verdict::Misinformation,
            confidence,
            reasoning: reasoning.into(),
        }
    }

    pub fn confidence_or_default(&self) -> f64 {
        self.confidence.unwrap_or(Self::DEFAULT_CONFIDENCE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimAnalysis {
    pub claim: String,
    pub verdict: Verdict,
    pub confidence: f64,
    pub explanation: String,
    pub evidence: Vec<Evidence>,
    pub analyzed_at: DateTime<Utc>,
    pub cached: bool,
}

impl ClaimAnalysis {
    pub fn new(
        claim: String,
        verdict: Verdict,
        confidence: f64,
        explanation: String,
        evidence: Vec<Evidence>,
    ) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            claim,
            verdict,
            confidence,
            explanation,
            evidence: dedup_by_url(evidence),
            analyzed_at: Utc::now(),
            cached: false,
        }
    }
}

/// Keeps the first occurrence of every URL, preserving order.
pub fn dedup_by_url(evidence: Vec<Evidence>) -> Vec<Evidence> {
    let mut seen = std::collections::HashSet::new();
    evidence
        .into_iter()
        .filter(|e| seen.insert(e.url.clone()))
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub topic: String,
}

impl AnalysisRequest {
    /// Trimmed topic, or `None` when empty or longer than [`TOPIC_MAX_CHARS`].
    pub fn validated_topic(&self) -> Option<&str> {
        let topic = self.topic.trim();
        let len = topic.chars().count();
        (len >= 1 && len <= TOPIC_MAX_CHARS).then_some(topic)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub claims: Vec<ClaimAnalysis>,
    pub topic: String,
    pub analyzed_at: DateTime<Utc>,
    /// Seconds.
    pub processing_time: f64,
    pub cached: bool,
}

impl AnalysisResponse {
    pub fn new(topic: String, claims: Vec<ClaimAnalysis>, processing_time: f64) -> Self {
        // Claims served from the cache keep the flag they were stored with.
        let cached = claims.iter().any(|c| c.cached);
        Self {
            claims,
            topic,
            analyzed_at: Utc::now(),
            processing_time,
            cached,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentStatus {
    pub coordinator: &'static str,
    pub evidence_gatherer: &'static str,
    pub fact_checker: &'static str,
    pub credibility_assessor: &'static str,
    pub explainer: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub agents: AgentStatus,
}

impl HealthReport {
    pub fn current() -> Self {
        Self {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
            agents: AgentStatus {
                coordinator: "active",
                evidence_gatherer: "active",
                fact_checker: "active",
                credibility_assessor: "active",
                explainer: "active",
            },
        }
    }
}
