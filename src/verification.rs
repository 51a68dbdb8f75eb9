use crate::{llm::Llm, types::{Evidence, FactCheck}};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{error, info, Instrument};

fn build_verify_prompt(topic: &str, evidence: &[Evidence]) -> String {
    let summary = evidence.iter().map(|e| format!("- {}: {}", e.title, e.snippet)).collect::<Vec<_>>().join("\n");
    format!(
        r#"Analyze this topic for misinformation:

Topic: "{topic}"

Evidence:
{summary}

Identify 1-3 specific claims that are MISINFORMATION only.
Return JSON array:
[
  {{
    "claim": "exact claim text",
    "verdict": "MISINFORMATION",
    "confidence": 0.85,
    "reasoning": "why this is false"
  }}
]

Return [] if no misinformation found."#
    )
}

#[derive(Deserialize)]
struct RawFact {
    claim: String,
    #[serde(default, deserialize_with = "lenient_confidence")]
    confidence: Option<f64>,
    #[serde(default)]
    reasoning: String,
}

/// Accepts a number or a numeric string; anything else reads as absent.
fn lenient_confidence<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFacts {
    Many(Vec<RawFact>),
    One(RawFact),
}

/// Strips one leading code fence (optionally tagged `json`) and one trailing
/// fence from a model reply. Fences inside the body are left alone.
pub fn strip_code_fences(raw: &str) -> &str {
    let s = raw.trim();
    let s = s.strip_prefix("```json").or_else(|| s.strip_prefix("```")).unwrap_or(s);
    let s = s.trim();
    s.strip_suffix("```").unwrap_or(s).trim()
}

pub fn parse_facts(raw: &str) -> serde_json::Result<Vec<FactCheck>> {
    let facts = match serde_json::from_str::<RawFacts>(strip_code_fences(raw))? {
        RawFacts::Many(v) => v,
        RawFacts::One(f) => vec![f],
    };
    Ok(facts
        .into_iter()
        .map(|f| FactCheck::misinformation(f.claim, f.confidence, f.reasoning))
        .collect())
}

/// Asks the model for misinformation claims about `topic`. Never fails: any
/// collaborator or parse error yields an empty list.
pub async fn verify_topic(client: &dyn Llm, topic: &str, evidence: &[Evidence]) -> Vec<FactCheck> {
    let span = tracing::info_span!("fact_checking", sources = evidence.len());
    async move {
        info!(topic, "fact-checking topic");
        let prompt = build_verify_prompt(topic, evidence);
        let raw = match client.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "fact-checking model call failed");
                return Vec::new();
            }
        };
        match parse_facts(&raw) {
            Ok(facts) => {
                info!(claims = facts.len(), "misinformation claims found");
                facts
            }
            Err(e) => {
                error!(error = %e, "fact-checking reply was not a claim list");
                Vec::new()
            }
        }
    }
    .instrument(span)
    .await
}
