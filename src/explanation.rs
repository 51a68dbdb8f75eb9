use crate::{llm::Llm, types::Evidence};
use tracing::{error, info, Instrument};

pub const MAX_SOURCES: usize = 3;

fn build_explain_prompt(claim: &str, reasoning: &str, evidence: &[Evidence]) -> String {
    let sources = evidence
        .iter()
        .take(MAX_SOURCES)
        .map(|e| format!("- [{}]({})", e.title, e.url))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Create a clear, concise explanation (2-3 paragraphs):\n\n\
         Claim: \"{claim}\"\n\
         Why it's false: {reasoning}\n\n\
         Sources:\n{sources}\n\n\
         Write in friendly, authoritative tone with Markdown formatting."
    )
}

/// Narrates a verdict. Falls back to `reasoning` unchanged when the model call fails.
pub async fn explain_claim(client: &dyn Llm, claim: &str, reasoning: &str, evidence: &[Evidence]) -> String {
    let span = tracing::info_span!("explanation_generation", sources = evidence.len().min(MAX_SOURCES));
    async move {
        info!("generating explanation");
        match client.generate(&build_explain_prompt(claim, reasoning, evidence)).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "explanation failed, using verifier reasoning");
                reasoning.to_string()
            }
        }
    }
    .instrument(span)
    .await
}
