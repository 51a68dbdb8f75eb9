use crate::{
    credibility,
    error::AnalyzeError,
    explanation::explain_claim,
    llm::Llm,
    memory::{CacheStats, ResultCache},
    retrieve::gather_evidence,
    serper::Searcher,
    types::{ClaimAnalysis, CredibilityTier, Evidence, Verdict},
    verification::verify_topic,
};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

pub const MAX_CLAIMS: usize = 3;
pub const MAX_CLAIM_EVIDENCE: usize = 3;

/// Per-request values threaded through every pipeline stage.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub trace_id: String,
}

impl RequestContext {
    pub fn new() -> Self {
        let mut trace_id = Uuid::new_v4().simple().to_string();
        trace_id.truncate(8);
        Self { trace_id }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-call limits on collaborator calls. `None` waits indefinitely.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineConfig {
    pub search_timeout: Option<Duration>,
    pub llm_timeout: Option<Duration>,
}

async fn within<F: Future>(limit: Option<Duration>, fut: F) -> Option<F::Output> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await.ok(),
        None => Some(fut.await),
    }
}

/// High-credibility evidence if there is any, otherwise everything; first
/// three in gathering order.
pub fn select_evidence(evidence: &[Evidence], tiers: &HashMap<String, CredibilityTier>) -> Vec<Evidence> {
    let high = evidence
        .iter()
        .filter(|e| tiers.get(&e.url) == Some(&CredibilityTier::High))
        .take(MAX_CLAIM_EVIDENCE)
        .cloned()
        .collect::<Vec<_>>();
    if high.is_empty() {
        evidence.iter().take(MAX_CLAIM_EVIDENCE).cloned().collect()
    } else {
        high
    }
}

pub struct Coordinator {
    searcher: Arc<dyn Searcher>,
    llm: Arc<dyn Llm>,
    memory: ResultCache,
    config: PipelineConfig,
}

impl Coordinator {
    pub fn new(searcher: Arc<dyn Searcher>, llm: Arc<dyn Llm>, memory: ResultCache, config: PipelineConfig) -> Self {
        Self { searcher, llm, memory, config }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.memory.stats()
    }

    /// Cache lookup, then gather -> {score, verify} -> explain -> store.
    ///
    /// Only evidence gathering can fail the request; verifier and explainer
    /// failures degrade the result instead.
    pub async fn analyze(&self, ctx: &RequestContext, topic: &str) -> Result<Vec<ClaimAnalysis>, AnalyzeError> {
        let span = tracing::info_span!("coordination", trace_id = %ctx.trace_id);
        self.run(topic).instrument(span).await
    }

    async fn run(&self, topic: &str) -> Result<Vec<ClaimAnalysis>, AnalyzeError> {
        info!(topic, "coordinating analysis");

        if let Some(cached) = self.memory.get(topic) {
            info!(claims = cached.len(), "retrieved from memory bank");
            return Ok(cached);
        }

        let evidence = within(self.config.search_timeout, gather_evidence(self.searcher.as_ref(), topic))
            .await
            .ok_or(AnalyzeError::Timeout("evidence gathering"))?
            .map_err(AnalyzeError::Evidence)?;
        if evidence.is_empty() {
            warn!(topic, "no evidence found");
            return Ok(Vec::new());
        }

        let verify = async {
            within(self.config.llm_timeout, verify_topic(self.llm.as_ref(), topic, &evidence))
                .await
                .unwrap_or_else(|| {
                    warn!("fact-checking timed out");
                    Vec::new()
                })
        };
        let (tiers, facts) = tokio::join!(async { credibility::assess(&evidence) }, verify);

        let mut claims = Vec::with_capacity(facts.len().min(MAX_CLAIMS));
        for fact in facts.into_iter().take(MAX_CLAIMS) {
            let selected = select_evidence(&evidence, &tiers);
            let explanation = within(
                self.config.llm_timeout,
                explain_claim(self.llm.as_ref(), &fact.claim, &fact.reasoning, &selected),
            )
            .await
            .unwrap_or_else(|| {
                warn!(claim = %fact.claim, "explanation timed out, using verifier reasoning");
                fact.reasoning.clone()
            });
            let confidence = fact.confidence_or_default();
            claims.push(ClaimAnalysis::new(fact.claim, Verdict::Misinformation, confidence, explanation, selected));
        }

        if !claims.is_empty() {
            self.memory.store(topic, claims.clone());
            info!(claims = claims.len(), "stored in memory bank");
        }
        info!(claims = claims.len(), "coordination complete");
        Ok(claims)
    }
}
