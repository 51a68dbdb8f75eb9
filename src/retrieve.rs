use crate::{serper::Searcher, types::Evidence};
use anyhow::Result;
use futures::future::try_join_all;
use std::collections::HashSet;
use tracing::{info, Instrument};

pub const RESULTS_PER_QUERY: usize = 3;
pub const MAX_EVIDENCE: usize = 8;

pub fn derived_queries(topic: &str) -> [String; 3] {
    [
        topic.to_string(),
        format!("{topic} fact check"),
        format!("{topic} misinformation analysis"),
    ]
}

/// Runs the three derived queries concurrently and merges them in submission
/// order, first URL occurrence wins. Any search failure fails the whole call.
pub async fn gather_evidence(serp: &dyn Searcher, topic: &str) -> Result<Vec<Evidence>> {
    let queries = derived_queries(topic);
    let span = tracing::info_span!("evidence_gathering", queries = queries.len());
    async move {
        info!(topic, "gathering evidence");
        let tasks = queries.iter().map(|q| serp.search(q, RESULTS_PER_QUERY));
        // try_join_all yields results in input order regardless of completion order
        let per_query = try_join_all(tasks).await?;

        let mut seen = HashSet::new();
        let evidence = per_query
            .into_iter()
            .flatten()
            .filter(|hit| !hit.link.is_empty() && seen.insert(hit.link.clone()))
            .map(|hit| Evidence::new(hit.title, hit.link, &hit.snippet))
            .take(MAX_EVIDENCE)
            .collect::<Vec<_>>();

        info!(evidence = evidence.len(), "evidence gathered");
        Ok(evidence)
    }
    .instrument(span)
    .await
}
