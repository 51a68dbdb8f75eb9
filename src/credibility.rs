use crate::types::{CredibilityTier, Evidence};
use std::collections::HashMap;

const TRUSTED: [&str; 6] = ["edu", "gov", "reuters", "apnews", "bbc", "factcheck"];
const UNTRUSTED: [&str; 3] = ["blog", "wordpress", "medium"];

/// Third `/`-separated segment of the URL, or the whole URL when it has no `/`.
/// A URL with a single `/` has no third segment and yields an empty domain.
pub fn domain_of(url: &str) -> &str {
    if !url.contains('/') {
        return url;
    }
    url.split('/').nth(2).unwrap_or("")
}

pub fn classify_domain(domain: &str) -> CredibilityTier {
    let domain = domain.to_lowercase();
    if TRUSTED.iter().any(|t| domain.contains(t)) {
        CredibilityTier::High
    } else if UNTRUSTED.iter().any(|t| domain.contains(t)) {
        CredibilityTier::Low
    } else {
        CredibilityTier::Medium
    }
}

/// Maps every evidence URL to a credibility tier.
pub fn assess(evidence: &[Evidence]) -> HashMap<String, CredibilityTier> {
    let _span = tracing::info_span!("credibility_assessment", sources = evidence.len()).entered();
    let map = evidence
        .iter()
        .map(|e| (e.url.clone(), classify_domain(domain_of(&e.url))))
        .collect::<HashMap<_, _>>();
    tracing::debug!(sources = map.len(), "credibility assessment complete");
    map
}
