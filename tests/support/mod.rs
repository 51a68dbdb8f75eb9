#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use misinfo_guard::llm::Llm;
use misinfo_guard::serper::{SearchHit, Searcher};
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct FakeLlm {
    // maps each prompt to a reply
    pub handler: Box<dyn Fn(&str) -> Result<String> + Send + Sync>,
    pub delay_ms: u64,
    pub calls: AtomicUsize,
}

impl FakeLlm {
    /// Answers fact-check prompts with `facts`, everything else with `explanation`.
    pub fn scripted(facts: &'static str, explanation: &'static str) -> Self {
        Self {
            handler: Box::new(move |p: &str| {
                Ok(if p.starts_with("Analyze this topic") { facts } else { explanation }.to_string())
            }),
            delay_ms: 0,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Llm for FakeLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        use tokio::time::{sleep, Duration};
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 { sleep(Duration::from_millis(self.delay_ms)).await; }
        (self.handler)(prompt)
    }
}

pub struct FakeSearcher {
    pub results: Vec<SearchHit>,
    pub fail: bool,
}

impl FakeSearcher {
    pub fn with(results: Vec<SearchHit>) -> Self {
        Self { results, fail: false }
    }
}

#[async_trait]
impl Searcher for FakeSearcher {
    async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        if self.fail {
            anyhow::bail!("search backend unreachable");
        }
        Ok(self.results.iter().take(max_results).cloned().collect())
    }
}

pub fn hit(title: &str, link: &str, snippet: &str) -> SearchHit {
    SearchHit { title: title.into(), link: link.into(), snippet: snippet.into() }
}
