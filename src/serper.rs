// src/serper.rs
use anyhow::{Context, Result};
use governor::{clock::DefaultClock, state::direct::NotKeyed, state::InMemoryState, Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;

const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default = "untitled")]
    pub title: String,
    /// Empty when the backend omitted it; such hits are skipped when gathering.
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

fn untitled() -> String {
    "Unknown".to_string()
}

/// Web search backend.
#[async_trait::async_trait]
pub trait Searcher: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}

#[derive(Debug, Deserialize)]
struct SerperResp {
    #[serde(default)]
    organic: Vec<SearchHit>,
}

pub struct Serper {
    http: Client,
    key: String,
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl Serper {
    pub fn new(key: String, qps: u32, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("building search http client")?;
        let qps = NonZeroU32::new(qps).unwrap_or(NonZeroU32::MIN);
        let limiter = RateLimiter::direct(Quota::per_second(qps));
        Ok(Self { http, key, limiter })
    }
}

#[async_trait::async_trait]
impl Searcher for Serper {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        self.limiter.until_ready().await;
        let resp = self.http
            .post(SERPER_ENDPOINT)
            .header("X-API-KEY", &self.key)
            .json(&serde_json::json!({ "q": query, "num": max_results }))
            .send().await?
            .error_for_status()?
            .json::<SerperResp>().await?;
        Ok(resp.organic.into_iter().take(max_results).collect())
    }
}
