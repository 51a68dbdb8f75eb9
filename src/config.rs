use clap::Args;
use std::time::Duration;

use crate::{coordinator::PipelineConfig, memory::CacheConfig};

#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Serper API key for web search
    #[arg(long, env = "SERPER_API_KEY", hide_env_values = true)]
    pub serper_api_key: String,
    /// Search requests per second
    #[arg(long, env = "SEARCH_QPS", default_value_t = 5)]
    pub search_qps: u32,
    /// Limit for one evidence-gathering round, 0 disables it
    #[arg(long, env = "SEARCH_TIMEOUT_MS", default_value_t = 10_000)]
    pub search_timeout_ms: u64,
    #[arg(long, env = "LLM_MODEL", default_value = "gpt-4o-mini")]
    pub llm_model: String,
    /// OpenAI-compatible endpoint
    #[arg(long, env = "LLM_BASE_URL")]
    pub llm_base_url: Option<String>,
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,
    /// Limit for one model call, 0 disables it
    #[arg(long, env = "LLM_TIMEOUT_MS", default_value_t = 30_000)]
    pub llm_timeout_ms: u64,
    /// Max cached topics; unbounded when unset
    #[arg(long, env = "MISINFO_CACHE_CAPACITY")]
    pub cache_capacity: Option<usize>,
    /// Cache entry lifetime; entries never expire when unset
    #[arg(long, env = "MISINFO_CACHE_TTL_SECS")]
    pub cache_ttl_secs: Option<u64>,
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

impl Config {
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            search_timeout: millis(self.search_timeout_ms),
            llm_timeout: millis(self.llm_timeout_ms),
        }
    }

    pub fn cache(&self) -> CacheConfig {
        CacheConfig {
            capacity: self.cache_capacity,
            ttl: self.cache_ttl_secs.map(Duration::from_secs),
        }
    }

    /// Per-request search client timeout; the whole-round limit is in [`Config::pipeline`].
    pub fn search_http_timeout(&self) -> Duration {
        millis(self.search_timeout_ms).unwrap_or(Duration::from_secs(30))
    }
}
