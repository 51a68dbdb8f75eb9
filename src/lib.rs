pub mod config;
pub mod coordinator;
pub mod credibility;
pub mod error;
pub mod explanation;
pub mod llm;
pub mod memory;
pub mod metrics;
pub mod retrieve;
pub mod serper;
pub mod server;
pub mod types;
pub mod verification;

pub use coordinator::{Coordinator, PipelineConfig, RequestContext};
pub use memory::{CacheConfig, CacheStats, ResultCache};
pub use types::*;
