pub mod openai;

use anyhow::Result;

/// Text generation backend shared by the fact verifier and the explainer.
#[async_trait::async_trait]
pub trait Llm: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
