use anyhow::Result;
use clap::{Parser, Subcommand};
use misinfo_guard::{
  config::Config, llm::openai::LlmClient, serper::Serper, server, types::{AnalysisRequest, AnalysisResponse},
  Coordinator, RequestContext, ResultCache,
};
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser)]
#[command(name="misinfo-guard", version)]
struct Cli {
  #[command(subcommand)]
  cmd: Cmd,
  #[command(flatten)]
  config: Config,
}

#[derive(Subcommand)]
enum Cmd {
  /// Serve the HTTP API
  Serve { #[arg(long, env="MISINFO_BIND", default_value="0.0.0.0:8000")] bind: String },
  /// Analyze one topic and print the response as JSON
  Analyze { topic: String },
}

fn build_coordinator(cfg: &Config) -> Result<Coordinator> {
  let serper = Serper::new(cfg.serper_api_key.clone(), cfg.search_qps, cfg.search_http_timeout())?;
  let llm = LlmClient::new(cfg.llm_model.clone(), cfg.llm_base_url.clone(), cfg.llm_api_key.clone());
  tracing::info!(model = llm.model(), "language model configured");
  Ok(Coordinator::new(Arc::new(serper), Arc::new(llm), ResultCache::new(cfg.cache()), cfg.pipeline()))
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .init();

  let cli = Cli::parse();
  let coordinator = build_coordinator(&cli.config)?;

  match cli.cmd {
    Cmd::Serve { bind } => {
      tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting misinfo-guard");
      server::run_server(server::AppState::new(coordinator), &bind).await?;
    }
    Cmd::Analyze { topic } => {
      let topic = AnalysisRequest { topic }
        .validated_topic()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("topic must be 1-200 characters"))?;
      let started = Instant::now();
      let claims = coordinator.analyze(&RequestContext::new(), &topic).await?;
      let resp = AnalysisResponse::new(topic, claims, started.elapsed().as_secs_f64());
      println!("{}", serde_json::to_string_pretty(&resp)?);
    }
  }
  Ok(())
}
