pub mod assistant;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod model;
pub mod model_gateway;
pub mod prompt;
pub mod providers;
pub mod repl;

use anyhow::{Context, Result};
use std::env;
use tracing::info;

use assistant::Assistant;
use config::Config;
use providers::xai::HttpGateway;
use repl::run_repl;

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = logging::init();

    let cfg = Config::from_env();
    info!(
        api_url = %cfg.api_url,
        model = %cfg.model,
        timeout_secs = cfg.timeout_secs,
        extraction = cfg.extraction.as_str(),
        language = %cfg.language,
        api_key_present = cfg.api_key.is_some(),
        "loaded runtime configuration"
    );

    let gateway = HttpGateway::new(&cfg).context("Failed to initialize HTTP client")?;
    let mut assistant = Assistant::new(cfg, gateway);

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        run_repl(&mut assistant).await
    } else {
        let prompt = args.join(" ");
        assistant.grok(&prompt).await?;
        Ok(())
    }
}
