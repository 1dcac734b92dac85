use std::path::Path;

use tokensmith_batch::clock::SystemClock;
use tokensmith_batch::{run, RunPaths};
use tokensmith_core::config::Config;
use tokensmith_core::types::RefreshStatus;
use tokensmith_integrations::webex::WebexTokenClient;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const CONFIG_PATH: &str = "tokensmith.toml";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();

    let config = Config::load(Path::new(CONFIG_PATH)).unwrap_or_else(|e| {
        error!("fatal: failed to load config: {e}");
        std::process::exit(1);
    });

    let endpoint = WebexTokenClient::new(config.webex.token_url.clone());
    let paths = RunPaths::from(&config.store);

    let report = run(&paths, &endpoint, &SystemClock).await.unwrap_or_else(|e| {
        error!("fatal: {e}");
        std::process::exit(1);
    });

    info!(
        success = report.count(RefreshStatus::Success),
        failed = report.count(RefreshStatus::Failed),
        skipped = report.count(RefreshStatus::Skipped),
        "token refresh complete, store and snapshot updated"
    );

    println!("New tokens saved to: {}", report.snapshot.display());
    println!("Token logs saved to: {}", report.log.display());
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}
