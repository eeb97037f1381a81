//! Correlator Binary - Firehose Indicator Correlation
//!
//! Consumes the indicator firehose, accumulates per-indicator evidence over
//! the current day, and submits a "correlated" indicator back to the
//! collection API once enough distinct providers have reported it.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin correlator -- -v -r -s --user wes --feed correlated
//! ```
//!
//! ## Environment Variables
//!
//! - FIREHOSE_URL - websocket firehose endpoint (required)
//! - API_URL - collection API base URL for submissions (required)
//! - API_TOKEN - bearer token for both endpoints (optional)
//! - CORRELATOR_USER - local identity, user part (or --user)
//! - CORRELATOR_FEED - local identity, feed part (or --feed)
//! - CORRELATOR_TRIGGER - distinct-provider threshold (default: 3)
//! - CHECKPOINT_PATH - checkpoint file (default: correlator.json)
//! - RUST_LOG - logging level (overrides -v/-d)

use intelflow::consumer_core::{run_loop, ConsumerOptions, FirehoseFeed, HttpSubmissionClient};
use intelflow::correlator_core::checkpoint::{load_checkpoint, save_checkpoint};
use intelflow::correlator_core::CorrelationEngine;
use intelflow::Config;
use std::collections::HashMap;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config = Config::from_env()?;
    config.apply_cli_args(&args);
    config.validate()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter()),
    )
    .target(env_logger::Target::Stderr)
    .init();

    log::info!("🚀 Starting correlator");
    log::info!("   Firehose: {}", config.firehose_url);
    log::info!("   API: {}", config.api_url);
    log::info!("   Identity: {}", config.origin());
    log::info!("   Trigger: {} distinct providers", config.trigger);
    log::info!("   Reconnect: {}", config.reconnect);
    log::info!("   Save: {} ({})", config.save, config.checkpoint_path);

    let records = match load_checkpoint(&config.checkpoint_path) {
        Ok(records) => records,
        Err(e) => {
            log::warn!(
                "checkpoint unreadable ({}), starting with empty context",
                e
            );
            HashMap::new()
        }
    };

    let client = HttpSubmissionClient::new(config.api_url.clone(), config.token.clone())?;
    let mut engine = CorrelationEngine::with_records(
        &config.user,
        &config.feed,
        config.trigger,
        Box::new(client),
        records,
    );
    let mut feed = FirehoseFeed::new(config.firehose_url.clone(), config.token.clone());
    let opts = ConsumerOptions {
        reconnect: config.reconnect,
    };

    let mut error_exit = false;
    tokio::select! {
        summary = run_loop(&mut feed, &mut engine, &opts) => {
            if summary.error_close {
                error_exit = true;
            }
        }
        _ = tokio::signal::ctrl_c() => {
            log::info!("interrupt received, shutting down");
        }
    }

    if config.save {
        save_checkpoint(&config.checkpoint_path, engine.store())?;
    }

    if error_exit {
        std::process::exit(1);
    }

    Ok(())
}
