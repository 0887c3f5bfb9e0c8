//! # ike-engine
//!
//! An IKEv1 protocol engine.

#![warn(missing_docs, clippy::unwrap_used, clippy::expect_used)]
#![allow(missing_docs)]

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ike_engine::config::EngineConfig;
use ike_engine::demo::LoggingKernel;
use ike_engine::demo::StaticPolicy;
use ike_engine::demo::UnimplementedCrypto;
use ike_engine::Engine;
use tracing::error;

use crate::cli::Cli;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let source = match std::fs::read_to_string(&cli.config) {
        Ok(source) => source,
        Err(err) => {
            error!(path = %cli.config.display(), %err, "could not read configuration file");
            return ExitCode::FAILURE;
        }
    };
    let config = match EngineConfig::from_toml(&source) {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "could not parse configuration file");
            return ExitCode::FAILURE;
        }
    };

    let engine = match Engine::new(
        config,
        Arc::new(UnimplementedCrypto),
        Arc::new(LoggingKernel),
        Arc::new(StaticPolicy::default()),
    ) {
        Ok(engine) => engine,
        Err(err) => {
            error!(%err, "engine failed to initialize");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = engine.run().await {
        error!(%err, "engine exited");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
