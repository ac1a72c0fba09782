//! YSF Reflector - Entry Point
//!
//! Links YSF gateways and relays traffic between them.

use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use ysf_reflector::admin::spawn_console;
use ysf_reflector::error::handlers::handle_error;
use ysf_reflector::utils::logging::setup_logging;
use ysf_reflector::{Reflector, ReflectorConfig};

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    // Optional config file path as the only argument
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    let config = match ReflectorConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Launching YSF reflector {}...", config.name);

    let reflector = match Reflector::bind(config).await {
        Ok(reflector) => reflector,
        Err(e) => {
            handle_error(&e);
            return ExitCode::FAILURE;
        }
    };

    spawn_console(reflector.registry());

    match reflector.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            handle_error(&e);
            ExitCode::FAILURE
        }
    }
}
