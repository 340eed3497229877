pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

use clap::Parser;
use cli::Cli;
use commands::Ui;
use config::AppConfig;
use state::AppState;
use std::process::ExitCode;

pub fn run() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(c) => match cli.base_url.clone() {
            Some(url) => c.with_base_url(url),
            None => Ok(c),
        },
        Err(e) => Err(e),
    };
    let config = match config {
        Ok(c) => c,
        Err(e) => {
            eprintln!("farm-lens: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = logging::init_logger(&config.data_dir());

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "failed to start async runtime");
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::open(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "failed to open application state");
            return ExitCode::FAILURE;
        }
    };

    let mut ui = Ui::new(&state, cli.json);
    match runtime.block_on(commands::dispatch(&state, cli.command, &mut ui)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}
