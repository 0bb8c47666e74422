use clap::Parser;
use rollcall::cli::dispatcher::{Dispatcher, GlobalOptions};
use rollcall::cli::main_types::Cli;
use rollcall::core::normalized_error::normalize;
use rollcall::display::OutputFormat;
use rollcall::storage::config::Config;
use rollcall::utils::logging::init_logger;
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logger(cli.verbose);

    // Load Config
    let config_path = cli
        .config_dir
        .as_ref()
        .map(|dir| PathBuf::from(dir).join("config.toml"));

    let config = match Config::load(config_path.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    let format = match cli.format.parse::<OutputFormat>() {
        Ok(format) => format,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(2);
        }
    };

    let options = GlobalOptions {
        verbose: cli.verbose,
        url: cli.url,
        access_token: cli.access_token,
        store: cli.store,
        retry: cli.retry,
        format,
    };

    let dispatcher = Dispatcher::new(config, config_path, options);

    if let Err(e) = dispatcher.dispatch(cli.command).await {
        let normalized = normalize(&e);
        eprintln!("Error ({}): {}", normalized.status, normalized.message);
        if let Some(hint) = e.troubleshooting_hint() {
            eprintln!("Hint: {}", hint);
        }
        log::debug!("{} failure: {:?}", e.severity().label(), e);
        std::process::exit(1);
    }
}
