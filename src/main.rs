use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod commands;
mod config;
mod conversation;
mod core;
mod display;
mod fetchers;
mod input;
mod plugins;
mod utils;

use crate::app::Application;
use crate::cli::Args;
use crate::commands::create_command_registry;
use crate::config::Config;
use crate::core::error::ChatError;
use crate::fetchers::{HttpFetcher, JsonFetch, OfflineFetcher};
use crate::plugins::create_plugin_registry;

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), ChatError> {
    let args = Args::parse();
    init_tracing(args.debug);

    let mut config = Config::load()?;
    config.apply_args(&args);

    let fetch: Arc<dyn JsonFetch> = if config.offline {
        Arc::new(OfflineFetcher)
    } else {
        Arc::new(HttpFetcher::new(config.request_timeout())?)
    };

    let plugins = create_plugin_registry(&config, fetch)?;
    let commands = create_command_registry();

    let app = Application::new(plugins, commands, Config::history_dir());
    app.run(args.query).await
}
