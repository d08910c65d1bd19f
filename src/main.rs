//! src/main.rs
//!
//! Entrypoint: error reporting, configuration and logging, then `app::run()`.

mod app;
mod config;
mod feed;
mod layout;
mod logging;
mod net;
mod panels;
mod term;
mod ui;

use clap::Parser;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = config::AppConfig::parse();
    let log_dir = logging::init();
    tracing::info!(?config, "starting splitdeck");
    app::run(config, log_dir)
}
