mod actions;
mod app;
mod collectors;
mod config;
mod error;
mod input;
mod logging;
mod models;
mod monitor;
mod platform;
mod ui;
mod util;

use anyhow::Result;
use app::{App, Services};
use clap::Parser;
use std::io;

#[derive(Parser, Debug)]
#[command(
    name = "mystation",
    about = "Menu-driven workstation monitor: disks, memory, CPU, processes and maintenance",
    version
)]
struct Cli {}

fn main() -> Result<()> {
    let _cli = Cli::parse();

    let config = config::Config::load();
    logging::init(&config);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?config::Config::config_path(),
        "mystation starting"
    );

    let theme = ui::theme::Theme::for_variant(ui::theme::ThemeVariant::from_name(&config.appearance.theme));
    let services = Services::detect();
    if services.metrics.is_none() {
        tracing::warn!("system metrics are not supported on this host");
    }
    if services.charts.is_none() {
        tracing::warn!("stdout is not a terminal; charts disabled");
    }

    let stdin = io::stdin();
    let mut app = App::new(config, theme, services, stdin.lock(), io::stdout());
    let result = app.run();
    if let Err(e) = &result {
        tracing::error!(error = %e, "session ended with an error");
    }
    result
}
