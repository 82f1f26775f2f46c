//! Main application entry point (native).

use clap::Parser;
use courtboard_app::{App, AppConfig, Cli};

fn main() {
    env_logger::init();
    log::info!("Starting Courtboard");

    let config = AppConfig::from(Cli::parse());
    if let Err(err) = pollster::block_on(App::with_config(config).run()) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
