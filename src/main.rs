mod alerts;
mod api;
mod cli;
mod config;
mod dashboard;
mod db;
mod error;
mod logging;
mod seed;
mod server;

use cli::Cli;
use config::{Config, CONFIG};
use log::{debug, error};

fn main() {
    let project_dirs = match Config::project_dirs() {
        Ok(dirs) => dirs,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    let config = Config::load_config(&project_dirs);
    let _logger = match logging::setup_logging(&project_dirs, &config.logging) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("{}. Continuing without file logging.", err);
            None
        }
    };

    if CONFIG.set(config).is_err() {
        eprintln!("Configuration was already initialized");
        std::process::exit(1);
    }

    debug!("Command-line args: {:?}", std::env::args_os().collect::<Vec<_>>());

    if let Err(err) = Cli::handle_command_line() {
        error!("{:?}", err);
        eprintln!("{}", err);
        if err.is_config_error() {
            eprintln!(
                "Configuration is read from {} and SOCDASH_* environment variables",
                project_dirs.data_local_dir().join("config.toml").display()
            );
        }
        std::process::exit(1);
    }
}
