use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use csvsync::{app::run_app, cmd::Cli, config::Config, logger, terminal::wait_for_keypress};

/// Unrecovered file or database failure.
const EXIT_RUNTIME: u8 = 1;
/// Unreadable or invalid configuration.
const EXIT_CONFIG: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => cli.apply(config),
        Err(err) => {
            eprintln!("{:?}", err);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    if let Err(err) = logger::init(config.log_file.as_deref()) {
        eprintln!("failed to open log file: {err}");
        return ExitCode::from(EXIT_CONFIG);
    }

    let code = match run_app(&config) {
        Ok(summary) => {
            if !summary.diagnostics.is_empty() {
                info!("{} row(s) reported problems.", summary.diagnostics.len());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{:?}", err);
            error!("fatal error: {:?}", err);
            ExitCode::from(EXIT_RUNTIME)
        }
    };
    log::logger().flush();

    if config.pause_on_exit {
        if let Err(err) = wait_for_keypress("Press any key to exit...") {
            error!("failed to wait for key press: {err}");
        }
    }

    code
}
