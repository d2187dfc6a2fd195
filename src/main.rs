use clap::Parser;
use grain::cli::commands::Cli;
use grain::cli::handlers;
use grain::io::config_io;
use grain::logging;

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = config_io::resolve_data_dir(cli.data_dir.as_deref())?;
    let config = config_io::read_config(&data_dir)?;

    match cli.command {
        None => {
            // No subcommand → launch TUI
            let level = cli
                .log_level
                .as_deref()
                .or(config.log.level.as_deref())
                .unwrap_or(logging::DEFAULT_LOG_LEVEL);
            let _logger = logging::init_file_logging(level, &data_dir.join("logs"))?;
            grain::tui::run(&data_dir, &config)
        }
        Some(command) => {
            // One-shot commands only report problems unless asked for more
            let level = cli.log_level.as_deref().unwrap_or("warn");
            let _logger = logging::init_stderr_logging(level)?;
            handlers::dispatch(command, cli.json, &data_dir)
        }
    }
}
