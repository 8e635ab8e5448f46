use bookpanel::cli::commands::{Cli, Commands};
use bookpanel::cli::handlers;
use bookpanel::util::logging;
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init(args)) => {
            // Init runs before any config exists
            logging::init_stderr();
            if let Err(e) = handlers::cmd_init(args) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        _ => {
            // No subcommand → TUI, anything else → CLI command
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
