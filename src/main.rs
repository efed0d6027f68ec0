//! ytloop - YouTube Looper
//!
//! Binary entry point: parses the command line, sets up logging and
//! dispatches to the command handlers.

mod commands;

use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;

use ytloop::cli::{Cli, Commands, ConfigCommands, PlayArgs};
use ytloop::current_theme;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        let theme = current_theme();
        eprintln!("{}", theme.error_text(&format!("Error: {}", e)));
        for cause in e.chain().skip(1) {
            eprintln!("{}", theme.secondary_text(&format!("  caused by: {}", cause)));
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Completions and config never need the log file
    let needs_log = matches!(cli.command, None | Some(Commands::Play(_)));
    if needs_log {
        // The looper still works if the log file can't be opened
        if let Err(e) = ytloop::logging::init(cli.verbose) {
            eprintln!("Warning: logging disabled: {:#}", e);
        }
    }

    match cli.command {
        None => commands::play::handle(PlayArgs::default()),
        Some(Commands::Play(args)) => commands::play::handle(args),
        Some(Commands::Link(args)) => commands::link::handle(args),
        Some(Commands::Config(cmd)) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(),
            ConfigCommands::Edit => commands::config::handle_edit(),
            ConfigCommands::Migrate => commands::config::handle_migrate(),
        },
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "ytloop", &mut io::stdout());
            Ok(())
        }
    }
}
