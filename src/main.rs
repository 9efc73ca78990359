use std::io::IsTerminal;
use std::path::Path;

use clap::{Arg, ArgAction, Command};
use owo_colors::OwoColorize;
use tracing::Level;

use response_view::config::Config;
use response_view::content;
use response_view::exchange::Exchange;
use response_view::output::annotations::summary_titles;

mod editor;

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("response-view")
        .version(VERSION)
        .propagate_version(true)
        .author("Andrew Cowie")
        .about("Display HTTP responses in your editor.")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("debug")
                .long("debug")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log everything, written to standard error."),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("A JSON file with settings to use instead of the defaults."),
        )
        .subcommand(
            Command::new("server")
                .about("Run as a language server, talking to an editor over standard input and output"),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show what a result document for the given exchange would contain")
                .arg(
                    Arg::new("raw-control-chars")
                        .short('R')
                        .long("raw-control-chars")
                        .action(ArgAction::SetTrue)
                        .help("Emit ANSI escape codes for colour even if output is redirected to a pipe or file."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the exchange, as JSON."),
                ),
        )
        .get_matches();

    let level = if matches.get_flag("debug") {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = match matches.get_one::<String>("config") {
        Some(filename) => match Config::load(Path::new(filename)) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("{}: {}", "error".bright_red(), error);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    match matches.subcommand() {
        Some(("server", _)) => {
            if let Err(error) = editor::run_language_server(config) {
                eprintln!("{}: {}", "error".bright_red(), error);
                std::process::exit(1);
            }
        }
        Some(("inspect", submatches)) => {
            let raw = submatches.get_flag("raw-control-chars");
            if let Some(filename) = submatches.get_one::<String>("filename") {
                inspect(Path::new(filename), &config, raw || std::io::stdout().is_terminal());
            }
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: response-view [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn inspect(filename: &Path, config: &Config, colour: bool) {
    let exchange = std::fs::read_to_string(filename)
        .map_err(|error| error.to_string())
        .and_then(|content| {
            serde_json::from_str::<Exchange>(&content).map_err(|error| error.to_string())
        });

    let exchange = match exchange {
        Ok(exchange) => exchange,
        Err(error) => {
            eprintln!(
                "{}: Unable to read exchange from {}: {}",
                "error".bright_red(),
                filename.display(),
                error
            );
            std::process::exit(1);
        }
    };

    for title in summary_titles(&exchange, &config.settings.response_view_header) {
        if colour {
            println!("{}", title.bright_blue().bold());
        } else {
            println!("{}", title);
        }
    }
    println!();

    let selection = content::select(&exchange, &config.settings);
    print!("{}", selection.text());
}
