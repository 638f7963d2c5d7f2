use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

mod config;
mod dn;
mod error;
mod key;
mod output;
mod user_id;
mod utils;

use crate::config::Settings;
use crate::dn::DnCommands;
use crate::error::Result;
use crate::key::KeyCommands;

#[derive(Parser)]
#[command(name = "keyview")]
#[command(about = "Display Distinguished Names, user IDs and key listings", long_about = None)]
struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true, env = "KEYVIEW_CONFIG")]
    config: Option<PathBuf>,

    /// Display charset, e.g. utf-8 or iso-8859-1
    #[arg(long, global = true)]
    charset: Option<String>,

    /// More log output on stderr (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Distinguished Name operations
    Dn {
        #[command(subcommand)]
        command: DnCommands,
    },
    /// Display a key user ID
    UserId {
        #[command(flatten)]
        config: user_id::Config,
    },
    /// Key listing operations
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref(), cli.charset.as_deref())?;

    match cli.command {
        Commands::Dn { command } => match command {
            DnCommands::Parse { config } => {
                dn::parse::execute(config)?;
            }
            DnCommands::Render { config } => {
                dn::render::execute(config, &settings)?;
            }
            DnCommands::Encode { config } => {
                dn::encode::execute(config)?;
            }
        },
        Commands::UserId { config } => {
            user_id::execute(config, &settings)?;
        }
        Commands::Key { command } => match command {
            KeyCommands::List { config } => {
                key::list::execute(config, &settings)?;
            }
            KeyCommands::Inspect { config } => {
                key::inspect::execute(config, &settings)?;
            }
            KeyCommands::Select { config } => {
                key::select::execute(config, &settings)?;
            }
        },
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("keyview: {err}");
            ExitCode::FAILURE
        }
    }
}
