use clap::{Parser, Subcommand};

use crate::cli::{discover, session};

/// Eventgate command
#[derive(Parser, Debug)]
#[command(version, propagate_version = true, subcommand_required = true)]
pub struct EventgateCommand {
    /// Subcommand
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Drive the navigation shell interactively
    Session(session::SessionCommand),
    /// List events the way the discover page shows them
    Discover(discover::DiscoverCommand),
}

impl Command {
    pub async fn run(self) -> crate::Result<()> {
        match self {
            Command::Session(session) => session.run().await,
            Command::Discover(discover) => discover.run().await,
        }
    }
}

/// Parse command line args
pub fn parse() -> EventgateCommand {
    EventgateCommand::parse()
}
