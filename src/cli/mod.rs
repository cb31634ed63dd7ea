//! CLI module for Atelier
//!
//! Provides commands:
//! - `serve`: Start the HTTP/WebSocket server
//! - `suggest`: Print user suggestions as JSON

use clap::{Parser, Subcommand};

pub mod suggest;

/// Atelier CLI
#[derive(Parser, Debug)]
#[command(name = "atelier")]
#[command(about = "Layered painting canvas with a social graph")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server
    Serve,
    /// Print users sharing a user's interests
    Suggest {
        /// Requesting user ID
        user_id: String,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Serve) => crate::server::run().await,
        Some(Commands::Suggest { user_id }) => suggest::run(&user_id).await,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suggest() {
        let cli = Cli::try_parse_from(["atelier", "suggest", "user-1"]).unwrap();
        match cli.command {
            Some(Commands::Suggest { user_id }) => assert_eq!(user_id, "user-1"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["atelier"]).unwrap();
        assert!(cli.command.is_none());
    }
}
