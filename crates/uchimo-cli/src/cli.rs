//! Command line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// uchimo operator tool
#[derive(Debug, Parser)]
#[command(name = "uchimo", author, version, about)]
pub struct Cli {
    /// Config file to read instead of `config/uchimo.toml`
    #[arg(long, short, global = true, env = "UCHIMO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply pending database migrations
    Migrate {
        /// Directory holding the migration files
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Create the starter threads that do not exist yet
    Seed,

    /// Reset reaction counters of posts to their record counts
    Recount {
        /// Post ids to recount
        #[arg(required = true)]
        post_ids: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_recount() {
        let cli = Cli::try_parse_from(["uchimo", "recount", "p1", "p2"]).unwrap();
        match cli.command {
            Command::Recount { post_ids } => assert_eq!(post_ids, vec!["p1", "p2"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_recount_needs_ids() {
        assert!(Cli::try_parse_from(["uchimo", "recount"]).is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["uchimo", "migrate", "--config", "ops/uchimo.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("ops/uchimo.toml")));
        assert!(matches!(cli.command, Command::Migrate { dir: None }));
    }
}
