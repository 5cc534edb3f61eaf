//! Command-line interface for taskbot
//!
//! Plays the part of the chat platform's dispatcher: each run builds one
//! invocation from the global identity flags and hands it to the bot.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::Command;
use crate::error::{Error, Result};
use crate::output::OutputOptions;

mod bot;
mod init;

/// Environment variable holding the bot token
pub const TOKEN_ENV: &str = "DISCORD_TOKEN";

/// taskbot - personal to-do tracking with points, ranks and a reward role
#[derive(Parser, Debug)]
#[command(name = "taskbot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding .taskbot.toml and the state files (defaults to current directory)
    #[arg(long, global = true, env = "TASKBOT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Platform user id of the invoking user
    #[arg(long, global = true, env = "TASKBOT_USER")]
    pub user: Option<u64>,

    /// Display name of the invoking user
    #[arg(long, global = true, env = "TASKBOT_NAME")]
    pub name: Option<String>,

    /// Invoke with administrator permission
    #[arg(long, global = true)]
    pub admin: bool,

    /// Bot token
    #[arg(long, global = true, env = TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task description
        #[arg(required = true, num_args = 1..)]
        task: Vec<String>,
    },

    /// List your tasks and progress
    List,

    /// Mark a task as done
    Done {
        /// Task number as shown by `list`
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },

    /// Remove a task without marking it done
    Remove {
        /// Task number as shown by `list`
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },

    /// (Admin) Show all users' tasks
    Showall,

    /// Show your rank and stats
    Rank,

    /// Write a default .taskbot.toml into the data directory
    Init,
}

impl Commands {
    fn into_bot_command(self) -> Option<Command> {
        Some(match self {
            Commands::Add { task } => Command::Add {
                task: task.join(" "),
            },
            Commands::List => Command::List,
            Commands::Done { index } => Command::Done { index },
            Commands::Remove { index } => Command::Remove { index },
            Commands::Showall => Command::ShowAll,
            Commands::Rank => Command::Rank,
            Commands::Init => return None,
        })
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let data_dir = match self.data_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        let Some(command) = self.command.into_bot_command() else {
            return init::run(&data_dir, output);
        };

        require_token(self.token.as_deref())?;
        let user_id = self.user.ok_or_else(|| {
            Error::InvalidArgument("--user (or TASKBOT_USER) is required".to_string())
        })?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(bot::run(bot::BotOptions {
            data_dir,
            user_id,
            name: self.name,
            admin: self.admin,
            command,
            output,
        }))
    }
}

/// The token must be present and non-blank before any command runs.
fn require_token(token: Option<&str>) -> Result<&str> {
    match token.map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(Error::MissingToken(TOKEN_ENV.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_is_missing() {
        assert!(matches!(require_token(None), Err(Error::MissingToken(_))));
        assert!(matches!(require_token(Some("  ")), Err(Error::MissingToken(_))));
        assert_eq!(require_token(Some(" abc ")).unwrap(), "abc");
    }

    #[test]
    fn parses_multi_word_task() {
        let cli = Cli::try_parse_from(["taskbot", "--user", "7", "add", "buy", "oat", "milk"]).unwrap();
        assert_eq!(cli.user, Some(7));
        assert_eq!(
            cli.command.into_bot_command(),
            Some(Command::Add {
                task: "buy oat milk".to_string()
            })
        );
    }

    #[test]
    fn negative_index_reaches_handler() {
        let cli = Cli::try_parse_from(["taskbot", "done", "-1"]).unwrap();
        assert_eq!(cli.command.into_bot_command(), Some(Command::Done { index: -1 }));
    }
}
