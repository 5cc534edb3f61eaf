//! Runs one bot command against the local store and guild.

use std::path::PathBuf;

use crate::commands::{Command, TodoBot};
use crate::config::Config;
use crate::error::Result;
use crate::guild::LocalGuild;
use crate::output::{emit_reply, OutputOptions};
use crate::platform::{Guild, Invocation};
use crate::store::Store;

pub struct BotOptions {
    pub data_dir: PathBuf,
    pub user_id: u64,
    pub name: Option<String>,
    pub admin: bool,
    pub command: Command,
    pub output: OutputOptions,
}

pub async fn run(options: BotOptions) -> Result<()> {
    let config = Config::load_from_dir(&options.data_dir)?;
    let store = Store::load(config.data_path(&options.data_dir))?;
    let mut guild = LocalGuild::load(config.guild_path(&options.data_dir))?;

    let name = match options.name {
        Some(name) => name,
        None => guild
            .display_name(options.user_id)
            .await?
            .unwrap_or_else(|| options.user_id.to_string()),
    };
    guild.remember_member(options.user_id, &name)?;

    let mut who = Invocation::new(options.user_id, name);
    if options.admin {
        who = who.admin();
    }

    let command_name = options.command.name();
    let mut bot = TodoBot::new(store, &config);
    let reply = bot.dispatch(&mut guild, &who, options.command).await?;
    emit_reply(options.output, command_name, &reply)
}
