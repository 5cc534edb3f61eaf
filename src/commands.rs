//! Command handlers.
//!
//! Each handler takes the invoking user and returns the [`Reply`] to deliver.
//! Mutating handlers save the store before replying, so a success message
//! always describes state that is already on disk.

use std::fmt::Write as _;

use tracing::Instrument;

use crate::config::Config;
use crate::error::Result;
use crate::format::{progress_bar, rank, truncate_chars};
use crate::notifier::RewardNotifier;
use crate::platform::{Guild, Invocation, Reply};
use crate::store::{Store, UserRecord};

pub const INVALID_TASK_NUMBER: &str = "❌ Invalid task number.";
pub const EMPTY_TASK_TEXT: &str = "❌ Task text cannot be empty.";
pub const NO_TASKS: &str = "📭 You have no tasks yet.";
pub const NO_USERS: &str = "📭 No users found.";
pub const ADMIN_ONLY: &str = "🚫 You must be an admin to use this.";

/// A user-facing command with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { task: String },
    List,
    Done { index: i64 },
    Remove { index: i64 },
    ShowAll,
    Rank,
}

impl Command {
    /// Name the command is registered under on the platform.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Add { .. } => "todo_add",
            Command::List => "todo_list",
            Command::Done { .. } => "todo_done",
            Command::Remove { .. } => "todo_remove",
            Command::ShowAll => "todo_showall",
            Command::Rank => "todo_rank",
        }
    }
}

pub struct TodoBot {
    store: Store,
    notifier: RewardNotifier,
    showall_max_chars: usize,
}

impl TodoBot {
    pub fn new(store: Store, config: &Config) -> Self {
        Self {
            store,
            notifier: RewardNotifier::from_config(&config.reward),
            showall_max_chars: config.showall_max_chars,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Route one invocation to its handler.
    pub async fn dispatch<G: Guild + ?Sized>(
        &mut self,
        guild: &mut G,
        who: &Invocation,
        command: Command,
    ) -> Result<Reply> {
        let span = tracing::info_span!("command", name = command.name(), user = who.user_id);
        async move {
            match command {
                Command::Add { task } => self.add(who, &task),
                Command::List => Ok(self.list(who)),
                Command::Done { index } => self.done(guild, who, index).await,
                Command::Remove { index } => self.remove(who, index),
                Command::ShowAll => self.show_all(guild, who).await,
                Command::Rank => Ok(self.rank(who)),
            }
        }
        .instrument(span)
        .await
    }

    pub fn add(&mut self, who: &Invocation, task: &str) -> Result<Reply> {
        if task.trim().is_empty() {
            tracing::warn!(user = who.user_id, "rejected empty task");
            return Ok(Reply::message(EMPTY_TASK_TEXT));
        }

        let pending = self.store.add_task(&who.key(), task).tasks.len();
        self.store.save()?;
        tracing::info!(user = who.user_id, pending, "task added");
        Ok(Reply::message(format!("📝 Task added: **{task}**")))
    }

    pub fn list(&self, who: &Invocation) -> Reply {
        let record = self.store.peek(&who.key());
        if record.tasks.is_empty() {
            return Reply::message(NO_TASKS);
        }

        let numbered = record
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| format!("{}. {task}", i + 1))
            .collect::<Vec<_>>()
            .join("\n");
        Reply::message(format!(
            "📋 **Your Tasks:**\n{numbered}\n\n📊 {}",
            record_progress(&record)
        ))
    }

    /// Complete task `index` (1-based), then check for the reward role.
    ///
    /// Replies as a deferred response since the role check may call out to
    /// the platform after the confirmation is ready. Platform failures during
    /// the role check are logged and leave the confirmation in place.
    pub async fn done<G: Guild + ?Sized>(
        &mut self,
        guild: &mut G,
        who: &Invocation,
        index: i64,
    ) -> Result<Reply> {
        let mut reply = Reply::deferred();

        let Some((task, points)) = self.store.complete_task(&who.key(), index) else {
            tracing::warn!(user = who.user_id, index, "rejected completion");
            reply.followup(INVALID_TASK_NUMBER);
            return Ok(reply);
        };
        self.store.save()?;
        tracing::info!(user = who.user_id, points, "task completed");

        reply.followup(format!(
            "✅ Completed: **{task}**\n🏆 You earned **+1 point!**"
        ));

        // The completion is already saved; a failed role grant must not
        // swallow its confirmation.
        match self.notifier.check(guild, who, points).await {
            Ok(Some(grant)) => reply.followup(grant.message),
            Ok(None) => {}
            Err(err) => {
                tracing::error!(user = who.user_id, points, error = %err, "reward role grant failed");
            }
        }
        Ok(reply)
    }

    pub fn remove(&mut self, who: &Invocation, index: i64) -> Result<Reply> {
        let Some(task) = self.store.remove_task(&who.key(), index) else {
            tracing::warn!(user = who.user_id, index, "rejected removal");
            return Ok(Reply::message(INVALID_TASK_NUMBER));
        };
        self.store.save()?;
        tracing::info!(user = who.user_id, "task removed");
        Ok(Reply::message(format!("🗑️ Removed: **{task}**")))
    }

    /// Every user's rank, points, pending tasks and progress. Admins only.
    pub async fn show_all<G: Guild + ?Sized>(&self, guild: &G, who: &Invocation) -> Result<Reply> {
        if !who.is_admin {
            tracing::warn!(user = who.user_id, "non-admin asked for overview");
            return Ok(Reply::message(ADMIN_ONLY));
        }
        if self.store.is_empty() {
            return Ok(Reply::message(NO_USERS));
        }

        let mut msg = String::new();
        for (user_id, record) in self.store.users() {
            let name = match user_id.parse::<u64>() {
                Ok(id) => guild.display_name(id).await?,
                Err(_) => None,
            }
            .unwrap_or_else(|| user_id.to_string());

            let _ = writeln!(
                msg,
                "**{name}** — {} ({} pts)",
                rank(record.points),
                record.points
            );
            if record.tasks.is_empty() {
                msg.push_str("No active tasks.");
            } else {
                let bullets = record
                    .tasks
                    .iter()
                    .map(|task| format!("• {task}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                msg.push_str(&bullets);
            }
            let _ = write!(msg, "\n📊 {}\n\n", record_progress(record));
        }

        Ok(Reply::message(truncate_chars(&msg, self.showall_max_chars)))
    }

    pub fn rank(&self, who: &Invocation) -> Reply {
        let record = self.store.peek(&who.key());
        Reply::message(format!(
            "🏅 **{}** — {}\n⭐ **Points:** {}\n📊 {}",
            who.user_name,
            rank(record.points),
            record.points,
            record_progress(&record)
        ))
    }
}

fn record_progress(record: &UserRecord) -> String {
    progress_bar(record.done.len(), record.total())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::guild::LocalGuild;
    use crate::platform::Role;
    use async_trait::async_trait;
    use tempfile::TempDir;

    /// Guild that refuses to create or assign roles.
    struct DenyingGuild;

    #[async_trait]
    impl Guild for DenyingGuild {
        async fn find_role(&self, _name: &str) -> Result<Option<Role>> {
            Ok(None)
        }

        async fn create_role(&mut self, _name: &str) -> Result<Role> {
            Err(Error::Platform("create denied".to_string()))
        }

        async fn member_has_role(&self, _user_id: u64, _role: &Role) -> Result<bool> {
            Ok(false)
        }

        async fn add_role(&mut self, _user_id: u64, _role: &Role) -> Result<()> {
            Err(Error::Platform("assign denied".to_string()))
        }

        async fn display_name(&self, _user_id: u64) -> Result<Option<String>> {
            Ok(None)
        }
    }

    fn bot() -> TodoBot {
        TodoBot::new(Store::in_memory(), &Config::default())
    }

    fn ada() -> Invocation {
        Invocation::new(1, "ada")
    }

    #[test]
    fn add_then_list_shows_task_first() {
        let mut bot = bot();
        let reply = bot.add(&ada(), "buy milk").unwrap();
        assert_eq!(reply.text(), "📝 Task added: **buy milk**");
        assert!(!reply.deferred);

        let list = bot.list(&ada());
        assert_eq!(
            list.text(),
            "📋 **Your Tasks:**\n1. buy milk\n\n📊 ▯▯▯▯▯▯▯▯▯▯  0/1 (0%)"
        );
    }

    #[test]
    fn blank_task_is_rejected() {
        let mut bot = bot();
        assert_eq!(bot.add(&ada(), "   ").unwrap().text(), EMPTY_TASK_TEXT);
        assert!(bot.store().is_empty());
    }

    #[test]
    fn list_and_rank_do_not_create_records() {
        let bot = bot();
        assert_eq!(bot.list(&ada()).text(), NO_TASKS);
        assert_eq!(
            bot.rank(&ada()).text(),
            "🏅 **ada** — 🐣 Beginner\n⭐ **Points:** 0\n📊 No tasks yet!"
        );
        assert!(bot.store().is_empty());
    }

    #[tokio::test]
    async fn done_moves_task_and_awards_point() {
        let mut bot = bot();
        let mut guild = LocalGuild::in_memory();
        bot.add(&ada(), "buy milk").unwrap();

        let reply = bot.done(&mut guild, &ada(), 1).await.unwrap();
        assert!(reply.deferred);
        assert_eq!(
            reply.messages,
            vec!["✅ Completed: **buy milk**\n🏆 You earned **+1 point!**".to_string()]
        );

        let record = bot.store().get("1").unwrap();
        assert!(record.tasks.is_empty());
        assert_eq!(record.done, vec!["buy milk".to_string()]);
        assert_eq!(record.points, 1);
        assert_eq!(bot.list(&ada()).text(), NO_TASKS);
    }

    #[tokio::test]
    async fn invalid_indexes_are_rejected_without_change() {
        let mut bot = bot();
        let mut guild = LocalGuild::in_memory();

        let reply = bot.done(&mut guild, &ada(), 1).await.unwrap();
        assert_eq!(reply.text(), INVALID_TASK_NUMBER);
        assert_eq!(bot.remove(&ada(), 1).unwrap().text(), INVALID_TASK_NUMBER);
        assert!(bot.store().is_empty());

        bot.add(&ada(), "only").unwrap();
        let before = bot.store().peek("1");
        for index in [0, 2, -3] {
            let reply = bot.done(&mut guild, &ada(), index).await.unwrap();
            assert_eq!(reply.text(), INVALID_TASK_NUMBER);
            assert_eq!(bot.remove(&ada(), index).unwrap().text(), INVALID_TASK_NUMBER);
        }
        assert_eq!(bot.store().peek("1"), before);
    }

    #[test]
    fn remove_drops_task_without_points() {
        let mut bot = bot();
        bot.add(&ada(), "a").unwrap();
        bot.add(&ada(), "b").unwrap();

        assert_eq!(bot.remove(&ada(), 1).unwrap().text(), "🗑️ Removed: **a**");
        let record = bot.store().get("1").unwrap();
        assert_eq!(record.tasks, vec!["b".to_string()]);
        assert!(record.done.is_empty());
        assert_eq!(record.points, 0);
    }

    #[tokio::test]
    async fn reward_role_granted_exactly_once() {
        let mut bot = bot();
        let mut guild = LocalGuild::in_memory();
        let mut congrats = 0;

        for n in 0..12 {
            bot.add(&ada(), &format!("task {n}")).unwrap();
            let reply = bot.done(&mut guild, &ada(), 1).await.unwrap();
            let granted = reply.messages.iter().any(|m| m.starts_with("🎉 Congrats <@1>!"));
            if granted {
                congrats += 1;
                assert_eq!(n, 9, "grant should fire on the tenth completion");
            }
        }

        assert_eq!(congrats, 1);
        assert_eq!(bot.store().get("1").unwrap().points, 12);
        let role = guild.find_role("Task Master").await.unwrap().unwrap();
        assert!(guild.member_has_role(1, &role).await.unwrap());
    }

    #[tokio::test]
    async fn show_all_requires_admin() {
        let bot = bot();
        let guild = LocalGuild::in_memory();
        let reply = bot.show_all(&guild, &ada()).await.unwrap();
        assert_eq!(reply.text(), ADMIN_ONLY);

        let reply = bot.show_all(&guild, &ada().admin()).await.unwrap();
        assert_eq!(reply.text(), NO_USERS);
    }

    #[tokio::test]
    async fn show_all_lists_every_user() {
        let mut bot = bot();
        let mut guild = LocalGuild::in_memory();
        guild.remember_member(1, "ada").unwrap();
        let bob = Invocation::new(2, "bob");

        bot.add(&ada(), "buy milk").unwrap();
        bot.add(&bob, "ship it").unwrap();
        bot.done(&mut guild, &bob, 1).await.unwrap();

        let reply = bot.show_all(&guild, &ada().admin()).await.unwrap();
        assert_eq!(
            reply.text(),
            "**ada** — 🐣 Beginner (0 pts)\n• buy milk\n📊 ▯▯▯▯▯▯▯▯▯▯  0/1 (0%)\n\n\
             **2** — 🐣 Beginner (1 pts)\nNo active tasks.\n📊 ▮▮▮▮▮▮▮▮▮▮  1/1 (100%)\n\n"
        );
    }

    #[tokio::test]
    async fn show_all_is_truncated() {
        let mut config = Config::default();
        config.showall_max_chars = 12;
        let mut bot = TodoBot::new(Store::in_memory(), &config);
        let guild = LocalGuild::in_memory();
        bot.add(&ada(), "a long task description").unwrap();

        let reply = bot.show_all(&guild, &ada().admin()).await.unwrap();
        assert_eq!(reply.text().chars().count(), 12);
    }

    #[tokio::test]
    async fn mutations_are_saved_before_reply() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        let mut bot = TodoBot::new(Store::load(&path).unwrap(), &Config::default());
        let mut guild = LocalGuild::in_memory();

        bot.dispatch(&mut guild, &ada(), Command::Add { task: "buy milk".into() })
            .await
            .unwrap();
        assert_eq!(Store::load(&path).unwrap().peek("1").tasks.len(), 1);

        bot.dispatch(&mut guild, &ada(), Command::Done { index: 1 })
            .await
            .unwrap();
        let on_disk = Store::load(&path).unwrap().peek("1");
        assert_eq!(on_disk.done, vec!["buy milk".to_string()]);
        assert_eq!(on_disk.points, 1);
    }

    #[tokio::test]
    async fn failed_role_grant_keeps_confirmation() {
        let mut config = Config::default();
        config.reward.threshold = 1;
        let mut bot = TodoBot::new(Store::in_memory(), &config);
        bot.add(&ada(), "buy milk").unwrap();

        let reply = bot.done(&mut DenyingGuild, &ada(), 1).await.unwrap();
        assert!(reply.deferred);
        assert_eq!(
            reply.messages,
            vec!["✅ Completed: **buy milk**\n🏆 You earned **+1 point!**".to_string()]
        );

        let record = bot.store().get("1").unwrap();
        assert!(record.tasks.is_empty());
        assert_eq!(record.done, vec!["buy milk".to_string()]);
        assert_eq!(record.points, 1);
    }

    #[test]
    fn add_keeps_task_text_as_given() {
        let mut bot = bot();
        let reply = bot.add(&ada(), "  buy milk ").unwrap();
        assert_eq!(reply.text(), "📝 Task added: **  buy milk **");
        assert_eq!(bot.store().get("1").unwrap().tasks, vec!["  buy milk ".to_string()]);
    }
}
