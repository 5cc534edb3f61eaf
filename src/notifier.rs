//! Reward role grants after a completed task.
//!
//! Whether the user already holds the role is the only guard; nothing is
//! recorded locally. If the role is taken away on the platform side, the
//! next completion at or above the threshold grants it again.

use crate::config::RewardConfig;
use crate::error::Result;
use crate::platform::{Guild, Invocation, Role};

/// Outcome of a grant that actually happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub role: Role,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct RewardNotifier {
    role_name: String,
    threshold: u64,
}

impl RewardNotifier {
    pub fn new(role_name: impl Into<String>, threshold: u64) -> Self {
        Self {
            role_name: role_name.into(),
            threshold,
        }
    }

    pub fn from_config(config: &RewardConfig) -> Self {
        Self::new(config.role_name.clone(), config.threshold)
    }

    /// Grant the reward role if `points` qualifies and the user lacks it.
    ///
    /// The role is created on first use.
    pub async fn check<G: Guild + ?Sized>(
        &self,
        guild: &mut G,
        who: &Invocation,
        points: u64,
    ) -> Result<Option<Grant>> {
        if points < self.threshold {
            return Ok(None);
        }

        let role = match guild.find_role(&self.role_name).await? {
            Some(role) => role,
            None => guild.create_role(&self.role_name).await?,
        };

        if guild.member_has_role(who.user_id, &role).await? {
            tracing::debug!(user = who.user_id, role = %role.name, "reward role already held");
            return Ok(None);
        }

        guild.add_role(who.user_id, &role).await?;
        tracing::info!(user = who.user_id, role = %role.name, points, "granted reward role");

        let message = format!(
            "🎉 Congrats {}! You’ve earned the **{}** role!",
            who.mention(),
            role.name
        );
        Ok(Some(Grant {
            role,
            message,
        }))
    }
}
