//! Contract with the chat platform.
//!
//! The dispatcher supplies an [`Invocation`] per command, delivers the
//! returned [`Reply`], and exposes role management through [`Guild`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Who invoked a command, as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub user_id: u64,
    pub user_name: String,
    /// Administrator permission in the invoking guild.
    pub is_admin: bool,
}

impl Invocation {
    pub fn new(user_id: u64, user_name: impl Into<String>) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
            is_admin: false,
        }
    }

    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    /// Store key for this user.
    pub fn key(&self) -> String {
        self.user_id.to_string()
    }

    pub fn mention(&self) -> String {
        format!("<@{}>", self.user_id)
    }
}

/// Messages to deliver for one invocation, in order.
///
/// `deferred` marks replies sent as an acknowledgement followed by
/// followup messages rather than a single immediate response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub deferred: bool,
    pub messages: Vec<String>,
}

impl Reply {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            deferred: false,
            messages: vec![text.into()],
        }
    }

    pub fn deferred() -> Self {
        Self {
            deferred: true,
            messages: Vec::new(),
        }
    }

    pub fn followup(&mut self, text: impl Into<String>) {
        self.messages.push(text.into());
    }

    /// All messages joined by blank lines.
    pub fn text(&self) -> String {
        self.messages.join("\n\n")
    }
}

/// A guild role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: u64,
    pub name: String,
}

/// Role and member lookups against the guild a command ran in.
#[async_trait]
pub trait Guild: Send {
    async fn find_role(&self, name: &str) -> Result<Option<Role>>;

    async fn create_role(&mut self, name: &str) -> Result<Role>;

    async fn member_has_role(&self, user_id: u64, role: &Role) -> Result<bool>;

    async fn add_role(&mut self, user_id: u64, role: &Role) -> Result<()>;

    /// Display name for a user, if the platform knows one.
    async fn display_name(&self, user_id: u64) -> Result<Option<String>>;
}
