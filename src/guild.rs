//! File-backed guild used when running commands locally.
//!
//! Holds the roles that exist, who holds them and the display names of
//! members seen so far:
//!
//! ```text
//! {
//!   "roles": [{ "id": 1, "name": "Task Master" }],
//!   "members": { "1234": { "name": "ada", "roles": [1] } }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};
use crate::platform::{Guild, Role};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub roles: Vec<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct GuildState {
    #[serde(default)]
    roles: Vec<Role>,
    #[serde(default)]
    members: BTreeMap<String, Member>,
}

#[derive(Debug, Clone, Default)]
pub struct LocalGuild {
    path: Option<PathBuf>,
    state: GuildState,
}

impl LocalGuild {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load guild state from `path`; a missing file is an empty guild.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path: Some(path),
                state: GuildState::default(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let state = serde_json::from_str(&content)?;
        Ok(Self {
            path: Some(path),
            state,
        })
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.state)?;
        lock::write_atomic_locked(path, json.as_bytes(), DEFAULT_LOCK_TIMEOUT_MS)
    }

    /// Record the name the platform reported for a member.
    pub fn remember_member(&mut self, user_id: u64, name: &str) -> Result<()> {
        let member = self.state.members.entry(user_id.to_string()).or_default();
        if member.name == name {
            return Ok(());
        }
        member.name = name.to_string();
        self.save()
    }

    /// Take a role away, as a guild admin would by hand.
    pub fn remove_role(&mut self, user_id: u64, role: &Role) -> Result<bool> {
        let Some(member) = self.state.members.get_mut(&user_id.to_string()) else {
            return Ok(false);
        };
        let before = member.roles.len();
        member.roles.retain(|id| *id != role.id);
        let removed = member.roles.len() != before;
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    pub fn member(&self, user_id: u64) -> Option<&Member> {
        self.state.members.get(&user_id.to_string())
    }

    pub fn roles(&self) -> &[Role] {
        &self.state.roles
    }
}

#[async_trait]
impl Guild for LocalGuild {
    async fn find_role(&self, name: &str) -> Result<Option<Role>> {
        Ok(self.state.roles.iter().find(|role| role.name == name).cloned())
    }

    async fn create_role(&mut self, name: &str) -> Result<Role> {
        if name.trim().is_empty() {
            return Err(Error::Platform("role name cannot be empty".to_string()));
        }
        let id = self.state.roles.iter().map(|role| role.id).max().unwrap_or(0) + 1;
        let role = Role {
            id,
            name: name.to_string(),
        };
        self.state.roles.push(role.clone());
        self.save()?;
        tracing::info!(role = %role.name, id = role.id, "created role");
        Ok(role)
    }

    async fn member_has_role(&self, user_id: u64, role: &Role) -> Result<bool> {
        Ok(self
            .member(user_id)
            .map(|member| member.roles.contains(&role.id))
            .unwrap_or(false))
    }

    async fn add_role(&mut self, user_id: u64, role: &Role) -> Result<()> {
        if !self.state.roles.iter().any(|known| known.id == role.id) {
            return Err(Error::Platform(format!("unknown role: {}", role.name)));
        }
        let member = self.state.members.entry(user_id.to_string()).or_default();
        if !member.roles.contains(&role.id) {
            member.roles.push(role.id);
        }
        self.save()
    }

    async fn display_name(&self, user_id: u64) -> Result<Option<String>> {
        Ok(self
            .member(user_id)
            .map(|member| member.name.clone())
            .filter(|name| !name.is_empty()))
    }
}
