use std::path::PathBuf;
use std::time::Duration;

use crate::auth::{AccessRoles, DEFAULT_TOKEN_DURATION};

/// Settings for a catalog server.
///
/// Built with [`ServerConfig::new`] and the `with_*` methods; `Default` gives
/// the standard access table, a ten minute token lifetime and in-memory
/// attachments.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HMAC secret for signing access tokens.
    pub secret_key: String,
    pub token_duration: Duration,
    /// Where attachments are written. `None` keeps them in memory.
    pub attachment_dir: Option<PathBuf>,
    pub access_roles: AccessRoles,
    /// bcrypt cost for the seeded accounts.
    pub password_cost: u32,
    /// Register the default `admin1` / `user1` accounts at startup.
    pub seed_users: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            secret_key: "secret".to_string(),
            token_duration: DEFAULT_TOKEN_DURATION,
            attachment_dir: None,
            access_roles: AccessRoles::standard(),
            password_cost: bcrypt::DEFAULT_COST,
            seed_users: true,
        }
    }
}

impl ServerConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            ..Self::default()
        }
    }

    pub fn with_token_duration(mut self, duration: Duration) -> Self {
        self.token_duration = duration;
        self
    }

    pub fn with_attachment_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.attachment_dir = Some(dir.into());
        self
    }

    pub fn with_access_roles(mut self, access_roles: AccessRoles) -> Self {
        self.access_roles = access_roles;
        self
    }

    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    pub fn without_seed_users(mut self) -> Self {
        self.seed_users = false;
        self
    }
}
