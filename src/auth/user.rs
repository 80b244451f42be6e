//! Credential store: login names mapped to bcrypt hashes and roles.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use bcrypt::{hash, verify, DEFAULT_COST};
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use crate::store::StoreError;

/// Caller role. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// A registered login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub hashed_password: String,
    pub role: Role,
}

impl User {
    /// Hash `password` with the default bcrypt cost.
    pub fn new(username: &str, password: &str, role: Role) -> Result<Self, AuthError> {
        Self::with_cost(username, password, role, DEFAULT_COST)
    }

    pub fn with_cost(username: &str, password: &str, role: Role, cost: u32) -> Result<Self, AuthError> {
        Ok(Self {
            username: username.to_string(),
            hashed_password: hash(password, cost)?,
            role,
        })
    }

    /// A malformed stored hash counts as a mismatch.
    pub fn is_correct_password(&self, password: &str) -> bool {
        verify(password, &self.hashed_password).unwrap_or(false)
    }
}

/// Abstract storage for users.
pub trait UserStore: Send + Sync {
    /// Store a copy of `user`. Fails with `AlreadyExists` on a taken username.
    fn save(&self, user: &User) -> Result<(), StoreError>;

    /// A copy of the user, or `None`.
    fn find(&self, username: &str) -> Result<Option<User>, StoreError>;
}

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn save(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| StoreError::LockPoisoned("user save"))?;

        if users.contains_key(&user.username) {
            return Err(StoreError::AlreadyExists(user.username.clone()));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    fn find(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self
            .users
            .read()
            .map_err(|_| StoreError::LockPoisoned("user find"))?;
        Ok(users.get(username).cloned())
    }
}

/// Default accounts: `admin1` / `secret_admin` and `user1` / `secret_user`.
pub const SEED_USERS: &[(&str, &str, Role)] = &[
    ("admin1", "secret_admin", Role::Admin),
    ("user1", "secret_user", Role::User),
];

/// Register [`SEED_USERS`] with the given bcrypt cost.
pub fn seed_users(store: &dyn UserStore, cost: u32) -> Result<(), AuthError> {
    for (username, password, role) in SEED_USERS {
        store.save(&User::with_cost(username, password, *role, cost)?)?;
    }
    Ok(())
}
