// ============================
// crates/backend-lib/src/store.rs
// ============================
//! User store abstraction with flat-file and in-memory implementations.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs as tokio_fs, sync::RwLock};

use crate::error::AppError;

/// A persisted user record
///
/// `email` is the unique key. Timestamps are set by the store on create;
/// this flow never mutates or deletes a record afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub username: String,
    /// bcrypt output, never the raw password
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new user record
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Trait for user store backends
///
/// Implementations must enforce email uniqueness atomically: of two
/// concurrent inserts for the same email, exactly one succeeds.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user record by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Insert a new user record, stamping its timestamps
    ///
    /// Fails with [`AppError::EmailTaken`] if a record with the same email
    /// already exists.
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError>;
}

/// Flat-file implementation of the [`UserStore`] trait
///
/// All records live in a single `users.json` under the data directory,
/// mirrored by an in-process map. Inserts hold the write lock across the
/// uniqueness check and the disk write.
pub struct FlatFileUserStore {
    path: PathBuf,
    users: RwLock<HashMap<String, User>>,
}

impl FlatFileUserStore {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        let path = root.join("users.json");
        let users = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            users: RwLock::new(users),
        })
    }

    async fn persist(&self, users: &HashMap<String, User>) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(users)?;
        tokio_fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for FlatFileUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.get(email).cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;

        if users.contains_key(&new_user.email) {
            return Err(AppError::EmailTaken);
        }

        let now = Utc::now();
        let user = User {
            email: new_user.email.clone(),
            username: new_user.username,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(new_user.email.clone(), user.clone());

        // the in-process map must mirror the file
        if let Err(e) = self.persist(&users).await {
            users.remove(&new_user.email);
            return Err(e);
        }

        Ok(user)
    }
}

/// In-memory implementation of the [`UserStore`] trait
///
/// Used by the test suite and ephemeral deployments. Uniqueness is enforced
/// through the concurrent map's entry API.
#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<DashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(email).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        match self.users.entry(new_user.email.clone()) {
            Entry::Occupied(_) => Err(AppError::EmailTaken),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let user = User {
                    email: new_user.email,
                    username: new_user.username,
                    password_hash: new_user.password_hash,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(user.clone());
                Ok(user)
            },
        }
    }
}
