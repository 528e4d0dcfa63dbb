use crate::{
    domain::{Issue, User},
    error::{KanbanError, Result},
};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

pub mod file_storage;
pub mod memory_storage;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

/// Logical slots of the persisted store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Issues,
    Users,
}

impl Slot {
    pub fn key(self) -> &'static str {
        match self {
            Self::Issues => "issues",
            Self::Users => "users",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Storage trait for persisting the issue and user collections.
///
/// Backends only move raw slot contents; encoding is handled by the
/// provided methods. Every write replaces the whole slot.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Reads a slot, `None` if it was never written
    async fn read_slot(&self, slot: Slot) -> Result<Option<String>>;

    /// Replaces a slot's contents
    async fn write_slot(&self, slot: Slot, contents: String) -> Result<()>;

    /// Loads the issue collection. Undecodable contents are `MalformedSnapshot`.
    async fn load_issues(&self) -> Result<Option<Vec<Issue>>> {
        match self.read_slot(Slot::Issues).await? {
            Some(raw) => decode(Slot::Issues, &raw).map(Some),
            None => Ok(None),
        }
    }

    async fn save_issues(&self, issues: &[Issue]) -> Result<()> {
        self.write_slot(Slot::Issues, encode(issues)?).await
    }

    /// Loads the user list. Undecodable contents are `MalformedSnapshot`.
    async fn load_users(&self) -> Result<Option<Vec<User>>> {
        match self.read_slot(Slot::Users).await? {
            Some(raw) => decode(Slot::Users, &raw).map(Some),
            None => Ok(None),
        }
    }

    async fn save_users(&self, users: &[User]) -> Result<()> {
        self.write_slot(Slot::Users, encode(users)?).await
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn decode<T: DeserializeOwned>(slot: Slot, raw: &str) -> Result<T> {
    serde_json::from_str(raw)
        .map_err(|e| KanbanError::MalformedSnapshot(format!("{} slot: {}", slot, e)))
}
