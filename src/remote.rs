//! Remote issue source consulted on a cold start.

use crate::{
    domain::{Issue, User},
    error::{KanbanError, Result},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Seed data for an empty board
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl Snapshot {
    /// Parses a `{ "issues": [...], "users": [...] }` document
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| KanbanError::MalformedSnapshot(format!("remote snapshot: {}", e)))
    }
}

/// Read-only source of the initial board snapshot
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch(&self) -> Result<Snapshot>;
}

/// Reads the snapshot from a `db.json` style file
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl RemoteSource for JsonFileSource {
    async fn fetch(&self) -> Result<Snapshot> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            KanbanError::RemoteError(format!("{}: {}", self.path.display(), e))
        })?;
        Snapshot::from_json(&raw)
    }
}
