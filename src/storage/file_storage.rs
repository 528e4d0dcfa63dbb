use crate::{
    error::Result,
    storage::{Slot, Storage},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based storage: one JSON file per slot
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const KANBAN_DIR: &'static str = ".kanban";

    /// Creates a new FileStorage instance for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::KANBAN_DIR),
        }
    }

    fn slot_file(&self, slot: Slot) -> PathBuf {
        self.root_path.join(format!("{}.json", slot.key()))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await
    }

    async fn read_slot(&self, slot: Slot) -> Result<Option<String>> {
        let file_path = self.slot_file(slot);

        if !file_path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&file_path).await?;
        Ok(Some(contents))
    }

    async fn write_slot(&self, slot: Slot, contents: String) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        // Atomic replace via rename
        let file_path = self.slot_file(slot);
        let tmp_path = file_path.with_extension("json.tmp");
        fs::write(&tmp_path, contents).await?;
        fs::rename(&tmp_path, &file_path).await?;

        tracing::debug!(slot = %slot, path = %file_path.display(), "wrote slot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Column, Issue, IssueId, User, UserId},
        error::KanbanError,
    };
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_storage_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(!storage.root_path.exists());
        storage.initialize().await.unwrap();
        assert!(storage.root_path.exists());
    }

    #[tokio::test]
    async fn test_missing_slots_are_absent() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(storage.load_issues().await.unwrap().is_none());
        assert!(storage.load_users().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_issues_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        let issues = vec![
            Issue::new(IssueId::new(1), "First")
                .with_priority("high")
                .with_assignee(UserId::new(2)),
            Issue::new(IssueId::new(2), "Second").with_status(Column::Done),
        ];
        storage.save_issues(&issues).await.unwrap();

        let loaded = storage.load_issues().await.unwrap().unwrap();
        assert_eq!(loaded, issues);
        assert!(storage.slot_file(Slot::Issues).exists());
    }

    #[tokio::test]
    async fn test_save_replaces_whole_slot() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        storage
            .save_issues(&[Issue::new(IssueId::new(1), "a"), Issue::new(IssueId::new(2), "b")])
            .await
            .unwrap();
        storage.save_issues(&[Issue::new(IssueId::new(3), "c")]).await.unwrap();

        let loaded = storage.load_issues().await.unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, IssueId::new(3));
    }

    #[tokio::test]
    async fn test_users_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        let users = vec![User::new(UserId::new(1), "Ada"), User::new(UserId::new(2), "Linus")];
        storage.save_users(&users).await.unwrap();

        assert_eq!(storage.load_users().await.unwrap(), Some(users));
    }

    #[tokio::test]
    async fn test_malformed_slot() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        fs::write(storage.slot_file(Slot::Issues), "{not an array").await.unwrap();

        assert!(matches!(
            storage.load_issues().await,
            Err(KanbanError::MalformedSnapshot(_))
        ));
    }
}
