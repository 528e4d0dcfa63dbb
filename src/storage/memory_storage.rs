use crate::{
    error::Result,
    storage::{Slot, Storage},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory storage. Slots hold encoded text, the same as on disk.
#[derive(Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<Slot, String>>,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slot writes performed so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read_slot(&self, slot: Slot) -> Result<Option<String>> {
        Ok(self.slots.read().await.get(&slot).cloned())
    }

    async fn write_slot(&self, slot: Slot, contents: String) -> Result<()> {
        self.slots.write().await.insert(slot, contents);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
