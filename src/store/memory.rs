use super::CardStore;
use crate::core::card::CardRecord;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory card collection, used when nothing should touch disk
#[derive(Default)]
pub struct MemoryStore {
    cards: Mutex<Vec<CardRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn load(&self) -> Result<Vec<CardRecord>> {
        Ok(self.cards.lock().await.clone())
    }

    async fn save(&self, cards: &[CardRecord]) -> Result<()> {
        let mut stored = self.cards.lock().await;
        debug!(count = cards.len(), "Memory store PUT");
        *stored = cards.to_vec();
        Ok(())
    }
}
