use super::CardStore;
use crate::core::card::CardRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "cards";
const COLLECTION_KEY: &str = "cards.v1";

/// Card collection persisted as a single JSON value in a fjall partition.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path.join("collection"))
            .open()
            .context("Failed to open collection keyspace")?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .context("Failed to open cards partition")?;

        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl CardStore for DiskStore {
    async fn load(&self) -> Result<Vec<CardRecord>> {
        let Some(value) = self.partition.get(COLLECTION_KEY)? else {
            debug!("No stored collection, starting empty");
            return Ok(Vec::new());
        };
        let cards: Vec<CardRecord> =
            serde_json::from_slice(&value).context("Failed to decode stored collection")?;
        debug!(count = cards.len(), "Loaded collection");
        Ok(cards)
    }

    async fn save(&self, cards: &[CardRecord]) -> Result<()> {
        let value = serde_json::to_vec(cards)?;
        self.partition.insert(COLLECTION_KEY, value)?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist collection")?;
        debug!(count = cards.len(), "Saved collection");
        Ok(())
    }
}
