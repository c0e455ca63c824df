use crate::store::{CardStore, Collection};
use anyhow::Result;
use tracing::info;

pub async fn run(id: &str, store: &dyn CardStore) -> Result<()> {
    let mut collection = Collection::load(store).await?;
    let removed = collection.remove(id)?;
    collection.save(store).await?;

    info!(id = %removed.id, "Card removed");
    println!("Removed {}", removed.name);
    Ok(())
}
