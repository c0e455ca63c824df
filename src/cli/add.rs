use super::ui;
use crate::core::PriceSummary;
use crate::core::card::CardRecord;
use crate::core::{Aggregator, MetadataProvider};
use crate::store::{CardStore, Collection};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Reads the listing at `url`, prices it and prepends it to the collection.
///
/// A card is always stored once the listing was read; prices that cannot be
/// aggregated are stored as absent.
pub async fn run(
    url: &str,
    name_override: Option<&str>,
    metadata: &dyn MetadataProvider,
    aggregator: &Aggregator,
    store: &dyn CardStore,
) -> Result<CardRecord> {
    let spinner = ui::new_spinner("Fetching listing...");
    let page = metadata.fetch_metadata(url).await;
    let page = match page {
        Ok(page) => page,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e).context("Could not read the listing page");
        }
    };

    let name = name_override
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(page.title.trim())
        .to_string();
    spinner.set_message(format!("Fetching prices for {name}..."));
    let prices = aggregator.aggregate(&name).await;
    spinner.finish_and_clear();
    let prices = prices.unwrap_or_else(|e| {
        warn!(error = %e, card = %name, "Could not price the card, storing without prices");
        PriceSummary::default()
    });

    let card = CardRecord::new(&name, page.image, Some(url.to_string()), prices);
    let mut collection = Collection::load(store).await?;
    collection.add(card.clone());
    collection.save(store).await?;
    info!(id = %card.id, name = %card.name, "Card added");

    println!("{}", ui::style_text("Card added", ui::StyleType::Success));
    println!("{}", ui::cards_table(std::slice::from_ref(&card)));
    Ok(card)
}
