use super::ui;
use crate::store::{CardStore, Collection};
use anyhow::Result;

pub async fn run(store: &dyn CardStore) -> Result<()> {
    let collection = Collection::load(store).await?;
    if collection.cards().is_empty() {
        println!("No cards yet. Add one with `cardwatch add <url>`.");
        return Ok(());
    }

    println!("{}", ui::cards_table(collection.cards()));
    println!(
        "{}",
        ui::style_text(
            &format!("{} card(s)", collection.cards().len()),
            ui::StyleType::Subtle
        )
    );
    Ok(())
}
