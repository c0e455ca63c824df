use super::ui;
use crate::core::Refresher;
use crate::store::{CardStore, Collection};
use anyhow::{Result, bail};
use futures::future::join_all;

/// Refreshes one card, or every card with `all`.
///
/// Cards whose refresh fails keep their stored prices.
pub async fn run(
    id: Option<&str>,
    all: bool,
    refresher: &Refresher,
    store: &dyn CardStore,
) -> Result<()> {
    let mut collection = Collection::load(store).await?;

    let targets: Vec<(String, String)> = match (id, all) {
        (_, true) => collection
            .cards()
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect(),
        (Some(id), false) => {
            let card = collection.find(id)?;
            vec![(card.id.clone(), card.name.clone())]
        }
        (None, false) => bail!("Pass a card id or --all"),
    };

    if targets.is_empty() {
        println!("No cards to refresh.");
        return Ok(());
    }

    let pb = ui::new_progress_bar(targets.len() as u64);
    pb.set_message("Refreshing prices...");

    let refresh_futures = targets.iter().map(|(id, name)| {
        let pb_clone = pb.clone();
        async move {
            let res = refresher.refresh(name).await;
            pb_clone.inc(1);
            (id, name, res)
        }
    });
    let results = join_all(refresh_futures).await;
    pb.finish_and_clear();

    let mut refreshed = Vec::new();
    let mut failures = 0;
    for (id, name, result) in results {
        match result {
            Ok(prices) => {
                refreshed.push(collection.replace_prices(id, prices)?.clone());
            }
            Err(failure) => {
                failures += 1;
                eprintln!(
                    "{}",
                    ui::style_text(
                        &format!("Failed to refresh {name}: {failure}"),
                        ui::StyleType::Error
                    )
                );
            }
        }
    }

    if !refreshed.is_empty() {
        collection.save(store).await?;
        println!("{}", ui::cards_table(&refreshed));
    }

    if failures > 0 {
        bail!("{failures} of {} card(s) could not be refreshed", targets.len());
    }
    Ok(())
}
