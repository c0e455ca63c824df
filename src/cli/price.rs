use super::ui;
use crate::core::Aggregator;
use anyhow::Result;
use comfy_table::Cell;

/// Prices a card by name without touching the collection.
pub async fn run(name: &str, aggregator: &Aggregator) -> Result<()> {
    let spinner = ui::new_spinner(&format!("Fetching prices for {}...", name.trim()));
    let survey = aggregator.survey(name).await;
    spinner.finish_and_clear();
    let survey = survey?;

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Variant"),
        ui::header_cell("Median"),
        ui::header_cell("Listings"),
    ]);

    for (variant, outcome) in &survey.outcomes {
        let listings = match outcome {
            Ok(count) => Cell::new(count),
            Err(reason) => Cell::new(ui::style_text(&reason.to_string(), ui::StyleType::Subtle)),
        };
        table.add_row(vec![
            Cell::new(variant),
            ui::price_cell(survey.summary.get(*variant)),
            listings,
        ]);
    }

    println!(
        "{}\n\n{}",
        ui::style_text(name.trim(), ui::StyleType::Title),
        table
    );
    Ok(())
}
