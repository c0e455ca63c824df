use crate::core::card::CardRecord;
use crate::core::price::{PriceSummary, Variant};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Shown in place of a price that has no data.
pub const MISSING: &str = "—";

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Success,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Success => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn format_price(value: Option<f64>) -> String {
    value.map_or(MISSING.to_string(), |p| format!("${p:.2}"))
}

/// Right-aligned price cell; absent prices are dimmed.
pub fn price_cell(value: Option<f64>) -> Cell {
    match value {
        Some(_) => Cell::new(format_price(value)).set_alignment(CellAlignment::Right),
        None => Cell::new(MISSING)
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
    }
}

pub fn price_header_cells() -> Vec<Cell> {
    Variant::ALL
        .iter()
        .map(|v| header_cell(&v.to_string()))
        .collect()
}

pub fn price_cells(prices: &PriceSummary) -> Vec<Cell> {
    Variant::ALL
        .iter()
        .map(|v| price_cell(prices.get(*v)))
        .collect()
}

/// Renders cards as a table, newest first.
pub fn cards_table(cards: &[CardRecord]) -> Table {
    let mut table = new_styled_table();

    let mut header = vec![header_cell("ID"), header_cell("Name")];
    header.extend(price_header_cells());
    header.push(header_cell("Last checked"));
    table.set_header(header);

    for card in cards {
        let last_checked = card.last_checked.map_or(MISSING.to_string(), |ts| {
            ts.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        });

        let mut row = vec![
            Cell::new(card.short_id()).fg(Color::DarkGrey),
            Cell::new(&card.name),
        ];
        row.extend(price_cells(&card.prices));
        row.push(Cell::new(last_checked));
        table.add_row(row);
    }

    table
}

/// Creates a spinner for work of unknown length.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Creates a new `indicatif::ProgressBar` with standard styling.
pub fn new_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}
