use super::ui;
use crate::core::MetadataProvider;
use anyhow::Result;

pub async fn run(url: &str, metadata: &dyn MetadataProvider) -> Result<()> {
    let spinner = ui::new_spinner("Fetching listing...");
    let result = metadata.fetch_metadata(url).await;
    spinner.finish_and_clear();
    let page = result?;

    println!("{}", ui::style_text(&page.title, ui::StyleType::Title));
    match &page.image {
        Some(image) => println!("Image: {image}"),
        None => println!("{}", ui::style_text("No image found", ui::StyleType::Subtle)),
    }
    Ok(())
}
