pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::{Aggregator, MetadataProvider, PriceSource, Refresher};
use crate::store::CardStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Preview { url: String },
    Add { url: String, name: Option<String> },
    List,
    Refresh { id: Option<String>, all: bool },
    Remove { id: String },
    Price { name: String },
}

/// Shared services built once from config.
pub struct AppContext {
    pub metadata: Box<dyn MetadataProvider>,
    pub aggregator: Arc<Aggregator>,
    pub refresher: Refresher,
    pub store: Box<dyn CardStore>,
}

impl AppContext {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let source: Arc<dyn PriceSource> = Arc::new(providers::countdown::CountdownProvider::new(
            &config.countdown(),
        )?);
        let aggregator = Arc::new(Aggregator::new(source));
        let refresher = Refresher::new(aggregator.clone(), &config.refresh);
        let metadata = Box::new(providers::opengraph::OpenGraphProvider::new(
            &config.metadata(),
        )?);
        let store = Box::new(store::disk::DiskStore::open(
            &config.default_data_path()?,
        )?);

        Ok(Self {
            metadata,
            aggregator,
            refresher,
            store,
        })
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Card Tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let ctx = AppContext::from_config(&config)?;
    execute(command, &ctx).await
}

pub async fn execute(command: AppCommand, ctx: &AppContext) -> Result<()> {
    match command {
        AppCommand::Preview { url } => cli::preview::run(&url, ctx.metadata.as_ref()).await,
        AppCommand::Add { url, name } => cli::add::run(
            &url,
            name.as_deref(),
            ctx.metadata.as_ref(),
            &ctx.aggregator,
            ctx.store.as_ref(),
        )
        .await
        .map(|_| ()),
        AppCommand::List => cli::list::run(ctx.store.as_ref()).await,
        AppCommand::Refresh { id, all } => {
            cli::refresh::run(id.as_deref(), all, &ctx.refresher, ctx.store.as_ref()).await
        }
        AppCommand::Remove { id } => cli::remove::run(&id, ctx.store.as_ref()).await,
        AppCommand::Price { name } => cli::price::run(&name, &ctx.aggregator).await,
    }
}
