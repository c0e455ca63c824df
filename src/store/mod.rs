pub mod disk;
pub mod memory;

use crate::core::card::CardRecord;
use crate::core::price::PriceSummary;
use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::Utc;

/// Opaque storage for the card list, read and written wholesale.
#[async_trait]
pub trait CardStore: Send + Sync {
    async fn load(&self) -> Result<Vec<CardRecord>>;
    async fn save(&self, cards: &[CardRecord]) -> Result<()>;
}

/// The user's card list, newest first.
pub struct Collection {
    cards: Vec<CardRecord>,
}

impl Collection {
    pub async fn load(store: &dyn CardStore) -> Result<Self> {
        Ok(Self {
            cards: store.load().await?,
        })
    }

    pub async fn save(&self, store: &dyn CardStore) -> Result<()> {
        store.save(&self.cards).await
    }

    pub fn cards(&self) -> &[CardRecord] {
        &self.cards
    }

    pub fn add(&mut self, card: CardRecord) {
        self.cards.insert(0, card);
    }

    /// Finds a card by full id or unambiguous id prefix.
    pub fn find(&self, id: &str) -> Result<&CardRecord> {
        let index = self.position(id)?;
        Ok(&self.cards[index])
    }

    /// Replaces a card's prices and stamps it as checked now.
    pub fn replace_prices(&mut self, id: &str, prices: PriceSummary) -> Result<&CardRecord> {
        let index = self.position(id)?;
        let card = &mut self.cards[index];
        card.prices = prices;
        card.last_checked = Some(Utc::now());
        Ok(card)
    }

    pub fn remove(&mut self, id: &str) -> Result<CardRecord> {
        let index = self.position(id)?;
        Ok(self.cards.remove(index))
    }

    fn position(&self, id: &str) -> Result<usize> {
        if id.is_empty() {
            bail!("Card id is empty");
        }
        if let Some(index) = self.cards.iter().position(|c| c.id == id) {
            return Ok(index);
        }

        let matches: Vec<usize> = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.id.starts_with(id))
            .map(|(i, _)| i)
            .collect();
        match matches.as_slice() {
            [index] => Ok(*index),
            [] => bail!("No card with id {id}"),
            _ => bail!("Card id {id} is ambiguous, use more characters"),
        }
    }
}
