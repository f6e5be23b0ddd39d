use super::domain::{Item, ItemCondition, ItemId};
use crate::marketplace::profiles::domain::ProfileId;
use crate::marketplace::store::StoreError;

/// Browse filters; `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub category: Option<String>,
    pub condition: Option<ItemCondition>,
    pub max_price: Option<f64>,
    pub seller: Option<ProfileId>,
}

/// Storage abstraction for the item table.
pub trait ItemRepository: Send + Sync {
    fn insert(&self, item: Item) -> Result<Item, StoreError>;
    fn update(&self, item: Item) -> Result<(), StoreError>;
    fn fetch(&self, id: &ItemId) -> Result<Option<Item>, StoreError>;
    fn delete(&self, id: &ItemId) -> Result<(), StoreError>;
    /// Newest first.
    fn list(&self, filter: &ItemFilter) -> Result<Vec<Item>, StoreError>;
}
