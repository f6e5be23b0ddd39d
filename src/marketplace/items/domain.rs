use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::profiles::domain::ProfileId;
use crate::marketplace::storage::BlobRef;

/// Identifier wrapper for marketplace listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared condition of a listed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCondition {
    New,
    LikeNew,
    Good,
    Fair,
    Poor,
}

impl ItemCondition {
    pub const fn label(self) -> &'static str {
        match self {
            ItemCondition::New => "new",
            ItemCondition::LikeNew => "like_new",
            ItemCondition::Good => "good",
            ItemCondition::Fair => "fair",
            ItemCondition::Poor => "poor",
        }
    }
}

/// A marketplace listing, independent of the job/application domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub user_id: ProfileId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub condition: ItemCondition,
    pub image: Option<BlobRef>,
    pub created_at: DateTime<Utc>,
}

/// Payload accepted by the listing form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub condition: ItemCondition,
}

/// Owner-editable fields; absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub condition: Option<ItemCondition>,
}

impl Item {
    pub fn apply(&mut self, patch: ItemPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(condition) = patch.condition {
            self.condition = condition;
        }
    }
}

/// Listing-form validation knobs; independent of the job posting minimum.
#[derive(Debug, Clone, Copy)]
pub struct ItemListingPolicy {
    pub minimum_price: f64,
}

impl Default for ItemListingPolicy {
    fn default() -> Self {
        Self { minimum_price: 0.0 }
    }
}
