use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::domain::{Item, ItemDraft, ItemId, ItemListingPolicy, ItemPatch};
use super::repository::{ItemFilter, ItemRepository};
use crate::marketplace::auth::{self, AccessDenied};
use crate::marketplace::profiles::domain::ProfileId;
use crate::marketplace::storage::{BlobError, BlobStore};
use crate::marketplace::store::StoreError;

const ITEM_IMAGE_BUCKET: &str = "item-images";

static ITEM_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_item_id() -> ItemId {
    let id = ITEM_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ItemId(format!("item-{id:06}"))
}

/// Operations over the item store.
pub struct ItemService<I, B> {
    items: Arc<I>,
    blobs: Arc<B>,
    policy: ItemListingPolicy,
}

impl<I, B> ItemService<I, B>
where
    I: ItemRepository + 'static,
    B: BlobStore + 'static,
{
    pub fn new(items: Arc<I>, blobs: Arc<B>, policy: ItemListingPolicy) -> Self {
        Self {
            items,
            blobs,
            policy,
        }
    }

    /// Create a listing. Any profile may sell, regardless of role.
    pub fn list_item(&self, actor: &ProfileId, draft: ItemDraft) -> Result<Item, ItemServiceError> {
        validate_draft(&self.policy, &draft)?;

        let item = Item {
            id: next_item_id(),
            user_id: actor.clone(),
            title: draft.title,
            description: draft.description,
            price: draft.price,
            category: draft.category,
            condition: draft.condition,
            image: None,
            created_at: Utc::now(),
        };

        let stored = self.items.insert(item)?;
        Ok(stored)
    }

    pub fn get(&self, id: &ItemId) -> Result<Item, ItemServiceError> {
        let item = self.items.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(item)
    }

    pub fn browse(&self, filter: &ItemFilter) -> Result<Vec<Item>, ItemServiceError> {
        Ok(self.items.list(filter)?)
    }

    /// Owner-initiated edit of the listing fields.
    pub fn update(
        &self,
        actor: &ProfileId,
        id: &ItemId,
        patch: ItemPatch,
    ) -> Result<Item, ItemServiceError> {
        let mut item = self.items.fetch(id)?.ok_or(StoreError::NotFound)?;
        auth::ensure_item_owner(actor, &item)?;

        if let Some(price) = patch.price {
            ensure_price(&self.policy, price)?;
        }
        if matches!(&patch.title, Some(title) if title.trim().is_empty()) {
            return Err(ItemValidationError::MissingTitle.into());
        }

        item.apply(patch);
        self.items.update(item.clone())?;
        Ok(item)
    }

    /// Owner-initiated removal; the image blob is cleaned up best-effort.
    pub fn delete(&self, actor: &ProfileId, id: &ItemId) -> Result<(), ItemServiceError> {
        let item = self.items.fetch(id)?.ok_or(StoreError::NotFound)?;
        auth::ensure_item_owner(actor, &item)?;
        self.items.delete(id)?;

        if let Some(image) = item.image {
            if let Err(err) = self.blobs.delete(&image) {
                warn!(item = %id, "listing image cleanup failed: {err}");
            }
        }
        Ok(())
    }

    /// Store a listing image and point the item at it, returning the public
    /// URL.
    pub fn upload_image(
        &self,
        actor: &ProfileId,
        id: &ItemId,
        bytes: Vec<u8>,
    ) -> Result<String, ItemServiceError> {
        let mut item = self.items.fetch(id)?.ok_or(StoreError::NotFound)?;
        auth::ensure_item_owner(actor, &item)?;

        let blob = self
            .blobs
            .upload(ITEM_IMAGE_BUCKET, &format!("{id}/image"), bytes)?;
        item.image = Some(blob.clone());
        self.items.update(item)?;

        Ok(self.blobs.public_url(&blob))
    }

    pub fn image_url(&self, item: &Item) -> Option<String> {
        item.image.as_ref().map(|blob| self.blobs.public_url(blob))
    }
}

/// Error raised by the item service.
#[derive(Debug, thiserror::Error)]
pub enum ItemServiceError {
    #[error(transparent)]
    Denied(#[from] AccessDenied),
    #[error(transparent)]
    Invalid(#[from] ItemValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Blob(#[from] BlobError),
}

/// Listing-form validation failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ItemValidationError {
    #[error("title must not be empty")]
    MissingTitle,
    #[error("description must not be empty")]
    MissingDescription,
    #[error("price {found} is below the listing minimum of {minimum}")]
    PriceBelowMinimum { minimum: f64, found: f64 },
}

fn validate_draft(policy: &ItemListingPolicy, draft: &ItemDraft) -> Result<(), ItemValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ItemValidationError::MissingTitle);
    }
    if draft.description.trim().is_empty() {
        return Err(ItemValidationError::MissingDescription);
    }
    ensure_price(policy, draft.price)
}

fn ensure_price(policy: &ItemListingPolicy, price: f64) -> Result<(), ItemValidationError> {
    if price.is_finite() && price >= policy.minimum_price {
        Ok(())
    } else {
        Err(ItemValidationError::PriceBelowMinimum {
            minimum: policy.minimum_price,
            found: price,
        })
    }
}
