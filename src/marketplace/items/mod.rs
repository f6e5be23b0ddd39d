//! Item store: the secondary marketplace, independent of jobs and
//! applications.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Item, ItemCondition, ItemDraft, ItemId, ItemListingPolicy, ItemPatch};
pub use repository::{ItemFilter, ItemRepository};
pub use router::item_router;
pub use service::{ItemService, ItemServiceError, ItemValidationError};
