use serde::{Deserialize, Serialize};

/// Location of an uploaded object inside the external storage buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRef {
    pub bucket: String,
    pub path: String,
}

/// Object storage abstraction covering avatar and item-image uploads.
pub trait BlobStore: Send + Sync {
    fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>) -> Result<BlobRef, BlobError>;
    fn public_url(&self, blob: &BlobRef) -> String;
    fn delete(&self, blob: &BlobRef) -> Result<(), BlobError>;
}

/// Blob storage failure.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("blob not found")]
    NotFound,
    #[error("blob storage unavailable: {0}")]
    Unavailable(String),
}
