use super::domain::{Profile, ProfileId};
use crate::marketplace::store::StoreError;

/// Storage abstraction for the profile table.
pub trait ProfileRepository: Send + Sync {
    fn insert(&self, profile: Profile) -> Result<Profile, StoreError>;
    fn update(&self, profile: Profile) -> Result<(), StoreError>;
    fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError>;
    /// Bump the view counter, returning the new value. Open to any actor.
    fn increment_views(&self, id: &ProfileId) -> Result<u64, StoreError>;
    /// Profiles with `visible = true`, for the public directory.
    fn visible(&self) -> Result<Vec<Profile>, StoreError>;
}
