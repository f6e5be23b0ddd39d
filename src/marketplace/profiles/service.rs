use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::domain::{Profile, ProfileDraft, ProfileId, ProfilePatch, ProfileView};
use super::repository::ProfileRepository;
use crate::marketplace::auth::{self, AccessDenied};
use crate::marketplace::storage::{BlobError, BlobStore};
use crate::marketplace::store::StoreError;

const AVATAR_BUCKET: &str = "avatars";

static PROFILE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_profile_id() -> ProfileId {
    let id = PROFILE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProfileId(format!("profile-{id:06}"))
}

/// Operations over the profile store.
pub struct ProfileService<P, B> {
    profiles: Arc<P>,
    blobs: Arc<B>,
}

impl<P, B> ProfileService<P, B>
where
    P: ProfileRepository + 'static,
    B: BlobStore + 'static,
{
    pub fn new(profiles: Arc<P>, blobs: Arc<B>) -> Self {
        Self { profiles, blobs }
    }

    /// Create the profile record at signup.
    pub fn register(&self, draft: ProfileDraft) -> Result<Profile, ProfileServiceError> {
        validate_draft(&draft)?;

        let profile = Profile {
            id: next_profile_id(),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            role: draft.role,
            visible: draft.visible,
            bio: draft.bio,
            location: draft.location,
            avatar: None,
            social_links: draft.social_links,
            view_count: 0,
            created_at: Utc::now(),
        };

        let stored = self.profiles.insert(profile)?;
        Ok(stored)
    }

    pub fn get(&self, id: &ProfileId) -> Result<Profile, ProfileServiceError> {
        let profile = self.profiles.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(profile)
    }

    /// Apply an owner-initiated patch.
    pub fn update(
        &self,
        actor: &ProfileId,
        id: &ProfileId,
        patch: ProfilePatch,
    ) -> Result<Profile, ProfileServiceError> {
        let mut profile = self.profiles.fetch(id)?.ok_or(StoreError::NotFound)?;
        auth::ensure_profile_owner(actor, &profile)?;

        if let Some(email) = &patch.email {
            validate_email(email)?;
        }
        if matches!(&patch.name, Some(name) if name.trim().is_empty()) {
            return Err(ProfileValidationError::EmptyName.into());
        }

        profile.apply(patch);
        self.profiles.update(profile.clone())?;
        Ok(profile)
    }

    /// Fire-and-forget view counter bump; failures are logged, never surfaced.
    pub fn record_view(&self, id: &ProfileId) {
        if let Err(err) = self.profiles.increment_views(id) {
            warn!(profile = %id, "view count increment failed: {err}");
        }
    }

    /// Visible profiles for the public directory.
    pub fn directory(&self) -> Result<Vec<Profile>, ProfileServiceError> {
        Ok(self.profiles.visible()?)
    }

    /// Store an avatar image and point the profile at it, returning the
    /// public URL. The previous avatar is deleted best-effort.
    pub fn upload_avatar(
        &self,
        actor: &ProfileId,
        id: &ProfileId,
        bytes: Vec<u8>,
    ) -> Result<String, ProfileServiceError> {
        let mut profile = self.profiles.fetch(id)?.ok_or(StoreError::NotFound)?;
        auth::ensure_profile_owner(actor, &profile)?;

        let blob = self
            .blobs
            .upload(AVATAR_BUCKET, &format!("{id}/avatar"), bytes)?;
        let previous = profile.avatar.replace(blob.clone());
        self.profiles.update(profile)?;

        // The path is stable per profile, so re-uploads overwrite in place;
        // only a blob at a different location needs cleanup.
        if let Some(previous) = previous.filter(|previous| *previous != blob) {
            if let Err(err) = self.blobs.delete(&previous) {
                warn!(profile = %id, "stale avatar cleanup failed: {err}");
            }
        }

        Ok(self.blobs.public_url(&blob))
    }

    pub fn view_of(&self, profile: &Profile) -> ProfileView {
        let avatar_url = profile
            .avatar
            .as_ref()
            .map(|blob| self.blobs.public_url(blob));
        profile.view(avatar_url)
    }
}

/// Error raised by the profile service.
#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    #[error(transparent)]
    Denied(#[from] AccessDenied),
    #[error(transparent)]
    Invalid(#[from] ProfileValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Blob(#[from] BlobError),
}

/// Signup/patch validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("'{0}' is not a usable email address")]
    MalformedEmail(String),
}

fn validate_draft(draft: &ProfileDraft) -> Result<(), ProfileValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ProfileValidationError::EmptyName);
    }
    validate_email(&draft.email)
}

fn validate_email(email: &str) -> Result<(), ProfileValidationError> {
    let trimmed = email.trim();
    if trimmed.contains('@') && !trimmed.starts_with('@') && !trimmed.ends_with('@') {
        Ok(())
    } else {
        Err(ProfileValidationError::MalformedEmail(email.to_string()))
    }
}
