//! Profile store: one record per registered user.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Profile, ProfileDraft, ProfileId, ProfilePatch, ProfileRole, SocialLinks};
pub use repository::ProfileRepository;
pub use router::profile_router;
pub use service::{ProfileService, ProfileServiceError, ProfileValidationError};
