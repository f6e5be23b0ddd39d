//! Access rules for every mutable resource, expressed as pure functions so
//! the services and their tests can exercise them without any storage.
//!
//! Callers must treat a denial as final: the requested mutation is never
//! applied and the denial surfaces as a 403 (401 when no actor is present).

use axum::http::HeaderMap;

use crate::marketplace::applications::domain::{Application, ApplicationStatus};
use crate::marketplace::items::domain::Item;
use crate::marketplace::jobs::domain::Job;
use crate::marketplace::profiles::domain::{Profile, ProfileId};

/// Header carrying the acting profile, populated upstream by the identity
/// collaborator once the BaaS session is verified.
pub const ACTOR_HEADER: &str = "x-profile-id";

/// Denials raised by the access rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("request carries no authenticated profile")]
    NotAuthenticated,
    #[error("profile {actor} does not own this {resource}")]
    NotOwner {
        actor: ProfileId,
        resource: &'static str,
    },
    #[error("only the applicant may withdraw an application")]
    NotApplicant,
    #[error("only the job owner or the applicant may view an application")]
    NotParticipant,
    #[error("cannot apply to a job you posted")]
    SelfApplication,
}

/// Resolve the acting profile from request headers.
pub fn current_actor(headers: &HeaderMap) -> Result<ProfileId, AccessDenied> {
    let value = headers
        .get(ACTOR_HEADER)
        .ok_or(AccessDenied::NotAuthenticated)?;
    let raw = value.to_str().map_err(|_| AccessDenied::NotAuthenticated)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AccessDenied::NotAuthenticated);
    }
    Ok(ProfileId(trimmed.to_string()))
}

/// Job mutation and deletion are reserved for the posting owner.
pub fn ensure_job_owner(actor: &ProfileId, job: &Job) -> Result<(), AccessDenied> {
    if *actor == job.owner_id {
        Ok(())
    } else {
        Err(AccessDenied::NotOwner {
            actor: actor.clone(),
            resource: "job",
        })
    }
}

/// Item mutation and deletion are reserved for the listing owner.
pub fn ensure_item_owner(actor: &ProfileId, item: &Item) -> Result<(), AccessDenied> {
    if *actor == item.user_id {
        Ok(())
    } else {
        Err(AccessDenied::NotOwner {
            actor: actor.clone(),
            resource: "item",
        })
    }
}

/// Profile edits are reserved for the profile itself; the view counter is
/// exempt and handled separately.
pub fn ensure_profile_owner(actor: &ProfileId, profile: &Profile) -> Result<(), AccessDenied> {
    if *actor == profile.id {
        Ok(())
    } else {
        Err(AccessDenied::NotOwner {
            actor: actor.clone(),
            resource: "profile",
        })
    }
}

/// Status mutations are keyed on the denormalized `business_id`, with one
/// carve-out: `withdrawn` belongs to the applicant alone.
pub fn ensure_status_actor(
    actor: &ProfileId,
    application: &Application,
    new_status: ApplicationStatus,
) -> Result<(), AccessDenied> {
    if new_status == ApplicationStatus::Withdrawn {
        if *actor == application.user_id {
            Ok(())
        } else {
            Err(AccessDenied::NotApplicant)
        }
    } else if *actor == application.business_id {
        Ok(())
    } else {
        Err(AccessDenied::NotOwner {
            actor: actor.clone(),
            resource: "application",
        })
    }
}

/// Reads are open to both parties of an application.
pub fn ensure_application_party(
    actor: &ProfileId,
    application: &Application,
) -> Result<(), AccessDenied> {
    if *actor == application.user_id || *actor == application.business_id {
        Ok(())
    } else {
        Err(AccessDenied::NotParticipant)
    }
}

/// Self-application block: a profile may not apply to its own posting.
pub fn ensure_not_job_owner(applicant: &ProfileId, job: &Job) -> Result<(), AccessDenied> {
    if *applicant == job.owner_id {
        Err(AccessDenied::SelfApplication)
    } else {
        Ok(())
    }
}
