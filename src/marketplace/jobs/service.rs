use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use super::domain::{Job, JobDraft, JobId, JobPatch, JobPostingPolicy, JobStatus};
use super::repository::{JobFilter, JobRepository};
use crate::marketplace::auth::{self, AccessDenied};
use crate::marketplace::lifecycle::{InvalidTransition, TransitionPolicy};
use crate::marketplace::profiles::domain::{ProfileId, ProfileRole};
use crate::marketplace::profiles::repository::ProfileRepository;
use crate::marketplace::store::StoreError;

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

/// Operations over the job store.
pub struct JobService<J, P> {
    jobs: Arc<J>,
    profiles: Arc<P>,
    policy: JobPostingPolicy,
    transitions: TransitionPolicy,
}

impl<J, P> JobService<J, P>
where
    J: JobRepository + 'static,
    P: ProfileRepository + 'static,
{
    pub fn new(
        jobs: Arc<J>,
        profiles: Arc<P>,
        policy: JobPostingPolicy,
        transitions: TransitionPolicy,
    ) -> Self {
        Self {
            jobs,
            profiles,
            policy,
            transitions,
        }
    }

    /// Create a posting on behalf of a business-role profile.
    pub fn post(&self, actor: &ProfileId, draft: JobDraft) -> Result<Job, JobServiceError> {
        let poster = self.profiles.fetch(actor)?.ok_or(StoreError::NotFound)?;
        if poster.role != ProfileRole::Business {
            return Err(JobServiceError::RoleRequired);
        }

        let today = Utc::now().date_naive();
        validate_draft(&self.policy, &draft, today)?;

        let job = Job {
            id: next_job_id(),
            owner_id: actor.clone(),
            title: draft.title,
            description: draft.description,
            price: draft.price,
            category: draft.category,
            status: JobStatus::Open,
            deadline: draft.deadline,
            address: draft.address,
            created_at: Utc::now(),
        };

        let stored = self.jobs.insert(job)?;
        Ok(stored)
    }

    pub fn get(&self, id: &JobId) -> Result<Job, JobServiceError> {
        let job = self.jobs.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(job)
    }

    pub fn list(&self, filter: &JobFilter) -> Result<Vec<Job>, JobServiceError> {
        Ok(self.jobs.list(filter)?)
    }

    /// Owner-initiated edit of the posting fields.
    pub fn update(
        &self,
        actor: &ProfileId,
        id: &JobId,
        patch: JobPatch,
    ) -> Result<Job, JobServiceError> {
        let mut job = self.jobs.fetch(id)?.ok_or(StoreError::NotFound)?;
        auth::ensure_job_owner(actor, &job)?;

        if let Some(price) = patch.price {
            ensure_price(&self.policy, price)?;
        }
        if let Some(deadline) = patch.deadline {
            ensure_deadline(deadline, Utc::now().date_naive())?;
        }
        if matches!(&patch.title, Some(title) if title.trim().is_empty()) {
            return Err(JobValidationError::MissingTitle.into());
        }

        job.apply(patch);
        self.jobs.update(job.clone())?;
        Ok(job)
    }

    /// Move the posting through its lifecycle, owner-only.
    pub fn set_status(
        &self,
        actor: &ProfileId,
        id: &JobId,
        new_status: JobStatus,
    ) -> Result<Job, JobServiceError> {
        let mut job = self.jobs.fetch(id)?.ok_or(StoreError::NotFound)?;
        auth::ensure_job_owner(actor, &job)?;
        self.transitions.check_job(job.status, new_status)?;

        job.status = new_status;
        self.jobs.update(job.clone())?;
        Ok(job)
    }

    /// Unconditional, immediate deletion by the owner. Applications pointing
    /// at the job are not cascaded.
    pub fn delete(&self, actor: &ProfileId, id: &JobId) -> Result<(), JobServiceError> {
        let job = self.jobs.fetch(id)?.ok_or(StoreError::NotFound)?;
        auth::ensure_job_owner(actor, &job)?;
        self.jobs.delete(id)?;
        Ok(())
    }
}

/// Error raised by the job service.
#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error(transparent)]
    Denied(#[from] AccessDenied),
    #[error("only business profiles may post jobs")]
    RoleRequired,
    #[error(transparent)]
    Invalid(#[from] JobValidationError),
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Posting-form validation failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JobValidationError {
    #[error("title must not be empty")]
    MissingTitle,
    #[error("description must not be empty")]
    MissingDescription,
    #[error("price {found} is below the posting minimum of {minimum}")]
    PriceBelowMinimum { minimum: f64, found: f64 },
    #[error("deadline {0} is already in the past")]
    DeadlineInPast(NaiveDate),
}

fn validate_draft(
    policy: &JobPostingPolicy,
    draft: &JobDraft,
    today: NaiveDate,
) -> Result<(), JobValidationError> {
    if draft.title.trim().is_empty() {
        return Err(JobValidationError::MissingTitle);
    }
    if draft.description.trim().is_empty() {
        return Err(JobValidationError::MissingDescription);
    }
    ensure_price(policy, draft.price)?;
    if let Some(deadline) = draft.deadline {
        ensure_deadline(deadline, today)?;
    }
    Ok(())
}

fn ensure_price(policy: &JobPostingPolicy, price: f64) -> Result<(), JobValidationError> {
    if price.is_finite() && price >= policy.minimum_price {
        Ok(())
    } else {
        Err(JobValidationError::PriceBelowMinimum {
            minimum: policy.minimum_price,
            found: price,
        })
    }
}

fn ensure_deadline(deadline: NaiveDate, today: NaiveDate) -> Result<(), JobValidationError> {
    if deadline < today {
        Err(JobValidationError::DeadlineInPast(deadline))
    } else {
        Ok(())
    }
}
