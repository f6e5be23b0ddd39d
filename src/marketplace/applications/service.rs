use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::warn;

use super::domain::{Application, ApplicationId, ApplicationStatus, SubmissionPolicy};
use super::repository::{ApplicationRepository, EmailMessage, EmailNotifier};
use crate::marketplace::auth::{self, AccessDenied};
use crate::marketplace::jobs::domain::{JobId, JobStatus};
use crate::marketplace::jobs::repository::JobRepository;
use crate::marketplace::lifecycle::{InvalidTransition, TransitionPolicy};
use crate::marketplace::profiles::domain::ProfileId;
use crate::marketplace::profiles::repository::ProfileRepository;
use crate::marketplace::store::StoreError;

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Service composing the access rules, the lifecycle guard, and the
/// application store.
pub struct ApplicationService<A, J, P, N> {
    applications: Arc<A>,
    jobs: Arc<J>,
    profiles: Arc<P>,
    notifier: Arc<N>,
    submission: SubmissionPolicy,
    transitions: TransitionPolicy,
}

impl<A, J, P, N> ApplicationService<A, J, P, N>
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    P: ProfileRepository + 'static,
    N: EmailNotifier + 'static,
{
    pub fn new(
        applications: Arc<A>,
        jobs: Arc<J>,
        profiles: Arc<P>,
        notifier: Arc<N>,
        submission: SubmissionPolicy,
        transitions: TransitionPolicy,
    ) -> Self {
        Self {
            applications,
            jobs,
            profiles,
            notifier,
            submission,
            transitions,
        }
    }

    /// Submit a new application against an open job.
    ///
    /// Every precondition failure carries its own reason and nothing is
    /// written when any of them trips.
    pub fn submit(
        &self,
        job_id: &JobId,
        applicant: &ProfileId,
        cover_letter: String,
    ) -> Result<Application, ApplicationServiceError> {
        let job = self.jobs.fetch(job_id)?.ok_or(StoreError::NotFound)?;

        auth::ensure_not_job_owner(applicant, &job)?;

        if job.status != JobStatus::Open {
            return Err(SubmissionRejected::JobNotOpen(job.status.label()).into());
        }

        if let Some(deadline) = job.deadline {
            if deadline < Utc::now().date_naive() {
                return Err(SubmissionRejected::DeadlinePassed(deadline).into());
            }
        }

        let length = cover_letter.chars().count();
        if length < self.submission.minimum_cover_letter_chars {
            return Err(SubmissionRejected::CoverLetterTooShort {
                minimum: self.submission.minimum_cover_letter_chars,
                found: length,
            }
            .into());
        }

        // Cheap duplicate pre-check; the store's uniqueness conflict below
        // remains the authoritative answer under concurrent submissions.
        if self.applications.find_for(job_id, applicant)?.is_some() {
            return Err(SubmissionRejected::AlreadyApplied.into());
        }

        let now = Utc::now();
        let application = Application {
            id: next_application_id(),
            job_id: job.id.clone(),
            user_id: applicant.clone(),
            business_id: job.owner_id.clone(),
            cover_letter,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        match self.applications.insert(application) {
            Ok(stored) => Ok(stored),
            Err(StoreError::Conflict) => Err(SubmissionRejected::AlreadyApplied.into()),
            Err(err) => Err(err.into()),
        }
    }

    /// Move an application through its lifecycle.
    ///
    /// The acting profile must be the job owner, or the applicant when the
    /// target is `withdrawn`. On the first move into `accepted` an email to
    /// the applicant is dispatched best-effort after the write commits.
    pub fn set_status(
        &self,
        id: &ApplicationId,
        actor: &ProfileId,
        new_status: ApplicationStatus,
    ) -> Result<Application, ApplicationServiceError> {
        let mut application = self.applications.fetch(id)?.ok_or(StoreError::NotFound)?;

        auth::ensure_status_actor(actor, &application, new_status)?;
        self.transitions
            .check_application(application.status, new_status)?;

        let was_accepted = application.status == ApplicationStatus::Accepted;
        application.status = new_status;
        application.updated_at = Utc::now();
        self.applications.update(application.clone())?;

        if new_status == ApplicationStatus::Accepted && !was_accepted {
            self.notify_applicant(&application);
        }

        Ok(application)
    }

    /// Fetch an application for either party.
    pub fn get(
        &self,
        id: &ApplicationId,
        actor: &ProfileId,
    ) -> Result<Application, ApplicationServiceError> {
        let application = self.applications.fetch(id)?.ok_or(StoreError::NotFound)?;
        auth::ensure_application_party(actor, &application)?;
        Ok(application)
    }

    /// Applications received by a job, visible to its owner only.
    pub fn for_job(
        &self,
        job_id: &JobId,
        actor: &ProfileId,
    ) -> Result<Vec<Application>, ApplicationServiceError> {
        let job = self.jobs.fetch(job_id)?.ok_or(StoreError::NotFound)?;
        auth::ensure_job_owner(actor, &job)?;
        Ok(self.applications.for_job(job_id)?)
    }

    /// The acting profile's own submissions.
    pub fn for_applicant(
        &self,
        actor: &ProfileId,
    ) -> Result<Vec<Application>, ApplicationServiceError> {
        Ok(self.applications.for_applicant(actor)?)
    }

    fn notify_applicant(&self, application: &Application) {
        let email = match self.profiles.fetch(&application.user_id) {
            Ok(Some(profile)) => profile.email,
            Ok(None) => {
                warn!(
                    application = %application.id,
                    "acceptance email skipped: applicant profile missing"
                );
                return;
            }
            Err(err) => {
                warn!(
                    application = %application.id,
                    "acceptance email skipped: {err}"
                );
                return;
            }
        };

        let message = EmailMessage {
            to: email,
            subject: "Your application was accepted".to_string(),
            html_body: format!(
                "<p>Good news: your application for job {} was accepted.</p>",
                application.job_id
            ),
        };

        if let Err(err) = self.notifier.send(message) {
            warn!(application = %application.id, "acceptance email failed: {err}");
        }
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Denied(#[from] AccessDenied),
    #[error(transparent)]
    Rejected(#[from] SubmissionRejected),
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Specific intake rejection reasons.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmissionRejected {
    #[error("job is not accepting applications (status {0})")]
    JobNotOpen(&'static str),
    #[error("application deadline {0} has passed")]
    DeadlinePassed(NaiveDate),
    #[error("an application for this job already exists")]
    AlreadyApplied,
    #[error("cover letter must be at least {minimum} characters (got {found})")]
    CoverLetterTooShort { minimum: usize, found: usize },
}
