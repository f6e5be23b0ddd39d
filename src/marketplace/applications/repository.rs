use serde::{Deserialize, Serialize};

use super::domain::{Application, ApplicationId};
use crate::marketplace::jobs::domain::JobId;
use crate::marketplace::profiles::domain::ProfileId;
use crate::marketplace::store::StoreError;

/// Storage abstraction for the application table.
///
/// Implementations must enforce uniqueness of `(job_id, user_id)` at insert
/// time and report a duplicate as `StoreError::Conflict`; that conflict is
/// the source of truth for the duplicate-application rule. The service's
/// read-before-insert check is an optimization only and cannot close the
/// race between concurrent submissions.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, StoreError>;
    fn update(&self, application: Application) -> Result<(), StoreError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError>;
    fn find_for(
        &self,
        job: &JobId,
        applicant: &ProfileId,
    ) -> Result<Option<Application>, StoreError>;
    fn for_job(&self, job: &JobId) -> Result<Vec<Application>, StoreError>;
    fn for_applicant(&self, applicant: &ProfileId) -> Result<Vec<Application>, StoreError>;
}

/// Outbound email hook. Delivery is best-effort: the caller logs a failure
/// and moves on, never blocking or retrying the primary mutation.
pub trait EmailNotifier: Send + Sync {
    fn send(&self, message: EmailMessage) -> Result<(), NotifyError>;
}

/// Payload handed to the email collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Email dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("email transport unavailable: {0}")]
    Transport(String),
}
