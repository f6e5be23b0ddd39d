use super::domain::{Job, JobId, JobStatus};
use crate::marketplace::profiles::domain::ProfileId;
use crate::marketplace::store::StoreError;

/// Listing filters; `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub category: Option<String>,
    pub owner: Option<ProfileId>,
}

/// Storage abstraction for the job table.
pub trait JobRepository: Send + Sync {
    fn insert(&self, job: Job) -> Result<Job, StoreError>;
    fn update(&self, job: Job) -> Result<(), StoreError>;
    fn fetch(&self, id: &JobId) -> Result<Option<Job>, StoreError>;
    /// Hard delete; dependent applications are left in place (no cascade).
    fn delete(&self, id: &JobId) -> Result<(), StoreError>;
    /// Newest first.
    fn list(&self, filter: &JobFilter) -> Result<Vec<Job>, StoreError>;
}
