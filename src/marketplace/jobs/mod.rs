//! Job store: postings created by business-role profiles.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Job, JobDraft, JobId, JobPatch, JobPostingPolicy, JobStatus};
pub use repository::{JobFilter, JobRepository};
pub use router::job_router;
pub use service::{JobService, JobServiceError, JobValidationError};
