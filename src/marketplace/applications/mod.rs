//! Application store and lifecycle: submissions by customer profiles against
//! open jobs, moved through `pending -> reviewed -> accepted/rejected` (or
//! withdrawn by the applicant) under the access rules.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationView, SubmissionPolicy,
};
pub use repository::{ApplicationRepository, EmailMessage, EmailNotifier, NotifyError};
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError, SubmissionRejected};
