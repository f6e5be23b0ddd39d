use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::jobs::domain::JobId;
use crate::marketplace::profiles::domain::ProfileId;

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status tracked on every application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Accepted | ApplicationStatus::Rejected | ApplicationStatus::Withdrawn
        )
    }
}

/// A customer profile's submission against a job.
///
/// `business_id` is the job owner's id copied at submission time so status
/// mutations can be authorized without re-reading the job. If a job were ever
/// reassigned the copy would go stale; jobs are never reassigned here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub user_id: ProfileId,
    pub business_id: ProfileId,
    pub cover_letter: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn view(&self) -> ApplicationView {
        ApplicationView {
            application_id: self.id.clone(),
            job_id: self.job_id.clone(),
            applicant_id: self.user_id.clone(),
            status: self.status.label(),
            submitted_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Representation of an application's exposed state.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub application_id: ApplicationId,
    pub job_id: JobId,
    pub applicant_id: ProfileId,
    pub status: &'static str,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Intake validation knobs.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionPolicy {
    pub minimum_cover_letter_chars: usize,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self {
            minimum_cover_letter_chars: 100,
        }
    }
}
