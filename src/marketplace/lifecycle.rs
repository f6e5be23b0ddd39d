//! Status transition tables for applications and job postings.
//!
//! The legacy app let owners overwrite either status field with any value.
//! The tables below are enforced by default, but the guard stays switchable
//! because the source never settled whether free-form overwrite (e.g. to
//! un-reject an applicant) was intentional.

use crate::marketplace::applications::domain::ApplicationStatus;
use crate::marketplace::jobs::domain::JobStatus;

/// Controls whether the lifecycle controller rejects moves outside the
/// transition tables.
#[derive(Debug, Clone, Copy)]
pub struct TransitionPolicy {
    pub enforce_guard: bool,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self::guarded()
    }
}

impl TransitionPolicy {
    pub const fn guarded() -> Self {
        Self {
            enforce_guard: true,
        }
    }

    /// Legacy behavior: any status may be overwritten with any other once
    /// the access rules pass.
    pub const fn free_form() -> Self {
        Self {
            enforce_guard: false,
        }
    }

    pub fn check_application(
        &self,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<(), InvalidTransition> {
        if !self.enforce_guard || application_transition_allowed(from, to) {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: from.label(),
                to: to.label(),
            })
        }
    }

    pub fn check_job(&self, from: JobStatus, to: JobStatus) -> Result<(), InvalidTransition> {
        if !self.enforce_guard || job_transition_allowed(from, to) {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: from.label(),
                to: to.label(),
            })
        }
    }
}

/// Rejected move between two statuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot move status from {from} to {to}")]
pub struct InvalidTransition {
    pub from: &'static str,
    pub to: &'static str,
}

/// `pending -> {reviewed, accepted, rejected}`, `reviewed -> {accepted,
/// rejected}`, any non-withdrawn state -> `withdrawn`.
fn application_transition_allowed(from: ApplicationStatus, to: ApplicationStatus) -> bool {
    use ApplicationStatus::*;

    match (from, to) {
        (Withdrawn, _) => false,
        (_, Withdrawn) => true,
        (Pending, Reviewed | Accepted | Rejected) => true,
        (Reviewed, Accepted | Rejected) => true,
        _ => false,
    }
}

/// `open -> in_progress -> completed`.
fn job_transition_allowed(from: JobStatus, to: JobStatus) -> bool {
    matches!(
        (from, to),
        (JobStatus::Open, JobStatus::InProgress) | (JobStatus::InProgress, JobStatus::Completed)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;

    #[test]
    fn guarded_policy_follows_the_application_table() {
        let policy = TransitionPolicy::guarded();

        assert!(policy.check_application(Pending, Reviewed).is_ok());
        assert!(policy.check_application(Pending, Accepted).is_ok());
        assert!(policy.check_application(Pending, Rejected).is_ok());
        assert!(policy.check_application(Reviewed, Accepted).is_ok());
        assert!(policy.check_application(Reviewed, Rejected).is_ok());

        assert_eq!(
            policy.check_application(Accepted, Rejected),
            Err(InvalidTransition {
                from: "accepted",
                to: "rejected",
            })
        );
        assert!(policy.check_application(Rejected, Accepted).is_err());
        assert!(policy.check_application(Reviewed, Pending).is_err());
        assert!(policy.check_application(Pending, Pending).is_err());
    }

    #[test]
    fn any_live_application_can_be_withdrawn() {
        let policy = TransitionPolicy::guarded();

        for from in [Pending, Reviewed, Accepted, Rejected] {
            assert!(policy.check_application(from, Withdrawn).is_ok());
        }
        assert!(policy.check_application(Withdrawn, Withdrawn).is_err());
        assert!(policy.check_application(Withdrawn, Pending).is_err());
    }

    #[test]
    fn free_form_policy_accepts_everything() {
        let policy = TransitionPolicy::free_form();

        assert!(policy.check_application(Withdrawn, Accepted).is_ok());
        assert!(policy.check_application(Rejected, Accepted).is_ok());
        assert!(policy
            .check_job(JobStatus::Completed, JobStatus::Open)
            .is_ok());
    }

    #[test]
    fn job_postings_move_forward_only() {
        let policy = TransitionPolicy::guarded();

        assert!(policy
            .check_job(JobStatus::Open, JobStatus::InProgress)
            .is_ok());
        assert!(policy
            .check_job(JobStatus::InProgress, JobStatus::Completed)
            .is_ok());
        assert_eq!(
            policy.check_job(JobStatus::Open, JobStatus::Completed),
            Err(InvalidTransition {
                from: "open",
                to: "completed",
            })
        );
        assert!(policy
            .check_job(JobStatus::Completed, JobStatus::Open)
            .is_err());
    }
}
