use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::infra::{
    InMemoryApplicationStore, InMemoryJobStore, InMemoryProfileStore, RecordingNotifier,
};
use crate::marketplace::applications::domain::SubmissionPolicy;
use crate::marketplace::applications::service::ApplicationService;
use crate::marketplace::jobs::domain::{Job, JobId, JobStatus};
use crate::marketplace::jobs::repository::JobRepository;
use crate::marketplace::lifecycle::TransitionPolicy;
use crate::marketplace::profiles::domain::{Profile, ProfileId, ProfileRole};
use crate::marketplace::profiles::repository::ProfileRepository;

pub(super) type TestApplicationService = ApplicationService<
    InMemoryApplicationStore,
    InMemoryJobStore,
    InMemoryProfileStore,
    RecordingNotifier,
>;

pub(super) struct Harness {
    pub service: TestApplicationService,
    pub applications: Arc<InMemoryApplicationStore>,
    pub jobs: Arc<InMemoryJobStore>,
    pub profiles: Arc<InMemoryProfileStore>,
    pub notifier: Arc<RecordingNotifier>,
}

pub(super) fn harness() -> Harness {
    harness_with_policy(TransitionPolicy::guarded())
}

pub(super) fn harness_with_policy(transitions: TransitionPolicy) -> Harness {
    let applications = Arc::new(InMemoryApplicationStore::default());
    let jobs = Arc::new(InMemoryJobStore::default());
    let profiles = Arc::new(InMemoryProfileStore::default());
    let notifier = Arc::new(RecordingNotifier::default());

    let service = ApplicationService::new(
        applications.clone(),
        jobs.clone(),
        profiles.clone(),
        notifier.clone(),
        SubmissionPolicy::default(),
        transitions,
    );

    Harness {
        service,
        applications,
        jobs,
        profiles,
        notifier,
    }
}

pub(super) fn profile(id: &str, role: ProfileRole) -> Profile {
    Profile {
        id: ProfileId(id.to_string()),
        name: id.to_string(),
        email: format!("{id}@example.com"),
        phone: None,
        role,
        visible: true,
        bio: None,
        location: None,
        avatar: None,
        social_links: Default::default(),
        view_count: 0,
        created_at: Utc::now(),
    }
}

pub(super) fn job(id: &str, owner: &str, status: JobStatus) -> Job {
    Job {
        id: JobId(id.to_string()),
        owner_id: ProfileId(owner.to_string()),
        title: "Logo".to_string(),
        description: "Design a logo for our storefront".to_string(),
        price: 50.0,
        category: "design".to_string(),
        status,
        deadline: None,
        address: None,
        created_at: Utc::now(),
    }
}

/// Business `p1` owns open job `job-1`; customer `p2` is ready to apply.
pub(super) fn seed_open_job(harness: &Harness) -> (ProfileId, ProfileId, JobId) {
    harness
        .profiles
        .insert(profile("p1", ProfileRole::Business))
        .expect("business inserted");
    harness
        .profiles
        .insert(profile("p2", ProfileRole::Customer))
        .expect("customer inserted");
    harness
        .jobs
        .insert(job("job-1", "p1", JobStatus::Open))
        .expect("job inserted");

    (
        ProfileId("p1".to_string()),
        ProfileId("p2".to_string()),
        JobId("job-1".to_string()),
    )
}

pub(super) fn cover_letter(chars: usize) -> String {
    "x".repeat(chars)
}

pub(super) fn yesterday() -> chrono::NaiveDate {
    Utc::now().date_naive() - Duration::days(1)
}

pub(super) fn tomorrow() -> chrono::NaiveDate {
    Utc::now().date_naive() + Duration::days(1)
}
