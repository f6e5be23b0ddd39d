//! In-memory implementations of the external collaborators: the relational
//! store tables, the blob buckets, and the email transport.
//!
//! They back the runnable binary and the test suites; a deployment against
//! the hosted BaaS swaps these for adapters over its client without touching
//! the services.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::marketplace::applications::domain::{Application, ApplicationId};
use crate::marketplace::applications::repository::{
    ApplicationRepository, EmailMessage, EmailNotifier, NotifyError,
};
use crate::marketplace::items::domain::{Item, ItemId};
use crate::marketplace::items::repository::{ItemFilter, ItemRepository};
use crate::marketplace::jobs::domain::{Job, JobId};
use crate::marketplace::jobs::repository::{JobFilter, JobRepository};
use crate::marketplace::profiles::domain::{Profile, ProfileId};
use crate::marketplace::profiles::repository::ProfileRepository;
use crate::marketplace::storage::{BlobError, BlobRef, BlobStore};
use crate::marketplace::store::StoreError;

#[derive(Default, Clone)]
pub struct InMemoryProfileStore {
    records: Arc<Mutex<HashMap<ProfileId, Profile>>>,
}

impl ProfileRepository for InMemoryProfileStore {
    fn insert(&self, profile: Profile) -> Result<Profile, StoreError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        if guard.contains_key(&profile.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn update(&self, profile: Profile) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        if guard.contains_key(&profile.id) {
            guard.insert(profile.id.clone(), profile);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn increment_views(&self, id: &ProfileId) -> Result<u64, StoreError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        let profile = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        profile.view_count += 1;
        Ok(profile.view_count)
    }

    fn visible(&self) -> Result<Vec<Profile>, StoreError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        let mut profiles: Vec<_> = guard
            .values()
            .filter(|profile| profile.visible)
            .cloned()
            .collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(profiles)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryJobStore {
    records: Arc<Mutex<HashMap<JobId, Job>>>,
}

impl JobRepository for InMemoryJobStore {
    fn insert(&self, job: Job) -> Result<Job, StoreError> {
        let mut guard = self.records.lock().expect("job mutex poisoned");
        if guard.contains_key(&job.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn update(&self, job: Job) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("job mutex poisoned");
        if guard.contains_key(&job.id) {
            guard.insert(job.id.clone(), job);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn fetch(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        let guard = self.records.lock().expect("job mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &JobId) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("job mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    fn list(&self, filter: &JobFilter) -> Result<Vec<Job>, StoreError> {
        let guard = self.records.lock().expect("job mutex poisoned");
        let mut jobs: Vec<_> = guard
            .values()
            .filter(|job| filter.status.map_or(true, |status| job.status == status))
            .filter(|job| {
                filter
                    .category
                    .as_ref()
                    .map_or(true, |category| &job.category == category)
            })
            .filter(|job| {
                filter
                    .owner
                    .as_ref()
                    .map_or(true, |owner| &job.owner_id == owner)
            })
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryApplicationStore {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for InMemoryApplicationStore {
    fn insert(&self, application: Application) -> Result<Application, StoreError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        // Unique constraint on (job_id, user_id), mirrored from the table
        // definition.
        let duplicate = guard.values().any(|existing| {
            existing.job_id == application.job_id && existing.user_id == application.user_id
        });
        if duplicate || guard.contains_key(&application.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        if guard.contains_key(&application.id) {
            guard.insert(application.id.clone(), application);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_for(
        &self,
        job: &JobId,
        applicant: &ProfileId,
    ) -> Result<Option<Application>, StoreError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard
            .values()
            .find(|application| &application.job_id == job && &application.user_id == applicant)
            .cloned())
    }

    fn for_job(&self, job: &JobId) -> Result<Vec<Application>, StoreError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        let mut applications: Vec<_> = guard
            .values()
            .filter(|application| &application.job_id == job)
            .cloned()
            .collect();
        applications.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(applications)
    }

    fn for_applicant(&self, applicant: &ProfileId) -> Result<Vec<Application>, StoreError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        let mut applications: Vec<_> = guard
            .values()
            .filter(|application| &application.user_id == applicant)
            .cloned()
            .collect();
        applications.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(applications)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryItemStore {
    records: Arc<Mutex<HashMap<ItemId, Item>>>,
}

impl ItemRepository for InMemoryItemStore {
    fn insert(&self, item: Item) -> Result<Item, StoreError> {
        let mut guard = self.records.lock().expect("item mutex poisoned");
        if guard.contains_key(&item.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    fn update(&self, item: Item) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("item mutex poisoned");
        if guard.contains_key(&item.id) {
            guard.insert(item.id.clone(), item);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn fetch(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        let guard = self.records.lock().expect("item mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &ItemId) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("item mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    fn list(&self, filter: &ItemFilter) -> Result<Vec<Item>, StoreError> {
        let guard = self.records.lock().expect("item mutex poisoned");
        let mut items: Vec<_> = guard
            .values()
            .filter(|item| {
                filter
                    .category
                    .as_ref()
                    .map_or(true, |category| &item.category == category)
            })
            .filter(|item| {
                filter
                    .condition
                    .map_or(true, |condition| item.condition == condition)
            })
            .filter(|item| filter.max_price.map_or(true, |max| item.price <= max))
            .filter(|item| {
                filter
                    .seller
                    .as_ref()
                    .map_or(true, |seller| &item.user_id == seller)
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryBlobStore {
    objects: Arc<Mutex<HashMap<(String, String), Vec<u8>>>>,
}

impl BlobStore for InMemoryBlobStore {
    fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>) -> Result<BlobRef, BlobError> {
        let mut guard = self.objects.lock().expect("blob mutex poisoned");
        guard.insert((bucket.to_string(), path.to_string()), bytes);
        Ok(BlobRef {
            bucket: bucket.to_string(),
            path: path.to_string(),
        })
    }

    fn public_url(&self, blob: &BlobRef) -> String {
        format!("memory://{}/{}", blob.bucket, blob.path)
    }

    fn delete(&self, blob: &BlobRef) -> Result<(), BlobError> {
        let mut guard = self.objects.lock().expect("blob mutex poisoned");
        guard
            .remove(&(blob.bucket.clone(), blob.path.clone()))
            .map(|_| ())
            .ok_or(BlobError::NotFound)
    }
}

/// Records every message and logs it; stands in for the outbound mail
/// collaborator.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<EmailMessage>>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<EmailMessage> {
        self.messages.lock().expect("notifier mutex poisoned").clone()
    }
}

impl EmailNotifier for RecordingNotifier {
    fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        info!(to = %message.to, subject = %message.subject, "email dispatched");
        self.messages
            .lock()
            .expect("notifier mutex poisoned")
            .push(message);
        Ok(())
    }
}

/// Notifier that always fails; used to verify that email problems never
/// surface to callers.
#[derive(Default, Clone)]
pub struct FailingNotifier;

impl EmailNotifier for FailingNotifier {
    fn send(&self, _message: EmailMessage) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay offline".to_string()))
    }
}
