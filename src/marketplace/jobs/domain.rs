use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::profiles::domain::ProfileId;

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical posting status. The legacy app mixed two vocabularies between
/// its edit form and its listing badges; this enum is the single one both
/// surfaces now use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    InProgress,
    Completed,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
        }
    }
}

/// A work posting created by a business-role profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub owner_id: ProfileId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub status: JobStatus,
    pub deadline: Option<NaiveDate>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload accepted by the posting form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Owner-editable fields; absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Job {
    pub fn apply(&mut self, patch: JobPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = Some(deadline);
        }
        if let Some(address) = patch.address {
            self.address = Some(address);
        }
    }
}

/// Posting-form validation knobs. The job and item forms historically used
/// different minimum prices, so each module carries its own config rather
/// than a shared constant.
#[derive(Debug, Clone, Copy)]
pub struct JobPostingPolicy {
    pub minimum_price: f64,
}

impl Default for JobPostingPolicy {
    fn default() -> Self {
        Self { minimum_price: 5.0 }
    }
}
