use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::storage::BlobRef;

/// Identifier wrapper for registered profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub String);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role fixed at signup; gates who may post jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    Customer,
    Business,
}

impl ProfileRole {
    pub const fn label(self) -> &'static str {
        match self {
            ProfileRole::Customer => "customer",
            ProfileRole::Business => "business",
        }
    }
}

/// Links surfaced on the public profile page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

/// One record per registered user. Mutated only by its owner, except the
/// view counter which any viewer bumps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: ProfileRole,
    pub visible: bool,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<BlobRef>,
    pub social_links: SocialLinks,
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
}

fn default_visible() -> bool {
    true
}

/// Payload accepted at signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: ProfileRole,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub social_links: SocialLinks,
}

/// Owner-editable fields; absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub social_links: Option<SocialLinks>,
}

impl Profile {
    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(bio) = patch.bio {
            self.bio = Some(bio);
        }
        if let Some(location) = patch.location {
            self.location = Some(location);
        }
        if let Some(social_links) = patch.social_links {
            self.social_links = social_links;
        }
    }

    /// Public representation returned by the API.
    pub fn view(&self, avatar_url: Option<String>) -> ProfileView {
        ProfileView {
            id: self.id.clone(),
            name: self.name.clone(),
            role: self.role.label(),
            visible: self.visible,
            bio: self.bio.clone(),
            location: self.location.clone(),
            avatar_url,
            social_links: self.social_links.clone(),
            view_count: self.view_count,
        }
    }
}

/// Sanitized profile representation; contact details stay off the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub id: ProfileId,
    pub name: String,
    pub role: &'static str,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub social_links: SocialLinks,
    pub view_count: u64,
}
