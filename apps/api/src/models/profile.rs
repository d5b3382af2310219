use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The portfolio owner's biographical record. The site shows the earliest-created one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub title: String,
    pub bio: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub website_url: String,
    pub github_url: String,
    pub linkedin_url: String,
    /// Object key of an uploaded photo, e.g. `profiles/<uuid>.jpg`.
    pub photo_key: Option<String>,
    pub photo_url: String,
    pub resume_url: String,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// The photo to display: an explicit URL wins over an uploaded file.
    pub fn display_photo_url(&self, media_base_url: &str) -> Option<String> {
        if !self.photo_url.is_empty() {
            return Some(self.photo_url.clone());
        }
        self.photo_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(|key| format!("{}/{}", media_base_url.trim_end_matches('/'), key))
    }

    /// Splits the full name into (first, last) the way contact cards expect.
    /// A single-word name has no last name.
    pub fn name_parts(&self) -> (&str, &str) {
        let mut parts = self.full_name.split_whitespace();
        let first = parts.next().unwrap_or("");
        let last = parts.last().unwrap_or("");
        (first, last)
    }
}

#[cfg(test)]
pub(crate) fn sample_profile() -> Profile {
    Profile {
        id: Uuid::new_v4(),
        full_name: "Ada King Lovelace".to_string(),
        title: "Analyst".to_string(),
        bio: "Wrote the first published algorithm.".to_string(),
        location: "London".to_string(),
        email: "ada@example.com".to_string(),
        phone: "+44 20 7946 0000".to_string(),
        website_url: "https://ada.example.com".to_string(),
        github_url: "https://github.com/ada".to_string(),
        linkedin_url: String::new(),
        photo_key: None,
        photo_url: String::new(),
        resume_url: String::new(),
        created_at: Utc::now(),
    }
}
