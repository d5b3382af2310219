//! Persistence seam between handlers and the database.
//!
//! Handlers only see the repository traits; production wires in [`PgStore`],
//! tests use the in-memory implementation in `memory`.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::forms::{ExperienceDraft, ProfileDraft, ProjectDraft, ServiceDraft, SkillDraft};
use crate::models::{
    Experience, Profile, ProjectWithSkills, Service, Skill, User, UserPreference,
};

pub use postgres::PgStore;

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    /// A write referenced a row that does not exist (e.g. an unknown skill id).
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Admin list filters. Each entity honours the subset that applies to it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListFilter {
    /// Case-insensitive substring search over the entity's text fields.
    pub q: Option<String>,
    pub category: Option<String>,
    pub company: Option<String>,
}

impl ListFilter {
    pub fn search(&self) -> Option<&str> {
        non_blank(self.q.as_deref())
    }

    pub fn category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    pub fn company(&self) -> Option<&str> {
        non_blank(self.company.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PreferenceFilter {
    pub theme: Option<String>,
    pub reduce_motion: Option<bool>,
}

/// One row of the admin preference listing.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct PreferenceListing {
    pub user_id: Uuid,
    pub username: String,
    pub theme: String,
    pub reduce_motion: bool,
}

/// Data needed to create an account; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
}

/// Portfolio content: the profile and the four list entities.
#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    /// The earliest-created profile, if any.
    async fn first_profile(&self) -> StoreResult<Option<Profile>>;
    /// Updates the first profile, creating it when none exists.
    async fn save_profile(&self, draft: ProfileDraft) -> StoreResult<Profile>;
    async fn set_profile_photo(&self, photo_key: &str) -> StoreResult<Profile>;

    async fn list_skills(&self, filter: &ListFilter) -> StoreResult<Vec<Skill>>;
    async fn get_skill(&self, id: Uuid) -> StoreResult<Option<Skill>>;
    async fn create_skill(&self, draft: SkillDraft) -> StoreResult<Skill>;
    async fn update_skill(&self, id: Uuid, draft: SkillDraft) -> StoreResult<Skill>;
    async fn delete_skill(&self, id: Uuid) -> StoreResult<()>;
    async fn set_skill_order(&self, id: Uuid, order: i32) -> StoreResult<Skill>;

    async fn list_projects(&self, filter: &ListFilter) -> StoreResult<Vec<ProjectWithSkills>>;
    async fn get_project(&self, id: Uuid) -> StoreResult<Option<ProjectWithSkills>>;
    async fn create_project(&self, draft: ProjectDraft) -> StoreResult<ProjectWithSkills>;
    async fn update_project(&self, id: Uuid, draft: ProjectDraft)
        -> StoreResult<ProjectWithSkills>;
    async fn delete_project(&self, id: Uuid) -> StoreResult<()>;
    async fn set_project_order(&self, id: Uuid, order: i32) -> StoreResult<ProjectWithSkills>;

    async fn list_experiences(&self, filter: &ListFilter) -> StoreResult<Vec<Experience>>;
    async fn get_experience(&self, id: Uuid) -> StoreResult<Option<Experience>>;
    async fn create_experience(&self, draft: ExperienceDraft) -> StoreResult<Experience>;
    async fn update_experience(&self, id: Uuid, draft: ExperienceDraft)
        -> StoreResult<Experience>;
    async fn delete_experience(&self, id: Uuid) -> StoreResult<()>;
    async fn set_experience_order(&self, id: Uuid, order: i32) -> StoreResult<Experience>;

    async fn list_services(&self, filter: &ListFilter) -> StoreResult<Vec<Service>>;
    async fn get_service(&self, id: Uuid) -> StoreResult<Option<Service>>;
    async fn create_service(&self, draft: ServiceDraft) -> StoreResult<Service>;
    async fn update_service(&self, id: Uuid, draft: ServiceDraft) -> StoreResult<Service>;
    async fn delete_service(&self, id: Uuid) -> StoreResult<()>;
    async fn set_service_order(&self, id: Uuid, order: i32) -> StoreResult<Service>;
}

/// Site accounts and their display preferences.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
    /// Exact (case-sensitive) username match, used for login.
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    /// Case-insensitive check, used for registration.
    async fn username_taken(&self, username: &str) -> StoreResult<bool>;
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Returns the user's preferences, creating the default row on first access.
    async fn preferences(&self, user_id: Uuid) -> StoreResult<UserPreference>;
    async fn save_preferences(&self, prefs: &UserPreference) -> StoreResult<UserPreference>;
    async fn list_preferences(&self, filter: &PreferenceFilter)
        -> StoreResult<Vec<PreferenceListing>>;
}

/// Case-insensitive substring match used by in-process filtering.
pub fn matches_search(needle: &str, haystacks: &[&str]) -> bool {
    let needle = needle.to_lowercase();
    haystacks
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_filters_are_ignored() {
        let filter = ListFilter {
            q: Some("   ".to_string()),
            category: Some(" tool ".to_string()),
            company: None,
        };
        assert_eq!(filter.search(), None);
        assert_eq!(filter.category(), Some("tool"));
    }

    #[test]
    fn test_matches_search_is_case_insensitive() {
        assert!(matches_search("RUST", &["", "Systems in Rust"]));
        assert!(!matches_search("go", &["Rust", "Python"]));
    }
}
