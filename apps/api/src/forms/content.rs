//! Admin payloads for portfolio content.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fields::{
    choice, date_range, display_order, optional_email, optional_text, optional_url,
    required_text, REQUIRED,
};
use super::FieldErrors;
use crate::models::{ServiceCategory, SkillCategory};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileInput {
    pub full_name: String,
    pub title: String,
    pub bio: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub website_url: String,
    pub github_url: String,
    pub linkedin_url: String,
    pub photo_url: String,
    pub resume_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDraft {
    pub full_name: String,
    pub title: String,
    pub bio: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub website_url: String,
    pub github_url: String,
    pub linkedin_url: String,
    pub photo_url: String,
    pub resume_url: String,
}

impl ProfileInput {
    pub fn clean(&self) -> Result<ProfileDraft, FieldErrors> {
        let mut errors = FieldErrors::default();
        let draft = ProfileDraft {
            full_name: required_text(&mut errors, "full_name", &self.full_name, 200),
            title: optional_text(&mut errors, "title", &self.title, 200),
            bio: self.bio.trim().to_string(),
            location: optional_text(&mut errors, "location", &self.location, 120),
            email: optional_email(&mut errors, "email", &self.email),
            phone: optional_text(&mut errors, "phone", &self.phone, 50),
            website_url: optional_url(&mut errors, "website_url", &self.website_url),
            github_url: optional_url(&mut errors, "github_url", &self.github_url),
            linkedin_url: optional_url(&mut errors, "linkedin_url", &self.linkedin_url),
            photo_url: optional_url(&mut errors, "photo_url", &self.photo_url),
            resume_url: optional_url(&mut errors, "resume_url", &self.resume_url),
        };
        errors.finish(draft)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillInput {
    pub name: String,
    pub level: String,
    pub category: Option<String>,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillDraft {
    pub name: String,
    pub level: String,
    pub category: SkillCategory,
    pub order: i32,
}

impl SkillInput {
    pub fn clean(&self) -> Result<SkillDraft, FieldErrors> {
        let mut errors = FieldErrors::default();
        let category = match self.category.as_deref() {
            Some(code) => choice(
                &mut errors,
                "category",
                code,
                SkillCategory::parse,
                SkillCategory::default(),
            ),
            None => SkillCategory::default(),
        };
        let draft = SkillDraft {
            name: required_text(&mut errors, "name", &self.name, 100),
            level: optional_text(&mut errors, "level", &self.level, 50),
            category,
            order: display_order(&mut errors, "order", self.order),
        };
        errors.finish(draft)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    pub project_url: String,
    pub repo_url: String,
    pub image_url: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub skill_ids: Vec<Uuid>,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub project_url: String,
    pub repo_url: String,
    pub image_url: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Deduplicated, in submission order.
    pub skill_ids: Vec<Uuid>,
    pub order: i32,
}

impl ProjectInput {
    pub fn clean(&self) -> Result<ProjectDraft, FieldErrors> {
        let mut errors = FieldErrors::default();
        date_range(&mut errors, "end_date", self.start_date, self.end_date);

        let mut skill_ids = Vec::with_capacity(self.skill_ids.len());
        for id in &self.skill_ids {
            if !skill_ids.contains(id) {
                skill_ids.push(*id);
            }
        }

        let draft = ProjectDraft {
            title: required_text(&mut errors, "title", &self.title, 200),
            description: self.description.trim().to_string(),
            project_url: optional_url(&mut errors, "project_url", &self.project_url),
            repo_url: optional_url(&mut errors, "repo_url", &self.repo_url),
            image_url: optional_url(&mut errors, "image_url", &self.image_url),
            start_date: self.start_date,
            end_date: self.end_date,
            skill_ids,
            order: display_order(&mut errors, "order", self.order),
        };
        errors.finish(draft)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceInput {
    pub company: String,
    pub role: String,
    pub location: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: String,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceDraft {
    pub company: String,
    pub role: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: String,
    pub order: i32,
}

impl ExperienceInput {
    pub fn clean(&self) -> Result<ExperienceDraft, FieldErrors> {
        let mut errors = FieldErrors::default();
        let company = required_text(&mut errors, "company", &self.company, 200);
        let role = required_text(&mut errors, "role", &self.role, 200);
        let location = optional_text(&mut errors, "location", &self.location, 120);
        let order = display_order(&mut errors, "order", self.order);
        date_range(&mut errors, "end_date", self.start_date, self.end_date);

        let Some(start_date) = self.start_date else {
            errors.add("start_date", REQUIRED);
            return Err(errors);
        };

        errors.finish(ExperienceDraft {
            company,
            role,
            location,
            start_date,
            end_date: self.end_date,
            description: self.description.trim().to_string(),
            order,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceInput {
    pub title: String,
    pub summary: String,
    pub icon: String,
    pub price: String,
    pub category: Option<String>,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDraft {
    pub title: String,
    pub summary: String,
    pub icon: String,
    pub price: String,
    pub category: ServiceCategory,
    pub order: i32,
}

impl ServiceInput {
    pub fn clean(&self) -> Result<ServiceDraft, FieldErrors> {
        let mut errors = FieldErrors::default();
        let category = match self.category.as_deref() {
            Some(code) => choice(
                &mut errors,
                "category",
                code,
                ServiceCategory::parse,
                ServiceCategory::default(),
            ),
            None => ServiceCategory::default(),
        };
        let draft = ServiceDraft {
            title: required_text(&mut errors, "title", &self.title, 200),
            summary: self.summary.trim().to_string(),
            icon: optional_text(&mut errors, "icon", &self.icon, 32),
            price: optional_text(&mut errors, "price", &self.price, 100),
            category,
            order: display_order(&mut errors, "order", self.order),
        };
        errors.finish(draft)
    }
}

/// Body of the `PATCH .../order` endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderUpdate {
    pub order: i32,
}

impl OrderUpdate {
    pub fn clean(&self) -> Result<i32, FieldErrors> {
        let mut errors = FieldErrors::default();
        let order = display_order(&mut errors, "order", self.order);
        errors.finish(order)
    }
}
