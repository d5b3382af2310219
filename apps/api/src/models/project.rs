use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Skill;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub project_url: String,
    pub repo_url: String,
    pub image_url: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
}

/// A project together with the skills it is tagged with, in skill display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectWithSkills {
    #[serde(flatten)]
    pub project: Project,
    pub skills: Vec<Skill>,
}
