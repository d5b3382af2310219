use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use super::{
    AccountRepository, ListFilter, NewUser, PortfolioRepository, PreferenceFilter,
    PreferenceListing, StoreError, StoreResult,
};
use crate::forms::{ExperienceDraft, ProfileDraft, ProjectDraft, ServiceDraft, SkillDraft};
use crate::models::{
    Experience, Profile, Project, ProjectWithSkills, Service, Skill, User, UserPreference,
};

const PROFILE_COLUMNS: &str = "id, full_name, title, bio, location, email, phone, website_url, \
     github_url, linkedin_url, photo_key, photo_url, resume_url, created_at";
const SKILL_COLUMNS: &str = "id, name, level, category, sort_order";
const PROJECT_COLUMNS: &str =
    "id, title, description, project_url, repo_url, image_url, start_date, end_date, sort_order";
const EXPERIENCE_COLUMNS: &str =
    "id, company, role, location, start_date, end_date, description, sort_order";
const SERVICE_COLUMNS: &str = "id, title, summary, icon, price, category, sort_order";
const USER_COLUMNS: &str = "id, username, email, password_hash, is_staff, created_at";
const PREFERENCE_COLUMNS: &str = "user_id, theme, reduce_motion, accent, density, \
     default_section, show_email, show_phone";

/// PostgreSQL-backed implementation of both repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn attach_skills(&self, projects: Vec<Project>) -> StoreResult<Vec<ProjectWithSkills>> {
        if projects.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
        let rows: Vec<ProjectSkillRow> = sqlx::query_as(
            r#"
            SELECT ps.project_id, s.id, s.name, s.level, s.category, s.sort_order
            FROM project_skills ps
            JOIN skills s ON s.id = ps.skill_id
            WHERE ps.project_id = ANY($1)
            ORDER BY s.sort_order, s.name
            "#,
        )
        .bind(ids.as_slice())
        .fetch_all(&self.pool)
        .await?;

        let mut by_project: HashMap<Uuid, Vec<Skill>> = HashMap::new();
        for row in rows {
            by_project.entry(row.project_id).or_default().push(row.skill);
        }

        Ok(projects
            .into_iter()
            .map(|project| {
                let skills = by_project.remove(&project.id).unwrap_or_default();
                ProjectWithSkills { project, skills }
            })
            .collect())
    }

    async fn load_project(&self, id: Uuid) -> StoreResult<Option<ProjectWithSkills>> {
        let project: Option<Project> =
            sqlx::query_as(&format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        match project {
            Some(project) => Ok(self.attach_skills(vec![project]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProjectSkillRow {
    project_id: Uuid,
    #[sqlx(flatten)]
    skill: Skill,
}

/// `%term%` for ILIKE, with the pattern metacharacters escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Maps constraint violations onto store errors; everything else stays a database error.
fn classify(err: sqlx::Error, what: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        match db.code().as_deref() {
            Some("23505") => return StoreError::Conflict(format!("{what} already exists")),
            Some("23503") => {
                return StoreError::InvalidReference(format!("{what} references a missing record"))
            }
            _ => {}
        }
    }
    StoreError::Database(err)
}

async fn replace_project_skills(
    tx: &mut Transaction<'_, Postgres>,
    project_id: Uuid,
    skill_ids: &[Uuid],
) -> StoreResult<()> {
    sqlx::query("DELETE FROM project_skills WHERE project_id = $1")
        .bind(project_id)
        .execute(&mut **tx)
        .await?;
    if skill_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO project_skills (project_id, skill_id) SELECT $1, UNNEST($2::uuid[])",
    )
    .bind(project_id)
    .bind(skill_ids)
    .execute(&mut **tx)
    .await
    .map_err(|e| classify(e, "Project skill"))?;
    Ok(())
}

fn affected_one(rows: u64) -> StoreResult<()> {
    if rows == 0 {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}

#[async_trait]
impl PortfolioRepository for PgStore {
    async fn first_profile(&self) -> StoreResult<Option<Profile>> {
        Ok(sqlx::query_as(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at, id LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn save_profile(&self, draft: ProfileDraft) -> StoreResult<Profile> {
        let mut tx = self.pool.begin().await?;
        let existing: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM profiles ORDER BY created_at, id LIMIT 1 FOR UPDATE",
        )
        .fetch_optional(&mut *tx)
        .await?;

        let query = match existing {
            Some(_) => format!(
                r#"
                UPDATE profiles SET
                    full_name = $2, title = $3, bio = $4, location = $5, email = $6,
                    phone = $7, website_url = $8, github_url = $9, linkedin_url = $10,
                    photo_url = $11, resume_url = $12
                WHERE id = $1
                RETURNING {PROFILE_COLUMNS}
                "#
            ),
            None => format!(
                r#"
                INSERT INTO profiles
                    (id, full_name, title, bio, location, email, phone, website_url,
                     github_url, linkedin_url, photo_url, resume_url)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                RETURNING {PROFILE_COLUMNS}
                "#
            ),
        };

        let profile: Profile = sqlx::query_as(&query)
            .bind(existing.unwrap_or_else(Uuid::new_v4))
            .bind(&draft.full_name)
            .bind(&draft.title)
            .bind(&draft.bio)
            .bind(&draft.location)
            .bind(&draft.email)
            .bind(&draft.phone)
            .bind(&draft.website_url)
            .bind(&draft.github_url)
            .bind(&draft.linkedin_url)
            .bind(&draft.photo_url)
            .bind(&draft.resume_url)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("Saved profile {} ({})", profile.id, profile.full_name);
        Ok(profile)
    }

    async fn set_profile_photo(&self, photo_key: &str) -> StoreResult<Profile> {
        let profile: Option<Profile> = sqlx::query_as(&format!(
            r#"
            UPDATE profiles SET photo_key = $1
            WHERE id = (SELECT id FROM profiles ORDER BY created_at, id LIMIT 1)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(photo_key)
        .fetch_optional(&self.pool)
        .await?;
        profile.ok_or(StoreError::NotFound)
    }

    async fn list_skills(&self, filter: &ListFilter) -> StoreResult<Vec<Skill>> {
        Ok(sqlx::query_as(&format!(
            r#"
            SELECT {SKILL_COLUMNS} FROM skills
            WHERE ($1::text IS NULL OR name ILIKE $1)
              AND ($2::text IS NULL OR category = $2)
            ORDER BY sort_order, name
            "#
        ))
        .bind(filter.search().map(like_pattern))
        .bind(filter.category())
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_skill(&self, id: Uuid) -> StoreResult<Option<Skill>> {
        Ok(
            sqlx::query_as(&format!("SELECT {SKILL_COLUMNS} FROM skills WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_skill(&self, draft: SkillDraft) -> StoreResult<Skill> {
        let skill: Skill = sqlx::query_as(&format!(
            r#"
            INSERT INTO skills (id, name, level, category, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SKILL_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&draft.name)
        .bind(&draft.level)
        .bind(draft.category.code())
        .bind(draft.order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, "Skill with this name"))?;
        info!("Created skill {} ({})", skill.id, skill.name);
        Ok(skill)
    }

    async fn update_skill(&self, id: Uuid, draft: SkillDraft) -> StoreResult<Skill> {
        let skill: Option<Skill> = sqlx::query_as(&format!(
            r#"
            UPDATE skills SET name = $2, level = $3, category = $4, sort_order = $5
            WHERE id = $1
            RETURNING {SKILL_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.level)
        .bind(draft.category.code())
        .bind(draft.order)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify(e, "Skill with this name"))?;
        skill.ok_or(StoreError::NotFound)
    }

    async fn delete_skill(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        affected_one(result.rows_affected())?;
        info!("Deleted skill {id}");
        Ok(())
    }

    async fn set_skill_order(&self, id: Uuid, order: i32) -> StoreResult<Skill> {
        let skill: Option<Skill> = sqlx::query_as(&format!(
            "UPDATE skills SET sort_order = $2 WHERE id = $1 RETURNING {SKILL_COLUMNS}"
        ))
        .bind(id)
        .bind(order)
        .fetch_optional(&self.pool)
        .await?;
        skill.ok_or(StoreError::NotFound)
    }

    async fn list_projects(&self, filter: &ListFilter) -> StoreResult<Vec<ProjectWithSkills>> {
        let projects: Vec<Project> = sqlx::query_as(&format!(
            r#"
            SELECT {PROJECT_COLUMNS} FROM projects
            WHERE ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1)
            ORDER BY sort_order, start_date DESC NULLS FIRST, title
            "#
        ))
        .bind(filter.search().map(like_pattern))
        .fetch_all(&self.pool)
        .await?;
        self.attach_skills(projects).await
    }

    async fn get_project(&self, id: Uuid) -> StoreResult<Option<ProjectWithSkills>> {
        self.load_project(id).await
    }

    async fn create_project(&self, draft: ProjectDraft) -> StoreResult<ProjectWithSkills> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO projects
                (id, title, description, project_url, repo_url, image_url,
                 start_date, end_date, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.project_url)
        .bind(&draft.repo_url)
        .bind(&draft.image_url)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .bind(draft.order)
        .execute(&mut *tx)
        .await?;
        replace_project_skills(&mut tx, id, &draft.skill_ids).await?;
        tx.commit().await?;

        info!("Created project {id} ({})", draft.title);
        self.load_project(id).await?.ok_or(StoreError::NotFound)
    }

    async fn update_project(
        &self,
        id: Uuid,
        draft: ProjectDraft,
    ) -> StoreResult<ProjectWithSkills> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE projects SET
                title = $2, description = $3, project_url = $4, repo_url = $5,
                image_url = $6, start_date = $7, end_date = $8, sort_order = $9
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.project_url)
        .bind(&draft.repo_url)
        .bind(&draft.image_url)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .bind(draft.order)
        .execute(&mut *tx)
        .await?;
        affected_one(result.rows_affected())?;
        replace_project_skills(&mut tx, id, &draft.skill_ids).await?;
        tx.commit().await?;

        self.load_project(id).await?.ok_or(StoreError::NotFound)
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        affected_one(result.rows_affected())?;
        info!("Deleted project {id}");
        Ok(())
    }

    async fn set_project_order(&self, id: Uuid, order: i32) -> StoreResult<ProjectWithSkills> {
        let result = sqlx::query("UPDATE projects SET sort_order = $2 WHERE id = $1")
            .bind(id)
            .bind(order)
            .execute(&self.pool)
            .await?;
        affected_one(result.rows_affected())?;
        self.load_project(id).await?.ok_or(StoreError::NotFound)
    }

    async fn list_experiences(&self, filter: &ListFilter) -> StoreResult<Vec<Experience>> {
        Ok(sqlx::query_as(&format!(
            r#"
            SELECT {EXPERIENCE_COLUMNS} FROM experiences
            WHERE ($1::text IS NULL OR role ILIKE $1 OR company ILIKE $1 OR description ILIKE $1)
              AND ($2::text IS NULL OR company = $2)
            ORDER BY sort_order, start_date DESC
            "#
        ))
        .bind(filter.search().map(like_pattern))
        .bind(filter.company())
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_experience(&self, id: Uuid) -> StoreResult<Option<Experience>> {
        Ok(sqlx::query_as(&format!(
            "SELECT {EXPERIENCE_COLUMNS} FROM experiences WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_experience(&self, draft: ExperienceDraft) -> StoreResult<Experience> {
        let experience: Experience = sqlx::query_as(&format!(
            r#"
            INSERT INTO experiences
                (id, company, role, location, start_date, end_date, description, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {EXPERIENCE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&draft.company)
        .bind(&draft.role)
        .bind(&draft.location)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .bind(&draft.description)
        .bind(draft.order)
        .fetch_one(&self.pool)
        .await?;
        info!(
            "Created experience {} ({} @ {})",
            experience.id, experience.role, experience.company
        );
        Ok(experience)
    }

    async fn update_experience(
        &self,
        id: Uuid,
        draft: ExperienceDraft,
    ) -> StoreResult<Experience> {
        let experience: Option<Experience> = sqlx::query_as(&format!(
            r#"
            UPDATE experiences SET
                company = $2, role = $3, location = $4, start_date = $5,
                end_date = $6, description = $7, sort_order = $8
            WHERE id = $1
            RETURNING {EXPERIENCE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&draft.company)
        .bind(&draft.role)
        .bind(&draft.location)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .bind(&draft.description)
        .bind(draft.order)
        .fetch_optional(&self.pool)
        .await?;
        experience.ok_or(StoreError::NotFound)
    }

    async fn delete_experience(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM experiences WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        affected_one(result.rows_affected())?;
        info!("Deleted experience {id}");
        Ok(())
    }

    async fn set_experience_order(&self, id: Uuid, order: i32) -> StoreResult<Experience> {
        let experience: Option<Experience> = sqlx::query_as(&format!(
            "UPDATE experiences SET sort_order = $2 WHERE id = $1 RETURNING {EXPERIENCE_COLUMNS}"
        ))
        .bind(id)
        .bind(order)
        .fetch_optional(&self.pool)
        .await?;
        experience.ok_or(StoreError::NotFound)
    }

    async fn list_services(&self, filter: &ListFilter) -> StoreResult<Vec<Service>> {
        Ok(sqlx::query_as(&format!(
            r#"
            SELECT {SERVICE_COLUMNS} FROM services
            WHERE ($1::text IS NULL OR title ILIKE $1 OR summary ILIKE $1)
              AND ($2::text IS NULL OR category = $2)
            ORDER BY sort_order, title
            "#
        ))
        .bind(filter.search().map(like_pattern))
        .bind(filter.category())
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_service(&self, id: Uuid) -> StoreResult<Option<Service>> {
        Ok(
            sqlx::query_as(&format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_service(&self, draft: ServiceDraft) -> StoreResult<Service> {
        let service: Service = sqlx::query_as(&format!(
            r#"
            INSERT INTO services (id, title, summary, icon, price, category, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SERVICE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&draft.title)
        .bind(&draft.summary)
        .bind(&draft.icon)
        .bind(&draft.price)
        .bind(draft.category.code())
        .bind(draft.order)
        .fetch_one(&self.pool)
        .await?;
        info!("Created service {} ({})", service.id, service.title);
        Ok(service)
    }

    async fn update_service(&self, id: Uuid, draft: ServiceDraft) -> StoreResult<Service> {
        let service: Option<Service> = sqlx::query_as(&format!(
            r#"
            UPDATE services SET
                title = $2, summary = $3, icon = $4, price = $5, category = $6, sort_order = $7
            WHERE id = $1
            RETURNING {SERVICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.summary)
        .bind(&draft.icon)
        .bind(&draft.price)
        .bind(draft.category.code())
        .bind(draft.order)
        .fetch_optional(&self.pool)
        .await?;
        service.ok_or(StoreError::NotFound)
    }

    async fn delete_service(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        affected_one(result.rows_affected())?;
        info!("Deleted service {id}");
        Ok(())
    }

    async fn set_service_order(&self, id: Uuid, order: i32) -> StoreResult<Service> {
        let service: Option<Service> = sqlx::query_as(&format!(
            "UPDATE services SET sort_order = $2 WHERE id = $1 RETURNING {SERVICE_COLUMNS}"
        ))
        .bind(id)
        .bind(order)
        .fetch_optional(&self.pool)
        .await?;
        service.ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl AccountRepository for PgStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let created: User = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (id, username, email, password_hash, is_staff)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_staff)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, "A user with that username"))?;
        info!("Created user {} ({})", created.id, created.username);
        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
                .bind(username)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn username_taken(&self, username: &str) -> StoreResult<bool> {
        Ok(sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE lower(username) = lower($1))",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn preferences(&self, user_id: Uuid) -> StoreResult<UserPreference> {
        sqlx::query(
            "INSERT INTO user_preferences (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, "Preferences"))?;

        Ok(sqlx::query_as(&format!(
            "SELECT {PREFERENCE_COLUMNS} FROM user_preferences WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn save_preferences(&self, prefs: &UserPreference) -> StoreResult<UserPreference> {
        let saved: UserPreference = sqlx::query_as(&format!(
            r#"
            INSERT INTO user_preferences
                (user_id, theme, reduce_motion, accent, density, default_section,
                 show_email, show_phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE SET
                theme = EXCLUDED.theme,
                reduce_motion = EXCLUDED.reduce_motion,
                accent = EXCLUDED.accent,
                density = EXCLUDED.density,
                default_section = EXCLUDED.default_section,
                show_email = EXCLUDED.show_email,
                show_phone = EXCLUDED.show_phone
            RETURNING {PREFERENCE_COLUMNS}
            "#
        ))
        .bind(prefs.user_id)
        .bind(&prefs.theme)
        .bind(prefs.reduce_motion)
        .bind(&prefs.accent)
        .bind(&prefs.density)
        .bind(&prefs.default_section)
        .bind(prefs.show_email)
        .bind(prefs.show_phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, "Preferences"))?;
        info!("Saved preferences for user {}", saved.user_id);
        Ok(saved)
    }

    async fn list_preferences(
        &self,
        filter: &PreferenceFilter,
    ) -> StoreResult<Vec<PreferenceListing>> {
        Ok(sqlx::query_as(
            r#"
            SELECT p.user_id, u.username, p.theme, p.reduce_motion
            FROM user_preferences p
            JOIN users u ON u.id = p.user_id
            WHERE ($1::text IS NULL OR p.theme = $1)
              AND ($2::bool IS NULL OR p.reduce_motion = $2)
            ORDER BY u.username
            "#,
        )
        .bind(filter.theme.as_deref())
        .bind(filter.reduce_motion)
        .fetch_all(&self.pool)
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_affected_one_reports_missing_rows() {
        assert!(matches!(affected_one(0), Err(StoreError::NotFound)));
        assert!(affected_one(1).is_ok());
    }
}
