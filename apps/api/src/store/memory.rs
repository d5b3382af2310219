//! In-memory repositories for handler tests. Ordering and conflict rules
//! mirror the PostgreSQL implementation.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use super::{
    matches_search, AccountRepository, ListFilter, NewUser, PortfolioRepository,
    PreferenceFilter, PreferenceListing, StoreError, StoreResult,
};
use crate::forms::{ExperienceDraft, ProfileDraft, ProjectDraft, ServiceDraft, SkillDraft};
use crate::models::{
    Experience, Profile, Project, ProjectWithSkills, Service, Skill, User, UserPreference,
};

// Same ORDER BY clauses as the PostgreSQL queries.

fn skill_order(a: &Skill, b: &Skill) -> Ordering {
    a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name))
}

/// Undated projects lead, then newest `start_date` first.
fn project_order(a: &Project, b: &Project) -> Ordering {
    a.order
        .cmp(&b.order)
        .then_with(|| match (a.start_date, b.start_date) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => y.cmp(&x),
        })
        .then_with(|| a.title.cmp(&b.title))
}

fn experience_order(a: &Experience, b: &Experience) -> Ordering {
    a.order
        .cmp(&b.order)
        .then_with(|| b.start_date.cmp(&a.start_date))
}

fn service_order(a: &Service, b: &Service) -> Ordering {
    a.order.cmp(&b.order).then_with(|| a.title.cmp(&b.title))
}

/// Overwrites the editable fields, keeping identity and the uploaded photo.
fn apply_profile(draft: ProfileDraft, profile: &mut Profile) {
    profile.full_name = draft.full_name;
    profile.title = draft.title;
    profile.bio = draft.bio;
    profile.location = draft.location;
    profile.email = draft.email;
    profile.phone = draft.phone;
    profile.website_url = draft.website_url;
    profile.github_url = draft.github_url;
    profile.linkedin_url = draft.linkedin_url;
    profile.photo_url = draft.photo_url;
    profile.resume_url = draft.resume_url;
}

#[derive(Default)]
struct State {
    profiles: Vec<Profile>,
    skills: Vec<Skill>,
    projects: Vec<(Project, Vec<Uuid>)>,
    experiences: Vec<Experience>,
    services: Vec<Service>,
    users: Vec<User>,
    preferences: Vec<UserPreference>,
}

impl State {
    fn with_skills(&self, project: &Project, skill_ids: &[Uuid]) -> ProjectWithSkills {
        let mut skills: Vec<Skill> = self
            .skills
            .iter()
            .filter(|s| skill_ids.contains(&s.id))
            .cloned()
            .collect();
        skills.sort_by(skill_order);
        ProjectWithSkills {
            project: project.clone(),
            skills,
        }
    }

    fn check_skill_ids(&self, ids: &[Uuid]) -> StoreResult<()> {
        match ids
            .iter()
            .find(|id| !self.skills.iter().any(|s| s.id == **id))
        {
            Some(_) => Err(StoreError::InvalidReference(
                "Project skill references a missing record".to_string(),
            )),
            None => Ok(()),
        }
    }

    fn skill_name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
        self.skills
            .iter()
            .any(|s| s.name == name && Some(s.id) != except)
    }
}

#[derive(Default, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("store mutex poisoned")
    }
}

#[async_trait]
impl PortfolioRepository for MemoryStore {
    async fn first_profile(&self) -> StoreResult<Option<Profile>> {
        let state = self.lock();
        Ok(state
            .profiles
            .iter()
            .min_by_key(|p| (p.created_at, p.id))
            .cloned())
    }

    async fn save_profile(&self, draft: ProfileDraft) -> StoreResult<Profile> {
        let mut state = self.lock();
        let first = state
            .profiles
            .iter_mut()
            .min_by_key(|p| (p.created_at, p.id));
        if let Some(profile) = first {
            apply_profile(draft, profile);
            return Ok(profile.clone());
        }
        // Later inserts must sort after earlier ones even within one clock tick.
        let created_at = Utc::now() + Duration::microseconds(state.profiles.len() as i64);
        let mut profile = Profile {
            id: Uuid::new_v4(),
            full_name: String::new(),
            title: String::new(),
            bio: String::new(),
            location: String::new(),
            email: String::new(),
            phone: String::new(),
            website_url: String::new(),
            github_url: String::new(),
            linkedin_url: String::new(),
            photo_key: None,
            photo_url: String::new(),
            resume_url: String::new(),
            created_at,
        };
        apply_profile(draft, &mut profile);
        state.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn set_profile_photo(&self, photo_key: &str) -> StoreResult<Profile> {
        let mut state = self.lock();
        let profile = state
            .profiles
            .iter_mut()
            .min_by_key(|p| (p.created_at, p.id))
            .ok_or(StoreError::NotFound)?;
        profile.photo_key = Some(photo_key.to_string());
        Ok(profile.clone())
    }

    async fn list_skills(&self, filter: &ListFilter) -> StoreResult<Vec<Skill>> {
        let state = self.lock();
        let mut skills: Vec<Skill> = state
            .skills
            .iter()
            .filter(|s| filter.search().map_or(true, |q| matches_search(q, &[&s.name])))
            .filter(|s| filter.category().map_or(true, |c| s.category == c))
            .cloned()
            .collect();
        skills.sort_by(skill_order);
        Ok(skills)
    }

    async fn get_skill(&self, id: Uuid) -> StoreResult<Option<Skill>> {
        Ok(self.lock().skills.iter().find(|s| s.id == id).cloned())
    }

    async fn create_skill(&self, draft: SkillDraft) -> StoreResult<Skill> {
        let mut state = self.lock();
        if state.skill_name_taken(&draft.name, None) {
            return Err(StoreError::Conflict(
                "Skill with this name already exists".to_string(),
            ));
        }
        let skill = Skill {
            id: Uuid::new_v4(),
            name: draft.name,
            level: draft.level,
            category: draft.category.code().to_string(),
            order: draft.order,
        };
        state.skills.push(skill.clone());
        Ok(skill)
    }

    async fn update_skill(&self, id: Uuid, draft: SkillDraft) -> StoreResult<Skill> {
        let mut state = self.lock();
        if state.skill_name_taken(&draft.name, Some(id)) {
            return Err(StoreError::Conflict(
                "Skill with this name already exists".to_string(),
            ));
        }
        let skill = state
            .skills
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound)?;
        skill.name = draft.name;
        skill.level = draft.level;
        skill.category = draft.category.code().to_string();
        skill.order = draft.order;
        Ok(skill.clone())
    }

    async fn delete_skill(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.lock();
        let before = state.skills.len();
        state.skills.retain(|s| s.id != id);
        if state.skills.len() == before {
            return Err(StoreError::NotFound);
        }
        for (_, skill_ids) in state.projects.iter_mut() {
            skill_ids.retain(|sid| *sid != id);
        }
        Ok(())
    }

    async fn set_skill_order(&self, id: Uuid, order: i32) -> StoreResult<Skill> {
        let mut state = self.lock();
        let skill = state
            .skills
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound)?;
        skill.order = order;
        Ok(skill.clone())
    }

    async fn list_projects(&self, filter: &ListFilter) -> StoreResult<Vec<ProjectWithSkills>> {
        let state = self.lock();
        let mut projects: Vec<&(Project, Vec<Uuid>)> = state
            .projects
            .iter()
            .filter(|(p, _)| {
                filter
                    .search()
                    .map_or(true, |q| matches_search(q, &[&p.title, &p.description]))
            })
            .collect();
        projects.sort_by(|(a, _), (b, _)| project_order(a, b));
        Ok(projects
            .into_iter()
            .map(|(p, ids)| state.with_skills(p, ids))
            .collect())
    }

    async fn get_project(&self, id: Uuid) -> StoreResult<Option<ProjectWithSkills>> {
        let state = self.lock();
        Ok(state
            .projects
            .iter()
            .find(|(p, _)| p.id == id)
            .map(|(p, ids)| state.with_skills(p, ids)))
    }

    async fn create_project(&self, draft: ProjectDraft) -> StoreResult<ProjectWithSkills> {
        let mut state = self.lock();
        state.check_skill_ids(&draft.skill_ids)?;
        let project = Project {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            project_url: draft.project_url,
            repo_url: draft.repo_url,
            image_url: draft.image_url,
            start_date: draft.start_date,
            end_date: draft.end_date,
            order: draft.order,
        };
        let view = state.with_skills(&project, &draft.skill_ids);
        state.projects.push((project, draft.skill_ids));
        Ok(view)
    }

    async fn update_project(
        &self,
        id: Uuid,
        draft: ProjectDraft,
    ) -> StoreResult<ProjectWithSkills> {
        let mut state = self.lock();
        state.check_skill_ids(&draft.skill_ids)?;
        let (project, skill_ids) = state
            .projects
            .iter_mut()
            .find(|(p, _)| p.id == id)
            .ok_or(StoreError::NotFound)?;
        project.title = draft.title;
        project.description = draft.description;
        project.project_url = draft.project_url;
        project.repo_url = draft.repo_url;
        project.image_url = draft.image_url;
        project.start_date = draft.start_date;
        project.end_date = draft.end_date;
        project.order = draft.order;
        *skill_ids = draft.skill_ids;
        let (project, skill_ids) = (project.clone(), skill_ids.clone());
        Ok(state.with_skills(&project, &skill_ids))
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.lock();
        let before = state.projects.len();
        state.projects.retain(|(p, _)| p.id != id);
        if state.projects.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn set_project_order(&self, id: Uuid, order: i32) -> StoreResult<ProjectWithSkills> {
        let mut state = self.lock();
        let (project, skill_ids) = state
            .projects
            .iter_mut()
            .find(|(p, _)| p.id == id)
            .ok_or(StoreError::NotFound)?;
        project.order = order;
        let (project, skill_ids) = (project.clone(), skill_ids.clone());
        Ok(state.with_skills(&project, &skill_ids))
    }

    async fn list_experiences(&self, filter: &ListFilter) -> StoreResult<Vec<Experience>> {
        let state = self.lock();
        let mut items: Vec<Experience> = state
            .experiences
            .iter()
            .filter(|e| {
                filter.search().map_or(true, |q| {
                    matches_search(q, &[&e.role, &e.company, &e.description])
                })
            })
            .filter(|e| filter.company().map_or(true, |c| e.company == c))
            .cloned()
            .collect();
        items.sort_by(experience_order);
        Ok(items)
    }

    async fn get_experience(&self, id: Uuid) -> StoreResult<Option<Experience>> {
        Ok(self.lock().experiences.iter().find(|e| e.id == id).cloned())
    }

    async fn create_experience(&self, draft: ExperienceDraft) -> StoreResult<Experience> {
        let experience = Experience {
            id: Uuid::new_v4(),
            company: draft.company,
            role: draft.role,
            location: draft.location,
            start_date: draft.start_date,
            end_date: draft.end_date,
            description: draft.description,
            order: draft.order,
        };
        self.lock().experiences.push(experience.clone());
        Ok(experience)
    }

    async fn update_experience(
        &self,
        id: Uuid,
        draft: ExperienceDraft,
    ) -> StoreResult<Experience> {
        let mut state = self.lock();
        let experience = state
            .experiences
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::NotFound)?;
        experience.company = draft.company;
        experience.role = draft.role;
        experience.location = draft.location;
        experience.start_date = draft.start_date;
        experience.end_date = draft.end_date;
        experience.description = draft.description;
        experience.order = draft.order;
        Ok(experience.clone())
    }

    async fn delete_experience(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.lock();
        let before = state.experiences.len();
        state.experiences.retain(|e| e.id != id);
        if state.experiences.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn set_experience_order(&self, id: Uuid, order: i32) -> StoreResult<Experience> {
        let mut state = self.lock();
        let experience = state
            .experiences
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::NotFound)?;
        experience.order = order;
        Ok(experience.clone())
    }

    async fn list_services(&self, filter: &ListFilter) -> StoreResult<Vec<Service>> {
        let state = self.lock();
        let mut items: Vec<Service> = state
            .services
            .iter()
            .filter(|s| {
                filter
                    .search()
                    .map_or(true, |q| matches_search(q, &[&s.title, &s.summary]))
            })
            .filter(|s| filter.category().map_or(true, |c| s.category == c))
            .cloned()
            .collect();
        items.sort_by(service_order);
        Ok(items)
    }

    async fn get_service(&self, id: Uuid) -> StoreResult<Option<Service>> {
        Ok(self.lock().services.iter().find(|s| s.id == id).cloned())
    }

    async fn create_service(&self, draft: ServiceDraft) -> StoreResult<Service> {
        let service = Service {
            id: Uuid::new_v4(),
            title: draft.title,
            summary: draft.summary,
            icon: draft.icon,
            price: draft.price,
            category: draft.category.code().to_string(),
            order: draft.order,
        };
        self.lock().services.push(service.clone());
        Ok(service)
    }

    async fn update_service(&self, id: Uuid, draft: ServiceDraft) -> StoreResult<Service> {
        let mut state = self.lock();
        let service = state
            .services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound)?;
        service.title = draft.title;
        service.summary = draft.summary;
        service.icon = draft.icon;
        service.price = draft.price;
        service.category = draft.category.code().to_string();
        service.order = draft.order;
        Ok(service.clone())
    }

    async fn delete_service(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.lock();
        let before = state.services.len();
        state.services.retain(|s| s.id != id);
        if state.services.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn set_service_order(&self, id: Uuid, order: i32) -> StoreResult<Service> {
        let mut state = self.lock();
        let service = state
            .services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound)?;
        service.order = order;
        Ok(service.clone())
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut state = self.lock();
        let lowered = user.username.to_lowercase();
        if state
            .users
            .iter()
            .any(|u| u.username.to_lowercase() == lowered)
        {
            return Err(StoreError::Conflict(
                "A user with that username already exists".to_string(),
            ));
        }
        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            is_staff: user.is_staff,
            created_at: Utc::now(),
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn username_taken(&self, username: &str) -> StoreResult<bool> {
        let lowered = username.to_lowercase();
        Ok(self
            .lock()
            .users
            .iter()
            .any(|u| u.username.to_lowercase() == lowered))
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn preferences(&self, user_id: Uuid) -> StoreResult<UserPreference> {
        let mut state = self.lock();
        if !state.users.iter().any(|u| u.id == user_id) {
            return Err(StoreError::InvalidReference(
                "Preferences references a missing record".to_string(),
            ));
        }
        if let Some(prefs) = state.preferences.iter().find(|p| p.user_id == user_id) {
            return Ok(prefs.clone());
        }
        let prefs = UserPreference::defaults(user_id);
        state.preferences.push(prefs.clone());
        Ok(prefs)
    }

    async fn save_preferences(&self, prefs: &UserPreference) -> StoreResult<UserPreference> {
        let mut state = self.lock();
        match state
            .preferences
            .iter_mut()
            .find(|p| p.user_id == prefs.user_id)
        {
            Some(existing) => *existing = prefs.clone(),
            None => state.preferences.push(prefs.clone()),
        }
        Ok(prefs.clone())
    }

    async fn list_preferences(
        &self,
        filter: &PreferenceFilter,
    ) -> StoreResult<Vec<PreferenceListing>> {
        let state = self.lock();
        let mut rows: Vec<PreferenceListing> = state
            .preferences
            .iter()
            .filter(|p| filter.theme.as_deref().map_or(true, |t| p.theme == t))
            .filter(|p| filter.reduce_motion.map_or(true, |r| p.reduce_motion == r))
            .filter_map(|p| {
                state
                    .users
                    .iter()
                    .find(|u| u.id == p.user_id)
                    .map(|u| PreferenceListing {
                        user_id: p.user_id,
                        username: u.username.clone(),
                        theme: p.theme.clone(),
                        reduce_motion: p.reduce_motion,
                    })
            })
            .collect();
        rows.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::experience::sample_experience;
    use crate::models::skill::sample_skill;
    use crate::models::SkillCategory;

    fn project(title: &str, order: i32, start: Option<(i32, u32)>) -> Project {
        Project {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            project_url: String::new(),
            repo_url: String::new(),
            image_url: String::new(),
            start_date: start.and_then(|(y, m)| chrono::NaiveDate::from_ymd_opt(y, m, 1)),
            end_date: None,
            order,
        }
    }

    #[test]
    fn test_skill_order_by_order_then_name() {
        let mut skills = vec![
            sample_skill("Rust", SkillCategory::Language, 1),
            sample_skill("Go", SkillCategory::Language, 1),
            sample_skill("Docker", SkillCategory::Tool, 0),
        ];
        skills.sort_by(skill_order);
        let names: Vec<_> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Docker", "Go", "Rust"]);
    }

    #[test]
    fn test_project_order_newest_first_with_undated_leading() {
        let mut projects = vec![
            project("Old", 0, Some((2019, 1))),
            project("New", 0, Some((2023, 6))),
            project("Undated", 0, None),
            project("Ancient", 0, Some((2010, 1))),
            project("Later", 1, Some((2024, 1))),
            project("Beta", 2, Some((2020, 1))),
            project("Alpha", 2, Some((2020, 1))),
        ];
        projects.sort_by(project_order);
        let titles: Vec<_> = projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Undated", "New", "Old", "Ancient", "Later", "Alpha", "Beta"]
        );
    }

    #[test]
    fn test_experience_order_newest_first_within_order() {
        let mut items = vec![
            sample_experience("Old", (2015, 1), Some((2016, 1))),
            sample_experience("New", (2022, 1), None),
        ];
        items.sort_by(experience_order);
        assert_eq!(items[0].company, "New");
    }

    fn skill(name: &str, order: i32) -> SkillDraft {
        SkillDraft {
            name: name.to_string(),
            level: String::new(),
            category: SkillCategory::Language,
            order,
        }
    }

    #[tokio::test]
    async fn test_duplicate_skill_name_conflicts() {
        let store = MemoryStore::default();
        store.create_skill(skill("Rust", 0)).await.unwrap();
        let err = store.create_skill(skill("Rust", 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_deleting_skill_detaches_it_from_projects() {
        let store = MemoryStore::default();
        let rust = store.create_skill(skill("Rust", 0)).await.unwrap();
        let project = store
            .create_project(ProjectDraft {
                title: "Site".to_string(),
                description: String::new(),
                project_url: String::new(),
                repo_url: String::new(),
                image_url: String::new(),
                start_date: None,
                end_date: None,
                skill_ids: vec![rust.id],
                order: 0,
            })
            .await
            .unwrap();
        assert_eq!(project.skills.len(), 1);

        store.delete_skill(rust.id).await.unwrap();
        let reloaded = store.get_project(project.project.id).await.unwrap().unwrap();
        assert!(reloaded.skills.is_empty());
    }

    #[tokio::test]
    async fn test_save_profile_updates_the_first_profile() {
        let store = MemoryStore::default();
        let draft = |name: &str| ProfileDraft {
            full_name: name.to_string(),
            title: String::new(),
            bio: String::new(),
            location: String::new(),
            email: String::new(),
            phone: String::new(),
            website_url: String::new(),
            github_url: String::new(),
            linkedin_url: String::new(),
            photo_url: String::new(),
            resume_url: String::new(),
        };
        let first = store.save_profile(draft("Ada")).await.unwrap();
        let second = store.save_profile(draft("Ada Lovelace")).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(
            store.first_profile().await.unwrap().unwrap().full_name,
            "Ada Lovelace"
        );
    }
}
