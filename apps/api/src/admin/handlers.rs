use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::auth::StaffUser;
use crate::errors::AppError;
use crate::forms::{
    ExperienceInput, OrderUpdate, ProfileInput, ProjectInput, ServiceInput, SkillInput,
};
use crate::media::prepare_photo;
use crate::models::{Experience, Profile, ProjectWithSkills, Service, Skill};
use crate::state::AppState;
use crate::store::{ListFilter, PreferenceFilter, PreferenceListing};

fn not_found(what: &str, id: Uuid) -> AppError {
    AppError::NotFound(format!("{what} {id} not found"))
}

/// A profile plus the photo URL the site will actually display.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub display_photo_url: Option<String>,
}

impl ProfileResponse {
    fn new(profile: Profile, state: &AppState) -> Self {
        let display_photo_url = profile.display_photo_url(&state.config.media_base_url);
        Self {
            profile,
            display_photo_url,
        }
    }
}

// ── Profile ─────────────────────────────────────────────────────────────────

/// GET /api/v1/admin/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    _staff: StaffUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state
        .portfolio
        .first_profile()
        .await?
        .ok_or_else(|| AppError::NotFound("No profile has been created".to_string()))?;
    Ok(Json(ProfileResponse::new(profile, &state)))
}

/// PUT /api/v1/admin/profile
pub async fn handle_put_profile(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    ApiJson(input): ApiJson<ProfileInput>,
) -> Result<Json<ProfileResponse>, AppError> {
    let draft = input.clean()?;
    let profile = state.portfolio.save_profile(draft).await?;
    info!("Profile updated by '{}'", staff.username);
    Ok(Json(ProfileResponse::new(profile, &state)))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("The uploaded photo is too large".to_string())
    } else {
        AppError::Validation(err.body_text())
    }
}

/// POST /api/v1/admin/profile/photo
/// Multipart form with a single `photo` file field.
pub async fn handle_upload_photo(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    mut multipart: Multipart,
) -> Result<Json<ProfileResponse>, AppError> {
    let Some(current) = state.portfolio.first_profile().await? else {
        return Err(AppError::NotFound(
            "Create the profile before uploading a photo".to_string(),
        ));
    };

    let mut photo: Option<Bytes> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("photo") {
            photo = Some(field.bytes().await.map_err(multipart_error)?);
            break;
        }
    }
    let bytes = photo.ok_or_else(|| AppError::Validation("Missing 'photo' file field".to_string()))?;

    let (key, kind) = prepare_photo(&bytes)?;
    state
        .media
        .put(&key, kind.content_type(), bytes)
        .await?;
    let profile = state.portfolio.set_profile_photo(&key).await?;
    info!("Profile photo {key} uploaded by '{}'", staff.username);

    if let Some(previous) = current.photo_key.filter(|old| !old.is_empty() && *old != key) {
        if let Err(e) = state.media.delete(&previous).await {
            warn!("Could not remove replaced photo {previous}: {e}");
        }
    }
    Ok(Json(ProfileResponse::new(profile, &state)))
}

// ── Skills ──────────────────────────────────────────────────────────────────

/// GET /api/v1/admin/skills
pub async fn handle_list_skills(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiQuery(filter): ApiQuery<ListFilter>,
) -> Result<Json<Vec<Skill>>, AppError> {
    Ok(Json(state.portfolio.list_skills(&filter).await?))
}

/// POST /api/v1/admin/skills
pub async fn handle_create_skill(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiJson(input): ApiJson<SkillInput>,
) -> Result<(StatusCode, Json<Skill>), AppError> {
    let skill = state.portfolio.create_skill(input.clean()?).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

/// GET /api/v1/admin/skills/:id
pub async fn handle_get_skill(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Skill>, AppError> {
    let skill = state
        .portfolio
        .get_skill(id)
        .await?
        .ok_or_else(|| not_found("Skill", id))?;
    Ok(Json(skill))
}

/// PUT /api/v1/admin/skills/:id
pub async fn handle_update_skill(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<SkillInput>,
) -> Result<Json<Skill>, AppError> {
    Ok(Json(state.portfolio.update_skill(id, input.clean()?).await?))
}

/// DELETE /api/v1/admin/skills/:id
pub async fn handle_delete_skill(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.portfolio.delete_skill(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/admin/skills/:id/order
pub async fn handle_order_skill(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<OrderUpdate>,
) -> Result<Json<Skill>, AppError> {
    Ok(Json(state.portfolio.set_skill_order(id, update.clean()?).await?))
}

// ── Projects ────────────────────────────────────────────────────────────────

/// GET /api/v1/admin/projects
pub async fn handle_list_projects(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiQuery(filter): ApiQuery<ListFilter>,
) -> Result<Json<Vec<ProjectWithSkills>>, AppError> {
    Ok(Json(state.portfolio.list_projects(&filter).await?))
}

/// POST /api/v1/admin/projects
pub async fn handle_create_project(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiJson(input): ApiJson<ProjectInput>,
) -> Result<(StatusCode, Json<ProjectWithSkills>), AppError> {
    let project = state.portfolio.create_project(input.clean()?).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/admin/projects/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ProjectWithSkills>, AppError> {
    let project = state
        .portfolio
        .get_project(id)
        .await?
        .ok_or_else(|| not_found("Project", id))?;
    Ok(Json(project))
}

/// PUT /api/v1/admin/projects/:id
pub async fn handle_update_project(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<ProjectInput>,
) -> Result<Json<ProjectWithSkills>, AppError> {
    Ok(Json(state.portfolio.update_project(id, input.clean()?).await?))
}

/// DELETE /api/v1/admin/projects/:id
pub async fn handle_delete_project(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.portfolio.delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/admin/projects/:id/order
pub async fn handle_order_project(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<OrderUpdate>,
) -> Result<Json<ProjectWithSkills>, AppError> {
    Ok(Json(state.portfolio.set_project_order(id, update.clean()?).await?))
}

// ── Experiences ─────────────────────────────────────────────────────────────

/// GET /api/v1/admin/experiences
pub async fn handle_list_experiences(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiQuery(filter): ApiQuery<ListFilter>,
) -> Result<Json<Vec<Experience>>, AppError> {
    Ok(Json(state.portfolio.list_experiences(&filter).await?))
}

/// POST /api/v1/admin/experiences
pub async fn handle_create_experience(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiJson(input): ApiJson<ExperienceInput>,
) -> Result<(StatusCode, Json<Experience>), AppError> {
    let experience = state.portfolio.create_experience(input.clean()?).await?;
    Ok((StatusCode::CREATED, Json(experience)))
}

/// GET /api/v1/admin/experiences/:id
pub async fn handle_get_experience(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Experience>, AppError> {
    let experience = state
        .portfolio
        .get_experience(id)
        .await?
        .ok_or_else(|| not_found("Experience", id))?;
    Ok(Json(experience))
}

/// PUT /api/v1/admin/experiences/:id
pub async fn handle_update_experience(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<ExperienceInput>,
) -> Result<Json<Experience>, AppError> {
    Ok(Json(state.portfolio.update_experience(id, input.clean()?).await?))
}

/// DELETE /api/v1/admin/experiences/:id
pub async fn handle_delete_experience(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.portfolio.delete_experience(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/admin/experiences/:id/order
pub async fn handle_order_experience(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<OrderUpdate>,
) -> Result<Json<Experience>, AppError> {
    Ok(Json(
        state
            .portfolio
            .set_experience_order(id, update.clean()?)
            .await?,
    ))
}

// ── Services ────────────────────────────────────────────────────────────────

/// GET /api/v1/admin/services
pub async fn handle_list_services(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiQuery(filter): ApiQuery<ListFilter>,
) -> Result<Json<Vec<Service>>, AppError> {
    Ok(Json(state.portfolio.list_services(&filter).await?))
}

/// POST /api/v1/admin/services
pub async fn handle_create_service(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiJson(input): ApiJson<ServiceInput>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    let service = state.portfolio.create_service(input.clean()?).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// GET /api/v1/admin/services/:id
pub async fn handle_get_service(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Service>, AppError> {
    let service = state
        .portfolio
        .get_service(id)
        .await?
        .ok_or_else(|| not_found("Service", id))?;
    Ok(Json(service))
}

/// PUT /api/v1/admin/services/:id
pub async fn handle_update_service(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<ServiceInput>,
) -> Result<Json<Service>, AppError> {
    Ok(Json(state.portfolio.update_service(id, input.clean()?).await?))
}

/// DELETE /api/v1/admin/services/:id
pub async fn handle_delete_service(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.portfolio.delete_service(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/admin/services/:id/order
pub async fn handle_order_service(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<OrderUpdate>,
) -> Result<Json<Service>, AppError> {
    Ok(Json(state.portfolio.set_service_order(id, update.clean()?).await?))
}

// ── Preferences ─────────────────────────────────────────────────────────────

/// GET /api/v1/admin/preferences
pub async fn handle_list_preferences(
    State(state): State<AppState>,
    _staff: StaffUser,
    ApiQuery(filter): ApiQuery<PreferenceFilter>,
) -> Result<Json<Vec<PreferenceListing>>, AppError> {
    Ok(Json(state.accounts.list_preferences(&filter).await?))
}
