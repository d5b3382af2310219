use axum::{
    extract::State,
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::info;

use crate::auth::Viewer;
use crate::errors::AppError;
use crate::export::json::ProfileExport;
use crate::export::pdf::{render_profile_pdf, ProfileDocument};
use crate::export::vcard::render_vcard;
use crate::models::Profile;
use crate::state::AppState;
use crate::store::ListFilter;

fn ensure_download_allowed(state: &AppState, viewer: &Viewer) -> Result<(), AppError> {
    if state.config.downloads_require_login && !viewer.is_authenticated() {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

async fn require_profile(state: &AppState) -> Result<Profile, AppError> {
    state
        .portfolio
        .first_profile()
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

/// GET /profile/download
pub async fn handle_download_json(
    State(state): State<AppState>,
    viewer: Viewer,
) -> Result<Response, AppError> {
    ensure_download_allowed(&state, &viewer)?;
    let Some(profile) = state.portfolio.first_profile().await? else {
        return Ok((StatusCode::NOT_FOUND, Json(json!({ "error": "No profile" }))).into_response());
    };

    Ok((
        [(CONTENT_DISPOSITION, "attachment; filename=\"profile.json\"")],
        Json(ProfileExport::from(&profile)),
    )
        .into_response())
}

/// GET /profile/download.vcf
pub async fn handle_download_vcard(
    State(state): State<AppState>,
    viewer: Viewer,
) -> Result<Response, AppError> {
    ensure_download_allowed(&state, &viewer)?;
    let profile = require_profile(&state).await?;
    let photo = profile.display_photo_url(&state.config.media_base_url);
    let card = render_vcard(&profile, photo.as_deref());

    Ok((
        [
            (CONTENT_TYPE, "text/vcard; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"contact.vcf\""),
        ],
        card,
    )
        .into_response())
}

/// GET /profile/download.pdf
pub async fn handle_download_pdf(
    State(state): State<AppState>,
    viewer: Viewer,
) -> Result<Response, AppError> {
    ensure_download_allowed(&state, &viewer)?;
    let profile = require_profile(&state).await?;

    let everything = ListFilter::default();
    let experiences = state.portfolio.list_experiences(&everything).await?;
    let skills = state.portfolio.list_skills(&everything).await?;
    let projects = state
        .portfolio
        .list_projects(&everything)
        .await?
        .into_iter()
        .map(|entry| entry.project)
        .collect();

    let document = ProfileDocument {
        profile,
        experiences,
        skills,
        projects,
    };
    let config = state.page_config.clone();
    let bytes = tokio::task::spawn_blocking(move || render_profile_pdf(&document, &config))
        .await
        .map_err(|e| AppError::Export(format!("PDF task failed: {e}")))??;

    info!("Generated profile PDF ({} bytes)", bytes.len());
    Ok((
        [
            (CONTENT_TYPE, "application/pdf"),
            (CONTENT_DISPOSITION, "attachment; filename=\"profile.pdf\""),
        ],
        bytes,
    )
        .into_response())
}
