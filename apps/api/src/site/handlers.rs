use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::info;

use crate::auth::extract::{clear_session_cookie, session_cookie};
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::Viewer;
use crate::errors::AppError;
use crate::forms::account::USERNAME_TAKEN;
use crate::forms::{FieldErrors, LoginForm, PreferenceForm, RegisterForm};
use crate::models::{ServiceCategory, User};
use crate::site::context::SiteContext;
use crate::site::pages::{
    index_page, login_page, not_found_page, preferences_page, profile_page, register_page,
    HomeData,
};
use crate::state::AppState;
use crate::store::{ListFilter, NewUser, StoreError};

const PREFERENCES_LOGIN_URL: &str = "/login/?next=/preferences/";

/// Only same-site absolute paths are followed after login.
pub fn safe_next(next: Option<&str>) -> &str {
    match next.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path
        }
        _ => "/",
    }
}

fn invalid_form(html: String) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response()
}

async fn start_session(state: &AppState, user: &User, target: &str) -> Result<Response, AppError> {
    let token = state.sessions.create(user.id).await?;
    let cookie = session_cookie(
        &token,
        state.config.session_ttl_secs,
        state.config.cookie_secure,
    );
    info!("User '{}' logged in", user.username);
    Ok(([(SET_COOKIE, cookie)], Redirect::to(target)).into_response())
}

/// GET /
pub async fn handle_index(
    State(state): State<AppState>,
    viewer: Viewer,
) -> Result<Html<String>, AppError> {
    let ctx = SiteContext::load(&state, &viewer).await?;
    let everything = ListFilter::default();

    let skills = state.portfolio.list_skills(&everything).await?;
    let (services_management, services_normal): (Vec<_>, Vec<_>) = state
        .portfolio
        .list_services(&everything)
        .await?
        .into_iter()
        .partition(|service| service.category() == ServiceCategory::Management);

    let (projects, experiences) = if viewer.is_authenticated() {
        (
            state.portfolio.list_projects(&everything).await?,
            state.portfolio.list_experiences(&everything).await?,
        )
    } else {
        (Vec::new(), Vec::new())
    };

    let home = HomeData {
        skills,
        projects,
        experiences,
        services_management,
        services_normal,
    };
    Ok(Html(index_page(&ctx, &home, &state.config.media_base_url)))
}

/// GET /profile/
pub async fn handle_profile(
    State(state): State<AppState>,
    viewer: Viewer,
) -> Result<Response, AppError> {
    let ctx = SiteContext::load(&state, &viewer).await?;
    let Some(profile) = ctx.profile.clone() else {
        return Ok((
            StatusCode::NOT_FOUND,
            Html(not_found_page(&ctx, "Profile not found")),
        )
            .into_response());
    };
    Ok(Html(profile_page(&ctx, &profile, &state.config.media_base_url)).into_response())
}

/// Fallback for unmatched paths.
pub async fn handle_not_found(
    State(state): State<AppState>,
    viewer: Viewer,
) -> Result<Response, AppError> {
    let ctx = SiteContext::load(&state, &viewer).await?;
    Ok((
        StatusCode::NOT_FOUND,
        Html(not_found_page(&ctx, "The page you requested does not exist.")),
    )
        .into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct SavedQuery {
    pub saved: Option<String>,
}

/// GET /preferences/
pub async fn handle_preferences(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(query): Query<SavedQuery>,
) -> Result<Response, AppError> {
    if !viewer.is_authenticated() {
        return Ok(Redirect::to(PREFERENCES_LOGIN_URL).into_response());
    }
    let ctx = SiteContext::load(&state, &viewer).await?;
    let prefs = match &ctx.prefs {
        Some(prefs) => prefs.clone(),
        None => match &viewer.user {
            Some(user) => state.accounts.preferences(user.id).await?,
            None => return Ok(Redirect::to(PREFERENCES_LOGIN_URL).into_response()),
        },
    };
    let form = PreferenceForm::from_preference(&prefs);
    let saved = query.saved.is_some();
    Ok(Html(preferences_page(&ctx, &form, &FieldErrors::default(), saved)).into_response())
}

/// POST /preferences/
pub async fn handle_preferences_submit(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<PreferenceForm>,
) -> Result<Response, AppError> {
    let Some(user) = viewer.user.clone() else {
        return Ok(Redirect::to(PREFERENCES_LOGIN_URL).into_response());
    };

    match form.clean(user.id) {
        Ok(prefs) => {
            state.accounts.save_preferences(&prefs).await?;
            info!("Saved preferences for user '{}'", user.username);
            Ok(Redirect::to("/preferences/?saved=1").into_response())
        }
        Err(errors) => {
            let ctx = SiteContext::load(&state, &viewer).await?;
            Ok(invalid_form(preferences_page(&ctx, &form, &errors, false)))
        }
    }
}

/// GET /register/
pub async fn handle_register(
    State(state): State<AppState>,
    viewer: Viewer,
) -> Result<Response, AppError> {
    if viewer.is_authenticated() {
        return Ok(Redirect::to("/").into_response());
    }
    let ctx = SiteContext::load(&state, &viewer).await?;
    Ok(Html(register_page(&ctx, &RegisterForm::default(), &FieldErrors::default())).into_response())
}

/// POST /register/
pub async fn handle_register_submit(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    if viewer.is_authenticated() {
        return Ok(Redirect::to("/").into_response());
    }

    let taken = state.accounts.username_taken(form.username.trim()).await?;
    let registration = match form.clean(taken) {
        Ok(registration) => registration,
        Err(errors) => {
            let ctx = SiteContext::load(&state, &viewer).await?;
            return Ok(invalid_form(register_page(&ctx, &form, &errors)));
        }
    };

    let password_hash = hash_password_blocking(registration.password).await?;
    let created = state
        .accounts
        .create_user(NewUser {
            username: registration.username,
            email: registration.email,
            password_hash,
            is_staff: false,
        })
        .await;

    let user = match created {
        Ok(user) => user,
        // Lost a race with a concurrent registration of the same name.
        Err(StoreError::Conflict(_)) => {
            let mut errors = FieldErrors::default();
            errors.add("username", USERNAME_TAKEN);
            let ctx = SiteContext::load(&state, &viewer).await?;
            return Ok(invalid_form(register_page(&ctx, &form, &errors)));
        }
        Err(e) => return Err(e.into()),
    };

    info!("Registered user '{}'", user.username);
    start_session(&state, &user, "/").await
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// GET /login/
pub async fn handle_login(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(query): Query<NextQuery>,
) -> Result<Response, AppError> {
    if viewer.is_authenticated() {
        return Ok(Redirect::to(safe_next(query.next.as_deref())).into_response());
    }
    let ctx = SiteContext::load(&state, &viewer).await?;
    let form = LoginForm {
        next: query.next,
        ..LoginForm::default()
    };
    Ok(Html(login_page(&ctx, &form, &FieldErrors::default())).into_response())
}

/// POST /login/
pub async fn handle_login_submit(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let target = safe_next(form.next.as_deref()).to_string();

    let errors = match form.clean() {
        Ok((username, password)) => {
            if let Some(user) = state.accounts.find_user_by_username(&username).await? {
                if verify_password_blocking(password, user.password_hash.clone()).await {
                    return start_session(&state, &user, &target).await;
                }
            }
            LoginForm::invalid_credentials()
        }
        Err(errors) => errors,
    };

    let ctx = SiteContext::load(&state, &viewer).await?;
    Ok(invalid_form(login_page(&ctx, &form, &errors)))
}

/// POST /logout/
pub async fn handle_logout(
    State(state): State<AppState>,
    viewer: Viewer,
) -> Result<Response, AppError> {
    if let Some(token) = &viewer.session_token {
        state.sessions.destroy(token).await?;
    }
    if let Some(user) = &viewer.user {
        info!("User '{}' logged out", user.username);
    }
    let cookie = clear_session_cookie(state.config.cookie_secure);
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_accepts_local_paths() {
        assert_eq!(safe_next(Some("/preferences/")), "/preferences/");
        assert_eq!(safe_next(Some("/profile/?tab=1")), "/profile/?tab=1");
    }

    #[test]
    fn test_safe_next_rejects_offsite_targets() {
        assert_eq!(safe_next(None), "/");
        assert_eq!(safe_next(Some("")), "/");
        assert_eq!(safe_next(Some("https://evil.example")), "/");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("/\\evil.example")), "/");
    }
}
