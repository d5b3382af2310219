pub mod health;


use axum::{
    routing::{get, post},
    Router,
};

use crate::admin;
use crate::export::handlers as export;
use crate::site::{assets, handlers as site};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Public site
        .route("/", get(site::handle_index))
        .route("/profile/", get(site::handle_profile))
        .route(
            "/preferences/",
            get(site::handle_preferences).post(site::handle_preferences_submit),
        )
        .route(
            "/register/",
            get(site::handle_register).post(site::handle_register_submit),
        )
        .route(
            "/login/",
            get(site::handle_login).post(site::handle_login_submit),
        )
        .route("/logout/", post(site::handle_logout))
        // Downloads
        .route("/profile/download", get(export::handle_download_json))
        .route("/profile/download.vcf", get(export::handle_download_vcard))
        .route("/profile/download.pdf", get(export::handle_download_pdf))
        // Embedded assets
        .route("/static/main.js", get(assets::handle_main_js))
        .route("/static/site.css", get(assets::handle_site_css))
        // Content management
        .nest("/api/v1/admin", admin::router())
        .fallback(site::handle_not_found)
        .with_state(state)
}
