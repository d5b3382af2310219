//! Staff-only JSON API for managing portfolio content.

pub mod extract;
pub mod handlers;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::media::MAX_PHOTO_BYTES;
use crate::state::AppState;

/// Multipart framing on top of the photo itself.
const PHOTO_UPLOAD_OVERHEAD: usize = 64 * 1024;

/// Routes mounted under `/api/v1/admin`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(handlers::handle_get_profile).put(handlers::handle_put_profile),
        )
        .route(
            "/profile/photo",
            post(handlers::handle_upload_photo)
                .layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES + PHOTO_UPLOAD_OVERHEAD)),
        )
        .route(
            "/skills",
            get(handlers::handle_list_skills).post(handlers::handle_create_skill),
        )
        .route(
            "/skills/:id",
            get(handlers::handle_get_skill)
                .put(handlers::handle_update_skill)
                .delete(handlers::handle_delete_skill),
        )
        .route("/skills/:id/order", patch(handlers::handle_order_skill))
        .route(
            "/projects",
            get(handlers::handle_list_projects).post(handlers::handle_create_project),
        )
        .route(
            "/projects/:id",
            get(handlers::handle_get_project)
                .put(handlers::handle_update_project)
                .delete(handlers::handle_delete_project),
        )
        .route("/projects/:id/order", patch(handlers::handle_order_project))
        .route(
            "/experiences",
            get(handlers::handle_list_experiences).post(handlers::handle_create_experience),
        )
        .route(
            "/experiences/:id",
            get(handlers::handle_get_experience)
                .put(handlers::handle_update_experience)
                .delete(handlers::handle_delete_experience),
        )
        .route(
            "/experiences/:id/order",
            patch(handlers::handle_order_experience),
        )
        .route(
            "/services",
            get(handlers::handle_list_services).post(handlers::handle_create_service),
        )
        .route(
            "/services/:id",
            get(handlers::handle_get_service)
                .put(handlers::handle_update_service)
                .delete(handlers::handle_delete_service),
        )
        .route("/services/:id/order", patch(handlers::handle_order_service))
        .route("/preferences", get(handlers::handle_list_preferences))
}
