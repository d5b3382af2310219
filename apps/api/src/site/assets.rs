use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;

const MAIN_JS: &str = include_str!("../../static/main.js");
const SITE_CSS: &str = include_str!("../../static/site.css");
const CACHE_POLICY: &str = "public, max-age=3600";

/// GET /static/main.js
pub async fn handle_main_js() -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (CACHE_CONTROL, CACHE_POLICY),
        ],
        MAIN_JS,
    )
}

/// GET /static/site.css
pub async fn handle_site_css() -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "text/css; charset=utf-8"),
            (CACHE_CONTROL, CACHE_POLICY),
        ],
        SITE_CSS,
    )
}
