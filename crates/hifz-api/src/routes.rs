use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{self, AppState};
use crate::error::ApiError;
use crate::memorizes;
use crate::middleware::require_auth;
use crate::photos;

/// Full HTTP surface. CORS and request tracing are layered on by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/users", post(auth::register))
        .route("/signin", post(auth::login))
        .route("/signout", post(auth::logout));

    // route_layer: unmatched paths fall through to the 404 fallback, not 401
    let protected_routes = Router::new()
        .route(
            "/memorizes",
            get(memorizes::list_memorizes).post(memorizes::create_memorize),
        )
        .route(
            "/memorizes/{id}",
            get(memorizes::get_memorize)
                .put(memorizes::update_memorize)
                .delete(memorizes::delete_memorize),
        )
        .route("/photos", get(photos::list_photos).post(photos::create_photo))
        .route(
            "/photos/{id}",
            get(photos::get_photo).delete(photos::delete_photo),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(state)
}

pub async fn health() -> &'static str {
    "OK"
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Page not found".into())
}
