use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use hifz_db::DbError;
use hifz_types::api::{Claims, CreatePhotoResponse, PhotoRequest, StatusResponse};

use crate::auth::AppState;
use crate::convert::photo_from_row;
use crate::error::ApiError;
use crate::run_blocking;

const NOT_FOUND: &str = "Photo not found";

pub async fn list_photos(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let photos = run_blocking(move || {
        let rows = state.db.list_photos_for_user(&claims.username)?;
        Ok(rows.into_iter().map(photo_from_row).collect::<Vec<_>>())
    })
    .await?;

    Ok(Json(photos))
}

pub async fn get_photo(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;

    let photo = run_blocking(move || {
        state
            .db
            .get_photo(id, &claims.username)?
            .map(photo_from_row)
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.into()))
    })
    .await?;

    Ok(Json(photo))
}

pub async fn create_photo(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<PhotoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    if req.url.trim().is_empty() {
        return Err(ApiError::Validation("url is required".into()));
    }

    let username = claims.username.clone();
    let photo_id = run_blocking(move || {
        state.db.create_photo(&username, &req).map_err(|e| match e {
            DbError::NotFound => ApiError::Unauthorized,
            other => other.into(),
        })
    })
    .await?;

    info!("Photo {} created by {}", photo_id, claims.username);

    Ok((StatusCode::CREATED, Json(CreatePhotoResponse { photo_id })))
}

pub async fn delete_photo(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;

    let username = claims.username.clone();
    run_blocking(move || {
        state.db.delete_photo(id, &username).map_err(|e| match e {
            DbError::NotFound => ApiError::NotFound(NOT_FOUND.into()),
            other => other.into(),
        })
    })
    .await?;

    info!("Photo {} deleted by {}", id, claims.username);

    Ok(Json(StatusResponse::new("Photo deleted")))
}
