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
use hifz_types::api::{Claims, CreateMemorizeResponse, MemorizeRequest, StatusResponse};

use crate::auth::AppState;
use crate::convert::memorize_from_row;
use crate::error::ApiError;
use crate::run_blocking;

const NOT_FOUND: &str = "Memorize record not found";

/// Al-Baqarah, the longest surah.
const MAX_AYAH: i32 = 286;

/// GET /memorizes: the caller's records, oldest first.
pub async fn list_memorizes(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let memorizes = run_blocking(move || {
        let rows = state.db.list_memorizes_for_user(&claims.username)?;
        Ok(rows.into_iter().map(memorize_from_row).collect::<Vec<_>>())
    })
    .await?;

    Ok(Json(memorizes))
}

pub async fn get_memorize(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;

    let memorize = run_blocking(move || {
        state
            .db
            .get_memorize(id, &claims.username)?
            .map(memorize_from_row)
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.into()))
    })
    .await?;

    Ok(Json(memorize))
}

pub async fn create_memorize(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<MemorizeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    validate(&req)?;

    let username = claims.username.clone();
    let memorize_id = run_blocking(move || {
        state
            .db
            .create_memorize(&username, &req)
            .map_err(|e| match e {
                // Token outlived its account
                DbError::NotFound => ApiError::Unauthorized,
                other => other.into(),
            })
    })
    .await?;

    info!("Memorize {} created by {}", memorize_id, claims.username);

    Ok((StatusCode::CREATED, Json(CreateMemorizeResponse { memorize_id })))
}

/// PUT /memorizes/{id}: replaces every editable field, returns the stored record.
pub async fn update_memorize(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<MemorizeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;
    let Json(req) = payload?;
    validate(&req)?;

    let memorize = run_blocking(move || {
        state
            .db
            .update_memorize(id, &claims.username, &req)
            .map_err(not_found)?;
        state
            .db
            .get_memorize(id, &claims.username)?
            .map(memorize_from_row)
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.into()))
    })
    .await?;

    Ok(Json(memorize))
}

pub async fn delete_memorize(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;

    let username = claims.username.clone();
    run_blocking(move || state.db.delete_memorize(id, &username).map_err(not_found)).await?;

    info!("Memorize {} deleted by {}", id, claims.username);

    Ok(Json(StatusResponse::new("Memorize record deleted")))
}

fn not_found(err: DbError) -> ApiError {
    match err {
        DbError::NotFound => ApiError::NotFound(NOT_FOUND.into()),
        other => other.into(),
    }
}

fn validate(req: &MemorizeRequest) -> Result<(), ApiError> {
    if req.surah_name.trim().is_empty() {
        return Err(ApiError::Validation("surah_name is required".into()));
    }
    if !(0..=MAX_AYAH).contains(&req.total_ayah) {
        return Err(ApiError::Validation(format!(
            "total_ayah must be between 0 and {}",
            MAX_AYAH
        )));
    }
    if let (Some(started), Some(completed)) = (req.date_started, req.date_completed) {
        if completed < started {
            return Err(ApiError::Validation(
                "date_completed is before date_started".into(),
            ));
        }
    }
    Ok(())
}
