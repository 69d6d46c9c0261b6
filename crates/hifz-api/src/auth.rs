use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};

use hifz_db::Database;
use hifz_types::api::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, StatusResponse};

use crate::error::ApiError;
use crate::run_blocking;
use crate::service::AccountService;
use crate::token::TokenAuthority;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenAuthority,
}

impl AppStateInner {
    pub fn new(db: Database, tokens: TokenAuthority) -> Self {
        Self { db, tokens }
    }

    pub fn accounts(&self) -> AccountService<'_> {
        AccountService::new(&self.db, &self.tokens)
    }
}

/// POST /users
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let account = run_blocking(move || state.accounts().register(req)).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            status: "Created".into(),
            user: account,
        }),
    ))
}

/// POST /signin
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let (account, token) =
        run_blocking(move || state.accounts().login(&req.username, &req.password)).await?;

    Ok(Json(LoginResponse {
        status: "Logged in".into(),
        token,
        user: account,
    }))
}

/// POST /signout. Tokens are stateless, so the client just drops its copy.
pub async fn logout() -> Json<StatusResponse> {
    Json(StatusResponse::new("Logged out"))
}
