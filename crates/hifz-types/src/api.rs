use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Account;

// -- JWT Claims --

/// Claims carried by every bearer token. `sub` is the account id; record
/// ownership is resolved through `username`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub iat: usize,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub fullname: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    #[serde(default)]
    pub profile_pic: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub status: String,
    pub user: Account,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: String,
    pub token: String,
    pub user: Account,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self { status: status.into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// -- Memorizes --

/// Body of `POST /memorizes` and `PUT /memorizes/{id}`. Owner fields sent by
/// the client are ignored; the owner always comes from the bearer token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorizeRequest {
    pub surah_name: String,
    #[serde(default)]
    pub ayah_range: String,
    #[serde(default)]
    pub total_ayah: i32,
    #[serde(default)]
    pub date_started: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_completed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_frequency: String,
    #[serde(default)]
    pub last_review_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub accuracy_level: String,
    #[serde(default)]
    pub next_review_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMemorizeResponse {
    pub memorize_id: i64,
}

// -- Photos --

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoRequest {
    pub url: String,
    #[serde(default)]
    pub caption: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePhotoResponse {
    pub photo_id: i64,
}
