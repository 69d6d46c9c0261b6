use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public view of a registered account. The password hash never leaves the
/// database layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub fullname: String,
    pub description: String,
    pub profile_pic: String,
    pub created_at: DateTime<Utc>,
}

/// A memorization-tracking entry: one surah (or part of it) a user is
/// learning, with its review schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memorize {
    pub id: i64,
    pub user_id: Uuid,
    pub surah_name: String,
    pub ayah_range: String,
    pub total_ayah: i32,
    pub date_started: Option<DateTime<Utc>>,
    pub date_completed: Option<DateTime<Utc>>,
    pub review_frequency: String,
    pub last_review_date: Option<DateTime<Utc>>,
    pub accuracy_level: String,
    pub next_review_date: Option<DateTime<Utc>>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    pub user_id: Uuid,
    pub url: String,
    pub caption: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
