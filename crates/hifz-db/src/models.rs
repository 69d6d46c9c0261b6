//! Database row types. These map directly to SQLite rows.
//! Distinct from hifz-types API models to keep the DB layer independent.
//! Timestamps are kept as the TEXT SQLite stores.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub fullname: String,
    pub description: String,
    pub profile_pic: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Insert payload for `create_user`; `password_hash` must already be hashed.
pub struct NewUser<'a> {
    pub id: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub fullname: &'a str,
    pub description: &'a str,
    pub profile_pic: &'a str,
}

pub struct MemorizeRow {
    pub id: i64,
    pub user_id: String,
    pub surah_name: String,
    pub ayah_range: String,
    pub total_ayah: i32,
    pub date_started: Option<String>,
    pub date_completed: Option<String>,
    pub review_frequency: String,
    pub last_review_date: Option<String>,
    pub accuracy_level: String,
    pub next_review_date: Option<String>,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

pub struct PhotoRow {
    pub id: i64,
    pub user_id: String,
    pub url: String,
    pub caption: String,
    pub created_at: String,
    pub updated_at: String,
}
