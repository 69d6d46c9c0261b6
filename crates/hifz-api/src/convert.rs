//! Row → API model conversion. SQLite hands timestamps back as TEXT.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use hifz_db::models::{MemorizeRow, PhotoRow, UserRow};
use hifz_types::models::{Account, Memorize, Photo};

use crate::error::ApiError;

/// Accepts RFC 3339 (how request dates are stored) and SQLite's
/// `datetime('now')` form, which has no timezone and is UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>().ok().or_else(|| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|ndt| ndt.and_utc())
    })
}

fn timestamp_or_default(raw: &str, field: &str, owner: &str) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap_or_else(|| {
        warn!("Corrupt {} '{}' on {}", field, raw, owner);
        DateTime::default()
    })
}

fn optional_timestamp(raw: Option<&str>, field: &str, owner: &str) -> Option<DateTime<Utc>> {
    let raw = raw?;
    let parsed = parse_timestamp(raw);
    if parsed.is_none() {
        warn!("Corrupt {} '{}' on {}", field, raw, owner);
    }
    parsed
}

fn user_id_or_default(raw: &str, owner: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt user_id '{}' on {}: {}", raw, owner, e);
        Uuid::default()
    })
}

pub fn account_from_row(row: UserRow) -> Result<Account, ApiError> {
    let id = row
        .id
        .parse::<Uuid>()
        .map_err(|e| ApiError::Internal(format!("corrupt user id '{}': {}", row.id, e)))?;
    let owner = format!("user '{}'", row.username);

    Ok(Account {
        id,
        created_at: timestamp_or_default(&row.created_at, "created_at", &owner),
        username: row.username,
        fullname: row.fullname,
        description: row.description,
        profile_pic: row.profile_pic,
    })
}

pub fn memorize_from_row(row: MemorizeRow) -> Memorize {
    let owner = format!("memorize {}", row.id);

    Memorize {
        id: row.id,
        user_id: user_id_or_default(&row.user_id, &owner),
        surah_name: row.surah_name,
        ayah_range: row.ayah_range,
        total_ayah: row.total_ayah,
        date_started: optional_timestamp(row.date_started.as_deref(), "date_started", &owner),
        date_completed: optional_timestamp(row.date_completed.as_deref(), "date_completed", &owner),
        review_frequency: row.review_frequency,
        last_review_date: optional_timestamp(
            row.last_review_date.as_deref(),
            "last_review_date",
            &owner,
        ),
        accuracy_level: row.accuracy_level,
        next_review_date: optional_timestamp(
            row.next_review_date.as_deref(),
            "next_review_date",
            &owner,
        ),
        notes: row.notes,
        created_at: timestamp_or_default(&row.created_at, "created_at", &owner),
        updated_at: timestamp_or_default(&row.updated_at, "updated_at", &owner),
    }
}

pub fn photo_from_row(row: PhotoRow) -> Photo {
    let owner = format!("photo {}", row.id);

    Photo {
        id: row.id,
        user_id: user_id_or_default(&row.user_id, &owner),
        url: row.url,
        caption: row.caption,
        created_at: timestamp_or_default(&row.created_at, "created_at", &owner),
        updated_at: timestamp_or_default(&row.updated_at, "updated_at", &owner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_sqlite_and_rfc3339_timestamps() {
        let sqlite = parse_timestamp("2024-05-06 07:08:09").unwrap();
        assert_eq!((sqlite.year(), sqlite.month(), sqlite.day()), (2024, 5, 6));
        assert_eq!(sqlite.hour(), 7);

        let rfc = parse_timestamp("2024-05-06T07:08:09+00:00").unwrap();
        assert_eq!(rfc, sqlite);

        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn corrupt_account_id_is_internal() {
        let row = UserRow {
            id: "not-a-uuid".into(),
            username: "user".into(),
            password: String::new(),
            fullname: String::new(),
            description: String::new(),
            profile_pic: String::new(),
            created_at: "2024-05-06 07:08:09".into(),
            updated_at: "2024-05-06 07:08:09".into(),
        };
        assert!(matches!(account_from_row(row), Err(ApiError::Internal(_))));
    }
}
