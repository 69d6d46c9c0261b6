use hifz_types::api::{MemorizeRequest, PhotoRequest};
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::debug;

use crate::models::{MemorizeRow, NewUser, PhotoRow, UserRow};
use crate::{Database, DbError, Result};

/// Resolves the live account id for a username; NULL when there is none, so
/// any comparison against it matches nothing.
const OWNER_ID: &str = "(SELECT id FROM users WHERE username = ?2 AND deleted_at IS NULL)";

const USER_COLUMNS: &str =
    "id, username, password, fullname, description, profile_pic, created_at, updated_at";

const MEMORIZE_COLUMNS: &str = "id, user_id, surah_name, ayah_range, total_ayah, date_started, \
     date_completed, review_frequency, last_review_date, accuracy_level, next_review_date, notes, \
     created_at, updated_at";

const PHOTO_COLUMNS: &str = "id, user_id, url, caption, created_at, updated_at";

impl Database {
    // -- Users --

    pub fn create_user(&self, user: &NewUser<'_>) -> Result<String> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password, fullname, description, profile_pic)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (
                    user.id,
                    user.username,
                    user.password_hash,
                    user.fullname,
                    user.description,
                    user.profile_pic,
                ),
            )?;
            debug!("Created user {} ({})", user.username, user.id);
            Ok(user.id.to_string())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    // Frees the username; the account's records stay but become unreachable.
    pub fn soft_delete_user(&self, username: &str) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET deleted_at = datetime('now'), updated_at = datetime('now')
                 WHERE username = ?1 AND deleted_at IS NULL",
                [username],
            )?;
            expect_changed(changed)
        })
    }

    // -- Memorizes --

    /// Inserts a record owned by `username`. The owner lookup and the insert
    /// are one statement.
    pub fn create_memorize(&self, username: &str, m: &MemorizeRequest) -> Result<i64> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "INSERT INTO memorizes (user_id, surah_name, ayah_range, total_ayah, date_started,
                     date_completed, review_frequency, last_review_date, accuracy_level,
                     next_review_date, notes)
                 SELECT id, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11
                 FROM users WHERE username = ?1 AND deleted_at IS NULL",
                rusqlite::params![
                    username,
                    m.surah_name,
                    m.ayah_range,
                    m.total_ayah,
                    m.date_started.map(|d| d.to_rfc3339()),
                    m.date_completed.map(|d| d.to_rfc3339()),
                    m.review_frequency,
                    m.last_review_date.map(|d| d.to_rfc3339()),
                    m.accuracy_level,
                    m.next_review_date.map(|d| d.to_rfc3339()),
                    m.notes,
                ],
            )?;
            expect_changed(changed)?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_memorize(&self, id: i64, username: &str) -> Result<Option<MemorizeRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {MEMORIZE_COLUMNS} FROM memorizes
                 WHERE id = ?1 AND deleted_at IS NULL AND user_id = {OWNER_ID}"
            );
            let row = conn
                .query_row(&sql, rusqlite::params![id, username], memorize_from_row)
                .optional()?;
            Ok(row)
        })
    }

    /// All live records of `username`, oldest first. Empty for an unknown user.
    pub fn list_memorizes_for_user(&self, username: &str) -> Result<Vec<MemorizeRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {MEMORIZE_COLUMNS} FROM memorizes
                 WHERE deleted_at IS NULL
                   AND user_id = (SELECT id FROM users WHERE username = ?1 AND deleted_at IS NULL)
                 ORDER BY id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([username], memorize_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_memorize(&self, id: i64, username: &str, m: &MemorizeRequest) -> Result<()> {
        self.with_conn(|conn| {
            let sql = format!(
                "UPDATE memorizes SET
                     surah_name = ?3, ayah_range = ?4, total_ayah = ?5, date_started = ?6,
                     date_completed = ?7, review_frequency = ?8, last_review_date = ?9,
                     accuracy_level = ?10, next_review_date = ?11, notes = ?12,
                     updated_at = datetime('now')
                 WHERE id = ?1 AND deleted_at IS NULL AND user_id = {OWNER_ID}"
            );
            let changed = conn.execute(
                &sql,
                rusqlite::params![
                    id,
                    username,
                    m.surah_name,
                    m.ayah_range,
                    m.total_ayah,
                    m.date_started.map(|d| d.to_rfc3339()),
                    m.date_completed.map(|d| d.to_rfc3339()),
                    m.review_frequency,
                    m.last_review_date.map(|d| d.to_rfc3339()),
                    m.accuracy_level,
                    m.next_review_date.map(|d| d.to_rfc3339()),
                    m.notes,
                ],
            )?;
            expect_changed(changed)
        })
    }

    pub fn delete_memorize(&self, id: i64, username: &str) -> Result<()> {
        self.with_conn(|conn| soft_delete_owned(conn, "memorizes", id, username))
    }

    // -- Photos --

    pub fn create_photo(&self, username: &str, p: &PhotoRequest) -> Result<i64> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "INSERT INTO photos (user_id, url, caption)
                 SELECT id, ?2, ?3 FROM users WHERE username = ?1 AND deleted_at IS NULL",
                (username, &p.url, &p.caption),
            )?;
            expect_changed(changed)?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_photo(&self, id: i64, username: &str) -> Result<Option<PhotoRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {PHOTO_COLUMNS} FROM photos
                 WHERE id = ?1 AND deleted_at IS NULL AND user_id = {OWNER_ID}"
            );
            let row = conn
                .query_row(&sql, rusqlite::params![id, username], photo_from_row)
                .optional()?;
            Ok(row)
        })
    }

    pub fn list_photos_for_user(&self, username: &str) -> Result<Vec<PhotoRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {PHOTO_COLUMNS} FROM photos
                 WHERE deleted_at IS NULL
                   AND user_id = (SELECT id FROM users WHERE username = ?1 AND deleted_at IS NULL)
                 ORDER BY id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([username], photo_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn delete_photo(&self, id: i64, username: &str) -> Result<()> {
        self.with_conn(|conn| soft_delete_owned(conn, "photos", id, username))
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1 AND deleted_at IS NULL");
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                fullname: row.get(3)?,
                description: row.get(4)?,
                profile_pic: row.get(5)?,
                created_at: row.get(6)?,
                updated_at: row.get(7)?,
            })
        })
        .optional()?;

    Ok(row)
}

// `table` is always one of our own literals, never caller input.
fn soft_delete_owned(conn: &Connection, table: &str, id: i64, username: &str) -> Result<()> {
    let sql = format!(
        "UPDATE {table} SET deleted_at = datetime('now')
         WHERE id = ?1 AND deleted_at IS NULL AND user_id = {OWNER_ID}"
    );
    let changed = conn.execute(&sql, rusqlite::params![id, username])?;
    expect_changed(changed)
}

fn expect_changed(changed: usize) -> Result<()> {
    if changed == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

fn memorize_from_row(row: &Row<'_>) -> rusqlite::Result<MemorizeRow> {
    Ok(MemorizeRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        surah_name: row.get(2)?,
        ayah_range: row.get(3)?,
        total_ayah: row.get(4)?,
        date_started: row.get(5)?,
        date_completed: row.get(6)?,
        review_frequency: row.get(7)?,
        last_review_date: row.get(8)?,
        accuracy_level: row.get(9)?,
        next_review_date: row.get(10)?,
        notes: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

fn photo_from_row(row: &Row<'_>) -> rusqlite::Result<PhotoRow> {
    Ok(PhotoRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        url: row.get(2)?,
        caption: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
